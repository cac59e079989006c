/// Lazy iterator over the directory prefixes of a relative path, root first
///
/// For `posts/[id]/edit`, yields: `` → `posts` → `posts/[id]` → `posts/[id]/edit`
///
/// This is the walk used to resolve a page's layout chain: every prefix is a
/// directory that may hold a layout, visited in root-to-leaf order.
///
/// # Performance
///
/// - **Allocations**: Zero (only borrows from input string)
/// - **Complexity**: O(depth) where depth is path levels
///
/// # Examples
///
/// ```
/// use rusty_router::path::SegmentPrefixes;
///
/// let dirs: Vec<&str> = SegmentPrefixes::new("posts/[id]").collect();
/// assert_eq!(dirs, vec!["", "posts", "posts/[id]"]);
///
/// let dirs: Vec<&str> = SegmentPrefixes::new("").collect();
/// assert_eq!(dirs, vec![""]);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentPrefixes<'a> {
    path: &'a str,
    /// End of the next prefix to yield; `None` once the full path was returned
    next_end: Option<usize>,
}

impl<'a> SegmentPrefixes<'a> {
    pub fn new(path: &'a str) -> Self {
        let path = path.trim_matches('/');
        Self {
            path,
            next_end: Some(0),
        }
    }
}

impl<'a> Iterator for SegmentPrefixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.next_end?;
        let result = &self.path[..end];

        self.next_end = if end >= self.path.len() {
            None
        } else {
            // Skip the separator that follows a non-root prefix
            let start = if end == 0 { 0 } else { end + 1 };
            Some(
                self.path[start..]
                    .find('/')
                    .map(|pos| start + pos)
                    .unwrap_or(self.path.len()),
            )
        };

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_root_first() {
        let dirs: Vec<&str> = SegmentPrefixes::new("a/b/c").collect();
        assert_eq!(dirs, vec!["", "a", "a/b", "a/b/c"]);
    }

    #[test]
    fn test_prefixes_single_segment() {
        let dirs: Vec<&str> = SegmentPrefixes::new("about").collect();
        assert_eq!(dirs, vec!["", "about"]);
    }

    #[test]
    fn test_prefixes_trims_slashes() {
        let dirs: Vec<&str> = SegmentPrefixes::new("/docs/[...slug]/").collect();
        assert_eq!(dirs, vec!["", "docs", "docs/[...slug]"]);
    }

    #[test]
    fn test_prefixes_empty() {
        let dirs: Vec<&str> = SegmentPrefixes::new("").collect();
        assert_eq!(dirs, vec![""]);
    }
}
