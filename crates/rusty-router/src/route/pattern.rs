//! Segment classification for file-based route addresses
//!
//! Pure functional parsing of directory names into typed segments.
//! All functions are **pure**: same input → same output, no side effects.

/// One directory component of a page address
///
/// # Examples
///
/// ```
/// use rusty_router::route::pattern::{classify_segment, Segment};
///
/// assert_eq!(classify_segment("posts"), Segment::Static("posts".into()));
/// assert_eq!(classify_segment("[id]"), Segment::Dynamic("id".into()));
/// assert_eq!(classify_segment("[...slug]"), Segment::CatchAll("slug".into()));
///
/// // Malformed brackets degrade to literal text
/// assert_eq!(classify_segment("[id"), Segment::Static("[id".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched exactly
    Static(String),
    /// `[name]`: exactly one path component
    Dynamic(String),
    /// `[...name]`: one or more trailing path components
    CatchAll(String),
}

impl Segment {
    /// Parameter bound by this segment, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Dynamic(name) | Segment::CatchAll(name) => Some(name),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAll(_))
    }

    /// Regex fragment matching this segment (without the leading `/`)
    ///
    /// Dynamic segments capture one or more non-`/` characters; catch-all
    /// segments capture one or more characters of any kind.
    pub fn regex_fragment(&self) -> String {
        match self {
            Segment::Static(text) => regex::escape(text),
            Segment::Dynamic(_) => "([^/]+)".to_string(),
            Segment::CatchAll(_) => "(.+)".to_string(),
        }
    }
}

/// Classifies a directory name into a segment (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Catch-all**: `[...name]`
/// 2. **Dynamic**: `[name]`
/// 3. **Static**: anything else, including malformed bracket syntax
///    (`[id`, `[]`, `[...]`, `[[...slug]]`)
pub fn classify_segment(segment: &str) -> Segment {
    match segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => match inner.strip_prefix("...") {
            Some(name) if is_param_name(name) => Segment::CatchAll(name.to_string()),
            Some(_) => Segment::Static(segment.to_string()),
            None if is_param_name(inner) => Segment::Dynamic(inner.to_string()),
            None => Segment::Static(segment.to_string()),
        },
        None => Segment::Static(segment.to_string()),
    }
}

/// Whether a static segment looks like a mis-authored parameter
pub fn is_malformed(segment: &str) -> bool {
    segment.contains('[') || segment.contains(']')
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['[', ']', '/'])
}
