//! Pattern parsing for page directories
//!
//! Pure functional parsers that transform a page's directory into a
//! matching pattern. All functions are **pure** apart from diagnostics.

use regex::Regex;
use tracing::warn;

use super::pattern::{classify_segment, is_malformed, Segment};

/// Compiled matching rule for one page directory
#[derive(Debug, Clone)]
pub struct ParsedPattern {
    /// Anchored regex over internal paths
    pub regex: Regex,
    /// Parameter names in capture-group order
    pub params: Vec<String>,
    /// Number of static segments
    pub literal_count: usize,
    /// Whether the last segment is a catch-all
    pub has_catch_all: bool,
}

/// Internal state accumulator for fold-based parsing
#[derive(Default)]
struct ParseState {
    fragments: Vec<String>,
    params: Vec<String>,
    literal_count: usize,
    has_catch_all: bool,
}

impl ParseState {
    fn with_segment(mut self, segment: &Segment) -> Self {
        self.fragments.push(segment.regex_fragment());

        match segment {
            Segment::Static(_) => self.literal_count += 1,
            Segment::Dynamic(name) => self.params.push(name.clone()),
            Segment::CatchAll(name) => {
                self.params.push(name.clone());
                self.has_catch_all = true;
            }
        }

        self
    }

    /// Anchors the pattern; no segments compiles to exactly `/`
    fn finalize(self) -> Result<ParsedPattern, regex::Error> {
        let source = format!("^/{}$", self.fragments.join("/"));

        Ok(ParsedPattern {
            regex: Regex::new(&source)?,
            params: self.params,
            literal_count: self.literal_count,
            has_catch_all: self.has_catch_all,
        })
    }
}

/// Splits a page directory into classified segments
///
/// Fail-soft: malformed bracket syntax stays a literal, and a catch-all
/// that is not the final segment is demoted to a literal as well.
///
/// # Examples
///
/// ```
/// use rusty_router::route::parser::parse_segments;
/// use rusty_router::route::pattern::Segment;
///
/// assert_eq!(
///     parse_segments("posts/[id]"),
///     vec![Segment::Static("posts".into()), Segment::Dynamic("id".into())]
/// );
/// assert!(parse_segments("").is_empty());
/// ```
pub fn parse_segments(dir: &str) -> Vec<Segment> {
    let raw: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    let last = raw.len().saturating_sub(1);

    raw.iter()
        .enumerate()
        .map(|(idx, text)| match classify_segment(text) {
            Segment::CatchAll(_) if idx != last => {
                warn!(
                    segment = %text,
                    directory = %dir,
                    "catch-all segment must be last; treating it as literal text"
                );
                Segment::Static(text.to_string())
            }
            Segment::Static(literal) => {
                if is_malformed(&literal) {
                    warn!(
                        segment = %literal,
                        directory = %dir,
                        "malformed route segment; treating it as literal text"
                    );
                }
                Segment::Static(literal)
            }
            segment => segment,
        })
        .collect()
}

/// Builds the anchored matching pattern for a list of segments
///
/// # Examples
///
/// ```
/// use rusty_router::route::parser::{build_pattern, parse_segments};
///
/// let parsed = build_pattern(&parse_segments("docs/[...slug]")).unwrap();
/// assert_eq!(parsed.regex.as_str(), "^/docs/(.+)$");
/// assert_eq!(parsed.params, vec!["slug"]);
/// assert!(parsed.has_catch_all);
///
/// let root = build_pattern(&[]).unwrap();
/// assert_eq!(root.regex.as_str(), "^/$");
/// ```
pub fn build_pattern(segments: &[Segment]) -> Result<ParsedPattern, regex::Error> {
    segments
        .iter()
        .fold(ParseState::default(), ParseState::with_segment)
        .finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_static_pattern() {
        let parsed = build_pattern(&parse_segments("about")).unwrap();
        assert_eq!(parsed.regex.as_str(), "^/about$");
        assert!(parsed.params.is_empty());
        assert_eq!(parsed.literal_count, 1);
        assert!(!parsed.has_catch_all);
    }

    #[test]
    fn test_dynamic_pattern() {
        let parsed = build_pattern(&parse_segments("shop/[category]/[item]")).unwrap();
        assert_eq!(parsed.regex.as_str(), "^/shop/([^/]+)/([^/]+)$");
        assert_eq!(parsed.params, vec!["category", "item"]);
        assert_eq!(parsed.literal_count, 1);
    }

    #[test]
    fn test_literal_is_escaped() {
        let parsed = build_pattern(&parse_segments("v1.0/(group)")).unwrap();
        assert!(parsed.regex.is_match("/v1.0/(group)"));
        assert!(!parsed.regex.is_match("/v1x0/(group)"));
    }

    #[test]
    fn test_non_final_catch_all_is_literal() {
        let segments = parse_segments("[...rest]/edit");
        assert_eq!(
            segments,
            vec![
                Segment::Static("[...rest]".to_string()),
                Segment::Static("edit".to_string())
            ]
        );

        let parsed = build_pattern(&segments).unwrap();
        assert!(parsed.regex.is_match("/[...rest]/edit"));
        assert!(!parsed.has_catch_all);
    }

    #[test]
    fn test_malformed_segment_is_literal() {
        let parsed = build_pattern(&parse_segments("posts/[id")).unwrap();
        assert!(parsed.params.is_empty());
        assert!(parsed.regex.is_match("/posts/[id"));
        assert!(!parsed.regex.is_match("/posts/42"));
    }
}
