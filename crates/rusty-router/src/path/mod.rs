//! Path utilities: mount-prefix handling and normalization
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.
//!
//! Two path spaces exist:
//! - **external** paths, as the browser sees them, carrying the mount prefix (`/frontend/about`)
//! - **internal** route paths, prefix-free (`/about`)

use std::borrow::Cow;

pub mod hierarchy;
pub use hierarchy::SegmentPrefixes;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use rusty_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/frontend"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("frontend"));
/// assert!(!is_valid_path("/frontend/"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
///
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Backslashes: `\path\to` → `/path/to`
///
/// # Examples
///
/// ```
/// use rusty_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/frontend"), Cow::Borrowed("/frontend")));
/// assert_eq!(normalize_path("/frontend/"), "/frontend");
/// assert_eq!(normalize_path("\\frontend\\app"), "/frontend/app");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Ensures a route path starts with `/`
pub fn with_leading_slash(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{}", path))
    }
}

/// The configured mount prefix
///
/// Stored without a trailing slash; the empty string means "no prefix" and
/// turns both conversions into pass-throughs.
///
/// # Examples
///
/// ```
/// use rusty_router::BasePath;
///
/// let base = BasePath::new("/frontend/");
/// assert_eq!(base.add_prefix("/about"), "/frontend/about");
/// assert_eq!(base.strip_prefix("/frontend/about"), "/about");
/// assert_eq!(base.strip_prefix("/frontend"), "/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasePath {
    prefix: String,
}

impl BasePath {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let normalized = normalize_path(trimmed);
        let prefix = if normalized == "/" {
            String::new()
        } else {
            normalized.into_owned()
        };

        Self { prefix }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// External browser path → internal route path
    ///
    /// Paths that do not start with the prefix are returned unchanged.
    pub fn strip_prefix<'a>(&self, external: &'a str) -> Cow<'a, str> {
        if self.prefix.is_empty() {
            return Cow::Borrowed(external);
        }

        match external.strip_prefix(self.prefix.as_str()) {
            Some(rest) => with_leading_slash(rest),
            None => Cow::Borrowed(external),
        }
    }

    /// Internal route path → external browser path
    pub fn add_prefix(&self, internal: &str) -> String {
        let route_path = with_leading_slash(internal);
        if self.prefix.is_empty() {
            route_path.into_owned()
        } else {
            format!("{}{}", self.prefix, route_path)
        }
    }
}
