//! Captured dynamic segments.
//!
//! Storage is inline for the common case of a handful of dynamic segments.

use smallvec::SmallVec;

const INLINE_CAPTURES: usize = 4;

/// Values captured from `{name}` and `*name` segments, in path order.
///
/// # Example
///
/// ```rust
/// use folio_router::Params;
///
/// let mut params = Params::new();
/// params.push("slug", "hello-world");
///
/// assert_eq!(params.get("slug"), Some("hello-world"));
/// assert_eq!(params.get("id"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    captures: SmallVec<[(String, String); INLINE_CAPTURES]>,
}

impl Params {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a capture.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.captures.push((name.into(), value.into()));
    }

    /// First value captured under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v.as_str()))
    }

    /// Number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// True when nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Drops captures past `len`. Used when the matcher backs out of a branch.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.captures.truncate(len);
    }

    /// Borrowing iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.captures.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = smallvec::IntoIter<[(String, String); INLINE_CAPTURES]>;

    fn into_iter(self) -> Self::IntoIter {
        self.captures.into_iter()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            captures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_capture() {
        let mut params = Params::new();
        params.push("id", "1");
        params.push("id", "2");
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_truncate_backs_out_captures() {
        let mut params = Params::new();
        params.push("org", "acme");
        let mark = params.len();
        params.push("user", "42");
        params.truncate(mark);
        assert_eq!(params.get("user"), None);
        assert_eq!(params.get("org"), Some("acme"));
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let params: Params = (0..9).map(|i| (format!("k{i}"), format!("v{i}"))).collect();
        assert_eq!(params.len(), 9);
        assert_eq!(params.get("k8"), Some("v8"));
    }

    #[test]
    fn test_owned_iteration_keeps_order() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");
        let pairs: Vec<_> = params.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
