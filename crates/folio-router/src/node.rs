//! Segment tree used by [`Router`](crate::Router).
//!
//! Each node is one path segment. A node may hold a route (the pattern it was
//! registered under plus the stored value) and has three kinds of children:
//! literal segments kept sorted for binary search, at most one named
//! parameter, and at most one catch-all.

use crate::error::InsertError;
use crate::params::Params;

/// Kind of a pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Matches the segment text exactly (`todo`).
    Static,
    /// Matches any single segment and captures it (`{id}`).
    Param(String),
    /// Matches one or more trailing segments and captures them joined by `/` (`*slug`).
    CatchAll(String),
}

/// A route stored at a node.
#[derive(Debug, Clone)]
pub struct Leaf<T> {
    /// Normalized pattern the route was registered under.
    pub pattern: String,
    /// The stored value.
    pub value: T,
}

/// A node in the segment tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    segment: String,
    kind: SegmentKind,
    leaf: Option<Leaf<T>>,
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    catch_all_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: String, kind: SegmentKind) -> Self {
        Self {
            segment,
            kind,
            leaf: None,
            static_children: Vec::new(),
            param_child: None,
            catch_all_child: None,
        }
    }

    /// The empty root segment.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind(String::new(), SegmentKind::Static)
    }

    /// The segment text as written in the pattern.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// What this segment matches.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Splits a pattern into typed segments, dropping empty ones.
    pub(crate) fn parse_pattern(pattern: &str) -> Result<Vec<(String, SegmentKind)>, InsertError> {
        let empty_name = || InsertError::EmptyParamName {
            pattern: pattern.to_string(),
        };
        pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
                    if name.is_empty() {
                        return Err(empty_name());
                    }
                    Ok((s.to_string(), SegmentKind::Param(name.to_string())))
                } else if let Some(name) = s.strip_prefix('*') {
                    if name.is_empty() {
                        return Err(empty_name());
                    }
                    Ok((s.to_string(), SegmentKind::CatchAll(name.to_string())))
                } else {
                    Ok((s.to_string(), SegmentKind::Static))
                }
            })
            .collect()
    }

    /// Adds a route below this node.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), InsertError> {
        let segments = Self::parse_pattern(pattern)?;
        let normalized = normalize(&segments);
        if let Some(pos) = segments
            .iter()
            .position(|(_, k)| matches!(k, SegmentKind::CatchAll(_)))
        {
            if pos + 1 != segments.len() {
                return Err(InsertError::CatchAllNotLast {
                    pattern: normalized,
                });
            }
        }
        self.insert_segments(&segments, normalized, value)
    }

    fn insert_segments(
        &mut self,
        segments: &[(String, SegmentKind)],
        pattern: String,
        value: T,
    ) -> Result<(), InsertError> {
        let Some(((segment, kind), rest)) = segments.split_first() else {
            if self.leaf.is_some() {
                return Err(InsertError::Duplicate { pattern });
            }
            self.leaf = Some(Leaf { pattern, value });
            return Ok(());
        };

        let child = match kind {
            SegmentKind::Static => {
                match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(i) => &mut self.static_children[i],
                    Err(i) => {
                        self.static_children
                            .insert(i, Node::with_kind(segment.clone(), SegmentKind::Static));
                        &mut self.static_children[i]
                    }
                }
            }
            SegmentKind::Param(name) | SegmentKind::CatchAll(name) => {
                let slot = if matches!(kind, SegmentKind::Param(_)) {
                    &mut self.param_child
                } else {
                    &mut self.catch_all_child
                };
                let child =
                    slot.get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())));
                if child.kind != *kind {
                    let existing = match &child.kind {
                        SegmentKind::Param(n) | SegmentKind::CatchAll(n) => n.clone(),
                        SegmentKind::Static => String::new(),
                    };
                    return Err(InsertError::ParamNameConflict {
                        pattern,
                        existing,
                        requested: name.clone(),
                    });
                }
                child.as_mut()
            }
        };
        child.insert_segments(rest, pattern, value)
    }

    /// Finds the route for `path`, capturing dynamic segments.
    ///
    /// At every depth literal children are tried first, then the named
    /// parameter, then the catch-all. A branch that fails deeper down is
    /// abandoned and its captures discarded before the next kind is tried.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<(&Leaf<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let leaf = self.lookup_segments(&segments, &mut params)?;
        Some((leaf, params))
    }

    fn lookup_segments<'n>(&'n self, segments: &[&str], params: &mut Params) -> Option<&'n Leaf<T>> {
        let Some((first, rest)) = segments.split_first() else {
            return self.leaf.as_ref();
        };

        if let Some(child) = self.find_static_child(first) {
            if let Some(leaf) = child.lookup_segments(rest, params) {
                return Some(leaf);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.as_str(), *first);
                if let Some(leaf) = child.lookup_segments(rest, params) {
                    return Some(leaf);
                }
                params.truncate(mark);
            }
        }

        let child = self.catch_all_child.as_ref()?;
        let leaf = child.leaf.as_ref()?;
        if let SegmentKind::CatchAll(name) = &child.kind {
            params.push(name.as_str(), segments.join("/"));
        }
        Some(leaf)
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node<T>> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }

    /// Visits every stored route, depth first, literals before dynamic segments.
    pub fn for_each_leaf<'n>(&'n self, visit: &mut impl FnMut(&'n Leaf<T>)) {
        if let Some(leaf) = &self.leaf {
            visit(leaf);
        }
        for child in &self.static_children {
            child.for_each_leaf(visit);
        }
        if let Some(child) = &self.param_child {
            child.for_each_leaf(visit);
        }
        if let Some(child) = &self.catch_all_child {
            child.for_each_leaf(visit);
        }
    }
}

fn normalize(segments: &[(String, SegmentKind)]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().fold(String::new(), |mut acc, (s, _)| {
        acc.push('/');
        acc.push_str(s);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(patterns: &[&'static str]) -> Node<&'static str> {
        let mut root = Node::root();
        for p in patterns {
            root.insert(p, *p).unwrap();
        }
        root
    }

    #[test]
    fn test_parse_pattern_kinds() {
        let segments = Node::<()>::parse_pattern("/docs/{section}/*rest").unwrap();
        assert_eq!(segments[0], ("docs".to_string(), SegmentKind::Static));
        assert_eq!(
            segments[1],
            ("{section}".to_string(), SegmentKind::Param("section".to_string()))
        );
        assert_eq!(
            segments[2],
            ("*rest".to_string(), SegmentKind::CatchAll("rest".to_string()))
        );
    }

    #[test]
    fn test_parse_pattern_rejects_empty_names() {
        assert!(matches!(
            Node::<()>::parse_pattern("/a/{}"),
            Err(InsertError::EmptyParamName { .. })
        ));
        assert!(Node::<()>::parse_pattern("/a/*").is_err());
    }

    #[test]
    fn test_leaf_keeps_normalized_pattern() {
        let mut root = Node::root();
        root.insert("todo//insert/", 1).unwrap();
        let (leaf, _) = root.lookup("/todo/insert").unwrap();
        assert_eq!(leaf.pattern, "/todo/insert");
        assert_eq!(leaf.value, 1);
    }

    #[test]
    fn test_static_children_stay_sorted() {
        let root = tree(&["/c", "/a", "/b"]);
        let names: Vec<_> = root.static_children.iter().map(Node::segment).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_backtracking_discards_param_captures() {
        // "/x/{id}/edit" fails on "/x/1/view" after capturing id, so the
        // catch-all must see a clean capture set.
        let root = tree(&["/x/{id}/edit", "/x/*rest"]);
        let (leaf, params) = root.lookup("/x/1/view").unwrap();
        assert_eq!(leaf.value, "/x/*rest");
        assert_eq!(params.get("id"), None);
        assert_eq!(params.get("rest"), Some("1/view"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_backtracking_from_static_into_param() {
        let root = tree(&["/users/me/settings", "/users/{id}/profile"]);
        let (leaf, params) = root.lookup("/users/me/profile").unwrap();
        assert_eq!(leaf.value, "/users/{id}/profile");
        assert_eq!(params.get("id"), Some("me"));
    }

    #[test]
    fn test_catch_all_requires_a_segment() {
        let root = tree(&["/files/*path"]);
        assert!(root.lookup("/files").is_none());
        assert!(root.lookup("/files/a").is_some());
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut root = tree(&["/a/{id}"]);
        assert_eq!(
            root.insert("/a/{id}/", "again"),
            Err(InsertError::Duplicate {
                pattern: "/a/{id}".to_string()
            })
        );
    }

    #[test]
    fn test_param_name_conflict() {
        let mut root = tree(&["/a/{id}"]);
        let err = root.insert("/a/{slug}/b", "b").unwrap_err();
        assert!(matches!(err, InsertError::ParamNameConflict { ref existing, .. } if existing == "id"));
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let mut root: Node<()> = Node::root();
        assert!(matches!(
            root.insert("/a/*rest/b", ()),
            Err(InsertError::CatchAllNotLast { .. })
        ));
    }

    #[test]
    fn test_for_each_leaf_order() {
        let root = tree(&["/b/*r", "/b/{id}", "/b/x", "/"]);
        let mut seen = Vec::new();
        root.for_each_leaf(&mut |leaf| seen.push(leaf.pattern.clone()));
        assert_eq!(seen, vec!["/", "/b/x", "/b/{id}", "/b/*r"]);
    }
}
