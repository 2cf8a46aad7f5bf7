//! Page-file naming convention.
//!
//! Page files live under a pages directory and their relative path decides
//! the URL they answer:
//!
//! | File                    | Pattern          |
//! |-------------------------|------------------|
//! | `index.rs`              | `/`              |
//! | `todo/insert.rs`        | `/todo/insert`   |
//! | `todo/index.rs`         | `/todo`          |
//! | `todo/[id].rs`          | `/todo/{id}`     |
//! | `docs/[...slug].rs`     | `/docs/*slug`    |
//! | `_layout.rs`            | not a route      |
//!
//! Any file or directory whose name starts with `_` is private to the pages
//! tree (layouts, shared helpers) and never becomes a route.

use thiserror::Error;

/// Reasons a page file path cannot be turned into a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConventionError {
    /// A bracketed segment was not closed or had no name.
    #[error("malformed dynamic segment `{segment}` in `{file}`")]
    MalformedSegment {
        /// The page file path.
        file: String,
        /// The offending segment.
        segment: String,
    },

    /// The path was empty after stripping the extension.
    #[error("empty page path")]
    Empty,
}

/// Maps a page file path, relative to the pages root, to a route pattern.
///
/// Returns `Ok(None)` for private files (any segment starting with `_`).
///
/// ```rust
/// use folio_router::page_pattern;
///
/// assert_eq!(page_pattern("index.tsx").unwrap().as_deref(), Some("/"));
/// assert_eq!(page_pattern("todo/[id].rs").unwrap().as_deref(), Some("/todo/{id}"));
/// assert_eq!(page_pattern("_layout.rs").unwrap(), None);
/// ```
pub fn page_pattern(file: &str) -> Result<Option<String>, ConventionError> {
    let stem = strip_extension(file.trim_matches('/'));
    if stem.is_empty() {
        return Err(ConventionError::Empty);
    }

    let mut pattern = String::new();
    let parts: Vec<&str> = stem.split('/').filter(|s| !s.is_empty()).collect();
    for (i, part) in parts.iter().enumerate() {
        if part.starts_with('_') {
            return Ok(None);
        }
        if *part == "index" && i + 1 == parts.len() {
            break;
        }
        pattern.push('/');
        pattern.push_str(&translate_segment(file, part)?);
    }

    if pattern.is_empty() {
        pattern.push('/');
    }
    Ok(Some(pattern))
}

fn strip_extension(path: &str) -> &str {
    let start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[start..];
    if name.ends_with(']') {
        return path;
    }
    name.rfind('.').map_or(path, |dot| &path[..start + dot])
}

fn translate_segment(file: &str, part: &str) -> Result<String, ConventionError> {
    let Some(inner) = part.strip_prefix('[') else {
        if part.contains(['[', ']']) {
            return Err(malformed(file, part));
        }
        return Ok(part.to_string());
    };
    let inner = inner.strip_suffix(']').ok_or_else(|| malformed(file, part))?;
    if let Some(name) = inner.strip_prefix("...") {
        if name.is_empty() || name.contains(['[', ']']) {
            return Err(malformed(file, part));
        }
        return Ok(format!("*{name}"));
    }
    if inner.is_empty() || inner.contains(['[', ']']) {
        return Err(malformed(file, part));
    }
    Ok(format!("{{{inner}}}"))
}

fn malformed(file: &str, segment: &str) -> ConventionError {
    ConventionError::MalformedSegment {
        file: file.to_string(),
        segment: segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(file: &str) -> Option<String> {
        page_pattern(file).unwrap()
    }

    #[test]
    fn test_index_files() {
        assert_eq!(pattern("index.tsx").as_deref(), Some("/"));
        assert_eq!(pattern("/index.rs").as_deref(), Some("/"));
        assert_eq!(pattern("todo/index.rs").as_deref(), Some("/todo"));
    }

    #[test]
    fn test_nested_static_files() {
        assert_eq!(pattern("todo/toggle-all.tsx").as_deref(), Some("/todo/toggle-all"));
        assert_eq!(pattern("items").as_deref(), Some("/items"));
    }

    #[test]
    fn test_index_only_collapses_at_the_end() {
        assert_eq!(pattern("index/about.rs").as_deref(), Some("/index/about"));
    }

    #[test]
    fn test_dynamic_segments() {
        assert_eq!(pattern("todo/[id].rs").as_deref(), Some("/todo/{id}"));
        assert_eq!(pattern("[org]/[repo]/index.rs").as_deref(), Some("/{org}/{repo}"));
        assert_eq!(pattern("docs/[...slug].rs").as_deref(), Some("/docs/*slug"));
        assert_eq!(pattern("docs/[...slug]").as_deref(), Some("/docs/*slug"));
    }

    #[test]
    fn test_private_files_are_skipped() {
        assert_eq!(pattern("_layout.tsx"), None);
        assert_eq!(pattern("_components/button.rs"), None);
        assert_eq!(pattern("todo/_helpers.rs"), None);
    }

    #[test]
    fn test_malformed_segments() {
        assert!(page_pattern("todo/[id.rs").is_err());
        assert!(page_pattern("todo/[].rs").is_err());
        assert!(page_pattern("docs/[...].rs").is_err());
        assert!(page_pattern("a]b.rs").is_err());
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(page_pattern(""), Err(ConventionError::Empty));
        assert_eq!(page_pattern("/.rs"), Err(ConventionError::Empty));
    }
}
