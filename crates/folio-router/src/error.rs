//! Route registration errors.

use thiserror::Error;

/// Reasons a pattern cannot be added to a [`Router`](crate::Router).
///
/// Registration happens once at startup, so these surface as build-time
/// failures of the route table rather than at request time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The same pattern (after normalization) was registered twice.
    #[error("route `{pattern}` is already registered")]
    Duplicate {
        /// The normalized pattern.
        pattern: String,
    },

    /// A catch-all segment appeared before the end of the pattern.
    #[error("catch-all segment must be last in `{pattern}`")]
    CatchAllNotLast {
        /// The offending pattern.
        pattern: String,
    },

    /// Two patterns name the dynamic segment at the same position differently.
    #[error("`{pattern}` names a dynamic segment `{requested}` where `{existing}` is already used")]
    ParamNameConflict {
        /// The offending pattern.
        pattern: String,
        /// Name already registered at this position.
        existing: String,
        /// Name the new pattern tried to use.
        requested: String,
    },

    /// A segment such as `{}` or `*` carries no name.
    #[error("empty dynamic segment name in `{pattern}`")]
    EmptyParamName {
        /// The offending pattern.
        pattern: String,
    },
}
