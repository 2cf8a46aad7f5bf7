//! The closed set of methods a page may handle.

use std::fmt;
use std::str::FromStr;

use http::Method;

/// An HTTP method a page definition can bind a handler to.
///
/// Pages only ever answer these five methods. Anything else (`HEAD`,
/// `OPTIONS`, extension methods) is unsupported for every page, which the
/// pipeline reports the same way as a method the page simply left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl PageMethod {
    /// Every page method, in table order.
    pub const ALL: [PageMethod; 5] = [
        PageMethod::Get,
        PageMethod::Post,
        PageMethod::Put,
        PageMethod::Patch,
        PageMethod::Delete,
    ];

    /// Maps an [`http::Method`] onto the closed enumeration.
    #[must_use]
    pub fn from_http(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::PATCH => Some(Self::Patch),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }

    /// The canonical upper-case token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Converts back into an [`http::Method`].
    #[must_use]
    pub fn to_http(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is not one of the page methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported page method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for PageMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl TryFrom<&Method> for PageMethod {
    type Error = UnknownMethod;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        Self::from_http(method).ok_or_else(|| UnknownMethod(method.as_str().to_string()))
    }
}
