//! What a handler hands back.

use std::borrow::Cow;

use bytes::Bytes;
use http::Response;

use crate::markup::Markup;

/// The result of a handler.
#[derive(Debug)]
pub enum PageOutcome {
    /// A finished response. Layout composition and content-type selection
    /// are skipped and the response is sent exactly as given.
    Terminal(Response<Bytes>),
    /// A render tree, composed with the layout unless the request asked for
    /// a fragment.
    Render(Markup),
}

impl PageOutcome {
    /// A render-tree outcome.
    #[must_use]
    pub fn render(markup: impl Into<Markup>) -> Self {
        Self::Render(markup.into())
    }

    /// A terminal outcome.
    #[must_use]
    pub fn terminal(response: Response<Bytes>) -> Self {
        Self::Terminal(response)
    }

    /// Whether the handler already produced a full response.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

impl From<Markup> for PageOutcome {
    fn from(markup: Markup) -> Self {
        Self::Render(markup)
    }
}

impl From<Response<Bytes>> for PageOutcome {
    fn from(response: Response<Bytes>) -> Self {
        Self::Terminal(response)
    }
}

/// A human-readable status text carried as a response extension.
///
/// The HTTP transport writes it as the reason phrase and the pipeline logs
/// it with the outbound record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText(pub Cow<'static, str>);

impl StatusText {
    /// Creates a status text.
    #[must_use]
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self(text.into())
    }

    /// The text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the status text attached to `response`, if any.
    #[must_use]
    pub fn of<B>(response: &Response<B>) -> Option<&str> {
        response.extensions().get::<Self>().map(Self::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::el;

    #[test]
    fn test_conversions() {
        let outcome: PageOutcome = Markup::from(el("p")).into();
        assert!(!outcome.is_terminal());

        let outcome: PageOutcome = Response::new(Bytes::from_static(b"done")).into();
        assert!(outcome.is_terminal());
    }

    #[test]
    fn test_status_text_extension() {
        let mut response = Response::new(Bytes::new());
        assert_eq!(StatusText::of(&response), None);
        response
            .extensions_mut()
            .insert(StatusText::new("/todo doesn't handle 'PUT' method"));
        assert_eq!(
            StatusText::of(&response),
            Some("/todo doesn't handle 'PUT' method")
        );
    }
}
