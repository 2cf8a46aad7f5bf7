//! Layout composition.
//!
//! A [`Layout`] wraps a page's render tree in document scaffolding on full
//! page requests. It must not depend on anything but its input, so composing
//! the same tree twice yields identical output.

use crate::markup::{el, Markup};

/// Wraps a page's render tree in shared document scaffolding.
pub trait Layout: Send + Sync + 'static {
    /// Returns a new tree with `page` embedded inside the scaffolding.
    fn compose(&self, page: Markup) -> Markup;
}

impl<F> Layout for F
where
    F: Fn(Markup) -> Markup + Send + Sync + 'static,
{
    fn compose(&self, page: Markup) -> Markup {
        self(page)
    }
}

/// A layout that returns the page unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bare;

impl Layout for Bare {
    fn compose(&self, page: Markup) -> Markup {
        page
    }
}

/// A plain HTML5 document: head metadata, stylesheets, a title and deferred
/// scripts, with the page as the body.
///
/// ```rust
/// use folio_core::{el, DocumentLayout, Layout, Markup};
///
/// let layout = DocumentLayout::new("todos").stylesheet("/static/index.css");
/// let html = layout.compose(el("main").text("hi").into()).render();
///
/// assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\"><head>"));
/// assert!(html.contains("<title>todos</title>"));
/// assert!(html.contains("<body><main>hi</main></body>"));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    lang: String,
    title: String,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
}

/// Script included by [`DocumentLayout::new`] so fragment requests work out of the box.
pub const HTMX_SCRIPT: &str = "https://unpkg.com/htmx.org";

impl DocumentLayout {
    /// A document titled `title`, in English, loading htmx.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            lang: "en".to_string(),
            title: title.into(),
            stylesheets: Vec::new(),
            scripts: vec![HTMX_SCRIPT.to_string()],
        }
    }

    /// Sets the `lang` attribute of the root element.
    #[must_use]
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Adds a stylesheet link.
    #[must_use]
    pub fn stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheets.push(href.into());
        self
    }

    /// Adds a deferred script.
    #[must_use]
    pub fn script(mut self, src: impl Into<String>) -> Self {
        self.scripts.push(src.into());
        self
    }

    /// Drops all scripts, including the default one.
    #[must_use]
    pub fn without_scripts(mut self) -> Self {
        self.scripts.clear();
        self
    }

    fn head(&self) -> Markup {
        el("head")
            .child(el("meta").attr("charset", "UTF-8"))
            .child(
                el("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1.0"),
            )
            .child(
                el("meta")
                    .attr("http-equiv", "X-UA-Compatible")
                    .attr("content", "ie=edge"),
            )
            .children_from(
                self.stylesheets
                    .iter()
                    .map(|href| el("link").attr("rel", "stylesheet").attr("href", href.clone())),
            )
            .child(el("title").text(self.title.clone()))
            .into()
    }
}

impl Layout for DocumentLayout {
    fn compose(&self, page: Markup) -> Markup {
        let html = el("html")
            .attr("lang", self.lang.clone())
            .child(self.head())
            .child(el("body").child(page))
            .children_from(
                self.scripts
                    .iter()
                    .map(|src| el("script").attr("src", src.clone()).flag("defer")),
            );
        Markup::fragment([Markup::doctype(), html.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_is_identity() {
        let page: Markup = el("section").text("x").into();
        assert_eq!(Bare.compose(page.clone()), page);
    }

    #[test]
    fn test_closure_layout() {
        let layout = |page: Markup| Markup::from(el("div").attr("id", "app").child(page));
        assert_eq!(
            layout.compose(Markup::text("hi")).render(),
            r#"<div id="app">hi</div>"#
        );
    }

    #[test]
    fn test_document_markers() {
        let html = DocumentLayout::new("react-htmx example")
            .stylesheet("/static/index.css")
            .compose(el("section").attr("class", "todoapp").into())
            .render();
        assert!(html.contains("<head>"));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/index.css">"#));
        assert!(html.contains(r#"<body><section class="todoapp"></section></body>"#));
        assert!(html.ends_with(r#"<script src="https://unpkg.com/htmx.org" defer></script></html>"#));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let layout = DocumentLayout::new("t").lang("de").without_scripts().script("/app.js");
        let page: Markup = el("p").text("same").into();
        assert_eq!(
            layout.compose(page.clone()).render(),
            layout.compose(page).render()
        );
    }
}
