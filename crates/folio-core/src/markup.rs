//! Render trees.
//!
//! Handlers return a [`Markup`] value instead of a string. The value says
//! nothing about whether it ends up as a whole document or as a fragment,
//! so one handler can serve both a full navigation and an in-place update.
//! Serialization is a pure function of the tree.

use std::borrow::Cow;
use std::fmt;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in a render tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// An element with attributes and children.
    Element(Element),
    /// Text content, escaped on output.
    Text(String),
    /// Pre-rendered markup, written verbatim.
    Raw(String),
    /// A sequence of sibling nodes with no wrapper.
    Fragment(Vec<Markup>),
}

/// An HTML element under construction.
///
/// ```rust
/// use folio_core::{el, Markup};
///
/// let item = el("li")
///     .attr("class", "completed")
///     .child(el("input").attr("type", "checkbox").flag("checked"))
///     .text("Buy milk & eggs");
///
/// assert_eq!(
///     Markup::from(item).render(),
///     r#"<li class="completed"><input type="checkbox" checked>Buy milk &amp; eggs</li>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: Cow<'static, str>,
    attrs: Vec<(Cow<'static, str>, Option<String>)>,
    children: Vec<Markup>,
}

/// Shorthand for [`Element::new`].
#[must_use]
pub fn el(tag: impl Into<Cow<'static, str>>) -> Element {
    Element::new(tag)
}

impl Element {
    /// Starts a new element.
    #[must_use]
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of an attribute, if set. Boolean attributes report `Some("")`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[Markup] {
        &self.children
    }

    /// Sets an attribute, replacing an earlier value with the same name.
    pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.set(name.into(), Some(value.into()));
        self
    }

    /// Sets an attribute only when `condition` holds.
    pub fn attr_if(
        self,
        condition: bool,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<String>,
    ) -> Self {
        if condition {
            self.attr(name, value)
        } else {
            self
        }
    }

    /// Sets a boolean attribute such as `checked`.
    pub fn flag(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.set(name.into(), None);
        self
    }

    /// Sets a boolean attribute only when `condition` holds.
    pub fn flag_if(self, condition: bool, name: impl Into<Cow<'static, str>>) -> Self {
        if condition {
            self.flag(name)
        } else {
            self
        }
    }

    /// Appends a child node.
    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends every node yielded by `children`.
    pub fn children_from<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Markup>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Appends a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }

    fn set(&mut self, name: Cow<'static, str>, value: Option<String>) {
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_ref())
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
        }
        out.push('>');
        if self.is_void() {
            return;
        }
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl Markup {
    /// A text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Verbatim markup. The caller is responsible for its well-formedness.
    #[must_use]
    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    /// Siblings without a wrapping element.
    #[must_use]
    pub fn fragment<I>(nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Markup>,
    {
        Self::Fragment(nodes.into_iter().map(Into::into).collect())
    }

    /// The empty tree.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Fragment(Vec::new())
    }

    /// The HTML5 doctype declaration.
    #[must_use]
    pub fn doctype() -> Self {
        Self::Raw("<!DOCTYPE html>".to_string())
    }

    /// Serializes the tree.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Serializes the tree onto the end of `out`.
    pub fn write_to(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_to(out),
            Self::Text(text) => escape_into(text, false, out),
            Self::Raw(html) => out.push_str(html),
            Self::Fragment(nodes) => {
                for node in nodes {
                    node.write_to(out);
                }
            }
        }
    }

    /// Depth-first search for the first element with `tag`.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Element> {
        match self {
            Self::Element(element) if element.tag == tag => Some(element),
            Self::Element(element) => element.children.iter().find_map(|c| c.find(tag)),
            Self::Fragment(nodes) => nodes.iter().find_map(|c| c.find(tag)),
            Self::Text(_) | Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Markup>> for Markup {
    fn from(nodes: Vec<Markup>) -> Self {
        Self::Fragment(nodes)
    }
}

impl<T: Into<Markup>> From<Option<T>> for Markup {
    fn from(node: Option<T>) -> Self {
        node.map_or_else(Markup::empty, Into::into)
    }
}

/// Escapes text for element content, or for a double-quoted attribute value.
fn escape_into(input: &str, attribute: bool, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
