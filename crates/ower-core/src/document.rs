//! Selector-based queries over a parsed career page.
//!
//! [`Document`] owns the parsed tree; [`Node`] is a borrowed sub-view rooted at
//! one element. Both implement [`DocumentView`], so extraction code can walk
//! from the page into a wrapper element and keep querying with the same calls.
//!
//! Queries never fail. An invalid selector or a missing node yields `false`,
//! an empty string, `None` or an empty list.

use std::cell::Cell;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Read-only selector queries.
pub trait DocumentView {
    /// All elements matching `selector`, in document order.
    fn each(&self, selector: &str) -> Vec<Node<'_>>;

    /// First element matching `selector`.
    fn first(&self, selector: &str) -> Option<Node<'_>> {
        self.each(selector).into_iter().next()
    }

    /// Whether anything matches `selector`.
    fn exists(&self, selector: &str) -> bool {
        self.first(selector).is_some()
    }

    /// Concatenated text of every element matching `selector`.
    fn text(&self, selector: &str) -> String {
        self.each(selector).iter().map(Node::text_content).collect()
    }

    /// Attribute `name` of the first element matching `selector`.
    fn attr(&self, selector: &str, name: &str) -> Option<String> {
        self.first(selector)
            .and_then(|node| node.attr(name).map(str::to_string))
    }
}

/// A parsed career page.
pub struct Document {
    html: Html,
    queries: Cell<usize>,
}

impl Document {
    /// Parse raw page content. HTML parsing is error-tolerant and never fails.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
            queries: Cell::new(0),
        }
    }

    /// Number of selector queries made against the page root so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("queries", &self.queries.get())
            .finish_non_exhaustive()
    }
}

impl DocumentView for Document {
    fn each(&self, selector: &str) -> Vec<Node<'_>> {
        self.queries.set(self.queries.get() + 1);
        let Some(selector) = compile(selector) else {
            return Vec::new();
        };
        self.html.select(&selector).map(Node::new).collect()
    }
}

/// One element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    const fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Descendants matching `selector`, in document order.
    ///
    /// Unlike the [`DocumentView`] method, the returned nodes borrow the
    /// document rather than this node, so they can outlive it.
    pub fn each(&self, selector: &str) -> Vec<Node<'a>> {
        let Some(selector) = compile(selector) else {
            return Vec::new();
        };
        self.element.select(&selector).map(Node::new).collect()
    }

    /// Text of this element and all of its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.element.text().collect()
    }

    /// Attribute value by name.
    ///
    /// Namespaced attributes such as `xlink:href` are matched by local name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        let element = self.element.value();
        element.attr(name).or_else(|| {
            let local = name.rsplit(':').next().unwrap_or(name);
            element
                .attrs()
                .find_map(|(key, value)| (key == local).then_some(value))
        })
    }

    /// Whether the element carries `class` (exact token match).
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.element.value().name()
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("name", &self.name()).finish()
    }
}

impl DocumentView for Node<'_> {
    fn each(&self, selector: &str) -> Vec<Node<'_>> {
        Node::each(self, selector)
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Ignoring invalid selector '{}': {:?}", selector, e);
            None
        },
    }
}
