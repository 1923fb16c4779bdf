//! Parsed HTML documents and CSS selector queries
//!
//! Uses the scraper crate to parse pages and select elements by CSS selectors.

use scraper::{ElementRef, Html, Selector};

/// What to read from a matched node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Accessor {
    /// Trimmed text content (default, or `::text`)
    #[default]
    Text,
    /// Outer HTML of the node (`::html`)
    Html,
    /// Attribute value (`::attr(name)`)
    Attr(String),
}

/// A compiled query: CSS selector plus accessor.
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    selector: Selector,
    accessor: Accessor,
}

impl Query {
    /// Parse a selector string, possibly with a `::text`, `::html` or
    /// `::attr(x)` suffix.
    pub fn parse(input: &str) -> Result<Self, String> {
        let (css, accessor) = split_accessor(input.trim());
        let selector = Selector::parse(css).map_err(|e| e.to_string())?;

        Ok(Self {
            source: input.to_string(),
            selector,
            accessor,
        })
    }

    /// The selector as originally written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// Read this query's value from the first match in `doc`.
    ///
    /// `None` when nothing matches, or when the attribute is missing.
    pub fn first_value(&self, doc: &Document) -> Option<String> {
        let node = doc.query(&self.selector).next()?;

        match &self.accessor {
            Accessor::Text => Some(node.text()),
            Accessor::Html => Some(node.html()),
            Accessor::Attr(name) => node.attr(name).map(String::from),
        }
    }
}

// Split a trailing pseudo-element accessor off a selector
fn split_accessor(input: &str) -> (&str, Accessor) {
    if let Some(css) = input.strip_suffix("::text") {
        return (css.trim_end(), Accessor::Text);
    }
    if let Some(css) = input.strip_suffix("::html") {
        return (css.trim_end(), Accessor::Html);
    }
    if let Some(pos) = input.rfind("::attr(") {
        let attr_start = pos + "::attr(".len();
        if let Some(attr_len) = input[attr_start..].find(')') {
            if attr_start + attr_len + 1 == input.len() {
                let name = input[attr_start..attr_start + attr_len].trim();
                return (input[..pos].trim_end(), Accessor::Attr(name.to_string()));
            }
        }
    }
    (input, Accessor::Text)
}

/// A parsed, read-only HTML document.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Nodes matching `selector`, in document order.
    pub fn query<'a, 'b>(
        &'a self,
        selector: &'b Selector,
    ) -> impl Iterator<Item = Node<'a>> + 'b
    where
        'a: 'b,
    {
        self.html.select(selector).map(Node)
    }
}

/// A single element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Concatenated text content, trimmed.
    pub fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }

    pub fn html(&self) -> String {
        self.0.html()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }
}
