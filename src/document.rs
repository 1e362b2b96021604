//! Minimal vector document model.
//!
//! The renderer builds badges as an in-memory element tree rather than a
//! string, so the exporter can inspect and rewrite image references without
//! re-parsing markup. The tree serializes to self-contained SVG via
//! [`Document::to_svg`].
//!
//! The model is deliberately small: elements are a tag name, an ordered
//! attribute list, children, and optional text content. Ordering is preserved
//! everywhere so that rendering the same input twice produces byte-identical
//! output.

use std::collections::HashMap;

// ============================================================================
// Element
// ============================================================================

/// A single element in the vector document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
    raw_markup: Option<String>,
}

impl Element {
    /// Creates an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
            raw_markup: None,
        }
    }

    /// Adds an attribute. Numbers and other displayable values are accepted
    /// directly.
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.push((name.into(), value.to_string()));
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children at once.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Sets the text content (escaped on serialization).
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets trusted markup emitted verbatim inside this element, ahead of any
    /// children. Used for caller-supplied logo fragments.
    pub fn raw_markup(mut self, markup: impl Into<String>) -> Self {
        self.raw_markup = Some(markup.into());
        self
    }

    /// Returns the tag name.
    pub fn tag(&self) -> &str {
        &self.name
    }

    /// Returns the first value of the named attribute, if present.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of the named attribute, or appends it if absent.
    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Returns the child elements.
    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }

    /// Returns the text content, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn write_svg(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape(v));
            out.push('"');
        }

        if self.children.is_empty() && self.text.is_none() && self.raw_markup.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(markup) = &self.raw_markup {
            out.push_str(markup);
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_svg(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Document
// ============================================================================

/// A vector document: a logical canvas size plus the root-level elements.
///
/// Serialization always emits explicit `width`/`height` attributes matching
/// the viewbox, so the output stands alone when handed to a rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    width: f32,
    height: f32,
    nodes: Vec<Element>,
}

impl Document {
    /// Creates an empty document with the given logical canvas size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            nodes: Vec::new(),
        }
    }

    /// Logical canvas width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Logical canvas height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Appends a root-level element.
    pub fn push(&mut self, element: Element) {
        self.nodes.push(element);
    }

    /// Returns the root-level elements.
    pub fn nodes(&self) -> &[Element] {
        &self.nodes
    }

    /// Collects every descendant element with the given tag name, in document
    /// order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        for node in &self.nodes {
            node.visit(&mut |el| {
                if el.tag() == tag {
                    found.push(el);
                }
            });
        }
        found
    }

    /// Returns the `href` of every `image` element, in document order.
    pub fn image_hrefs(&self) -> Vec<&str> {
        self.find_all("image")
            .into_iter()
            .filter_map(|el| el.get_attr("href"))
            .collect()
    }

    /// Returns the image hrefs that still point at external resources
    /// (anything that is not a `data:` URI).
    pub fn external_image_hrefs(&self) -> Vec<&str> {
        self.image_hrefs()
            .into_iter()
            .filter(|href| !href.starts_with("data:"))
            .collect()
    }

    /// Returns a copy of this document with image hrefs rewritten through the
    /// given map. Hrefs without a mapping are left untouched; the original
    /// document is never modified.
    pub fn with_image_hrefs(&self, replacements: &HashMap<String, String>) -> Document {
        let mut copy = self.clone();
        for node in &mut copy.nodes {
            node.visit_mut(&mut |el| {
                if el.tag() == "image"
                    && let Some(href) = el.get_attr("href")
                    && let Some(inline) = replacements.get(href)
                {
                    el.set_attr("href", inline);
                }
            });
        }
        copy
    }

    /// Serializes the document to a standalone SVG string.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height,
        ));
        for node in &self.nodes {
            node.write_svg(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new(100.0, 50.0);
        doc.push(Element::new("rect").attr("width", 100).attr("fill", "#fff"));
        doc.push(
            Element::new("g").child(
                Element::new("image")
                    .attr("href", "https://example.com/a.png")
                    .attr("width", 10),
            ),
        );
        doc.push(Element::new("image").attr("href", "data:image/png;base64,AAAA"));
        doc
    }

    #[test]
    fn serializes_with_explicit_dimensions() {
        let svg = sample().to_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
    }

    #[test]
    fn escapes_text_and_attributes() {
        let mut doc = Document::new(10.0, 10.0);
        doc.push(Element::new("text").attr("data-note", "a<b&c").text("x > y"));
        let svg = doc.to_svg();
        assert!(svg.contains("a&lt;b&amp;c"));
        assert!(svg.contains("x &gt; y"));
    }

    #[test]
    fn finds_external_hrefs_only() {
        let doc = sample();
        assert_eq!(doc.image_hrefs().len(), 2);
        assert_eq!(
            doc.external_image_hrefs(),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn href_rewrite_leaves_original_untouched() {
        let doc = sample();
        let mut map = HashMap::new();
        map.insert(
            "https://example.com/a.png".to_string(),
            "data:image/png;base64,BBBB".to_string(),
        );

        let inlined = doc.with_image_hrefs(&map);

        assert!(inlined.external_image_hrefs().is_empty());
        assert_eq!(doc.external_image_hrefs().len(), 1);
    }

    #[test]
    fn raw_markup_is_emitted_verbatim() {
        let mut doc = Document::new(10.0, 10.0);
        doc.push(Element::new("g").raw_markup("<circle r=\"4\"/>"));
        assert!(doc.to_svg().contains("<g><circle r=\"4\"/></g>"));
    }
}
