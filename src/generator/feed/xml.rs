//! Minimal XML document tree.
//!
//! Feeds are assembled as a tree of [`Element`]s and serialized in a single
//! pass, so escaping and CDATA rules are applied in exactly one place.
//!
//! # Output Shape
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root>
//!   <child attr="v">text</child>
//!   <empty/>
//! </root>
//! ```
//!
//! Two-space indentation, `\n` line endings, no trailing newline.

use std::borrow::Cow;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const INDENT: &str = "  ";

/// Escape special XML characters.
///
/// `&` is replaced first so entities produced by later replacements are not
/// escaped again.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// Wrap text in a CDATA section.
///
/// The text is not inspected: a literal `]]>` inside it ends the section
/// early and produces malformed XML. Callers own that guarantee.
pub fn wrap_cdata(s: &str) -> String {
    format!("<![CDATA[{s}]]>")
}

/// Element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Self-closing element (`<name/>`).
    Empty,
    /// Escaped character data.
    Text(String),
    /// Raw character data inside `<![CDATA[...]]>`.
    CData(String),
    /// Nested elements, one per line.
    Children(Vec<Element>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    content: Content,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            content: Content::Empty,
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn cdata(mut self, text: impl Into<String>) -> Self {
        self.content = Content::CData(text.into());
        self
    }

    /// Append one child, turning the element into a container if needed.
    pub fn child(self, child: Element) -> Self {
        self.children(std::iter::once(child))
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(existing) => existing.extend(children),
            _ => self.content = Content::Children(children.into_iter().collect()),
        }
        self
    }

    fn write(&self, out: &mut String, depth: usize) {
        push_indent(out, depth);
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }

        match &self.content {
            Content::Empty => {
                out.push_str("/>");
                return;
            }
            Content::Text(text) => {
                out.push('>');
                out.push_str(&escape_xml(text));
            }
            Content::CData(text) => {
                out.push('>');
                out.push_str(&wrap_cdata(text));
            }
            Content::Children(children) => {
                out.push('>');
                for child in children {
                    out.push('\n');
                    child.write(out, depth + 1);
                }
                out.push('\n');
                push_indent(out, depth);
            }
        }

        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// An XML document: declaration plus one root element.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(DECLARATION);
        out.push('\n');
        self.root.write(&mut out, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml_all_entities() {
        assert_eq!(
            escape_xml(r#"<tag> & "quotes" & 'apostrophe'"#),
            "&lt;tag&gt; &amp; &quot;quotes&quot; &amp; &apos;apostrophe&apos;"
        );
    }

    #[test]
    fn test_escape_xml_plain_text_borrowed() {
        let text = "Plain text without special chars";
        assert!(matches!(escape_xml(text), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn test_escape_xml_leaves_no_raw_specials() {
        for input in ["&", "<>", "\"'", "&<>\"'", "&&&", "'&lt;'", "a&b<c>d\"e'f"] {
            let escaped = escape_xml(input);
            // Every '&' left must start one of the five entities
            let stripped = escaped
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&quot;", "")
                .replace("&apos;", "");
            assert!(
                !stripped.contains(['&', '<', '>', '"', '\'']),
                "raw special left in {escaped:?}"
            );
        }
    }

    #[test]
    fn test_escape_xml_no_double_escape() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        // A second pass only touches the ampersands of the first
        assert_eq!(escape_xml(&escape_xml("<")), "&amp;lt;");
    }

    #[test]
    fn test_wrap_cdata() {
        assert_eq!(wrap_cdata("a<b"), "<![CDATA[a<b]]>");
        assert_eq!(
            wrap_cdata("Some text with <html> tags"),
            "<![CDATA[Some text with <html> tags]]>"
        );
    }

    #[test]
    fn test_document_layout() {
        let doc = Document::new(
            Element::new("root")
                .attr("version", "1")
                .child(Element::new("a").text("x & y"))
                .child(
                    Element::new("b")
                        .child(Element::new("c").cdata("<raw>"))
                        .child(Element::new("d").attr("k", "\"v\"")),
                ),
        );

        assert_eq!(
            doc.to_xml(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <root version=\"1\">\n\
             \x20 <a>x &amp; y</a>\n\
             \x20 <b>\n\
             \x20   <c><![CDATA[<raw>]]></c>\n\
             \x20   <d k=\"&quot;v&quot;\"/>\n\
             \x20 </b>\n\
             </root>"
        );
    }

    #[test]
    fn test_children_appends() {
        let el = Element::new("list")
            .children([Element::new("a"), Element::new("b")])
            .child(Element::new("c"));
        match el.content {
            Content::Children(children) => assert_eq!(children.len(), 3),
            other => panic!("expected children, got {other:?}"),
        }
    }
}
