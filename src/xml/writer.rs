//! Serializes [`XmlTree`]s back to text.

use super::escape::{escape_attr, escape_text, sanitize_comment};
use super::tree::{Declaration, Element, Node, XmlTree};

/// Elements written without an end tag in HTML mode.
const HTML_VOID_ELEMENTS: &[&str] = &["area", "base", "br", "col", "hr", "img", "input", "meta"];

/// How empty elements are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `<a/>` for elements without text or children.
    #[default]
    Xml,
    /// `<a></a>`, except for HTML void elements.
    Html,
}

/// Serializes a whole document: declaration, doctype, prolog, root, epilog.
pub fn write_tree(tree: &XmlTree) -> String {
    let mut out = String::new();
    if let Some(decl) = &tree.declaration {
        write_declaration(decl, &mut out);
        out.push('\n');
    }
    if let Some(doctype) = &tree.doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(doctype);
        out.push_str(">\n");
    }
    for node in &tree.prolog {
        write_node(node, WriteMode::Xml, &mut out);
    }
    write_element(&tree.root, WriteMode::Xml, &mut out);
    for node in &tree.epilog {
        write_node(node, WriteMode::Xml, &mut out);
    }
    out
}

/// Serializes a single element subtree (its own tail excluded).
pub fn write_element_string(element: &Element, mode: WriteMode) -> String {
    let mut out = String::new();
    write_element(element, mode, &mut out);
    out
}

fn write_declaration(decl: &Declaration, out: &mut String) {
    out.push_str("<?xml version=\"");
    out.push_str(&decl.version);
    out.push('"');
    if let Some(encoding) = &decl.encoding {
        out.push_str(" encoding=\"");
        out.push_str(encoding);
        out.push('"');
    }
    if let Some(standalone) = &decl.standalone {
        out.push_str(" standalone=\"");
        out.push_str(standalone);
        out.push('"');
    }
    out.push_str("?>");
}

fn write_node(node: &Node, mode: WriteMode, out: &mut String) {
    match node {
        Node::Element(e) => write_element(e, mode, out),
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(&sanitize_comment(&c.content));
            out.push_str("-->");
        }
        Node::Instruction(i) => {
            out.push_str("<?");
            out.push_str(&i.content);
            out.push_str("?>");
        }
    }
    if let Some(tail) = node.tail() {
        out.push_str(&escape_text(tail));
    }
}

fn write_element(element: &Element, mode: WriteMode, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }

    let text = element.text.as_deref().unwrap_or("");
    if text.is_empty() && element.children.is_empty() {
        match mode {
            WriteMode::Xml => out.push_str("/>"),
            WriteMode::Html if HTML_VOID_ELEMENTS.contains(&element.name.as_str()) => {
                out.push('>')
            }
            WriteMode::Html => {
                out.push_str("></");
                out.push_str(&element.name);
                out.push('>');
            }
        }
        return;
    }

    out.push('>');
    out.push_str(&escape_text(text));
    for child in &element.children {
        write_node(child, mode, out);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_is_parse_fixed_point() {
        let source = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<office:document-content xmlns:office=\"urn:o\"><office:body><text:p text:style-name=\"P1\">a &amp; b<text:span>c</text:span> d<text:s/></text:p><!--n--></office:body></office:document-content>";
        let tree = parse(source).expect("parse should work");
        let written = write_tree(&tree);
        assert_eq!(written, source);
        assert_eq!(parse(&written).expect("reparse should work"), tree);
    }

    #[test]
    fn test_attribute_whitespace_survives() {
        let element = Element::new("a").with_attribute("v", "x\n\ty\"");
        let written = write_element_string(&element, WriteMode::Xml);
        assert_eq!(written, "<a v=\"x&#10;&#9;y&quot;\"/>");
        assert_eq!(parse(&written).unwrap().root, element);
    }

    #[test]
    fn test_html_mode_expands_empty_elements() {
        let element = Element::new("p")
            .with_child(Element::new("img"))
            .with_child(Element::new("span"));
        assert_eq!(
            write_element_string(&element, WriteMode::Html),
            "<p><img><span></span></p>"
        );
    }
}
