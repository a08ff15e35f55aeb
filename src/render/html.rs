//! HTML export of the content body.

use crate::document::{ComponentKind, Document};
use crate::render::Renderer;
use crate::translate::{translate_element, AttributePolicy, TranslationMap};
use crate::xml::{write_element_string, Element, Node, WriteMode};
use crate::Result;

pub const HTML_DOCTYPE: &str =
    r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#;

/// Name of the element holding the document body in `content.xml`.
const OFFICE_BODY: &str = "office:body";

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
    map: TranslationMap,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            map: TranslationMap::html(),
        }
    }

    pub fn with_attribute_policy(mut self, policy: AttributePolicy) -> Self {
        self.map.unmapped_attributes = policy;
        self
    }

    pub fn html(&self, document: &Document) -> Result<String> {
        let body = match document
            .tree(ComponentKind::Content)
            .and_then(|tree| tree.root.find(OFFICE_BODY))
        {
            Some(body) => translate_element(body, &self.map)?,
            None => Element::new("body"),
        };

        let head = Element::new("head").with_child(Element::new("title").with_text(&self.title));
        let mut html = Element::new("html").with_child(head).with_child(body);
        // The body's tail comes from content.xml and has no place after </body>.
        if let Some(Node::Element(body)) = html.children.last_mut() {
            body.tail = None;
        }

        Ok(format!(
            "{}\n{}",
            HTML_DOCTYPE,
            write_element_string(&html, WriteMode::Html)
        ))
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, document: &Document) -> Result<String> {
        self.html(document)
    }
}
