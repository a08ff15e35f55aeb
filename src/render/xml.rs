use crate::document::{ComponentKind, Document};
use crate::render::Renderer;
use crate::xml::{write_element_string, WriteMode};
use crate::Result;

/// Renders the content root element as XML.
#[derive(Debug, Clone, Default)]
pub struct XmlRenderer {
    encoding: Option<String>,
}

impl XmlRenderer {
    /// With an encoding label, the output starts with an XML declaration
    /// naming it. The returned string itself is always UTF-8.
    pub fn new(encoding: Option<String>) -> Self {
        Self { encoding }
    }

    pub fn xml(&self, document: &Document) -> String {
        let body = match document.component(ComponentKind::Content).tree() {
            Some(tree) => write_element_string(&tree.root, WriteMode::Xml),
            None => document.component_string(ComponentKind::Content),
        };
        match &self.encoding {
            Some(encoding) => format!("<?xml version='1.0' encoding='{encoding}'?>\n{body}"),
            None => body,
        }
    }
}

impl Renderer for XmlRenderer {
    fn render(&self, document: &Document) -> Result<String> {
        Ok(self.xml(document))
    }
}
