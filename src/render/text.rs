use crate::document::{ComponentKind, Document};
use crate::render::Renderer;
use crate::translate::extract_text;
use crate::Result;

/// Line separator used to join extracted text nodes.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    skip_blank_lines: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TextRenderer {
    pub fn new(skip_blank_lines: bool) -> Self {
        Self { skip_blank_lines }
    }

    pub fn text(&self, document: &Document) -> String {
        let Some(tree) = document.tree(ComponentKind::Content) else {
            return String::new();
        };
        extract_text(&tree.root, self.skip_blank_lines)
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
    }
}

impl Renderer for TextRenderer {
    fn render(&self, document: &Document) -> Result<String> {
        Ok(self.text(document))
    }
}
