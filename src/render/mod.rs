mod html;
mod text;
mod xml;

use crate::document::Document;
use crate::Result;

pub use html::{HtmlRenderer, HTML_DOCTYPE};
pub use text::{TextRenderer, LINE_SEPARATOR};
pub use xml::XmlRenderer;

pub trait Renderer {
    fn render(&self, document: &Document) -> Result<String>;
}
