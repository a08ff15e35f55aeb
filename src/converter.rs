//! File-level conversion driven by [`ConvertOptions`].

use crate::container;
use crate::document::Document;
use crate::render::{HtmlRenderer, Renderer, TextRenderer, XmlRenderer};
use crate::{ConvertOptions, OutputFormat, Result};
use std::path::Path;
use tracing::debug;

/// Converts ODF packages to text, HTML or XML.
#[derive(Debug, Clone, Default)]
pub struct OdfConverter {
    options: ConvertOptions,
}

impl OdfConverter {
    /// Creates a new converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Creates a new converter with default options.
    pub fn with_defaults() -> Self {
        Self::new(ConvertOptions::default())
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Loads the package at `path` and renders it in `format`.
    pub fn convert<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<String> {
        let path = path.as_ref();
        debug!("Converting {} to {:?}", path.display(), format);
        let document = container::load(path)?;
        self.convert_document(&document, format)
    }

    /// Renders an already loaded document in `format`.
    pub fn convert_document(&self, document: &Document, format: OutputFormat) -> Result<String> {
        self.renderer(format).render(document)
    }

    fn renderer(&self, format: OutputFormat) -> Box<dyn Renderer> {
        match format {
            OutputFormat::Text => Box::new(TextRenderer::new(self.options.skip_blank_lines)),
            OutputFormat::Html => Box::new(
                HtmlRenderer::new(self.options.html_title.as_str())
                    .with_attribute_policy(self.options.unmapped_attributes),
            ),
            OutputFormat::Xml => Box::new(XmlRenderer::new(self.options.xml_encoding.clone())),
        }
    }
}
