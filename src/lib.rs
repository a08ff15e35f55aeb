//! # odftools
//!
//! Read, transform and rewrite OpenDocument (ODF) packages.
//!
//! ## Example
//!
//! ```no_run
//! use odftools::{container, ConvertOptions, OdfConverter, OutputFormat};
//!
//! let mut document = container::load("report.odt").unwrap();
//! println!("{} by {}", document.extension(), document.author());
//!
//! document.replace("draft", "final");
//! container::dump(&document, "report-final.odt").unwrap();
//!
//! let converter = OdfConverter::new(ConvertOptions {
//!     html_title: "Report".into(),
//!     ..Default::default()
//! });
//! let html = converter.convert("report-final.odt", OutputFormat::Html).unwrap();
//! println!("{}", html);
//! ```

pub mod container;
pub mod converter;
pub mod discover;
pub mod document;
pub mod error;
pub mod pattern;
pub mod render;
pub mod translate;
pub mod xml;

pub use converter::OdfConverter;
pub use document::{Component, ComponentKind, Document, Timestamp};
pub use error::{Error, Result};
pub use pattern::{Pattern, PatternOptions};
pub use translate::{AttributePolicy, TranslationMap};

/// Options for converting ODF documents.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Leave empty and whitespace-only text nodes out of text output.
    pub skip_blank_lines: bool,
    /// Contents of the `<title>` element in HTML output.
    pub html_title: String,
    /// Encoding label for the declaration prefixed to XML output.
    pub xml_encoding: Option<String>,
    /// How attributes without an HTML counterpart are treated.
    pub unmapped_attributes: AttributePolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            skip_blank_lines: true,
            html_title: String::new(),
            xml_encoding: None,
            unmapped_attributes: AttributePolicy::Drop,
        }
    }
}

/// Target format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One text node per line.
    Text,
    /// HTML 4.01 rendering of the document body.
    Html,
    /// The content XML.
    Xml,
}

impl OutputFormat {
    /// Conventional file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Html => "html",
            OutputFormat::Xml => "xml",
        }
    }
}
