//! Error types for odftools.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for odftools operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, transforming or writing ODF files.
#[derive(Error, Debug)]
pub enum Error {
    /// The archive could not be opened or is not a valid ODF container.
    #[error("Failed to read ODF container: {0}")]
    Read(#[source] zip::result::ZipError),

    /// The destination could not be opened, written or persisted.
    #[error("Failed to write ODF container: {0}")]
    Write(#[source] std::io::Error),

    /// A filter string is neither a valid glob nor a valid regular expression.
    #[error("Invalid filter pattern '{pattern}': {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A directory segment of a file reference does not exist.
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Error occurred while parsing an XML component.
    #[error("Failed to parse XML: {0}")]
    Xml(String),

    /// A reserved archive entry is not UTF-8 encoded.
    #[error("Entry '{entry}' is not valid UTF-8")]
    InvalidUtf8 { entry: String },

    /// An attribute had no counterpart in the translation map.
    #[error("No mapping for attribute '{attribute}' on element '{element}'")]
    UnmappedAttribute { element: String, attribute: String },

    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
