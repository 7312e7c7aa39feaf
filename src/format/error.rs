//! Error types for cell list file operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a cell list file.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// A marker field held a value that is not a number
    #[error("Invalid coordinate in element '{element}': {value:?}")]
    InvalidCoordinate {
        /// The XML element name
        element: String,
        /// The offending text
        value: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
