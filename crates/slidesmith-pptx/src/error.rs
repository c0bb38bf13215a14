//! Error types for deck authoring and analysis.

use thiserror::Error;

/// Result type for slidesmith operations
pub type Result<T> = std::result::Result<T, DeckError>;

/// Broad category of a [`DeckError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, unreadable or unwritable path
    File,
    /// Content that does not parse as the expected structure
    Format,
    /// A layout or slide index that does not exist
    OutOfRange,
    /// The template cannot provide what an operation needs
    Unsupported,
}

/// Errors that can occur while loading, assembling or saving a deck
#[derive(Error, Debug)]
pub enum DeckError {
    /// A path could not be read or written
    #[error("File error on {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration, slide specification or part content is malformed
    #[error("Format error in {context}: {reason}")]
    Format { context: String, reason: String },

    /// Template package is structurally incomplete
    #[error("Invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// Layout index does not exist in the loaded template
    #[error("Layout index {index} out of range: template has {count} layouts")]
    LayoutOutOfRange { index: usize, count: usize },

    /// Slide index does not exist in the deck
    #[error("Slide index {index} out of range: deck has {count} slides")]
    SlideOutOfRange { index: usize, count: usize },

    /// The resolved layout does not expose the placeholders an operation needs
    #[error("Unsupported operation: {reason}")]
    Unsupported { reason: String },

    /// XML reader error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error without an associated path (in-memory buffers)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeckError {
    /// Create a file error for `path`
    pub fn file(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::File {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create a format error
    pub fn format(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template(reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            reason: reason.into(),
        }
    }

    /// Create a layout out-of-range error
    pub fn layout_out_of_range(index: usize, count: usize) -> Self {
        Self::LayoutOutOfRange { index, count }
    }

    /// Create a slide out-of-range error
    pub fn slide_out_of_range(index: usize, count: usize) -> Self {
        Self::SlideOutOfRange { index, count }
    }

    /// Create an unsupported operation error
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::File { .. } | Self::Io(_) => ErrorKind::File,
            Self::Format { .. } | Self::InvalidTemplate { .. } | Self::Xml(_) | Self::Zip(_) => {
                ErrorKind::Format
            }
            Self::LayoutOutOfRange { .. } | Self::SlideOutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::File { .. } => "DECK001",
            Self::Format { .. } => "DECK002",
            Self::InvalidTemplate { .. } => "DECK003",
            Self::LayoutOutOfRange { .. } => "DECK004",
            Self::SlideOutOfRange { .. } => "DECK005",
            Self::Unsupported { .. } => "DECK006",
            Self::Xml(_) => "DECK007",
            Self::Zip(_) => "DECK008",
            Self::Io(_) => "DECK009",
        }
    }
}
