use thiserror::Error;

/// Failures of a tool operation.
///
/// `Display` is the message shown to the user. Library diagnostics travel in
/// the `detail` fields and are logged, never displayed.
#[derive(Error, Debug)]
pub enum PdfToolsError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid page range. PDF has {total_pages} page(s).")]
    InvalidPageRange { total_pages: u32 },

    #[error("Failed to merge PDFs. Please ensure all files are valid PDF documents.")]
    MergeFailed { detail: String },

    #[error("Failed to split PDF. Please ensure the file is a valid PDF document.")]
    SplitFailed { detail: String },

    #[error("Failed to compress PDF. Please ensure the file is a valid PDF document.")]
    CompressFailed { detail: String },

    #[error("Failed to convert image to PDF. Please ensure the file is a valid image.")]
    ConvertFailed { detail: String },

    #[error("Failed to convert page {page} to image")]
    RenderFailed { page: u32, detail: String },

    #[error("Failed to convert selected pages. Please try again.")]
    RasterizeFailed { failed: usize },

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl PdfToolsError {
    /// True for errors raised before any library call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PdfToolsError::MissingInput(_) | PdfToolsError::InvalidPageRange { .. }
        )
    }

    /// Library diagnostic behind a wrapped failure, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            PdfToolsError::MergeFailed { detail }
            | PdfToolsError::SplitFailed { detail }
            | PdfToolsError::CompressFailed { detail }
            | PdfToolsError::ConvertFailed { detail }
            | PdfToolsError::RenderFailed { detail, .. } => Some(detail),
            PdfToolsError::ParseError(detail) => Some(detail),
            _ => None,
        }
    }
}
