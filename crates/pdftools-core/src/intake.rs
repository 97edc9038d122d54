//! File intake rules
//!
//! Validates a file selection (drop or picker) before anything is read or
//! handed to a document library. Accept filters use the same syntax as the
//! HTML `accept` attribute.

use regex::Regex;
use thiserror::Error;

/// Accept string used by every PDF tool.
pub const PDF_ACCEPT: &str = ".pdf,application/pdf";

/// Accept string used by the image packer.
pub const IMAGE_ACCEPT: &str = "image/*";

/// Name, declared MIME type and size of a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    /// Declared type; browsers report an empty string when they don't know.
    pub mime: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }
}

/// A selected file together with its contents.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub meta: FileMeta,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self {
            meta: FileMeta::new(name, mime, size),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn mime(&self) -> &str {
        &self.meta.mime
    }
}

/// Selection rejected before dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please select only one file")]
    SingleFileOnly,

    #[error("Maximum {max} file(s) allowed")]
    TooManyFiles { max: usize },

    #[error("Please select files with the following types: {accept}")]
    UnsupportedType { accept: String },
}

#[derive(Debug, Clone)]
enum AcceptToken {
    Extension(String),
    AnyImage,
    Mime(Regex),
}

impl AcceptToken {
    fn parse(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        if token.starts_with('.') {
            return Some(AcceptToken::Extension(token.to_lowercase()));
        }
        if token == "image/*" {
            return Some(AcceptToken::AnyImage);
        }
        // Unanchored, `*` as wildcard
        let pattern = format!("(?i){}", regex::escape(token).replace(r"\*", ".*"));
        Regex::new(&pattern).ok().map(AcceptToken::Mime)
    }

    fn matches(&self, file: &FileMeta) -> bool {
        match self {
            AcceptToken::Extension(ext) => file.name.to_lowercase().ends_with(ext.as_str()),
            AcceptToken::AnyImage => file.mime.starts_with("image/"),
            AcceptToken::Mime(re) => !file.mime.is_empty() && re.is_match(&file.mime),
        }
    }
}

/// Parsed HTML-style accept filter.
#[derive(Debug, Clone)]
pub struct AcceptFilter {
    raw: String,
    tokens: Vec<AcceptToken>,
}

impl AcceptFilter {
    pub fn parse(accept: &str) -> Self {
        let tokens = accept
            .split(',')
            .filter_map(|t| AcceptToken::parse(t.trim()))
            .collect();
        Self {
            raw: accept.to_string(),
            tokens,
        }
    }

    /// The filter as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An empty filter accepts every file.
    pub fn accepts(&self, file: &FileMeta) -> bool {
        self.tokens.is_empty() || self.tokens.iter().any(|t| t.matches(file))
    }
}

/// What a single dropzone accepts.
#[derive(Debug, Clone)]
pub struct IntakeRules {
    accept: AcceptFilter,
    multiple: bool,
    max_files: Option<usize>,
}

impl IntakeRules {
    pub fn new(accept: &str, multiple: bool, max_files: Option<usize>) -> Self {
        Self {
            accept: AcceptFilter::parse(accept),
            multiple,
            max_files,
        }
    }

    /// One PDF at a time.
    pub fn single_pdf() -> Self {
        Self::new(PDF_ACCEPT, false, None)
    }

    /// Any number of images, optionally capped.
    pub fn images(max_files: Option<usize>) -> Self {
        Self::new(IMAGE_ACCEPT, true, max_files)
    }

    pub fn accept(&self) -> &AcceptFilter {
        &self.accept
    }

    pub fn multiple(&self) -> bool {
        self.multiple
    }

    pub fn max_files(&self) -> Option<usize> {
        self.max_files
    }

    /// Check a selection.
    ///
    /// `Ok(false)` means there was nothing to act on (an empty drop); the
    /// caller does nothing and shows no error.
    pub fn validate(&self, files: &[FileMeta]) -> Result<bool, IntakeError> {
        if files.is_empty() {
            return Ok(false);
        }

        if !self.multiple && files.len() > 1 {
            return Err(IntakeError::SingleFileOnly);
        }

        if let Some(max) = self.max_files {
            if files.len() > max {
                return Err(IntakeError::TooManyFiles { max });
            }
        }

        if !files.iter().all(|f| self.accept.accepts(f)) {
            return Err(IntakeError::UnsupportedType {
                accept: self.accept.as_str().to_string(),
            });
        }

        Ok(true)
    }

    /// Hint lines rendered under the dropzone.
    pub fn hints(&self) -> Vec<String> {
        let mut hints = Vec::new();
        let accept = self.accept.as_str();
        if !accept.is_empty() {
            let label = if accept.contains(',') {
                "Formats"
            } else {
                "Format"
            };
            hints.push(format!("{}: {}", label, accept));
        }
        if self.multiple {
            hints.push(match self.max_files {
                Some(max) => format!("Up to {} files", max),
                None => "Multiple files allowed".to_string(),
            });
        }
        hints
    }
}
