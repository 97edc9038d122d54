//! JSON command API
//!
//! A host that cannot hold the stateful tool objects sends one command and
//! gets back one result with the artifact base64-encoded.

use crate::artifact::{Artifact, ArtifactKind};
use crate::compress::{compress_pdf, CompressionReport};
use crate::error::PdfToolsError;
use crate::images::images_to_pdf;
use crate::intake::SelectedFile;
use crate::merge::merge_documents;
use crate::range::PageRange;
use crate::split::split_range;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// A file carried inline as base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedFile {
    pub name: String,
    #[serde(default)]
    pub mime: String,
    pub data: String,
}

impl EncodedFile {
    pub fn encode(name: &str, mime: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    fn decode(&self) -> Result<SelectedFile, PdfToolsError> {
        let bytes = STANDARD.decode(&self.data).map_err(|e| {
            tracing::error!(name = %self.name, error = %e, "invalid base64 payload");
            PdfToolsError::MissingInput(format!("{} could not be read", self.name))
        })?;
        Ok(SelectedFile::new(&self.name, &self.mime, bytes))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ToolCommand {
    Merge { files: Vec<EncodedFile> },
    Split {
        file: EncodedFile,
        start: i64,
        end: i64,
    },
    Compress { file: EncodedFile },
    ImagesToPdf { images: Vec<EncodedFile> },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    /// Base64-encoded artifact
    pub data: Option<String>,
    pub file_name: Option<String>,
    pub mime: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
    pub reduction_percent: Option<f64>,
}

impl ProcessResult {
    fn failure(err: &PdfToolsError) -> Self {
        Self {
            success: false,
            data: None,
            file_name: None,
            mime: None,
            message: None,
            error: Some(err.to_string()),
            metrics: None,
        }
    }
}

struct Outcome {
    artifact: Artifact,
    message: String,
    input_size: usize,
    reduction_percent: Option<f64>,
}

fn decode_all(files: &[EncodedFile]) -> Result<Vec<SelectedFile>, PdfToolsError> {
    files.iter().map(EncodedFile::decode).collect()
}

fn run(command: &ToolCommand, timestamp_ms: i64) -> Result<Outcome, PdfToolsError> {
    match command {
        ToolCommand::Merge { files } => {
            if files.len() != 2 {
                return Err(PdfToolsError::MissingInput(
                    "Please select both PDF files to merge".into(),
                ));
            }
            let files = decode_all(files)?;
            let inputs: Vec<&[u8]> = files.iter().map(|f| f.bytes.as_slice()).collect();
            let merged = merge_documents(&inputs)?;
            Ok(Outcome {
                artifact: Artifact::new(ArtifactKind::Merged, merged, timestamp_ms),
                message: "PDFs merged successfully! Click the button below to download.".into(),
                input_size: inputs.iter().map(|b| b.len()).sum(),
                reduction_percent: None,
            })
        }
        ToolCommand::Split { file, start, end } => {
            let file = file.decode()?;
            let bytes = split_range(&file.bytes, *start, *end)?;
            // split_range has already validated the bounds
            let range = PageRange {
                start: *start as u32,
                end: *end as u32,
            };
            Ok(Outcome {
                artifact: Artifact::new(ArtifactKind::Split(range), bytes, timestamp_ms),
                message: "PDF split successfully! Click the button below to download.".into(),
                input_size: file.bytes.len(),
                reduction_percent: None,
            })
        }
        ToolCommand::Compress { file } => {
            let file = file.decode()?;
            let bytes = compress_pdf(&file.bytes)?;
            let report = CompressionReport::new(file.bytes.len(), bytes.len());
            Ok(Outcome {
                artifact: Artifact::new(ArtifactKind::Compressed, bytes, timestamp_ms),
                message: report.summary(),
                input_size: file.bytes.len(),
                reduction_percent: Some(report.reduction_percent()),
            })
        }
        ToolCommand::ImagesToPdf { images } => {
            let images = decode_all(images)?;
            let bytes = images_to_pdf(&images)?;
            Ok(Outcome {
                artifact: Artifact::new(ArtifactKind::ImagesToPdf, bytes, timestamp_ms),
                message: "PDF created successfully! Click the button below to download.".into(),
                input_size: images.iter().map(|f| f.bytes.len()).sum(),
                reduction_percent: None,
            })
        }
    }
}

/// Run one command; failures are reported in the result, never panicked.
pub fn process(command: &ToolCommand, timestamp_ms: i64) -> ProcessResult {
    match run(command, timestamp_ms) {
        Ok(outcome) => {
            let page_count = crate::get_page_count(&outcome.artifact.bytes).unwrap_or(0);
            ProcessResult {
                success: true,
                data: Some(STANDARD.encode(&outcome.artifact.bytes)),
                mime: Some(outcome.artifact.mime().to_string()),
                message: Some(outcome.message),
                error: None,
                metrics: Some(ProcessMetrics {
                    input_size_bytes: outcome.input_size,
                    output_size_bytes: outcome.artifact.len(),
                    page_count,
                    reduction_percent: outcome.reduction_percent,
                }),
                file_name: Some(outcome.artifact.file_name),
            }
        }
        Err(err) => ProcessResult::failure(&err),
    }
}

/// Parse a JSON command and run it.
pub fn process_json(json: &str, timestamp_ms: i64) -> Result<ProcessResult, PdfToolsError> {
    let command: ToolCommand =
        serde_json::from_str(json).map_err(|e| PdfToolsError::InvalidCommand(e.to_string()))?;
    Ok(process(&command, timestamp_ms))
}
