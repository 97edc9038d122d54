//! PDF re-serialization for size reduction

use crate::error::PdfToolsError;
use crate::format::format_kb;
use lopdf::Document;

fn compress_failed(detail: String) -> PdfToolsError {
    tracing::error!(%detail, "compress failed");
    PdfToolsError::CompressFailed { detail }
}

/// Re-serialize a PDF with unreachable objects and empty streams removed,
/// streams Flate-compressed and objects renumbered.
pub fn compress_pdf(bytes: &[u8]) -> Result<Vec<u8>, PdfToolsError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| compress_failed(e.to_string()))?;

    let pruned = doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.compress();
    doc.renumber_objects();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| compress_failed(format!("save failed: {}", e)))?;

    tracing::debug!(
        original = bytes.len(),
        compressed = buffer.len(),
        pruned = pruned.len(),
        "compress complete"
    );
    Ok(buffer)
}

/// Before/after sizes of a compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionReport {
    pub original_size: usize,
    pub compressed_size: usize,
}

impl CompressionReport {
    pub fn new(original_size: usize, compressed_size: usize) -> Self {
        Self {
            original_size,
            compressed_size,
        }
    }

    /// `(original - new) / original * 100`; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size as f64 - self.compressed_size as f64) / self.original_size as f64
            * 100.0
    }

    /// One decimal, e.g. "25.0%".
    pub fn reduction_label(&self) -> String {
        format!("{:.1}%", self.reduction_percent())
    }

    pub fn summary(&self) -> String {
        format!(
            "Original size: {}. New size: {}. Reduction: {}. Click the button below to download.",
            format_kb(self.original_size as u64),
            format_kb(self.compressed_size as u64),
            self.reduction_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;

    #[test]
    fn test_reduction_label() {
        let report = CompressionReport::new(200 * 1024, 150 * 1024);
        assert_eq!(report.reduction_label(), "25.0%");
    }

    #[test]
    fn test_growth_is_negative() {
        let report = CompressionReport::new(1000, 1100);
        assert_eq!(report.reduction_label(), "-10.0%");
    }

    #[test]
    fn test_empty_original() {
        assert_eq!(CompressionReport::new(0, 10).reduction_label(), "0.0%");
    }

    #[test]
    fn test_summary_text() {
        let report = CompressionReport::new(2048, 1024);
        assert_eq!(
            report.summary(),
            "Original size: 2.00 KB. New size: 1.00 KB. Reduction: 50.0%. \
             Click the button below to download."
        );
    }

    #[test]
    fn test_compress_keeps_pages() {
        let pdf = create_test_pdf(4);
        let out = compress_pdf(&pdf).unwrap();
        let doc = Document::load_mem(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
    }

    #[test]
    fn test_compress_rejects_garbage() {
        let err = compress_pdf(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, PdfToolsError::CompressFailed { .. }));
    }
}
