//! Result artifacts offered for download

use crate::range::PageRange;

pub const PDF_MIME: &str = "application/pdf";
pub const PNG_MIME: &str = "image/png";

/// What produced an artifact; decides its file name and MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Merged,
    Split(PageRange),
    Compressed,
    PageImage(u32),
    ImagesToPdf,
}

impl ArtifactKind {
    /// File name stamped with `timestamp_ms` (milliseconds since the epoch).
    pub fn file_name(&self, timestamp_ms: i64) -> String {
        match self {
            ArtifactKind::Merged => format!("merged-{}.pdf", timestamp_ms),
            ArtifactKind::Split(range) => format!(
                "split-pages-{}-{}-{}.pdf",
                range.start, range.end, timestamp_ms
            ),
            ArtifactKind::Compressed => format!("compressed-{}.pdf", timestamp_ms),
            ArtifactKind::PageImage(page) => format!("page-{}-{}.png", page, timestamp_ms),
            ArtifactKind::ImagesToPdf => format!("images-to-pdf-{}.pdf", timestamp_ms),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ArtifactKind::PageImage(_) => PNG_MIME,
            _ => PDF_MIME,
        }
    }
}

/// A serialized result, named and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, bytes: Vec<u8>, timestamp_ms: i64) -> Self {
        Self {
            kind,
            file_name: kind.file_name(timestamp_ms),
            bytes,
        }
    }

    pub fn mime(&self) -> &'static str {
        self.kind.mime()
    }

    /// Caption of the download button.
    pub fn label(&self) -> String {
        format!("📥 Download {}", self.file_name)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TS: i64 = 1_700_000_000_123;

    #[test]
    fn test_file_names() {
        assert_eq!(ArtifactKind::Merged.file_name(TS), "merged-1700000000123.pdf");
        assert_eq!(
            ArtifactKind::Split(PageRange { start: 2, end: 5 }).file_name(TS),
            "split-pages-2-5-1700000000123.pdf"
        );
        assert_eq!(
            ArtifactKind::Compressed.file_name(TS),
            "compressed-1700000000123.pdf"
        );
        assert_eq!(
            ArtifactKind::PageImage(3).file_name(TS),
            "page-3-1700000000123.png"
        );
        assert_eq!(
            ArtifactKind::ImagesToPdf.file_name(TS),
            "images-to-pdf-1700000000123.pdf"
        );
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(ArtifactKind::PageImage(1).mime(), "image/png");
        assert_eq!(ArtifactKind::Merged.mime(), "application/pdf");
        assert_eq!(ArtifactKind::ImagesToPdf.mime(), "application/pdf");
    }

    #[test]
    fn test_artifact_label() {
        let artifact = Artifact::new(ArtifactKind::Merged, vec![1, 2], 2);
        assert_eq!(artifact.file_name, "merged-2.pdf");
        assert_eq!(artifact.label(), "📥 Download merged-2.pdf");
        assert_eq!(artifact.len(), 2);
    }
}
