//! Tool configuration
//!
//! Every field has a default, so `{}` is a valid configuration.

use crate::error::PdfToolsError;
use crate::preview::PREVIEW_SCALE;
use crate::raster::DEFAULT_RASTER_SCALE;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PDFJS_WORKER_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.worker.min.js";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolsConfig {
    pub preview_scale: f64,
    pub raster_scale: f64,
    /// Delay before a document download URL is revoked.
    pub document_revoke_ms: u32,
    /// Delay before a page-image download URL is revoked.
    pub image_revoke_ms: u32,
    /// Cap on images accepted by the image packer; `None` is unlimited.
    pub max_image_files: Option<usize>,
    pub pdfjs_worker_url: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            preview_scale: PREVIEW_SCALE,
            raster_scale: DEFAULT_RASTER_SCALE,
            document_revoke_ms: 200,
            image_revoke_ms: 100,
            max_image_files: None,
            pdfjs_worker_url: DEFAULT_PDFJS_WORKER_URL.to_string(),
        }
    }
}

impl ToolsConfig {
    pub fn from_json(json: &str) -> Result<Self, PdfToolsError> {
        let config: ToolsConfig = serde_json::from_str(json)?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(ToolsConfig::from_json("{}").unwrap(), ToolsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ToolsConfig::from_json(r#"{"rasterScale": 3.0, "maxImageFiles": 20}"#).unwrap();
        assert_eq!(config.raster_scale, 3.0);
        assert_eq!(config.max_image_files, Some(20));
        assert_eq!(config.preview_scale, 1.5);
        assert_eq!(config.document_revoke_ms, 200);
        assert_eq!(config.image_revoke_ms, 100);
    }

    #[test]
    fn test_malformed_json() {
        let err = ToolsConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, PdfToolsError::Config(_)));
        assert!(err.to_string().starts_with("Invalid configuration:"));
    }
}
