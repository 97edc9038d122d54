//! Images to PDF
//!
//! Every image becomes one page the size of the image, drawn at the origin.
//! JPEG data is embedded as-is (DCTDecode); PNG is decoded and re-embedded as
//! Flate-compressed RGB with an optional soft mask for transparency.

use crate::error::PdfToolsError;
use crate::format::format_kb;
use crate::intake::{FileMeta, IntakeError, IntakeRules, SelectedFile};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::{Cursor, Write};

/// Image encodings the packer embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Kind from a declared MIME type; `None` when unrecognized.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageKind::Png),
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }
}

/// An image XObject ready to be added to a document.
struct EmbeddedImage {
    width: u32,
    height: u32,
    image: Stream,
    soft_mask: Option<Stream>,
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(|e| e.to_string())?;
    encoder.finish().map_err(|e| e.to_string())
}

fn image_stream(width: u32, height: u32, color_space: &str, filter: &str, data: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
            "Filter" => filter,
        },
        data,
    )
}

/// Decoded pixels as Flate RGB plus a gray soft mask when any pixel is
/// not fully opaque.
fn embed_pixels(decoded: &DynamicImage) -> Result<EmbeddedImage, String> {
    let (width, height) = (decoded.width(), decoded.height());
    let rgba = decoded.to_rgba8();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let soft_mask = if alpha.iter().any(|&a| a != 255) {
        Some(image_stream(
            width,
            height,
            "DeviceGray",
            "FlateDecode",
            deflate(&alpha)?,
        ))
    } else {
        None
    };

    Ok(EmbeddedImage {
        width,
        height,
        image: image_stream(width, height, "DeviceRGB", "FlateDecode", deflate(&rgb)?),
        soft_mask,
    })
}

fn embed_png(bytes: &[u8]) -> Result<EmbeddedImage, String> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| format!("png: {}", e))?;
    embed_pixels(&decoded)
}

fn embed_jpeg(bytes: &[u8]) -> Result<EmbeddedImage, String> {
    let decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(|e| format!("jpeg: {}", e))?;
    let original = decoder.original_color_type();
    let (width, height) = decoder.dimensions();

    let color_space = match original {
        ExtendedColorType::L8 => "DeviceGray",
        ExtendedColorType::Rgb8 => "DeviceRGB",
        // CMYK and friends: let the codec convert and embed pixels
        _ => {
            let decoded = DynamicImage::from_decoder(decoder).map_err(|e| format!("jpeg: {}", e))?;
            return embed_pixels(&decoded);
        }
    };

    Ok(EmbeddedImage {
        width,
        height,
        image: image_stream(width, height, color_space, "DCTDecode", bytes.to_vec()),
        soft_mask: None,
    })
}

/// Embed one file, choosing the decoder from its declared type and falling
/// back to PNG then JPEG when the type is unrecognized.
fn embed_file(file: &SelectedFile) -> Result<EmbeddedImage, String> {
    let embedded = match ImageKind::from_mime(file.mime()) {
        Some(ImageKind::Png) => embed_png(&file.bytes),
        Some(ImageKind::Jpeg) => embed_jpeg(&file.bytes),
        None => embed_png(&file.bytes).or_else(|png_err| {
            embed_jpeg(&file.bytes).map_err(|jpeg_err| format!("{}; {}", png_err, jpeg_err))
        }),
    };
    embedded.map_err(|e| format!("{}: {}", file.name(), e))
}

fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    embedded: EmbeddedImage,
) -> Result<ObjectId, String> {
    let EmbeddedImage {
        width,
        height,
        mut image,
        soft_mask,
    } = embedded;

    if let Some(mask) = soft_mask {
        let mask_id = doc.add_object(mask);
        image.dict.set("SMask", Object::Reference(mask_id));
    }
    let image_id = doc.add_object(image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width as i64).into(),
                    0.into(),
                    0.into(),
                    (height as i64).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(|e| e.to_string())?,
    ));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    }))
}

fn images_to_pdf_inner(images: &[SelectedFile]) -> Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    // Strictly one image at a time, in selection order
    let mut page_ids = Vec::with_capacity(images.len());
    for file in images {
        let embedded = embed_file(file)?;
        page_ids.push(add_image_page(&mut doc, pages_id, embedded)?);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| format!("save failed: {}", e))?;
    Ok(buffer)
}

/// Build a PDF with one page per image.
pub fn images_to_pdf(images: &[SelectedFile]) -> Result<Vec<u8>, PdfToolsError> {
    if images.is_empty() {
        return Err(PdfToolsError::MissingInput(
            "Please select at least one image file".into(),
        ));
    }

    tracing::debug!(count = images.len(), "packing images into PDF");

    images_to_pdf_inner(images).map_err(|detail| {
        tracing::error!(%detail, "image conversion failed");
        PdfToolsError::ConvertFailed { detail }
    })
}

/// Images picked for packing.
#[derive(Debug, Clone)]
pub struct ImageBatch {
    rules: IntakeRules,
    images: Vec<SelectedFile>,
}

impl ImageBatch {
    pub fn new(max_files: Option<usize>) -> Self {
        Self {
            rules: IntakeRules::images(max_files),
            images: Vec::new(),
        }
    }

    pub fn rules(&self) -> &IntakeRules {
        &self.rules
    }

    /// Replace the batch with a new selection.
    ///
    /// Returns `Ok(false)` for an empty drop, leaving the batch unchanged.
    pub fn replace(&mut self, files: Vec<SelectedFile>) -> Result<bool, IntakeError> {
        let metas: Vec<FileMeta> = files.iter().map(|f| f.meta.clone()).collect();
        if !self.rules.validate(&metas)? {
            return Ok(false);
        }
        self.images = files;
        Ok(true)
    }

    pub fn images(&self) -> &[SelectedFile] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn can_convert(&self) -> bool {
        !self.images.is_empty()
    }

    /// "name (12.34 KB)" per image, in order.
    pub fn entries(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|f| format!("{} ({})", f.name(), format_kb(f.meta.size)))
            .collect()
    }

    /// Convert the batch; on success the batch is emptied.
    pub fn convert(&mut self) -> Result<Vec<u8>, PdfToolsError> {
        let pdf = images_to_pdf(&self.images)?;
        self.images.clear();
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_jpeg, create_test_png};

    fn media_box(doc: &Document, page: u32) -> Vec<i64> {
        let page_id = doc.get_pages()[&page];
        doc.get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(ImageKind::from_mime("image/png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/webp"), None);
        assert_eq!(ImageKind::from_mime(""), None);
    }

    #[test]
    fn test_one_page_per_image_sized_to_image() {
        let images = vec![
            SelectedFile::new("a.png", "image/png", create_test_png(40, 30)),
            SelectedFile::new("b.jpg", "image/jpeg", create_test_jpeg(64, 48)),
        ];

        let pdf = images_to_pdf(&images).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();

        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(media_box(&doc, 1), vec![0, 0, 40, 30]);
        assert_eq!(media_box(&doc, 2), vec![0, 0, 64, 48]);
    }

    #[test]
    fn test_png_transparency_gets_soft_mask() {
        let embedded = embed_png(&create_test_png(4, 4)).unwrap();
        assert!(embedded.soft_mask.is_some());
        assert_eq!((embedded.width, embedded.height), (4, 4));
    }

    #[test]
    fn test_jpeg_is_passed_through() {
        let jpeg = create_test_jpeg(8, 8);
        let embedded = embed_jpeg(&jpeg).unwrap();
        assert_eq!(embedded.image.content, jpeg);
        assert!(embedded.soft_mask.is_none());
    }

    #[test]
    fn test_unknown_mime_falls_back() {
        let images = vec![
            SelectedFile::new("mystery", "", create_test_jpeg(10, 10)),
            SelectedFile::new("other", "application/octet-stream", create_test_png(5, 5)),
        ];
        let pdf = images_to_pdf(&images).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_invalid_image_is_wrapped() {
        let images = vec![SelectedFile::new("x.png", "image/png", b"not a png".to_vec())];
        let err = images_to_pdf(&images).unwrap_err();
        assert!(matches!(err, PdfToolsError::ConvertFailed { .. }));
        assert!(err.detail().unwrap().starts_with("x.png"));
    }

    #[test]
    fn test_empty_input_is_validation_error() {
        let err = images_to_pdf(&[]).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please select at least one image file");
    }

    #[test]
    fn test_batch_respects_max_files() {
        let mut batch = ImageBatch::new(Some(1));
        let files = vec![
            SelectedFile::new("a.png", "image/png", create_test_png(2, 2)),
            SelectedFile::new("b.png", "image/png", create_test_png(2, 2)),
        ];
        assert_eq!(
            batch.replace(files),
            Err(IntakeError::TooManyFiles { max: 1 })
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_rejects_non_images() {
        let mut batch = ImageBatch::new(None);
        let files = vec![SelectedFile::new("a.pdf", "application/pdf", vec![1, 2, 3])];
        assert!(matches!(
            batch.replace(files),
            Err(IntakeError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_batch_convert_clears() {
        let mut batch = ImageBatch::new(None);
        batch
            .replace(vec![SelectedFile::new(
                "a.png",
                "image/png",
                create_test_png(3, 3),
            )])
            .unwrap();
        assert!(batch.can_convert());
        assert_eq!(batch.entries().len(), 1);
        assert!(batch.entries()[0].starts_with("a.png ("));

        let pdf = batch.convert().unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(batch.is_empty());
    }
}
