//! PDF fixtures shared by the unit tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

fn page_content(label: &str) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    label.as_bytes().to_vec(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    content.encode().unwrap()
}

fn letter_box() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ])
}

fn finish(mut doc: Document, pages_id: lopdf::ObjectId, pages: Dictionary) -> Vec<u8> {
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A letter-sized PDF with `num_pages` pages, each labelled "<prefix> <n>".
pub fn create_test_pdf_labelled(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            page_content(&format!("{} {}", prefix, i + 1)),
        ));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", letter_box()),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    finish(doc, pages_id, pages)
}

pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    create_test_pdf_labelled(num_pages, "Page")
}

/// Pages carry no MediaBox of their own; it lives on the page tree root.
pub fn create_pdf_with_inherited_media_box(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            page_content(&format!("Inherited {}", i + 1)),
        ));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        ("MediaBox", letter_box()),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    finish(doc, pages_id, pages)
}

/// A tiny RGBA PNG with one translucent pixel.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    img.put_pixel(0, 0, image::Rgba([0, 0, 0, 128]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

/// Raw content-stream text of a 1-based page.
pub fn page_text(doc: &mut Document, page: u32) -> String {
    doc.decompress();
    let page_id = doc.get_pages()[&page];
    let mut text = String::new();
    for content_id in doc.get_page_contents(page_id) {
        if let Ok(Object::Stream(stream)) = doc.get_object(content_id) {
            text.push_str(&String::from_utf8_lossy(&stream.content));
        }
    }
    text
}
