//! PDF Merge
//!
//! Combines PDFs into a single document, pages in input order.

use crate::error::PdfToolsError;
use crate::intake::SelectedFile;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Page-tree nesting deeper than this is treated as a cycle.
const MAX_TREE_DEPTH: usize = 64;

/// Merge PDFs into one.
///
/// The algorithm:
/// 1. Load every input; the first becomes the destination
/// 2. Materialize inherited page attributes so pages can be re-parented
/// 3. For each further source, shift its object IDs past the destination's
///    and import every object
/// 4. Rebuild a flat page tree holding all pages in order
/// 5. Drop the orphaned catalogs, compress and serialize
pub fn merge_documents(documents: &[&[u8]]) -> Result<Vec<u8>, PdfToolsError> {
    if documents.is_empty() {
        return Err(PdfToolsError::MissingInput("No documents to merge".into()));
    }

    tracing::debug!(count = documents.len(), "merging documents");

    merge_inner(documents).map_err(|detail| {
        tracing::error!(%detail, "merge failed");
        PdfToolsError::MergeFailed { detail }
    })
}

fn merge_inner(documents: &[&[u8]]) -> Result<Vec<u8>, String> {
    // Single document - nothing to combine
    if let [only] = documents {
        let doc = Document::load_mem(only).map_err(|e| format!("document 1: {}", e))?;
        if doc.get_pages().is_empty() {
            return Err("document 1 has no pages".into());
        }
        return Ok(only.to_vec());
    }

    let mut loaded = Vec::with_capacity(documents.len());
    for (i, bytes) in documents.iter().enumerate() {
        let mut doc = Document::load_mem(bytes).map_err(|e| format!("document {}: {}", i + 1, e))?;
        materialize_inherited(&mut doc)?;
        loaded.push(doc);
    }

    let mut dest = loaded.remove(0);
    let pages_id = page_tree_root(&dest)?;
    let mut page_refs: Vec<ObjectId> = dest.get_pages().into_values().collect();
    let mut max_id = dest.max_id;

    for source in loaded {
        let offset = max_id;
        let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        let source_max = source.max_id;

        let mut imported = BTreeMap::new();
        for ((number, generation), mut object) in source.objects {
            remap_object_refs(&mut object, offset);
            imported.insert((number + offset, generation), object);
        }
        dest.objects.extend(imported);

        page_refs.extend(source_pages.iter().map(|&(n, g)| (n + offset, g)));
        max_id = max_id.max(source_max + offset);
    }

    dest.max_id = max_id;
    rebuild_page_tree(&mut dest, pages_id, &page_refs)?;

    dest.prune_objects();
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| format!("failed to save merged PDF: {}", e))?;

    tracing::debug!(pages = page_refs.len(), bytes = buffer.len(), "merge complete");
    Ok(buffer)
}

/// Copy attributes inherited through the page tree onto each page.
pub(crate) fn materialize_inherited(doc: &mut Document) -> Result<(), String> {
    for page_id in doc.get_pages().into_values() {
        let mut inherited = Vec::new();
        {
            let page = doc
                .get_dictionary(page_id)
                .map_err(|e| format!("page {:?}: {}", page_id, e))?;
            for key in INHERITABLE {
                if page.has(key) {
                    continue;
                }
                if let Some(value) = find_inherited(doc, page, key) {
                    inherited.push((key, value));
                }
            }
        }

        if inherited.is_empty() {
            continue;
        }
        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| format!("page {:?}: {}", page_id, e))?;
        for (key, value) in inherited {
            page.set(key.to_vec(), value);
        }
    }
    Ok(())
}

fn find_inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(id) = parent {
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let node = doc.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    None
}

/// Shift every reference in an object by `offset`
fn remap_object_refs(obj: &mut Object, offset: u32) {
    match obj {
        Object::Reference(id) => id.0 += offset,
        Object::Array(arr) => arr.iter_mut().for_each(|o| remap_object_refs(o, offset)),
        Object::Dictionary(dict) => dict
            .iter_mut()
            .for_each(|(_, v)| remap_object_refs(v, offset)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, v)| remap_object_refs(v, offset)),
        _ => {}
    }
}

/// Object ID of the root `Pages` node.
pub(crate) fn page_tree_root(doc: &Document) -> Result<ObjectId, String> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| "no Root in trailer".to_string())?;

    doc.get_dictionary(catalog_id)
        .map_err(|_| "invalid catalog".to_string())?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| "no Pages in catalog".to_string())
}

/// Point the root page node at `page_refs` and re-parent every page.
pub(crate) fn rebuild_page_tree(
    doc: &mut Document,
    pages_id: ObjectId,
    page_refs: &[ObjectId],
) -> Result<(), String> {
    match doc.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(pages_dict)) => {
            let kids = page_refs.iter().map(|&id| Object::Reference(id)).collect();
            pages_dict.set("Kids", Object::Array(kids));
            pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
        }
        _ => return Err("invalid pages dictionary".into()),
    }

    for &page_id in page_refs {
        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| format!("page {:?}: {}", page_id, e))?;
        page.set("Parent", Object::Reference(pages_id));
    }
    Ok(())
}

/// Which of the two merge inputs a file goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSlot {
    First,
    Second,
}

/// The two documents picked for merging.
#[derive(Debug, Clone, Default)]
pub struct MergeInputs {
    first: Option<SelectedFile>,
    second: Option<SelectedFile>,
}

impl MergeInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: MergeSlot, file: SelectedFile) {
        match slot {
            MergeSlot::First => self.first = Some(file),
            MergeSlot::Second => self.second = Some(file),
        }
    }

    pub fn get(&self, slot: MergeSlot) -> Option<&SelectedFile> {
        match slot {
            MergeSlot::First => self.first.as_ref(),
            MergeSlot::Second => self.second.as_ref(),
        }
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }

    /// Both inputs present.
    pub fn can_merge(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// Merge the two inputs; on success the inputs are cleared.
    pub fn merge(&mut self) -> Result<Vec<u8>, PdfToolsError> {
        let (Some(first), Some(second)) = (&self.first, &self.second) else {
            return Err(PdfToolsError::MissingInput(
                "Please select both PDF files to merge".into(),
            ));
        };

        let merged = merge_documents(&[first.bytes.as_slice(), second.bytes.as_slice()])?;
        self.clear();
        Ok(merged)
    }
}
