//! Page copying and output document assembly.
//!
//! [`LopdfAssembler`] keeps its own `lopdf::Document` for the source and
//! copies pages into an [`OutputDocument`] by importing every object the
//! page reaches (content streams, fonts, images, form XObjects,
//! annotations). Object contents are copied verbatim, so vector graphics,
//! embedded fonts and images survive unchanged.

mod import;

use std::collections::{HashMap, HashSet};

use lopdf::{dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::parser::{load_lopdf, PageAssembler};

use import::Importer;

/// PDF version written to output documents.
const OUTPUT_PDF_VERSION: &str = "1.7";

/// [`PageAssembler`] backed by its own `lopdf::Document`.
pub struct LopdfAssembler {
    doc: LopdfDocument,
    /// Page object ids in page-tree order
    page_ids: Vec<ObjectId>,
    page_set: HashSet<ObjectId>,
}

impl LopdfAssembler {
    /// Load from an in-memory byte slice.
    ///
    /// Fails with [`Error::MalformedDocument`] when the bytes are not a
    /// loadable PDF.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::from_document(load_lopdf(data)?))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        let page_set = page_ids.iter().copied().collect();
        Self {
            doc,
            page_ids,
            page_set,
        }
    }

    /// PDF version declared by the source.
    pub fn version(&self) -> &str {
        &self.doc.version
    }
}

impl PageAssembler for LopdfAssembler {
    type Output = OutputDocument;

    fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    fn create_empty(&self) -> OutputDocument {
        OutputDocument::new()
    }

    fn copy_page(&self, dest: &mut OutputDocument, index: u32) -> Result<()> {
        let page_id = *self
            .page_ids
            .get(index as usize)
            .ok_or(Error::PageOutOfRange(index, self.page_count()))?;

        let page = self.doc.get_dictionary(page_id).map_err(|e| {
            Error::MalformedDocument(format!("page {} is not a dictionary: {}", index + 1, e))
        })?;

        let new_id = Importer {
            source: &self.doc,
            source_pages: &self.page_set,
            dest: &mut dest.doc,
            imported: &mut dest.imported,
        }
        .import_page(page_id, page);

        dest.kids.push(new_id);
        log::debug!(
            "copied page {} as object {:?} ({} objects in output)",
            index + 1,
            new_id,
            dest.doc.objects.len()
        );
        Ok(())
    }

    fn serialize(&self, doc: OutputDocument) -> Result<Vec<u8>> {
        doc.into_bytes()
    }
}

/// A new document being built from copied pages.
///
/// Pages appear in the order they were copied.
pub struct OutputDocument {
    doc: LopdfDocument,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    /// Source object id -> output object id
    imported: HashMap<ObjectId, ObjectId>,
}

impl OutputDocument {
    /// Create an empty output document.
    pub fn new() -> Self {
        let mut doc = LopdfDocument::with_version(OUTPUT_PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            imported: HashMap::new(),
        }
    }

    /// Number of pages copied so far.
    pub fn page_count(&self) -> u32 {
        self.kids.len() as u32
    }

    /// Whether no page has been copied.
    pub fn is_empty(&self) -> bool {
        self.kids.is_empty()
    }

    /// Link the page tree and write the document to a byte buffer.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let Self {
            mut doc,
            pages_id,
            kids,
            ..
        } = self;

        for &kid in &kids {
            if let Ok(page_obj) = doc.get_object_mut(kid) {
                if let Ok(dict) = page_obj.as_dict_mut() {
                    dict.set("Parent", Object::Reference(pages_id));
                }
            }
        }

        let kid_refs: Vec<Object> = kids.iter().map(|id| Object::Reference(*id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kid_refs,
                "Count" => Object::Integer(kids.len() as i64),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(concat!("bandfilter ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| Error::Processing(format!("failed to write PDF: {}", e)))?;
        Ok(buf)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}
