//! Object graph import between lopdf documents.

use std::collections::{HashMap, HashSet, VecDeque};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on page-tree depth when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Source objects waiting to be copied, with their destination ids.
type Pending = VecDeque<(ObjectId, ObjectId)>;

/// Copies objects reachable from a source page into a destination document.
///
/// `imported` maps source object ids to destination ids and is shared across
/// all pages copied into one output, so resources used by several pages
/// (fonts, images) are imported once.
pub(crate) struct Importer<'a> {
    pub source: &'a LopdfDocument,
    pub source_pages: &'a HashSet<ObjectId>,
    pub dest: &'a mut LopdfDocument,
    pub imported: &'a mut HashMap<ObjectId, ObjectId>,
}

impl Importer<'_> {
    /// Import one page dictionary and return its id in the destination.
    ///
    /// Inherited attributes are written onto the copy and `/Parent` is
    /// dropped; the caller links the page into its own page tree.
    pub fn import_page(&mut self, page_id: ObjectId, page: &Dictionary) -> ObjectId {
        let mut copy = page.clone();
        for key in INHERITABLE_KEYS {
            if !copy.has(key) {
                if let Some(value) = inherited_attribute(self.source, page, key) {
                    copy.set(key, value);
                }
            }
        }
        copy.remove(b"Parent");

        let new_id = self.dest.new_object_id();
        // Registered before walking so annotations pointing back at the page
        // (/P) resolve to the copy.
        self.imported.insert(page_id, new_id);

        let mut pending = VecDeque::new();
        let copied = self.rewrite_dictionary(&copy, &mut pending);
        self.dest.objects.insert(new_id, Object::Dictionary(copied));

        // Indirect objects are copied from a work queue, so reference chains
        // of any length use constant stack.
        let source = self.source;
        while let Some((src_id, dest_id)) = pending.pop_front() {
            let copied = match source.get_object(src_id) {
                Ok(object) => self.rewrite_object(object, &mut pending),
                Err(_) => Object::Null,
            };
            self.dest.objects.insert(dest_id, copied);
        }

        new_id
    }

    fn rewrite_object(&mut self, object: &Object, pending: &mut Pending) -> Object {
        match object {
            Object::Reference(id) => self.map_reference(*id, pending),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.rewrite_object(item, pending))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.rewrite_dictionary(dict, pending)),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.rewrite_dictionary(&stream.dict, pending);
                Object::Stream(copied)
            }
            other => other.clone(),
        }
    }

    fn rewrite_dictionary(&mut self, dict: &Dictionary, pending: &mut Pending) -> Dictionary {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.rewrite_object(value, pending));
        }
        copied
    }

    /// Destination reference for a source id, queueing the object for copy
    /// the first time it is seen.
    fn map_reference(&mut self, id: ObjectId, pending: &mut Pending) -> Object {
        if let Some(&mapped) = self.imported.get(&id) {
            return Object::Reference(mapped);
        }

        // Other source pages are only reachable through links and
        // destinations; pulling them in would drag their content along.
        if self.source_pages.contains(&id) {
            return Object::Null;
        }

        // A reference to a missing object is equivalent to null.
        if self.source.get_object(id).is_err() {
            log::debug!("dangling reference {:?} replaced with null", id);
            return Object::Null;
        }

        let new_id = self.dest.new_object_id();
        self.imported.insert(id, new_id);
        pending.push_back((id, new_id));
        Object::Reference(new_id)
    }
}

/// Look up `key` on the ancestors of `page`.
pub(crate) fn inherited_attribute(
    doc: &LopdfDocument,
    page: &Dictionary,
    key: &[u8],
) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_inherited_attribute_walks_tree() {
        let mut doc = LopdfDocument::with_version("1.5");
        let root_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(300),
                Object::Integer(400),
            ],
        });
        let mid_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Rotate" => Object::Integer(90),
        });
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => mid_id,
        };

        assert!(matches!(
            inherited_attribute(&doc, &page, b"Rotate"),
            Some(Object::Integer(90))
        ));
        assert!(matches!(
            inherited_attribute(&doc, &page, b"MediaBox"),
            Some(Object::Array(_))
        ));
        assert!(inherited_attribute(&doc, &page, b"CropBox").is_none());
    }

    #[test]
    fn test_shared_objects_imported_once() {
        let mut source = LopdfDocument::with_version("1.5");
        let font_id = source.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let page_a = dictionary! {
            "Type" => "Page",
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        };
        let page_b = page_a.clone();
        let page_a_id = source.add_object(page_a.clone());
        let page_b_id = source.add_object(page_b.clone());
        let pages: HashSet<ObjectId> = [page_a_id, page_b_id].into_iter().collect();

        let mut dest = LopdfDocument::with_version("1.7");
        let mut imported = HashMap::new();
        let mut importer = Importer {
            source: &source,
            source_pages: &pages,
            dest: &mut dest,
            imported: &mut imported,
        };
        importer.import_page(page_a_id, &page_a);
        importer.import_page(page_b_id, &page_b);

        let fonts = dest
            .objects
            .values()
            .filter(|o| matches!(o, Object::Dictionary(d) if d.has(b"BaseFont")))
            .count();
        assert_eq!(fonts, 1);
    }

    #[test]
    fn test_links_to_other_pages_become_null() {
        let mut source = LopdfDocument::with_version("1.5");
        let other_page_id = source.add_object(dictionary! { "Type" => "Page" });
        let page = dictionary! {
            "Type" => "Page",
            "Dest" => vec![Object::Reference(other_page_id), "Fit".into()],
        };
        let page_id = source.add_object(page.clone());
        let pages: HashSet<ObjectId> = [page_id, other_page_id].into_iter().collect();

        let mut dest = LopdfDocument::with_version("1.7");
        let mut imported = HashMap::new();
        let new_id = Importer {
            source: &source,
            source_pages: &pages,
            dest: &mut dest,
            imported: &mut imported,
        }
        .import_page(page_id, &page);

        let copied = dest.get_dictionary(new_id).unwrap();
        let dest_array = copied.get(b"Dest").unwrap().as_array().unwrap();
        assert!(matches!(dest_array[0], Object::Null));
    }

    #[test]
    fn test_long_reference_chain_imports_without_recursion() {
        const CHAIN_LEN: usize = 5000;

        let mut source = LopdfDocument::with_version("1.5");
        let mut next: Option<ObjectId> = None;
        for _ in 0..CHAIN_LEN {
            let mut action = dictionary! { "S" => "URI", "URI" => Object::string_literal("x") };
            if let Some(id) = next {
                action.set("Next", Object::Reference(id));
            }
            next = Some(source.add_object(action));
        }
        let head = next.unwrap();
        let page = dictionary! {
            "Type" => "Page",
            "Annots" => vec![Object::Dictionary(dictionary! {
                "Subtype" => "Link",
                "A" => Object::Reference(head),
            })],
        };
        let page_id = source.add_object(page.clone());
        let pages: HashSet<ObjectId> = [page_id].into_iter().collect();

        // A small stack fails fast if the walk recurses per reference.
        let imported_objects = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || {
                let mut dest = LopdfDocument::with_version("1.7");
                let mut imported = HashMap::new();
                Importer {
                    source: &source,
                    source_pages: &pages,
                    dest: &mut dest,
                    imported: &mut imported,
                }
                .import_page(page_id, &page);
                dest.objects.len()
            })
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(imported_objects, CHAIN_LEN + 1);
    }

    #[test]
    fn test_dangling_reference_becomes_null() {
        let mut source = LopdfDocument::with_version("1.5");
        let page = dictionary! {
            "Type" => "Page",
            "Thumb" => Object::Reference((9999, 0)),
        };
        let page_id = source.add_object(page.clone());
        let pages: HashSet<ObjectId> = [page_id].into_iter().collect();

        let mut dest = LopdfDocument::with_version("1.7");
        let mut imported = HashMap::new();
        let new_id = Importer {
            source: &source,
            source_pages: &pages,
            dest: &mut dest,
            imported: &mut imported,
        }
        .import_page(page_id, &page);

        let copied = dest.get_dictionary(new_id).unwrap();
        assert!(matches!(copied.get(b"Thumb"), Ok(Object::Null)));
        assert_eq!(dest.objects.len(), 1);
    }
}
