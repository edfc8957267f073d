//! Fixture PDFs built with lopdf.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};

/// Create a multi-page PDF. Each page shows one line of text.
pub fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for text in texts {
        let content_str = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        let stream = Stream::new(dictionary! {}, content_str.into_bytes());
        let content_id = doc.add_object(stream);

        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };

        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(texts.len() as i64),
    };
    let pages_id = doc.add_object(pages_dict);

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// The five-page schedule used across tests: band on pages 0 and 2,
/// orchestra on page 3, nothing on 1 and 4.
pub fn five_page_schedule() -> Vec<u8> {
    pdf_with_pages(&[
        "Student A - Period 2 BAND",
        "Student B - Period 2 CHOIR",
        "Student C - Period 5 Jazz Band",
        "Student D - Period 1 ORCHESTRA",
        "Student E - Period 4 STUDY HALL",
    ])
}

/// Text of every page of a PDF, in order.
pub fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .keys()
        .map(|&n| doc.extract_text(&[n]).unwrap())
        .collect()
}

/// A one-page PDF whose link annotation starts a `/Next` action chain of
/// `chain_len` indirect objects.
pub fn pdf_with_action_chain(text: &str, chain_len: usize) -> Vec<u8> {
    let mut doc = Document::load_mem(&pdf_with_pages(&[text])).unwrap();

    let mut next: Option<lopdf::ObjectId> = None;
    for _ in 0..chain_len {
        let mut action = dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal("https://example.com"),
        };
        if let Some(id) = next {
            action.set("Next", Object::Reference(id));
        }
        next = Some(doc.add_object(action));
    }

    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![
            Object::Integer(72),
            Object::Integer(700),
            Object::Integer(200),
            Object::Integer(730),
        ],
        "A" => Object::Reference(next.unwrap()),
    });

    let page_id = *doc.get_pages().values().next().unwrap();
    doc.get_object_mut(page_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set("Annots", vec![Object::Reference(annot_id)]);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
