//! Shared test fixtures: build small real PDFs on disk with lopdf.
//!
//! Using genuine PDF structure (page tree, fonts, content streams) instead of
//! mocks means the extractor is exercised against exactly what production
//! sees, just smaller.

// Each test binary links its own copy; not every helper is used by every one.
#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// What to put on one page of a fixture PDF.
pub enum PageSpec {
    /// A page drawing the given string.
    Text(String),
    /// A page whose content stream reference dangles; the document stays
    /// loadable but the page yields no usable text.
    Broken,
}

impl PageSpec {
    pub fn text(s: impl Into<String>) -> Self {
        PageSpec::Text(s.into())
    }
}

/// Optional document information dictionary fields.
#[derive(Default)]
pub struct InfoSpec {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Write a PDF with the given pages (and optional info dict) to
/// `dir/name`, returning its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[PageSpec], info: Option<InfoSpec>) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for spec in pages {
        let contents: Object = match spec {
            PageSpec::Text(text) => {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![50.into(), 700.into()]),
                        Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                        Operation::new("ET", vec![]),
                    ],
                };
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                    .into()
            }
            // Reference to an object that does not exist.
            PageSpec::Broken => Object::Reference((9999, 0)),
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(info) = info {
        let mut dict = lopdf::Dictionary::new();
        if let Some(title) = info.title {
            dict.set("Title", Object::string_literal(title));
        }
        if let Some(author) = info.author {
            dict.set("Author", Object::string_literal(author));
        }
        dict.set("Producer", Object::string_literal("menuscan test fixtures"));
        let info_id = doc.add_object(dict);
        doc.trailer.set("Info", info_id);
    }

    let path = dir.join(name);
    doc.save(&path).expect("fixture PDF should save");
    path
}

/// A PDF whose page tree is empty (zero pages).
pub fn write_empty_pdf(dir: &Path, name: &str) -> PathBuf {
    write_pdf(dir, name, &[], None)
}

/// A file that passes path validation but is not parseable PDF structure.
pub fn write_garbage_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.5\nthis is not a real pdf body").unwrap();
    path
}

/// A multi-line text block of roughly `chars` characters, so fixtures can
/// sit deliberately above or below the chars-per-page threshold.
pub fn filler(prefix: &str, chars: usize) -> String {
    let mut s = String::with_capacity(chars + prefix.len());
    s.push_str(prefix);
    while s.len() < chars {
        s.push('x');
    }
    s
}
