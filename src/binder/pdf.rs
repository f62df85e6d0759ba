//! `.pdf` binder built on `lopdf`, grounded in the pack's PDF-writing
//! reference manifest (see `DESIGN.md`).

use super::filename;
use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use lopdf::{Dictionary, Document, Object, Stream, content::Content, content::Operation, dictionary};
use std::path::{Path, PathBuf};

pub struct PdfBinder;

const FONT_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 14.0;
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const WRAP_COLUMNS: usize = 90;

impl super::Binder for PdfBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut lines = vec![cs.title.clone(), String::new()];
        for section in &cs.sections {
            lines.push(section.title.clone());
            lines.extend(wrap(&section.body, WRAP_COLUMNS));
            lines.push(String::new());
        }
        if !cs.credentials_pre_embedded {
            lines.push("Credentials".to_string());
            for credential in &cs.credentials {
                lines.push(format!("{}: {}", credential.label, credential.value));
            }
        }

        let bytes = render(&lines).map_err(|detail| SynthesizerError::EncodingFailed { format: "pdf".to_string(), detail })?;

        let name = filename::build("document", &cs.title, "pdf");
        let path = out_dir.join(name);
        super::ensure_parent(&path)?;
        std::fs::write(&path, bytes).map_err(|source| SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

fn render(lines: &[String]) -> std::result::Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let usable_lines = ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize;
    let mut page_ids = Vec::new();

    for chunk in lines.chunks(usable_lines.max(1)) {
        let mut operations = vec![Operation::new("BT", vec![]), Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()])];
        let mut y = PAGE_HEIGHT - MARGIN;
        for (i, line) in chunk.iter().enumerate() {
            if i == 0 {
                operations.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
            } else {
                operations.push(Operation::new("Td", vec![0.0.into(), (-LINE_HEIGHT).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_bytes().to_vec())]));
            y -= LINE_HEIGHT;
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().map_err(|e| e.to_string())?));
        let page_dict: Dictionary = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    for page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(*page_id) {
            dict.set("Resources", resources_id);
        }
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| e.to_string())?;
    Ok(buffer)
}

/// Greedy word-wraps `text`'s paragraphs (split on blank lines) to at most
/// `width` characters per line, never splitting a word.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split("\n\n") {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > width {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push(current);
        }
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::core::{Credential, Section};
    use std::collections::BTreeMap;

    #[test]
    fn writes_a_pdf_with_header_magic() {
        let cs = ContentStructure {
            title: "Incident Report".to_string(),
            sections: vec![Section::new("Summary", "Short body text.")],
            credentials: vec![Credential::new("api_key", "sk_live_y", "API Key")],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: "pdf".to_string(),
            credentials_pre_embedded: true,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = PdfBinder.synthesize(&cs, dir.path()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn wrap_never_exceeds_width_except_for_single_long_words() {
        let wrapped = wrap("one two three four five six seven eight nine ten", 20);
        assert!(wrapped.iter().all(|l| l.len() <= 20 || !l.contains(' ')));
    }
}
