use super::{CONTENT_TYPES_XML, ROOT_RELS_XML, core_properties_part, flattened_text};
use crate::binder::filename;
use crate::binder::zip_package::{self, Part, xml_escape};
use crate::core::ContentStructure;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub struct DocxBinder;

impl crate::binder::Binder for DocxBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut body = format!("<w:p><w:pPr><w:pStyle w:val=\"Title\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>", xml_escape(&cs.title));
        for (title, text) in flattened_text(cs) {
            body.push_str(&format!(
                "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
                xml_escape(&title)
            ));
            for paragraph in text.split("\n\n") {
                body.push_str(&format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", xml_escape(paragraph)));
            }
        }

        let document_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
        );

        let parts = vec![
            Part { path: "[Content_Types].xml".to_string(), content: CONTENT_TYPES_XML.to_string() },
            Part { path: "_rels/.rels".to_string(), content: ROOT_RELS_XML.to_string() },
            core_properties_part(cs),
            Part { path: "document.xml".to_string(), content: document_xml },
        ];
        let bytes = zip_package::build("docx", parts)?;

        let name = filename::build("document", &cs.title, "docx");
        let path = out_dir.join(name);
        crate::binder::ensure_parent(&path)?;
        std::fs::write(&path, bytes).map_err(|source| crate::error::SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::core::{Credential, Section};
    use std::collections::BTreeMap;

    #[test]
    fn writes_a_valid_zip_with_document_part() {
        let cs = ContentStructure {
            title: "Policy Update".to_string(),
            sections: vec![Section::new("Scope", "Applies to all staff.")],
            credentials: vec![Credential::new("api_key", "sk_live_x", "API Key")],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: "docx".to_string(),
            credentials_pre_embedded: true,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = DocxBinder.synthesize(&cs, dir.path()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }
}
