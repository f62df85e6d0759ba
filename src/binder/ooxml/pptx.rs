use super::{core_properties_part, flattened_text};
use crate::binder::filename;
use crate::binder::zip_package::{self, Part, xml_escape};
use crate::core::ContentStructure;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub struct PptxBinder;

impl crate::binder::Binder for PptxBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        // Title slide, one content slide per section, and (when the
        // assembler hasn't pre-embedded) a final credentials slide —
        // per §4.6's pptx mapping row.
        let mut slide_texts = vec![(cs.title.clone(), String::new())];
        slide_texts.extend(flattened_text(cs));
        if !cs.credentials_pre_embedded {
            let lines = cs
                .credentials
                .iter()
                .map(|c| format!("{}: {}", c.label, c.value))
                .collect::<Vec<_>>()
                .join("\n");
            slide_texts.push(("Credentials".to_string(), lines));
        }

        let slide_count = slide_texts.len();
        let mut parts = vec![
            Part { path: "[Content_Types].xml".to_string(), content: content_types_xml(slide_count) },
            Part { path: "_rels/.rels".to_string(), content: ROOT_RELS_XML.to_string() },
            core_properties_part(cs),
            Part { path: "ppt/presentation.xml".to_string(), content: presentation_xml(slide_count) },
            Part { path: "ppt/_rels/presentation.xml.rels".to_string(), content: presentation_rels_xml(slide_count) },
        ];
        for (i, (title, body)) in slide_texts.iter().enumerate() {
            parts.push(Part {
                path: format!("ppt/slides/slide{}.xml", i + 1),
                content: slide_xml(title, body),
            });
        }
        let bytes = zip_package::build("pptx", parts)?;

        let name = filename::build("presentation", &cs.title, "pptx");
        let path = out_dir.join(name);
        crate::binder::ensure_parent(&path)?;
        std::fs::write(&path, bytes).map_err(|source| crate::error::SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#;

fn content_types_xml(slide_count: usize) -> String {
    let overrides: String = (1..=slide_count)
        .map(|i| format!(r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
{overrides}
</Types>"#
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let rels: String = (1..=slide_count)
        .map(|i| format!(r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{i}.xml"/>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
{rels}
</Relationships>"#
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let ids: String = (1..=slide_count).map(|i| format!(r#"<p:sldId id="{}" r:id="rId{i}"/>"#, 255 + i)).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<p:sldIdLst>{ids}</p:sldIdLst>
</p:presentation>"#
    )
}

fn slide_xml(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree>
<p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:txBody><a:p><a:r><a:t xml:space="preserve">{}</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld>
</p:sld>"#,
        xml_escape(title),
        xml_escape(body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::core::{Credential, Section};
    use std::collections::BTreeMap;

    fn sample() -> ContentStructure {
        ContentStructure {
            title: "Roadmap".to_string(),
            sections: vec![Section::new("Q3", "Ship it"), Section::new("Q4", "Iterate")],
            credentials: vec![Credential::new("api_key", "sk_live_z", "API Key")],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: "pptx".to_string(),
            credentials_pre_embedded: false,
        }
    }

    #[test]
    fn writes_one_slide_per_section_plus_title_and_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = PptxBinder.synthesize(&sample(), dir.path()).unwrap();
        assert!(path.extension().is_some_and(|e| e == "pptx"));
    }

    #[test]
    fn content_types_declares_an_override_per_slide() {
        let xml = content_types_xml(3);
        assert_eq!(xml.matches("presentationml.slide+xml").count(), 3);
    }
}
