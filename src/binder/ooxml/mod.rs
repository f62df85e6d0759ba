//! OOXML binder family: `docx`/`xlsx`/`pptx`. Each submodule supplies its
//! own parts; zip mechanics are shared via [`super::zip_package`].

pub mod docx;
pub mod pptx;
pub mod xlsx;

use super::zip_package::{Part, xml_escape};
use crate::core::ContentStructure;

pub(super) const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
</Types>"#;

pub(super) const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="document.xml"/>
</Relationships>"#;

pub(super) fn core_properties_part(cs: &ContentStructure) -> Part {
    Part {
        path: "docProps/core.xml".to_string(),
        content: format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>{}</dc:title>
<dc:creator>{}</dc:creator>
</cp:coreProperties>"#,
            xml_escape(&cs.title),
            xml_escape(cs.metadata.get("company").map_or("", String::as_str)),
        ),
    }
}

/// Concatenates every section's title and body into one paragraph run of
/// text, with embedded credential lines appended verbatim (they were
/// already placed into section bodies, or stand alone when
/// `credentials_pre_embedded` is `false`).
pub(super) fn flattened_text(cs: &ContentStructure) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = cs.sections.iter().map(|s| (s.title.clone(), s.body.clone())).collect();
    if !cs.credentials_pre_embedded {
        let lines = cs
            .credentials
            .iter()
            .map(|c| format!("{}: {}", c.label, c.value))
            .collect::<Vec<_>>()
            .join("\n");
        out.push(("Credentials".to_string(), lines));
    }
    out
}
