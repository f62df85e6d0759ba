//! OpenDocument binder family: `odt`/`ods`/`odp`, sharing a single
//! `content.xml`-centric structure (the three formats differ only in
//! mimetype and root element, unlike OOXML's per-format part layout).

use super::filename;
use super::zip_package::{self, Part, xml_escape};
use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdfKind {
    Text,
    Spreadsheet,
    Presentation,
}

impl OdfKind {
    const fn mimetype(self) -> &'static str {
        match self {
            Self::Text => "application/vnd.oasis.opendocument.text",
            Self::Spreadsheet => "application/vnd.oasis.opendocument.spreadsheet",
            Self::Presentation => "application/vnd.oasis.opendocument.presentation",
        }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Text => "odt",
            Self::Spreadsheet => "ods",
            Self::Presentation => "odp",
        }
    }

    const fn office_body_tag(self) -> &'static str {
        match self {
            Self::Text => "office:text",
            Self::Spreadsheet => "office:spreadsheet",
            Self::Presentation => "office:presentation",
        }
    }
}

pub struct OdfBinder {
    kind: OdfKind,
}

impl OdfBinder {
    #[must_use]
    pub const fn new(kind: OdfKind) -> Self {
        Self { kind }
    }
}

impl super::Binder for OdfBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let body_tag = self.kind.office_body_tag();
        let mut inner = match self.kind {
            OdfKind::Spreadsheet => spreadsheet_body(cs),
            OdfKind::Text | OdfKind::Presentation => prose_body(cs),
        };
        if !cs.credentials_pre_embedded && self.kind != OdfKind::Spreadsheet {
            inner.push_str("<text:p>Credentials</text:p>");
            for credential in &cs.credentials {
                inner.push_str(&format!("<text:p>{}: {}</text:p>", xml_escape(&credential.label), xml_escape(&credential.value)));
            }
        }

        let content_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0">
<office:body><{body_tag}>{inner}</{body_tag}></office:body>
</office:document-content>"#
        );

        let parts = vec![
            Part { path: "mimetype".to_string(), content: self.kind.mimetype().to_string() },
            Part {
                path: "META-INF/manifest.xml".to_string(),
                content: format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0">
<manifest:file-entry manifest:full-path="/" manifest:media-type="{}"/>
<manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
</manifest:manifest>"#,
                    self.kind.mimetype()
                ),
            },
            Part { path: "content.xml".to_string(), content: content_xml },
        ];
        let bytes = zip_package::build(self.kind.extension(), parts)?;

        let name = filename::build("document", &cs.title, self.kind.extension());
        let path = out_dir.join(name);
        super::ensure_parent(&path)?;
        std::fs::write(&path, bytes).map_err(|source| SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

fn prose_body(cs: &ContentStructure) -> String {
    let mut out = format!("<text:p>{}</text:p>", xml_escape(&cs.title));
    for section in &cs.sections {
        out.push_str(&format!("<text:h>{}</text:h>", xml_escape(&section.title)));
        out.push_str(&format!("<text:p>{}</text:p>", xml_escape(&section.body)));
    }
    out
}

fn spreadsheet_body(cs: &ContentStructure) -> String {
    let mut out = String::from("<table:table table:name=\"Sheet1\">");
    out.push_str(&row([cs.title.as_str()]));
    for section in &cs.sections {
        out.push_str(&row([section.title.as_str(), section.body.as_str()]));
    }
    for credential in &cs.credentials {
        out.push_str(&row([credential.label.as_str(), credential.value.as_str()]));
    }
    out.push_str("</table:table>");
    out
}

fn row<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("<table:table-row>");
    for cell in cells {
        out.push_str(&format!(
            "<table:table-cell office:value-type=\"string\"><text:p>{}</text:p></table:table-cell>",
            xml_escape(cell)
        ));
    }
    out.push_str("</table:table-row>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::core::Section;
    use std::collections::BTreeMap;

    fn sample(format_type: &str) -> ContentStructure {
        ContentStructure {
            title: "Report".to_string(),
            sections: vec![Section::new("Body", "text")],
            credentials: vec![],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: format_type.to_string(),
            credentials_pre_embedded: false,
        }
    }

    #[test]
    fn odt_uses_text_mimetype() {
        let dir = tempfile::tempdir().unwrap();
        let path = OdfBinder::new(OdfKind::Text).synthesize(&sample("odt"), dir.path()).unwrap();
        assert!(path.extension().is_some_and(|e| e == "odt"));
    }

    #[test]
    fn ods_body_uses_table_elements() {
        assert!(spreadsheet_body(&sample("ods")).contains("table:table-row"));
    }
}
