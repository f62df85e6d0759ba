use super::{CONTENT_TYPES_XML, core_properties_part, flattened_text};
use crate::binder::filename;
use crate::binder::zip_package::{self, Part, xml_escape};
use crate::core::ContentStructure;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub struct XlsxBinder;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

impl crate::binder::Binder for XlsxBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut rows = String::new();
        let mut row_index = 1u32;
        let mut push_row = |cols: &[String], rows: &mut String| {
            let cells: String = cols
                .iter()
                .enumerate()
                .map(|(i, v)| format!("<c r=\"{}{row_index}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>", column_letter(i), xml_escape(v)))
                .collect();
            rows.push_str(&format!("<row r=\"{row_index}\">{cells}</row>"));
            row_index += 1;
        };
        push_row(&[cs.title.clone()], &mut rows);
        for (title, text) in flattened_text(cs) {
            push_row(&[title, text], &mut rows);
        }
        // credentials always get their own native rows regardless of
        // credentials_pre_embedded: spreadsheets never embed into free
        // text, so the assembler defers entirely to this binder (§4.5).
        for credential in &cs.credentials {
            push_row(&[credential.label.clone(), credential.value.clone()], &mut rows);
        }

        let sheet_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>{rows}</sheetData>
</worksheet>"#
        );

        let parts = vec![
            Part { path: "[Content_Types].xml".to_string(), content: CONTENT_TYPES_XML.to_string() },
            Part { path: "_rels/.rels".to_string(), content: ROOT_RELS_XML.to_string() },
            core_properties_part(cs),
            Part { path: "xl/workbook.xml".to_string(), content: WORKBOOK_XML.to_string() },
            Part { path: "xl/_rels/workbook.xml.rels".to_string(), content: WORKBOOK_RELS_XML.to_string() },
            Part { path: "xl/worksheets/sheet1.xml".to_string(), content: sheet_xml },
        ];
        let bytes = zip_package::build("xlsx", parts)?;

        let name = filename::build("spreadsheet", &cs.title, "xlsx");
        let path = out_dir.join(name);
        crate::binder::ensure_parent(&path)?;
        std::fs::write(&path, bytes).map_err(|source| crate::error::SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

fn column_letter(index: usize) -> String {
    char::from(b'A' + u8::try_from(index).unwrap_or(0)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::core::{Credential, Section};
    use std::collections::BTreeMap;

    #[test]
    fn credentials_always_get_native_rows() {
        let cs = ContentStructure {
            title: "Budget".to_string(),
            sections: vec![Section::new("Q3", "Numbers")],
            credentials: vec![Credential::new("db_connection", "postgres://x", "DB Connection")],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: "xlsx".to_string(),
            credentials_pre_embedded: false,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = XlsxBinder.synthesize(&cs, dir.path()).unwrap();
        assert!(path.extension().is_some_and(|e| e == "xlsx"));
    }

    #[test]
    fn column_letter_cycles_through_alphabet() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
    }
}
