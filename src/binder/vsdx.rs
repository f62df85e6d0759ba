//! `.vsdx` binder: a simplified Visio-like page of `Shape` nodes (one per
//! section, laid out in a vertical column), zipped the same way as the
//! OOXML family since `.vsdx` is itself an OPC package.

use super::filename;
use super::zip_package::{self, Part, xml_escape};
use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use std::path::{Path, PathBuf};

pub struct VsdxBinder;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="visio/pages/page1.xml"/>
</Relationships>"#;

const SHAPE_WIDTH: f64 = 2.0;
const SHAPE_HEIGHT: f64 = 0.75;
const VERTICAL_GAP: f64 = 1.25;
const PIN_X: f64 = 2.0;

impl super::Binder for VsdxBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut shapes = String::new();
        let mut labels: Vec<(String, String)> = vec![("Title".to_string(), cs.title.clone())];
        labels.extend(cs.sections.iter().map(|s| (s.title.clone(), s.body.clone())));
        if !cs.credentials_pre_embedded {
            for credential in &cs.credentials {
                labels.push((credential.label.clone(), credential.value.clone()));
            }
        }

        for (index, (label, text)) in labels.iter().enumerate() {
            let pin_y = (labels.len() - index) as f64 * VERTICAL_GAP;
            let text_node = if label == text { label.clone() } else { format!("{label}: {text}") };
            shapes.push_str(&format!(
                r#"<Shape ID="{id}" Type="Shape"><PinX>{PIN_X}</PinX><PinY>{pin_y:.2}</PinY><Width>{SHAPE_WIDTH}</Width><Height>{SHAPE_HEIGHT}</Height><Text>{}</Text></Shape>"#,
                xml_escape(&text_node),
                id = index + 1,
            ));
        }

        let page_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<PageContents xmlns="http://schemas.microsoft.com/office/visio/2012/main">
<Shapes>{shapes}</Shapes>
</PageContents>"#
        );

        let parts = vec![
            Part { path: "[Content_Types].xml".to_string(), content: CONTENT_TYPES_XML.to_string() },
            Part { path: "_rels/.rels".to_string(), content: ROOT_RELS_XML.to_string() },
            Part { path: "visio/pages/page1.xml".to_string(), content: page_xml },
        ];
        let bytes = zip_package::build("vsdx", parts)?;

        let name = filename::build("diagram", &cs.title, "vsdx");
        let path = out_dir.join(name);
        super::ensure_parent(&path)?;
        std::fs::write(&path, bytes).map_err(|source| SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}
