//! Shared zip-container bookkeeping for the OOXML (`xlsx`/`docx`/`pptx`)
//! and OpenDocument (`odt`/`ods`/`odp`) binder families.
//!
//! Each family-specific binder supplies only its own part XML; this
//! module owns the zip/central-directory mechanics via the `zip` crate.

use crate::error::{Result, SynthesizerError};
use std::io::Write as _;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// One named part (path inside the archive + UTF-8 XML/text content).
pub struct Part {
    pub path: String,
    pub content: String,
}

/// Builds a zip archive in memory from `parts`, in the order given.
///
/// # Errors
///
/// Returns [`SynthesizerError::EncodingFailed`] if the zip writer fails.
pub fn build(format: &str, parts: Vec<Part>) -> Result<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for part in parts {
        writer
            .start_file(part.path, options)
            .map_err(|e| encoding_failed(format, &e))?;
        writer
            .write_all(part.content.as_bytes())
            .map_err(|e| SynthesizerError::EncodingFailed {
                format: format.to_string(),
                detail: e.to_string(),
            })?;
    }
    writer.finish().map_err(|e| encoding_failed(format, &e))?;
    Ok(buffer.into_inner())
}

fn encoding_failed(format: &str, error: &zip::result::ZipError) -> crate::error::Error {
    SynthesizerError::EncodingFailed {
        format: format.to_string(),
        detail: error.to_string(),
    }
    .into()
}

/// XML-escapes `text` for safe inclusion in a generated part.
#[must_use]
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_produces_a_nonempty_zip() {
        let parts = vec![Part {
            path: "doc.xml".to_string(),
            content: "<root/>".to_string(),
        }];
        let bytes = build("docx", parts).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn xml_escape_handles_reserved_characters() {
        assert_eq!(xml_escape("<a & b>"), "&lt;a &amp; b&gt;");
    }
}
