//! Format binders: serialize a [`crate::core::ContentStructure`] to a
//! concrete file on disk.
//!
//! One [`Binder`] implementation per format family, registered in
//! [`create_binder`] — the same factory shape as the teacher's
//! `create_embedder`/`create_chunker` pattern. Shared zip bookkeeping for
//! the OOXML/OpenDocument families lives in [`zip_package`]; shared
//! filename generation in [`filename`]; the plain-text degrade path in
//! [`txt_fallback`].

mod eml;
mod filename;
mod odf;
mod ooxml;
mod pdf;
mod raster;
mod rtf;
mod txt_fallback;
mod vsdx;
mod zip_package;

use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use std::path::{Path, PathBuf};

/// Serializes one `ContentStructure` to a file under `out_dir`.
pub trait Binder {
    /// Writes the file and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesizerError`] if the underlying serializer fails or
    /// the output path cannot be written. Implementations may instead
    /// write a `.txt` fallback and return that path, per §4.6.
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf>;
}

/// Resolves a format identifier (including aliases) to a [`Binder`].
///
/// # Errors
///
/// Returns [`SynthesizerError::UnsupportedFormat`] if `format` is outside
/// the closed supported set (§6).
pub fn create_binder(format: &str) -> Result<Box<dyn Binder>> {
    use crate::assembler::template::canonicalize;

    if let Some(kind) = odf_kind_for(format) {
        return Ok(Box::new(odf::OdfBinder::new(kind)));
    }

    let binder: Box<dyn Binder> = match canonicalize(format) {
        "eml" => Box::new(eml::EmlBinder),
        "xlsx" => Box::new(ooxml::xlsx::XlsxBinder),
        "docx" => Box::new(ooxml::docx::DocxBinder),
        "pptx" => Box::new(ooxml::pptx::PptxBinder),
        "rtf" => Box::new(rtf::RtfBinder),
        "png" => Box::new(raster::RasterBinder),
        "pdf" => Box::new(pdf::PdfBinder),
        "vsdx" => Box::new(vsdx::VsdxBinder),
        other => {
            tracing::warn!(target: "binder.create", format = other, "unsupported_format_rejected");
            return Err(SynthesizerError::UnsupportedFormat {
                format: other.to_string(),
            }
            .into());
        }
    };
    Ok(binder)
}

/// `odt`/`odf`/`ods`/`odp` all share the ODF binder family but carry
/// distinct sub-kinds, checked by `create_binder` before the
/// single-canonical-name dispatch below so `ods` never falls through to
/// the OOXML (`xlsx`) path that `canonicalize` uses for template lookup.
#[must_use]
pub fn odf_kind_for(format: &str) -> Option<odf::OdfKind> {
    match format {
        "odt" | "odf" => Some(odf::OdfKind::Text),
        "ods" => Some(odf::OdfKind::Spreadsheet),
        "odp" => Some(odf::OdfKind::Presentation),
        _ => None,
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SynthesizerError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_closed_set_alias() {
        for format in [
            "eml", "msg", "xlsx", "xls", "xlsm", "xlsb", "xltm", "docx", "doc", "docm", "rtf",
            "pptx", "ppt", "pdf", "png", "jpg", "jpeg", "bmp", "vsdx", "vsd", "vsdm", "vssx",
            "vssm", "vstx", "vstm", "odt", "odf", "ods", "odp",
        ] {
            assert!(create_binder(format).is_ok(), "expected a binder for {format}");
        }
    }

    #[test]
    fn odf_subkinds_resolve_independently() {
        assert_eq!(odf_kind_for("ods"), Some(odf::OdfKind::Spreadsheet));
        assert_eq!(odf_kind_for("odp"), Some(odf::OdfKind::Presentation));
        assert_eq!(odf_kind_for("odt"), Some(odf::OdfKind::Text));
        assert_eq!(odf_kind_for("exe"), None);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(create_binder("exe").is_err());
    }
}
