//! Static format → (section names, structure kind) template table.
//!
//! Grounded in SPEC_FULL.md §4.5 step 2. One entry per format alias in the
//! closed supported set (§6); aliases that share a binder also share a
//! structure kind and section layout.

/// Coarse document shape a format's binder implements, used by the
/// assembler to decide section layout and whether the binder embeds
/// credentials natively (spreadsheet, presentation) or the assembler must
/// embed them into a section body (every other kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    Email,
    Document,
    Presentation,
    Spreadsheet,
    Image,
    Diagram,
}

impl StructureKind {
    /// Whether this format's binder embeds credentials natively (sets
    /// its own dedicated sheet/slide), meaning the assembler must leave
    /// `credentials_pre_embedded` false and defer to it.
    #[must_use]
    pub const fn binder_embeds_natively(self) -> bool {
        matches!(self, Self::Spreadsheet | Self::Presentation)
    }
}

/// Looks up the section-name template and structure kind for a format
/// identifier, resolving format aliases first (§4.6 Rust notes).
///
/// # Errors
///
/// Returns [`crate::error::ValidationError::UnsupportedFormat`] if
/// `format` is outside the closed supported set.
pub fn lookup(format: &str) -> crate::error::Result<(&'static [&'static str], StructureKind)> {
    use StructureKind::{Diagram, Document, Email, Image, Presentation, Spreadsheet};

    let canonical = canonicalize(format);
    let result = match canonical {
        "eml" => (
            &["Overview", "Details"][..],
            Email,
        ),
        "xlsx" => (
            &["Summary", "Configuration"][..],
            Spreadsheet,
        ),
        "docx" => (
            &[
                "Overview",
                "Technical Details",
                "Implementation Notes",
                "Security Considerations",
            ][..],
            Document,
        ),
        "rtf" | "pdf" | "odt" => (
            &["Overview", "Technical Details", "Security Considerations"][..],
            Document,
        ),
        "pptx" | "odp" => (
            &["Overview", "Key Points", "Technical Details"][..],
            Presentation,
        ),
        "png" => (&["Summary"][..], Image),
        "vsdx" => (&["Overview", "Components"][..], Diagram),
        _ => {
            return Err(crate::error::ValidationError::UnsupportedFormat {
                format: format.to_string(),
            }
            .into());
        }
    };
    Ok(result)
}

/// Maps a format alias onto the canonical format identifier whose
/// template entry should be used, per §4.6's alias table.
#[must_use]
pub fn canonicalize(format: &str) -> &str {
    match format {
        "xls" | "xlsm" | "xltm" | "xlsb" | "ods" => "xlsx",
        "doc" | "docm" => "docx",
        "ppt" => "pptx",
        "odf" => "odt",
        "jpg" | "jpeg" | "bmp" => "png",
        "msg" => "eml",
        "vsd" | "vsdm" | "vssx" | "vssm" | "vstx" | "vstm" => "vsdx",
        other => other,
    }
}
