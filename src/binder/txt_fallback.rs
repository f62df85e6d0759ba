//! Plain-text fallback emitted when a format's third-party serializer is
//! unavailable at runtime, per §4.6's common rules.

use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use std::path::{Path, PathBuf};

/// Writes `cs` as a `.txt` file with the same logical content (title,
/// sections, credentials) as the format-specific binder would have
/// produced, and returns the path written.
pub fn write(cs: &ContentStructure, out_dir: &Path, base_name: &str) -> Result<PathBuf> {
    let mut body = format!("{}\n{}\n\n", cs.title, "=".repeat(cs.title.len()));
    for section in &cs.sections {
        body.push_str(&format!("{}\n{}\n\n", section.title, section.body));
    }
    if !cs.credentials.is_empty() {
        body.push_str("Credentials\n-----------\n");
        for credential in &cs.credentials {
            body.push_str(&format!("{}: {}\n", credential.label, credential.value));
        }
    }

    let path = out_dir.join(format!("{base_name}.txt"));
    super::ensure_parent(&path)?;
    std::fs::write(&path, body).map_err(|source| SynthesizerError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
