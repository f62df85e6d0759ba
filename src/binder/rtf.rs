//! `.rtf` binder: hand-rolled Rich Text Format, no crate covers this
//! format in the dependency pack.

use super::filename;
use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use std::path::{Path, PathBuf};

pub struct RtfBinder;

impl super::Binder for RtfBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut doc = String::from(r"{\rtf1\ansi\deff0{\fonttbl{\f0 Calibri;}}");
        doc.push_str(&format!(r"\f0\fs32\b {}\b0\par\par", escape(&cs.title)));
        for section in &cs.sections {
            doc.push_str(&format!(r"\fs26\b {}\b0\par", escape(&section.title)));
            doc.push_str(&format!(r"\fs22 {}\par\par", escape(&section.body)));
        }
        if !cs.credentials_pre_embedded {
            doc.push_str(r"\fs26\b Credentials\b0\par");
            for credential in &cs.credentials {
                doc.push_str(&format!(r"\fs22 {}: {}\par", escape(&credential.label), escape(&credential.value)));
            }
        }
        doc.push('}');

        let name = filename::build("document", &cs.title, "rtf");
        let path = out_dir.join(name);
        super::ensure_parent(&path)?;
        std::fs::write(&path, doc).map_err(|source| SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

/// Escapes RTF control characters and replaces non-ASCII with `\uN?`
/// Unicode escapes, per the RTF spec's fallback-glyph convention.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '\n' => out.push_str(r"\line "),
            c if c.is_ascii() => out.push(c),
            c => out.push_str(&format!(r"\u{}?", c as u32)),
        }
    }
    out
}
