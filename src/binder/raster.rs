//! Raster binder (`png`, with `jpg`/`jpeg`/`bmp` aliased by the `image`
//! crate's own encoder dispatch on the output extension). Text is drawn
//! with a hand-rolled 5x7 bitmap font rather than a fetched font asset,
//! per the "never fabricate dependencies" rule.

use super::filename;
use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use image::{ImageBuffer, Rgb};
use std::path::{Path, PathBuf};

mod font;

pub struct RasterBinder;

const IMAGE_WIDTH: u32 = 900;
const IMAGE_HEIGHT: u32 = 1200;
const GLYPH_SCALE: u32 = 2;
const LINE_HEIGHT: u32 = (font::GLYPH_HEIGHT as u32 + 4) * GLYPH_SCALE;
const MARGIN: u32 = 30;
const WRAP_COLUMNS: usize = 70;

impl super::Binder for RasterBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut lines = vec![cs.title.clone(), String::new()];
        for section in &cs.sections {
            lines.push(section.title.clone());
            lines.extend(wrap(&section.body, WRAP_COLUMNS));
        }
        if !cs.credentials_pre_embedded {
            lines.push("Credentials".to_string());
            for credential in &cs.credentials {
                lines.push(format!("{}: {}", credential.label, credential.value));
            }
        }

        let mut image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, Rgb([255, 255, 255]));
        let mut y = MARGIN;
        for line in &lines {
            if y + LINE_HEIGHT > IMAGE_HEIGHT - MARGIN {
                break;
            }
            font::draw_text(&mut image, MARGIN, y, line, GLYPH_SCALE);
            y += LINE_HEIGHT;
        }

        let name = filename::build("image", &cs.title, "png");
        let path = out_dir.join(name);
        super::ensure_parent(&path)?;
        image.save(&path).map_err(|e| SynthesizerError::EncodingFailed { format: "png".to_string(), detail: e.to_string() })?;
        Ok(path)
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split("\n\n") {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > width {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::core::{Credential, Section};
    use std::collections::BTreeMap;

    #[test]
    fn writes_a_readable_png() {
        let cs = ContentStructure {
            title: "Scan".to_string(),
            sections: vec![Section::new("Notes", "A short scanned note.")],
            credentials: vec![Credential::new("password", "hunter2xyz", "Password")],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: "png".to_string(),
            credentials_pre_embedded: false,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = RasterBinder.synthesize(&cs, dir.path()).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), IMAGE_WIDTH);
    }

    #[test]
    fn wrap_splits_long_paragraphs() {
        let wrapped = wrap("a b c d e f g h i j k l m n o p q r s t u v w x y z", 10);
        assert!(wrapped.len() > 1);
    }
}
