//! Shared filename generation: `<kind>_<slug-of-title>_<yyyymmdd_hhmmss>_<rand4>.<ext>`.

use chrono::Local;
use rand::Rng;

/// Builds an output filename per §4.6's common rules.
///
/// Draws its random suffix from the thread-local RNG rather than taking
/// one as a parameter, matching the `Binder` trait's signature (binders
/// are shared across worker threads behind `Box<dyn Binder>` and have no
/// natural place to thread a seeded RNG through).
#[must_use]
pub fn build(kind: &str, title: &str, ext: &str) -> String {
    let slug = slugify(title);
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut rng = rand::thread_rng();
    let rand4: String = (0..4)
        .map(|_| {
            const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
            ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
        })
        .collect();
    format!("{kind}_{slug}_{timestamp}_{rand4}.{ext}")
}

/// Lowercases `title` and keeps only alphanumerics/`-`/`_`, collapsing
/// everything else to a single `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = false;
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            slug.push(c);
            last_was_sep = false;
        } else if !last_was_sep && !slug.is_empty() {
            slug.push('-');
            last_was_sep = true;
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
