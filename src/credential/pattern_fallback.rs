//! Fallback generator for credential types absent from
//! [`super::generators::generate_fast`]'s dispatch table.
//!
//! Ported from `_parse_pattern_and_generate` in
//! `examples/original_source/credentialforge/generators/credential_generator.py`:
//! infer a length and character set directly from the entry's declared
//! regex text rather than failing outright.

use rand::Rng;

const ALPHA_UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHA_LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// Infers length and alphabet from `regex` and produces a matching
/// string. Never fails: any inference shortfall falls back to a 16-char
/// alphanumeric string, mirroring the Python original's blanket
/// `except Exception` fallback.
pub fn generate_from_pattern(rng: &mut impl Rng, regex: &str) -> String {
    let stripped = regex.trim_start_matches('^').trim_end_matches('$');

    let length = extract_quantifier_length(stripped).unwrap_or_else(|| {
        let estimate = stripped
            .chars()
            .filter(|c| !"[](){}^$.*+?|\\".contains(*c))
            .count();
        estimate.max(16)
    });

    let mut alphabet: Vec<u8> = Vec::new();
    if stripped.contains("A-Z") {
        alphabet.extend_from_slice(ALPHA_UPPER);
    }
    if stripped.contains("a-z") {
        alphabet.extend_from_slice(ALPHA_LOWER);
    }
    if stripped.contains("0-9") {
        alphabet.extend_from_slice(DIGITS);
    }
    if alphabet.is_empty() {
        alphabet.extend_from_slice(ALPHA_UPPER);
        alphabet.extend_from_slice(ALPHA_LOWER);
        alphabet.extend_from_slice(DIGITS);
    }
    if stripped.contains('+') || stripped.contains('=') {
        alphabet.extend_from_slice(b"+=");
    }
    if stripped.contains('@')
        || stripped.contains('#')
        || stripped.contains('$')
        || stripped.contains('%')
        || stripped.contains('^')
        || stripped.contains('&')
    {
        alphabet.extend_from_slice(b"@#$%^&");
    }

    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Finds a `{n}` or `{n,m}` quantifier and returns `n` (the minimum
/// length), matching the Python original's `re.search(r'\{(\d+)\}', ...)`.
fn extract_quantifier_length(pattern: &str) -> Option<usize> {
    let open = pattern.find('{')?;
    let close = pattern[open..].find('}')? + open;
    let inner = &pattern[open + 1..close];
    let digits: String = inner.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn extracts_explicit_quantifier_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let value = generate_from_pattern(&mut rng, r"^[A-Za-z0-9]{24}$");
        assert_eq!(value.len(), 24);
    }

    #[test]
    fn estimates_length_when_no_quantifier_present() {
        let mut rng = StdRng::seed_from_u64(1);
        let value = generate_from_pattern(&mut rng, "^custom-[a-z]-token$");
        assert!(value.len() >= 16);
    }

    #[test]
    fn includes_special_characters_mentioned_in_pattern() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let value = generate_from_pattern(&mut rng, r"^[A-Za-z0-9@#$%^&]{40}$");
            if value.chars().any(|c| "@#$%^&".contains(c)) {
                return;
            }
        }
        panic!("never produced a special character across 50 attempts");
    }
}
