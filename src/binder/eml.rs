//! `.eml` binder: a multipart/alternative RFC 5322 message with plain-text
//! and HTML parts, credentials embedded per `credentials_pre_embedded`.

use super::filename;
use crate::core::ContentStructure;
use crate::error::{Result, SynthesizerError};
use chrono::Local;
use rand::Rng;
use std::path::{Path, PathBuf};

pub struct EmlBinder;

const BOUNDARY_ALPHABET: &[u8] = b"0123456789abcdef";

impl super::Binder for EmlBinder {
    fn synthesize(&self, cs: &ContentStructure, out_dir: &Path) -> Result<PathBuf> {
        let mut rng = rand::thread_rng();
        let boundary: String = (0..16).map(|_| BOUNDARY_ALPHABET[rng.gen_range(0..BOUNDARY_ALPHABET.len())] as char).collect();
        let company = cs.metadata.get("company").map_or("Acme Corp", String::as_str);
        let from = format!("no-reply@{}", domain_of(company));
        let to = format!("team@{}", domain_of(company));
        let message_id: String = (0..12).map(|_| BOUNDARY_ALPHABET[rng.gen_range(0..BOUNDARY_ALPHABET.len())] as char).collect();

        let plain = plain_body(cs);
        let html = html_body(cs);

        let message = format!(
            "From: {from}\r\nTo: {to}\r\nDate: {date}\r\nMessage-ID: <{message_id}@{host}>\r\nSubject: {subject}\r\nMIME-Version: 1.0\r\nContent-Type: multipart/alternative; boundary=\"{boundary}\"\r\n\r\n--{boundary}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{plain}\r\n--{boundary}\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n{html}\r\n--{boundary}--\r\n",
            date = Local::now().to_rfc2822(),
            host = domain_of(company),
            subject = cs.title,
        );

        let name = filename::build("email", &cs.title, "eml");
        let path = out_dir.join(name);
        super::ensure_parent(&path)?;
        std::fs::write(&path, message).map_err(|source| SynthesizerError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

fn domain_of(company: &str) -> String {
    let slug = filename::slugify(company).replace('-', "");
    if slug.is_empty() { "example.com".to_string() } else { format!("{slug}.example.com") }
}

fn plain_body(cs: &ContentStructure) -> String {
    let mut body = String::new();
    for section in &cs.sections {
        body.push_str(&format!("{}\n{}\n\n", section.title, section.body));
    }
    body
}

fn html_body(cs: &ContentStructure) -> String {
    let mut body = String::from("<html><body>\n");
    for section in &cs.sections {
        body.push_str(&format!("<h2>{}</h2>\n<p>{}</p>\n", super::zip_package::xml_escape(&section.title), super::zip_package::xml_escape(&section.body)));
    }
    body.push_str("</body></html>");
    body
}
