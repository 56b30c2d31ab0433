//! Minimal DOCX reader: pulls paragraph text out of `word/document.xml`.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::documents::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex"))
}

/// `<w:br/>` with or without attributes (`w:type="page"`, `w:clear=...`).
fn break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<w:br\b[^>]*/>").expect("break pattern is a valid regex"))
}

fn entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&(#[xX][0-9A-Fa-f]+|#[0-9]+|lt|gt|quot|apos|amp);")
            .expect("entity pattern is a valid regex")
    })
}

/// Extracts the text of a DOCX file, one line per paragraph.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    Ok(xml_to_text(&xml))
}

/// Paragraph and break elements become newlines, tabs become `\t`, every
/// other tag is dropped and entities are decoded.
fn xml_to_text(xml: &str) -> String {
    let spaced = xml.replace("</w:p>", "\n").replace("<w:tab/>", "\t");
    let spaced = break_pattern().replace_all(&spaced, "\n");
    let stripped = tag_pattern().replace_all(&spaced, "");
    decode_entities(&stripped).trim_end().to_string()
}

/// Decodes the five named XML entities and numeric character references in
/// one pass, so `&amp;lt;` stays `&lt;`. References to invalid code points
/// are left as written.
fn decode_entities(text: &str) -> String {
    entity_pattern()
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => numeric_reference(name),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_reference(reference: &str) -> Option<char> {
    let code = match reference.strip_prefix("#x").or_else(|| reference.strip_prefix("#X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => reference.strip_prefix('#')?.parse().ok()?,
    };
    char::from_u32(code)
}
