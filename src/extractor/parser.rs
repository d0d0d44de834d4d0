//! Parsing and normalization of free-form model output.
//!
//! This stage absorbs failure instead of propagating it: malformed JSON
//! yields a single placeholder record pointing the reviewer back at the
//! source page, and partial records are silently filled with defaults so
//! every field of every record is always present.

use crate::models::{ContactInfo, ExtractedProperty};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Name given to the degraded placeholder record, chosen to stand out in
/// the review UI.
pub const FALLBACK_NAME: &str = "Website Content";

/// Turn raw completion text into normalized candidate records.
///
/// Always returns at least one record; see [`fallback_record`].
pub fn parse_response(raw: &str, source_url: &str) -> Vec<ExtractedProperty> {
    match locate_records(raw) {
        Some(records) => {
            debug!("Parsed {} candidate records from model output", records.len());
            records.iter().map(normalize_record).collect()
        }
        None => {
            warn!("Model output was not parseable JSON, emitting fallback record");
            vec![fallback_record(source_url)]
        }
    }
}

/// Find the JSON records in the raw text.
///
/// Prefers the first array-shaped substring (greedy across newlines,
/// models often wrap the array in prose); when none exists, tries the
/// whole text. `None` means neither attempt produced usable JSON.
fn locate_records(raw: &str) -> Option<Vec<Value>> {
    static ARRAY_RE: OnceLock<Regex> = OnceLock::new();
    let array_re = ARRAY_RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").unwrap());

    let candidate = match array_re.find(raw) {
        Some(found) => found.as_str(),
        None => raw,
    };

    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    match value {
        Value::Array(items) => Some(items),
        Value::Object(_) => Some(vec![value]),
        _ => None,
    }
}

/// Coerce one raw record into the uniform `ExtractedProperty` shape.
///
/// Idempotent: normalizing an already-normalized record changes nothing.
pub fn normalize_record(raw: &Value) -> ExtractedProperty {
    let contact = raw.get("contact");

    ExtractedProperty {
        name: text_field(raw, "name"),
        description: text_field(raw, "description"),
        location: text_field(raw, "location"),
        price: text_field(raw, "price"),
        activities: list_field(raw, "activities"),
        amenities: list_field(raw, "amenities"),
        hours: text_field(raw, "hours"),
        contact: ContactInfo {
            phone: contact.map(|c| text_field(c, "phone")).unwrap_or_default(),
            email: contact.map(|c| text_field(c, "email")).unwrap_or_default(),
            website: normalize_url(
                &contact.map(|c| text_field(c, "website")).unwrap_or_default(),
            ),
        },
        image: normalize_url(&text_field(raw, "image")),
    }
}

/// The degraded single record returned when model output cannot be parsed.
///
/// Keeps the pipeline's "always returns something actionable" guarantee:
/// the reviewer gets the source URL and a note to import by hand.
pub fn fallback_record(source_url: &str) -> ExtractedProperty {
    ExtractedProperty {
        name: FALLBACK_NAME.to_string(),
        description: "Structured extraction failed for this page; \
                      review the source manually before importing."
            .to_string(),
        location: source_url.to_string(),
        contact: ContactInfo {
            website: normalize_url(source_url),
            ..ContactInfo::default()
        },
        ..ExtractedProperty::default()
    }
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// A bare string is wrapped as a one-element list; anything that is not a
/// string or an array of strings becomes an empty list.
fn list_field(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Prefix `https://` when the value is non-empty and carries no scheme.
pub fn normalize_url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
