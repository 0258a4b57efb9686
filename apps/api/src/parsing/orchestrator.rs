//! Strategy selection between an upstream structured payload and the local
//! regex heuristics.
//!
//! The structured source is all-or-nothing per request: if it resolves at
//! least one field its record is returned as-is, otherwise it is discarded and
//! the heuristics run over the transcript. The two are never blended.

use serde::Serialize;
use tracing::debug;

use crate::affinda_client::StructuredResponse;
use crate::models::contact::{dedup_skills, ContactRecord};
use crate::models::StructuredValue;
use crate::parsing::heuristics::{ensure_scheme, extract_contact_info, extract_email};
use crate::parsing::locator::locate;

pub const NAME_ALIASES: &[&str] = &["name", "full_name", "given_name", "first_name", "formatted_name"];
pub const EMAIL_ALIASES: &[&str] = &["email", "emails"];
pub const PHONE_ALIASES: &[&str] = &["phone", "phones", "mobile"];
pub const ADDRESS_ALIASES: &[&str] = &["address", "location", "locations", "addresses"];
pub const LINKEDIN_ALIASES: &[&str] = &["linkedin", "linkedin_url", "linkedin_profile", "profile_url"];
pub const SKILL_ALIASES: &[&str] = &["skills", "skill", "keywords", "expertise"];

/// Keys tried, in order, when a located value is an object rather than text
/// (e.g. `{"raw": "Alice Example", "first": "Alice"}`).
const TEXT_KEYS: &[&str] = &["raw", "formatted", "value", "text", "url", "name"];

const SKILL_STRING_DELIMITERS: &[char] = &[',', ';', '|', '\n'];

/// Which strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    Structured,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: ContactRecord,
    pub path: ExtractionPath,
}

/// The upstream transcript when it carries any text; callers fall back to the
/// document-derived transcript otherwise.
pub fn select_transcript(structured: Option<&StructuredResponse>) -> Option<&str> {
    structured
        .and_then(|s| s.transcript.as_deref())
        .filter(|t| !t.trim().is_empty())
}

/// Produces the contact record for one request.
pub fn orchestrate(text: Option<&str>, structured: Option<&StructuredValue>) -> ContactRecord {
    resolve(text, structured).record
}

/// Like [`orchestrate`], also reporting which strategy produced the record.
pub fn resolve(text: Option<&str>, structured: Option<&StructuredValue>) -> Resolution {
    if let Some(document) = structured {
        let record = structured_record(document);
        if !record.is_empty() {
            debug!(
                "Structured source resolved {} contact fields",
                record.populated_fields()
            );
            return Resolution {
                record,
                path: ExtractionPath::Structured,
            };
        }
        debug!("Structured source resolved no fields, falling back to heuristics");
    }

    Resolution {
        record: extract_contact_info(text.unwrap_or_default()),
        path: ExtractionPath::Heuristic,
    }
}

/// Field-by-field alias lookup over an upstream payload.
pub fn structured_record(document: &StructuredValue) -> ContactRecord {
    let field = |aliases: &[&str]| locate(document, aliases).and_then(coerce_text);

    ContactRecord {
        full_name: field(NAME_ALIASES),
        email: field(EMAIL_ALIASES).and_then(|e| extract_email(&e)),
        phone: field(PHONE_ALIASES),
        address: field(ADDRESS_ALIASES),
        linkedin: field(LINKEDIN_ALIASES).map(|url| ensure_scheme(&url)),
        skills: normalize_skills(locate(document, SKILL_ALIASES)),
    }
}

/// Reduces a located value to a single trimmed, non-empty string.
fn coerce_text(value: &StructuredValue) -> Option<String> {
    let text = match value {
        StructuredValue::List(items) => items.iter().find_map(coerce_text),
        StructuredValue::Map(entries) => TEXT_KEYS
            .iter()
            .filter_map(|key| value.get(key))
            .find_map(coerce_text)
            .or_else(|| entries.iter().find_map(|(_, v)| coerce_text(v))),
        scalar => scalar.scalar_text(),
    }?;

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Skills arrive as a list, a delimited string, or a lone scalar.
pub fn normalize_skills(raw: Option<&StructuredValue>) -> Vec<String> {
    let skills: Vec<String> = match raw {
        None => Vec::new(),
        Some(StructuredValue::List(items)) => items.iter().filter_map(coerce_text).collect(),
        Some(StructuredValue::String(s)) => s
            .split(SKILL_STRING_DELIMITERS)
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => coerce_text(other).into_iter().collect(),
    };
    dedup_skills(skills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TRANSCRIPT: &str = "Jane Smith\njane.smith@email.com\nPhone: 555-123-4567\nSkills: Rust, Go";

    fn tree(value: serde_json::Value) -> StructuredValue {
        StructuredValue::from(value)
    }

    #[test]
    fn test_affinda_style_mapping() {
        let document = tree(json!({
            "data": {
                "name": "Alice Example",
                "email": "alice@example.com",
                "phones": ["+1 555-0000"],
                "location": "San Francisco, CA",
                "skills": ["Python", "FastAPI"]
            },
            "text": "Alice Example\nPython developer"
        }));
        let resolution = resolve(Some("Alice Example\nPython developer"), Some(&document));

        assert_eq!(resolution.path, ExtractionPath::Structured);
        let record = resolution.record;
        assert_eq!(record.full_name.as_deref(), Some("Alice Example"));
        assert_eq!(record.email.as_deref(), Some("alice@example.com"));
        assert_eq!(record.phone.as_deref(), Some("+1 555-0000"));
        assert_eq!(record.address.as_deref(), Some("San Francisco, CA"));
        assert_eq!(record.skills, vec!["Python", "FastAPI"]);
        assert_eq!(record.linkedin, None);
    }

    #[test]
    fn test_zero_structured_fields_falls_back_exactly() {
        let document = tree(json!({"data": {"name": "", "skills": []}, "meta": {"pages": 1}}));
        let resolution = resolve(Some(TRANSCRIPT), Some(&document));

        assert_eq!(resolution.path, ExtractionPath::Heuristic);
        assert_eq!(resolution.record, extract_contact_info(TRANSCRIPT));
        assert_eq!(resolution.record.full_name.as_deref(), Some("Jane Smith"));
    }

    #[test]
    fn test_partial_structured_result_is_not_merged() {
        let document = tree(json!({"contact": {"email": "Only@Example.com"}}));
        let record = orchestrate(Some(TRANSCRIPT), Some(&document));

        assert_eq!(record.email.as_deref(), Some("only@example.com"));
        assert_eq!(record.full_name, None);
        assert_eq!(record.phone, None);
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_structured_email_must_look_like_an_email() {
        let document = tree(json!({"data": {"email": "N/A", "name": "Alice Example"}}));
        let record = orchestrate(Some("alice@example.com"), Some(&document));

        assert_eq!(record.email, None);
        assert_eq!(record.full_name.as_deref(), Some("Alice Example"));
    }

    #[test]
    fn test_invalid_structured_email_alone_falls_back() {
        let document = tree(json!({"contact": {"email": "unknown"}}));
        let resolution = resolve(Some(TRANSCRIPT), Some(&document));

        assert_eq!(resolution.path, ExtractionPath::Heuristic);
        assert_eq!(resolution.record.email.as_deref(), Some("jane.smith@email.com"));
    }

    #[test]
    fn test_no_structured_source_uses_heuristics() {
        let resolution = resolve(Some(TRANSCRIPT), None);
        assert_eq!(resolution.path, ExtractionPath::Heuristic);
        assert_eq!(resolution.record, extract_contact_info(TRANSCRIPT));
    }

    #[test]
    fn test_nothing_available_yields_empty_record() {
        assert_eq!(orchestrate(None, None), ContactRecord::default());
    }

    #[test]
    fn test_structured_linkedin_gets_scheme() {
        let document = tree(json!({"profile": {"linkedin_url": "linkedin.com/in/alice"}}));
        let record = orchestrate(None, Some(&document));
        assert_eq!(record.linkedin.as_deref(), Some("https://linkedin.com/in/alice"));
    }

    #[test]
    fn test_object_values_coerce_through_text_keys() {
        let document = tree(json!({
            "name": {"first": "Alice", "last": "Example", "raw": "Alice Example"},
            "phones": [{"number": "", "formatted": "+44 20 7946 0958"}]
        }));
        let record = orchestrate(None, Some(&document));
        assert_eq!(record.full_name.as_deref(), Some("Alice Example"));
        assert_eq!(record.phone.as_deref(), Some("+44 20 7946 0958"));
    }

    #[test]
    fn test_normalize_skills_list_of_mixed_values() {
        let raw = tree(json!(["Rust", 42, {"name": "Go"}, "", "rust", null]));
        assert_eq!(normalize_skills(Some(&raw)), vec!["Rust", "42", "Go"]);
    }

    #[test]
    fn test_normalize_skills_delimited_string() {
        let raw = tree(json!("Python; SQL | Docker,\nKubernetes, "));
        assert_eq!(
            normalize_skills(Some(&raw)),
            vec!["Python", "SQL", "Docker", "Kubernetes"]
        );
    }

    #[test]
    fn test_normalize_skills_scalar_and_absent() {
        assert_eq!(normalize_skills(Some(&tree(json!(7)))), vec!["7"]);
        assert!(normalize_skills(None).is_empty());
    }

    #[test]
    fn test_normalize_skills_is_capped() {
        let raw = tree(json!((0..40).map(|i| format!("s{i}")).collect::<Vec<_>>()));
        assert_eq!(normalize_skills(Some(&raw)).len(), 20);
    }

    #[test]
    fn test_select_transcript_prefers_non_blank_upstream_text() {
        let with_text = StructuredResponse {
            document: tree(json!({})),
            transcript: Some("Alice Example".to_string()),
        };
        let blank = StructuredResponse {
            document: tree(json!({})),
            transcript: Some("  \n ".to_string()),
        };
        assert_eq!(select_transcript(Some(&with_text)), Some("Alice Example"));
        assert_eq!(select_transcript(Some(&blank)), None);
        assert_eq!(select_transcript(None), None);
    }
}
