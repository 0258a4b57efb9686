//! Regex heuristics that pull contact fields out of raw resume text.
//!
//! Every extractor is total: any input (empty, punctuation soup, megabytes of
//! text) yields either a value or `None`, never an error. Each field runs its own
//! independent pass, layered from labeled headers down to loose fallbacks.
//! Where several patterns compete, they are listed as an ordered cascade of
//! [`Rule`]s so the priority order is data rather than control flow.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::models::contact::{dedup_skills, ContactRecord};

/// Phone candidates need at least this many digits to be accepted.
pub const MIN_PHONE_DIGITS: usize = 10;
/// The name is assumed to appear within the first few lines.
const NAME_SCAN_LINES: usize = 10;
const MAX_HEADER_ADDRESS_CHARS: usize = 100;
const MAX_SKILL_CHARS: usize = 50;

/// Characters that disqualify a line from being a name (digits are checked separately).
const NAME_FORBIDDEN_CHARS: &str = "@#$%^&*()_+=[]{}|\\:\";'<>?,/";

const NAME_HEADERS: &[&str] = &["Name:", "Full Name:", "Candidate Name:", "Applicant:"];

const ADDRESS_HEADERS: &[&str] = &[
    "Address:",
    "Location:",
    "City:",
    "Residence:",
    "Lives in:",
    "Based in:",
];

const SKILL_HEADERS: &[&str] = &[
    "Skills:",
    "Technical Skills:",
    "Core Competencies:",
    "Expertise:",
    "Technologies:",
    "Programming Languages:",
];

const SKILL_DELIMITERS: &[char] = &[',', ';', '|', '•', '·'];

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// One entry of an ordered first-match cascade.
///
/// The value taken from a match is capture group 1 when the pattern has one,
/// otherwise the whole match. `accept` rejects structurally matching but
/// implausible candidates so the cascade moves on.
pub struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    pub accept: fn(&str) -> bool,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, accept: fn(&str) -> bool) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("heuristic pattern must compile"),
            accept,
        }
    }

    /// First accepted candidate produced by this rule alone.
    pub fn first_accepted<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str())
            .find(|candidate| (self.accept)(*candidate))
    }
}

/// Runs `rules` in order; the first rule producing an accepted candidate wins.
fn first_match<'t>(rules: &[Rule], text: &'t str) -> Option<&'t str> {
    rules.iter().find_map(|rule| {
        let hit = rule.first_accepted(text)?;
        trace!(rule = rule.name, "heuristic rule matched");
        Some(hit)
    })
}

fn any_candidate(_: &str) -> bool {
    true
}

fn has_phone_digits(candidate: &str) -> bool {
    candidate.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

fn has_name_word_count(candidate: &str) -> bool {
    (2..=4).contains(&candidate.split_whitespace().count())
}

/// Builds a case-insensitive pattern that matches a literal header label.
fn header_pattern(header: &str, tail: &str) -> Regex {
    Regex::new(&format!("(?i){}{}", regex::escape(header), tail))
        .expect("header pattern must compile")
}

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").expect("email pattern");

    static ref LINKEDIN: Regex =
        Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Z0-9_-]+/?")
            .expect("linkedin pattern");

    pub static ref PHONE_RULES: Vec<Rule> = vec![
        Rule::new(
            "international",
            r"\+?\(?[0-9]{1,3}\)?[- \t.]?\(?[0-9]{1,4}\)?[- \t.]?[0-9]{1,4}[- \t.]?[0-9]{1,9}",
            has_phone_digits,
        ),
        Rule::new("dashed_or_dotted", r"\b[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}\b", has_phone_digits),
        Rule::new("parenthesized", r"\(?[0-9]{3}\)?[-. \t]?[0-9]{3}[-. \t]?[0-9]{4}", has_phone_digits),
        Rule::new("country_code", r"\+[0-9]{1,3}[ \t]?[0-9]{1,14}", has_phone_digits),
        Rule::new("plain_digits", r"\b[0-9]{10,14}\b", has_phone_digits),
    ];

    pub static ref NAME_RULES: Vec<Rule> = vec![
        Rule::new(
            "capitalized_words",
            r"^([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})$",
            has_name_word_count,
        ),
        Rule::new(
            "middle_initial",
            r"^([A-Z][a-z]+\s+[A-Z]\.\s+[A-Z][a-z]+)$",
            has_name_word_count,
        ),
        Rule::new(
            "titled",
            r"^(?:Mr\.|Ms\.|Mrs\.|Dr\.|Prof\.)?\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})",
            has_name_word_count,
        ),
    ];

    static ref NAME_HEADER_RULES: Vec<Rule> = NAME_HEADERS
        .iter()
        .map(|header| Rule {
            name: *header,
            pattern: header_pattern(header, r"[ \t]*([A-Za-z \t]+)"),
            accept: has_name_word_count,
        })
        .collect();

    static ref ADDRESS_HEADER_PATTERNS: Vec<Regex> = ADDRESS_HEADERS
        .iter()
        .map(|header| header_pattern(header, r"[ \t]*([^\n]+)"))
        .collect();

    pub static ref ADDRESS_RULES: Vec<Rule> = vec![
        Rule::new(
            "city_state_zip",
            r"\b([A-Za-z \t]+,[ \t]*[A-Z]{2}[ \t]+[0-9]{5}(?:-[0-9]{4})?)\b",
            any_candidate,
        ),
        Rule::new("city_state", r"\b([A-Za-z \t]+,[ \t]*[A-Z]{2})\b", any_candidate),
        Rule::new(
            "street",
            r"\b([0-9]+[ \t]+[A-Za-z \t]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Circle|Cir)\.?)\b",
            any_candidate,
        ),
    ];

    static ref STATE_TOKEN: Regex =
        Regex::new(&format!(r"\b(?:{})\b", US_STATES.join("|"))).expect("state pattern");

    /// Per-state lookback: a run of capitalized words, optional comma, then the state.
    static ref STATE_LOOKBACKS: Vec<(&'static str, Regex)> = US_STATES
        .iter()
        .map(|state| {
            let pattern = format!(r"[A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*)*,?[ \t]*\b{state}\b");
            (*state, Regex::new(&pattern).expect("state lookback pattern"))
        })
        .collect();

    static ref SKILL_HEADER_PATTERNS: Vec<Regex> = SKILL_HEADERS
        .iter()
        .map(|header| header_pattern(header, r"\s*"))
        .collect();
}

/// First email address in document order, lower-cased.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_lowercase())
}

/// First phone-shaped substring with at least [`MIN_PHONE_DIGITS`] digits,
/// returned with its original formatting.
pub fn extract_phone(text: &str) -> Option<String> {
    first_match(&PHONE_RULES, text).map(str::to_string)
}

/// Candidate's full name, looked for near the top of the document first and
/// then after a labeled header anywhere in the text.
pub fn extract_name(text: &str) -> Option<String> {
    let from_top = text
        .split('\n')
        .take(NAME_SCAN_LINES)
        .map(str::trim)
        .filter(|line| is_name_candidate_line(line))
        .find_map(|line| first_match(&NAME_RULES, line));

    if let Some(name) = from_top {
        return Some(name.trim().to_string());
    }

    NAME_HEADER_RULES
        .iter()
        .find_map(|rule| {
            rule.pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|name| (rule.accept)(*name))
        })
        .map(str::to_string)
}

fn is_name_candidate_line(line: &str) -> bool {
    let len = line.chars().count();
    if !(3..=50).contains(&len) {
        return false;
    }
    !line
        .chars()
        .any(|c| c.is_ascii_digit() || NAME_FORBIDDEN_CHARS.contains(c))
}

/// Location of the candidate: labeled header, then structural address
/// patterns, then a bare state abbreviation with a preceding city.
pub fn extract_address(text: &str) -> Option<String> {
    let labeled = ADDRESS_HEADER_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|loc| !loc.is_empty() && loc.chars().count() < MAX_HEADER_ADDRESS_CHARS)
    });
    if let Some(location) = labeled {
        return Some(location.to_string());
    }

    if let Some(address) = first_match(&ADDRESS_RULES, text) {
        return Some(address.trim().to_string());
    }

    city_before_state(text)
}

fn city_before_state(text: &str) -> Option<String> {
    let mut tried: Vec<&str> = Vec::new();
    for token in STATE_TOKEN.find_iter(text) {
        let state = token.as_str();
        if tried.contains(&state) {
            continue;
        }
        tried.push(state);

        let hit = STATE_LOOKBACKS
            .iter()
            .find(|(abbr, _)| *abbr == state)
            .and_then(|(_, pattern)| pattern.find(text));
        if let Some(hit) = hit {
            return Some(hit.as_str().trim().to_string());
        }
    }
    None
}

/// LinkedIn profile URL, always carrying a scheme.
pub fn extract_linkedin(text: &str) -> Option<String> {
    LINKEDIN.find(text).map(|m| ensure_scheme(m.as_str()))
}

/// Prepends `https://` unless the URL already starts with `http`.
pub fn ensure_scheme(url: &str) -> String {
    if url.to_ascii_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Skills listed under the first recognised skills header, up to the next blank line.
pub fn extract_skills(text: &str) -> Vec<String> {
    let section = SKILL_HEADER_PATTERNS.iter().find_map(|pattern| {
        let rest = &text[pattern.find(text)?.end()..];
        (!rest.is_empty()).then_some(rest)
    });

    let Some(section) = section else {
        return Vec::new();
    };

    let tokens = section
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .flat_map(|line| line.split(SKILL_DELIMITERS))
        .map(|token| token.trim_matches(|c: char| c == '-' || c.is_whitespace()))
        .filter(|token| !token.is_empty() && token.chars().count() < MAX_SKILL_CHARS)
        .map(str::to_string);

    dedup_skills(tokens)
}

/// Runs every field extractor over `text` and assembles the record.
pub fn extract_contact_info(text: &str) -> ContactRecord {
    let record = ContactRecord {
        full_name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        address: extract_address(text),
        linkedin: extract_linkedin(text),
        skills: extract_skills(text),
    };
    debug!("Extracted {} contact fields", record.populated_fields());
    record
}
