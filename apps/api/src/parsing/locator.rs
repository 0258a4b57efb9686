//! Best-effort field lookup over a schema-less upstream payload.

use crate::models::StructuredValue;

/// Keys that commonly wrap the interesting part of a parser response.
/// Checked one level in before falling back to a full recursive walk.
pub const CONTAINER_KEYS: &[&str] = &[
    "data",
    "parsed",
    "parsed_resume",
    "personal",
    "contact",
    "personal_details",
    "attributes",
    "profile",
];

/// Matches serde_json's own nesting limit, so every decoded payload is
/// searched in full while hand-built trees still cannot exhaust the stack.
pub const MAX_DEPTH: usize = 128;

/// Finds the first non-empty value stored under any of `aliases`.
///
/// At a map node, aliases are tried against its keys in alias order, then
/// against each well-known container one level down, and only then does the
/// search recurse into every child (map values in order, list elements in
/// order). The first non-empty hit in that depth-first order wins.
pub fn locate<'a>(value: &'a StructuredValue, aliases: &[&str]) -> Option<&'a StructuredValue> {
    locate_at(value, aliases, 0)
}

fn locate_at<'a>(
    value: &'a StructuredValue,
    aliases: &[&str],
    depth: usize,
) -> Option<&'a StructuredValue> {
    if depth > MAX_DEPTH {
        return None;
    }

    match value {
        StructuredValue::Map(entries) => direct_hit(value, aliases)
            .or_else(|| {
                CONTAINER_KEYS
                    .iter()
                    .filter_map(|key| value.get(key))
                    .filter(|node| node.is_map())
                    .find_map(|node| direct_hit(node, aliases))
            })
            .or_else(|| {
                entries
                    .iter()
                    .find_map(|(_, child)| locate_at(child, aliases, depth + 1))
            }),
        StructuredValue::List(items) => items
            .iter()
            .find_map(|item| locate_at(item, aliases, depth + 1)),
        _ => None,
    }
}

fn direct_hit<'a>(node: &'a StructuredValue, aliases: &[&str]) -> Option<&'a StructuredValue> {
    aliases
        .iter()
        .filter_map(|alias| node.get(alias))
        .find(|value| value.is_truthy())
}
