use serde_json::{Number, Value};

/// Schema-less payload returned by an external resume parser, decoded once
/// into an owned tree. Map entries keep their upstream order.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<StructuredValue>),
    Map(Vec<(String, StructuredValue)>),
}

impl StructuredValue {
    /// Empty values (null, false, zero, empty string/list/map) never satisfy a lookup.
    pub fn is_truthy(&self) -> bool {
        match self {
            StructuredValue::Null => false,
            StructuredValue::Bool(b) => *b,
            StructuredValue::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
            StructuredValue::String(s) => !s.is_empty(),
            StructuredValue::List(items) => !items.is_empty(),
            StructuredValue::Map(entries) => !entries.is_empty(),
        }
    }

    /// Looks up `key` on a map node. Returns `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        match self {
            StructuredValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StructuredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, StructuredValue::Map(_))
    }

    /// Display text for scalar nodes; `None` for null, lists and maps.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            StructuredValue::String(s) => Some(s.clone()),
            StructuredValue::Number(n) => Some(n.to_string()),
            StructuredValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for StructuredValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StructuredValue::Null,
            Value::Bool(b) => StructuredValue::Bool(b),
            Value::Number(n) => StructuredValue::Number(n),
            Value::String(s) => StructuredValue::String(s),
            Value::Array(items) => {
                StructuredValue::List(items.into_iter().map(StructuredValue::from).collect())
            }
            Value::Object(map) => StructuredValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, StructuredValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decoding_preserves_key_order() {
        let value = StructuredValue::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let StructuredValue::Map(entries) = value else {
            panic!("expected map");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_truthiness_matches_empty_values() {
        for empty in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(!StructuredValue::from(empty.clone()).is_truthy(), "{empty} should be empty");
        }
        for present in [json!(true), json!(7), json!("x"), json!([0]), json!({"a": null})] {
            assert!(StructuredValue::from(present.clone()).is_truthy(), "{present} should be present");
        }
    }

    #[test]
    fn test_get_only_applies_to_maps() {
        let value = StructuredValue::from(json!({"name": "Alice"}));
        assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Alice"));
        assert!(value.get("email").is_none());
        assert!(StructuredValue::from(json!(["name"])).get("name").is_none());
    }
}
