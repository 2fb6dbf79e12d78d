//! Normalization of foreign-key id lists
//!
//! Id-list fields arrive either as a JSON array or as a JSON-encoded string
//! holding that array. Every membership test goes through [`IdList::normalize`]
//! (or the free [`normalize_id_list`]) so parsing lives in one place.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Why a raw id-list value could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdListError {
    #[error("encoded id list is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("expected an array of ids, found {0}")]
    UnexpectedShape(String),
}

/// A foreign-key id list as stored on a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum IdList {
    /// Field absent, null or an empty string
    #[default]
    Empty,
    /// A proper array of ids
    List(Vec<String>),
    /// A JSON-encoded array, e.g. `'["t1","t2"]'`
    Encoded(String),
    /// Some other JSON value; carries its textual form for diagnostics
    Invalid(String),
}

impl IdList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IdList::List(ids.into_iter().map(Into::into).collect())
    }

    pub fn encoded(raw: impl Into<String>) -> Self {
        IdList::Encoded(raw.into())
    }

    pub fn is_empty(&self) -> bool {
        self.normalize().is_empty()
    }

    /// Canonical id list, or the reason the raw value could not be read
    pub fn try_normalize(&self) -> Result<Vec<String>, IdListError> {
        match self {
            IdList::Empty => Ok(Vec::new()),
            IdList::List(ids) => Ok(canonical(ids.iter().map(String::as_str))),
            IdList::Encoded(raw) => parse_encoded(raw),
            IdList::Invalid(raw) => Err(IdListError::UnexpectedShape(raw.clone())),
        }
    }

    /// Canonical id list; unreadable values normalize to empty
    pub fn normalize(&self) -> Vec<String> {
        self.try_normalize().unwrap_or_default()
    }

    /// Membership test against the normalized list
    pub fn contains(&self, id: &str) -> bool {
        self.normalize().iter().any(|candidate| candidate == id)
    }
}

impl From<Vec<String>> for IdList {
    fn from(ids: Vec<String>) -> Self {
        IdList::List(ids)
    }
}

impl From<Vec<&str>> for IdList {
    fn from(ids: Vec<&str>) -> Self {
        IdList::new(ids)
    }
}

impl From<Value> for IdList {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => IdList::Empty,
            Value::String(s) if s.trim().is_empty() => IdList::Empty,
            Value::String(s) => IdList::Encoded(s),
            Value::Array(items) => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => ids.push(s),
                        Value::Number(n) => ids.push(n.to_string()),
                        other => return IdList::Invalid(Value::Array(vec![other]).to_string()),
                    }
                }
                IdList::List(ids)
            }
            other => IdList::Invalid(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for IdList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(IdList::from).unwrap_or_default())
    }
}

impl Serialize for IdList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.normalize().serialize(serializer)
    }
}

/// Normalize a raw JSON value into a canonical id list
pub fn normalize_id_list(value: &Value) -> Vec<String> {
    IdList::from(value.clone()).normalize()
}

fn parse_encoded(raw: &str) -> Result<Vec<String>, IdListError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|_| IdListError::InvalidJson(raw.to_string()))?;
    match value {
        Value::Array(items) => match IdList::from(Value::Array(items)) {
            IdList::List(ids) => Ok(canonical(ids.iter().map(String::as_str))),
            _ => Err(IdListError::UnexpectedShape(raw.to_string())),
        },
        // A JSON string holding a single id
        Value::String(id) => Ok(canonical(std::iter::once(id.as_str()))),
        Value::Null => Ok(Vec::new()),
        _ => Err(IdListError::UnexpectedShape(raw.to_string())),
    }
}

/// Trim, drop blanks and duplicates, keep first-seen order
fn canonical<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        let id = id.trim();
        if id.is_empty() || out.iter().any(|seen| seen == id) {
            continue;
        }
        out.push(id.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_and_encoded_string_are_equivalent() {
        let array = IdList::new(["t1", "t2"]);
        let encoded = IdList::encoded(r#"["t1","t2"]"#);
        assert_eq!(array.normalize(), encoded.normalize());
        assert!(encoded.contains("t2"));
    }

    #[test]
    fn test_unparsable_string_is_empty() {
        let list = IdList::encoded("[t1, t2");
        assert!(list.normalize().is_empty());
        assert!(matches!(list.try_normalize(), Err(IdListError::InvalidJson(_))));
    }

    #[test]
    fn test_deserialize_shapes() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default)]
            ids: IdList,
        }

        let from_array: Holder = serde_json::from_value(json!({ "ids": ["a", "b"] })).unwrap();
        assert_eq!(from_array.ids.normalize(), vec!["a", "b"]);

        let from_string: Holder = serde_json::from_value(json!({ "ids": "[\"a\"]" })).unwrap();
        assert_eq!(from_string.ids.normalize(), vec!["a"]);

        let missing: Holder = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.ids, IdList::Empty);

        let null: Holder = serde_json::from_value(json!({ "ids": null })).unwrap();
        assert_eq!(null.ids, IdList::Empty);

        let object: Holder = serde_json::from_value(json!({ "ids": { "a": 1 } })).unwrap();
        assert!(matches!(object.ids, IdList::Invalid(_)));
        assert!(object.ids.normalize().is_empty());
    }

    #[test]
    fn test_canonical_drops_blanks_and_duplicates() {
        let list = IdList::new(["a", " a ", "", "b"]);
        assert_eq!(list.normalize(), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_raw_value() {
        assert_eq!(normalize_id_list(&json!("[\"x\",\"y\"]")), vec!["x", "y"]);
        assert_eq!(normalize_id_list(&json!(42)), Vec::<String>::new());
    }
}
