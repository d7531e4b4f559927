//! Raw URL query mapping
//!
//! Keys may repeat (`field=id&field=span.op`). Every accessor hands back a
//! normalized view so callers never care whether a key held one value or many.

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// Ordered multimap of query string keys to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryParams {
    pairs: Vec<(String, String)>,
}

impl RawQueryParams {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Self { pairs }
    }

    /// Build from a JSON object whose values are strings or arrays of strings.
    ///
    /// Numbers and booleans are stringified; `null` values are skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::validation("query params must be a JSON object"))?;

        let mut params = Self::new();
        for (key, value) in object {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(item) = scalar_to_string(item) {
                            params.append(key.clone(), item);
                        }
                    }
                }
                other => {
                    if let Some(item) = scalar_to_string(other) {
                        params.append(key.clone(), item);
                    }
                }
            }
        }

        Ok(params)
    }

    /// Add a value for `key`, keeping existing ones
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replace every value of `key` with `values`
    pub fn set_all<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remove(key);
        for value in values {
            self.append(key, value);
        }
    }

    /// Replace every value of `key` with a single value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.set_all(key, [value.into()]);
    }

    /// Drop every value of `key`
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// First value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values of `key` in order; empty when absent
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether `key` appears at all
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Key/value pairs in insertion order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Whether the mapping holds no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize back to an `application/x-www-form-urlencoded` query string
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_repeated_keys() {
        let params = RawQueryParams::parse("?field=id&field=span.op&mode=aggregate");

        assert_eq!(params.get_all("field"), vec!["id", "span.op"]);
        assert_eq!(params.get("mode"), Some("aggregate"));
        assert_eq!(params.get("query"), None);
        assert!(params.get_all("sort").is_empty());
    }

    #[test]
    fn test_parse_percent_and_plus_decoding() {
        let params = RawQueryParams::parse("query=span.op%3Adb+has%3Auser&sort=-timestamp");

        assert_eq!(params.get("query"), Some("span.op:db has:user"));
        assert_eq!(params.get("sort"), Some("-timestamp"));
    }

    #[test]
    fn test_single_string_and_list_normalize_identically() {
        let single = RawQueryParams::from_json(&json!({ "field": "id" })).unwrap();
        let list = RawQueryParams::from_json(&json!({ "field": ["id"] })).unwrap();

        assert_eq!(single.get_all("field"), list.get_all("field"));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(RawQueryParams::from_json(&json!(["field"])).is_err());
    }

    #[test]
    fn test_set_all_replaces_existing_values() {
        let mut params = RawQueryParams::parse("field=id&field=span.op&query=x");
        params.set_all("field", ["timestamp"]);

        assert_eq!(params.get_all("field"), vec!["timestamp"]);
        assert_eq!(params.get("query"), Some("x"));
    }

    #[test]
    fn test_query_string_roundtrip_preserves_json_blobs() {
        let mut params = RawQueryParams::new();
        params.append("aggregateField", r#"{"groupBy":"span.op"}"#);
        params.append("query", "a b");

        let reparsed = RawQueryParams::parse(&params.to_query_string());
        assert_eq!(reparsed, params);
    }
}
