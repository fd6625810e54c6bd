//! Custom assertions for presented JSON documents.
//!
//! Provides high-level assertions that make tests more readable:
//! - Exact key set of a presented object
//! - Absence of keys that belong to inclusions that were not requested
//! - Length of presented collections

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that a JSON object has exactly the expected keys (order ignored).
pub fn assert_keys(json: &Value, expected: &[&str]) -> Result<()> {
    let object = json.as_object().context("Expected a JSON object")?;

    let mut actual: Vec<&str> = object.keys().map(String::as_str).collect();
    let mut wanted: Vec<&str> = expected.to_vec();
    actual.sort_unstable();
    wanted.sort_unstable();

    if actual != wanted {
        anyhow::bail!("Expected keys {:?}, got {:?}", wanted, actual);
    }

    Ok(())
}

/// Assert that a JSON object does not contain `key`.
pub fn assert_key_absent(json: &Value, key: &str) -> Result<()> {
    let object = json.as_object().context("Expected a JSON object")?;

    if object.contains_key(key) {
        anyhow::bail!("Key '{}' should not be present in {}", key, json);
    }

    Ok(())
}

/// Assert that `json[key]` is an array of `expected` elements.
pub fn assert_len(json: &Value, key: &str, expected: usize) -> Result<()> {
    let items = json[key]
        .as_array()
        .with_context(|| format!("Expected '{}' array in JSON", key))?;

    if items.len() != expected {
        anyhow::bail!("Expected {} items in '{}', got {}", expected, key, items.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assert_keys() {
        let json = json!({"id": 1, "name": "Ada"});

        assert!(assert_keys(&json, &["name", "id"]).is_ok());
        assert!(assert_keys(&json, &["id"]).is_err());
        assert!(assert_keys(&json!([1]), &[]).is_err());
    }

    #[test]
    fn test_assert_key_absent() {
        let json = json!({"id": 1});

        assert!(assert_key_absent(&json, "email").is_ok());
        assert!(assert_key_absent(&json, "id").is_err());
    }

    #[test]
    fn test_assert_len() {
        let json = json!({"comments": [{"id": 1}, {"id": 2}]});

        assert!(assert_len(&json, "comments", 2).is_ok());
        assert!(assert_len(&json, "comments", 3).is_err());
        assert!(assert_len(&json, "missing", 0).is_err());
    }
}
