//! The meta-schema validation seam.
//!
//! Whether a file is analyzed at all is gated by a [`DocumentValidator`].
//! The default [`MetaSchemaCheck`] performs a structural sanity check of the
//! draft-04-era vocabulary; callers wanting full meta-schema validation can
//! plug their own implementation into the workspace loader.

use std::path::Path;

use serde_json::{Map, Value};

/// Gate deciding whether a parsed document is a usable JSON Schema.
///
/// An `Err` means the document is skipped with a diagnostic; it never aborts
/// the run.
pub trait DocumentValidator {
    fn validate(&self, path: &Path, document: &Value) -> Result<(), String>;
}

const KNOWN_TYPES: [&str; 7] = [
    "string", "integer", "number", "boolean", "object", "array", "null",
];

/// Structural draft-04 keyword check used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetaSchemaCheck;

impl DocumentValidator for MetaSchemaCheck {
    fn validate(&self, _path: &Path, document: &Value) -> Result<(), String> {
        let Some(root) = document.as_object() else {
            return Err("the document root is not a JSON object".to_string());
        };
        check_schema_node(root, "#")
    }
}

fn check_schema_node(obj: &Map<String, Value>, at: &str) -> Result<(), String> {
    if let Some(ty) = obj.get("type") {
        check_type_keyword(ty, at)?;
    }
    for keyword in ["properties", "definitions"] {
        if let Some(value) = obj.get(keyword) {
            let Some(entries) = value.as_object() else {
                return Err(format!("`{keyword}` at {at} must be an object"));
            };
            for (name, entry) in entries {
                let Some(entry) = entry.as_object() else {
                    return Err(format!("`{keyword}/{name}` at {at} must be an object"));
                };
                check_schema_node(entry, &format!("{at}/{keyword}/{name}"))?;
            }
        }
    }
    for keyword in ["allOf", "oneOf", "anyOf"] {
        if let Some(value) = obj.get(keyword) {
            let Some(elements) = value.as_array() else {
                return Err(format!("`{keyword}` at {at} must be an array"));
            };
            for (index, element) in elements.iter().enumerate() {
                if let Some(element) = element.as_object() {
                    check_schema_node(element, &format!("{at}/{keyword}/{index}"))?;
                }
            }
        }
    }
    if let Some(items) = obj.get("items") {
        match items {
            Value::Object(items) => check_schema_node(items, &format!("{at}/items"))?,
            Value::Array(elements) => {
                for (index, element) in elements.iter().enumerate() {
                    if let Some(element) = element.as_object() {
                        check_schema_node(element, &format!("{at}/items/{index}"))?;
                    }
                }
            }
            _ => return Err(format!("`items` at {at} must be an object or array")),
        }
    }
    if let Some(required) = obj.get("required") {
        let ok = matches!(required, Value::Array(names)
            if names.iter().all(Value::is_string));
        if !ok {
            return Err(format!("`required` at {at} must be an array of strings"));
        }
    }
    if let Some(values) = obj.get("enum") {
        let ok = matches!(values, Value::Array(literals) if !literals.is_empty());
        if !ok {
            return Err(format!("`enum` at {at} must be a non-empty array"));
        }
    }
    for keyword in [
        "maxLength",
        "minLength",
        "maximum",
        "exclusiveMaximum",
        "minimum",
        "exclusiveMinimum",
        "multipleOf",
        "minItems",
        "maxItems",
    ] {
        if let Some(value) = obj.get(keyword) {
            if !value.is_number() {
                return Err(format!("`{keyword}` at {at} must be a number"));
            }
        }
    }
    if let Some(reference) = obj.get("$ref") {
        if !reference.is_string() {
            return Err(format!("`$ref` at {at} must be a string"));
        }
    }
    Ok(())
}

fn check_type_keyword(ty: &Value, at: &str) -> Result<(), String> {
    let names: Vec<&str> = match ty {
        Value::String(name) => vec![name.as_str()],
        Value::Array(names) => names.iter().filter_map(Value::as_str).collect(),
        _ => return Err(format!("`type` at {at} must be a string or array")),
    };
    for name in names {
        if !KNOWN_TYPES.contains(&name) {
            return Err(format!("unknown type '{name}' at {at}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(document: Value) -> Result<(), String> {
        MetaSchemaCheck.validate(Path::new("test.json"), &document)
    }

    #[test]
    fn test_accepts_ordinary_schema() {
        assert!(validate(json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "minimum": 0},
                "tags": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["age"]
        }))
        .is_ok());
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(validate(json!([1, 2, 3])).is_err());
        assert!(validate(json!("schema")).is_err());
    }

    #[test]
    fn test_rejects_unknown_type_name() {
        assert!(validate(json!({"type": "text"})).is_err());
    }

    #[test]
    fn test_rejects_malformed_required() {
        assert!(validate(json!({"type": "object", "required": [1]})).is_err());
    }

    #[test]
    fn test_rejects_nested_violations() {
        assert!(validate(json!({
            "type": "object",
            "properties": {"bad": {"type": "object", "properties": {"x": {"maxLength": "long"}}}}
        }))
        .is_err());
    }
}
