//! Schema-node classification.
//!
//! JSON Schema nodes arrive as untyped [`serde_json::Value`] objects; this
//! module turns presence-of-key dispatch into a single [`classify`] function
//! producing a closed set of [`SchemaNode`] shapes that the analyzer pattern
//! matches on.

use serde_json::{Map, Value};

/// A JSON object node (key order preserved by `serde_json/preserve_order`).
pub(crate) type JsonObject = Map<String, Value>;

/// The primitive type names the analyzer recognizes in `type` declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PrimitiveName {
    String,
    Integer,
    Number,
    Boolean,
}

impl PrimitiveName {
    fn from_str(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// The closed set of schema node shapes the analyzer recognizes.
#[derive(Debug)]
pub(crate) enum SchemaNode<'a> {
    /// `allOf`: superclass references plus local property composition.
    AllOf(&'a Vec<Value>),
    /// `oneOf`: exclusive variant set.
    OneOf(&'a Vec<Value>),
    /// `anyOf`: inclusive variant set.
    AnyOf(&'a Vec<Value>),
    /// `$ref` with no declared type.
    Reference(&'a str),
    /// A closed literal set, regardless of any co-occurring `type`.
    Enum(&'a Vec<Value>),
    /// `type: "array"`; the `items` sub-schema is inspected separately.
    Array,
    /// An object schema: its `properties` map, when declared.
    Object(Option<&'a JsonObject>),
    /// A bare primitive type.
    Primitive(PrimitiveName),
}

/// Classify a schema node by its recognized key combination.
///
/// Precedence: `allOf` > `enum` > `oneOf` > `anyOf` > declared `type` >
/// `$ref` > bare `properties`. Returns `None` for nodes carrying none of
/// the recognized keywords (e.g. a `definitions`-only document root).
pub(crate) fn classify(obj: &JsonObject) -> Option<SchemaNode<'_>> {
    if let Some(Value::Array(elements)) = obj.get("allOf") {
        return Some(SchemaNode::AllOf(elements));
    }
    if let Some(Value::Array(values)) = obj.get("enum") {
        return Some(SchemaNode::Enum(values));
    }
    if let Some(Value::Array(options)) = obj.get("oneOf") {
        return Some(SchemaNode::OneOf(options));
    }
    if let Some(Value::Array(options)) = obj.get("anyOf") {
        return Some(SchemaNode::AnyOf(options));
    }
    if let Some(declared) = declared_type(obj) {
        return match declared {
            "array" => Some(SchemaNode::Array),
            "object" => Some(SchemaNode::Object(properties_of(obj))),
            other => PrimitiveName::from_str(other).map(SchemaNode::Primitive),
        };
    }
    if let Some(Value::String(reference)) = obj.get("$ref") {
        return Some(SchemaNode::Reference(reference));
    }
    if let Some(properties) = properties_of(obj) {
        return Some(SchemaNode::Object(Some(properties)));
    }
    None
}

/// The declared `type` of a node: the string itself, or the first element if
/// `type` is an array.
pub(crate) fn declared_type(obj: &JsonObject) -> Option<&str> {
    match obj.get("type") {
        Some(Value::String(ty)) => Some(ty),
        Some(Value::Array(types)) => types.first().and_then(Value::as_str),
        _ => None,
    }
}

/// A trailing `"null"` in an array-valued `type` marks the node nullable.
pub(crate) fn is_nullable(obj: &JsonObject) -> bool {
    match obj.get("type") {
        Some(Value::Array(types)) => types.get(1).and_then(Value::as_str) == Some("null"),
        _ => false,
    }
}

pub(crate) fn properties_of(obj: &JsonObject) -> Option<&JsonObject> {
    match obj.get("properties") {
        Some(Value::Object(properties)) => Some(properties),
        _ => None,
    }
}

pub(crate) fn string_field<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

pub(crate) fn u32_field(obj: &JsonObject, key: &str) -> Option<u32> {
    obj.get(key).and_then(Value::as_u64).map(|n| n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_classify_precedence() {
        assert!(matches!(
            classify(&obj(json!({"allOf": [], "properties": {}}))),
            Some(SchemaNode::AllOf(_))
        ));
        assert!(matches!(
            classify(&obj(json!({"type": "string", "enum": ["a"]}))),
            Some(SchemaNode::Enum(_))
        ));
        assert!(matches!(
            classify(&obj(json!({"type": "object", "oneOf": []}))),
            Some(SchemaNode::OneOf(_))
        ));
        assert!(matches!(
            classify(&obj(json!({"type": "integer"}))),
            Some(SchemaNode::Primitive(PrimitiveName::Integer))
        ));
        assert!(matches!(
            classify(&obj(json!({"$ref": "#/definitions/X"}))),
            Some(SchemaNode::Reference("#/definitions/X"))
        ));
        assert!(matches!(
            classify(&obj(json!({"properties": {"a": {"type": "string"}}}))),
            Some(SchemaNode::Object(Some(_)))
        ));
        assert!(classify(&obj(json!({"definitions": {}}))).is_none());
    }

    #[test]
    fn test_type_array_takes_first_element() {
        let node = obj(json!({"type": ["integer", "null"]}));
        assert!(matches!(
            classify(&node),
            Some(SchemaNode::Primitive(PrimitiveName::Integer))
        ));
        assert!(is_nullable(&node));
        assert!(!is_nullable(&obj(json!({"type": "integer"}))));
    }

    #[test]
    fn test_object_without_properties() {
        assert!(matches!(
            classify(&obj(json!({"type": "object"}))),
            Some(SchemaNode::Object(None))
        ));
    }
}
