//! OCL-style constraint text assembly.
//!
//! String and numeric validation keywords are translated into named
//! constraints on the owning concept. Constraint names are derived from the
//! concept, property, and keyword, so they are unique per concept.

use serde_json::Value;

use crate::model::{Constraint, ConstraintKind};

use super::node::JsonObject;

/// Constraints produced by string validation keywords (`maxLength`,
/// `minLength`). `pattern` is a declared non-goal and only logged.
pub(crate) fn string_constraints(
    concept: &str,
    property: &str,
    obj: &JsonObject,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    if let Some(max) = obj.get("maxLength") {
        constraints.push(Constraint::new(
            concept,
            property,
            ConstraintKind::MaxLength,
            format!("self.{property}.size() <= {}", literal(max)),
        ));
    }
    if let Some(min) = obj.get("minLength") {
        constraints.push(Constraint::new(
            concept,
            property,
            ConstraintKind::MinLength,
            format!("self.{property}.size() >= {}", literal(min)),
        ));
    }
    if obj.contains_key("pattern") {
        tracing::debug!("`pattern` on '{property}' is not supported, no constraint emitted");
    }
    constraints
}

/// Constraints produced by numeric validation keywords.
pub(crate) fn numeric_constraints(
    concept: &str,
    property: &str,
    obj: &JsonObject,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    let mut push = |kind: ConstraintKind, keyword: &str, template: fn(&str, &str) -> String| {
        if let Some(bound) = obj.get(keyword) {
            constraints.push(Constraint::new(
                concept,
                property,
                kind,
                template(property, &literal(bound)),
            ));
        }
    };

    push(ConstraintKind::MultipleOf, "multipleOf", |p, n| {
        format!("self.{p}.div({n}) = 0")
    });
    push(ConstraintKind::Maximum, "maximum", |p, n| {
        format!("self.{p} <= {n}")
    });
    push(
        ConstraintKind::ExclusiveMaximum,
        "exclusiveMaximum",
        |p, n| format!("self.{p} < {n}"),
    );
    push(ConstraintKind::Minimum, "minimum", |p, n| {
        format!("self.{p} >= {n}")
    });
    push(
        ConstraintKind::ExclusiveMinimum,
        "exclusiveMinimum",
        |p, n| format!("self.{p} > {n}"),
    );
    constraints
}

/// Render a bound value as written in the schema (no quoting for strings).
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
