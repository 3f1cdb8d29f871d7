//! Tests for the deferred resolution pass: superclass binding, forward
//! references, cross-document references, and the Unknown placeholder.

use serde_json::json;
use skema::model::Multiplicity;
use skema::semantic::codes;
use skema::{Analysis, Analyzer};

fn analyze(documents: &[(&str, serde_json::Value)]) -> Analysis {
    let mut analyzer = Analyzer::default();
    for (name, schema) in documents {
        analyzer.analyze_value(name, schema).expect("analysis failed");
    }
    analyzer.finish()
}

#[test]
fn test_all_of_superclass_from_same_document() {
    let analysis = analyze(&[(
        "a",
        json!({
            "allOf": [
                {"$ref": "#/definitions/Base"},
                {"properties": {"x": {"type": "string"}}}
            ],
            "definitions": {
                "Base": {"type": "object", "properties": {"y": {"type": "integer"}}}
            }
        }),
    )]);

    let model = &analysis.model;
    let a = model.concept(model.concept_named("A").unwrap());
    let base_id = model.concept_named("Base").unwrap();

    assert_eq!(a.superclasses, vec![base_id]);

    // A keeps its own property; y stays on Base only.
    let a_names: Vec<&str> = a.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(a_names, ["x"]);
    let base = model.concept(base_id);
    assert_eq!(base.properties[0].name, "y");
}

#[test]
fn test_multiple_refs_yield_multiple_superclasses() {
    let analysis = analyze(&[(
        "c",
        json!({
            "allOf": [
                {"$ref": "#/definitions/Left"},
                {"$ref": "#/definitions/Right"}
            ],
            "definitions": {
                "Left": {"type": "object", "properties": {"l": {"type": "string"}}},
                "Right": {"type": "object", "properties": {"r": {"type": "string"}}}
            }
        }),
    )]);

    let model = &analysis.model;
    let c = model.concept(model.concept_named("C").unwrap());
    assert_eq!(c.superclasses.len(), 2);
}

#[test]
fn test_forward_reference_order_is_irrelevant() {
    let referencing = json!({
        "type": "object",
        "properties": {"partner": {"$ref": "b.json"}}
    });
    let referenced = json!({
        "type": "object",
        "properties": {"x": {"type": "string"}}
    });

    let forward = analyze(&[("a.json", referencing.clone()), ("b.json", referenced.clone())]);
    let backward = analyze(&[("b.json", referenced), ("a.json", referencing)]);

    for analysis in [&forward, &backward] {
        let model = &analysis.model;
        let a_id = model.concept_named("A").unwrap();
        let b_id = model.concept_named("B").unwrap();

        let association = model.associations_of(a_id).next().expect("association missing");
        assert_eq!(association.target, b_id);
        assert_eq!(association.owner_end.name, "partner");
        assert_eq!(association.owner_end.multiplicity, Multiplicity::optional());
        assert!(association.owner_end.composite);
        assert_eq!(association.target_end.multiplicity, Multiplicity::one());
    }
}

#[test]
fn test_missing_reference_binds_to_unknown() {
    let analysis = analyze(&[(
        "orphan",
        json!({
            "type": "object",
            "properties": {"thing": {"$ref": "#/definitions/Nowhere"}}
        }),
    )]);

    let model = &analysis.model;
    let orphan_id = model.concept_named("Orphan").unwrap();
    let association = model.associations_of(orphan_id).next().unwrap();
    assert!(model.is_unknown(association.target));

    // The unresolved binding is reported, not swallowed.
    assert!(analysis.diagnostics.iter().any(|d| {
        d.code.as_deref() == Some(codes::UNRESOLVED_REFERENCE) && d.message.contains("Nowhere")
    }));
}

#[test]
fn test_unknown_appears_only_for_missing_targets() {
    let analysis = analyze(&[
        (
            "a",
            json!({
                "type": "object",
                "properties": {
                    "real": {"$ref": "#/definitions/Real"},
                    "ghost": {"$ref": "#/definitions/Ghost"}
                },
                "definitions": {
                    "Real": {"type": "object", "properties": {"v": {"type": "integer"}}}
                }
            }),
        ),
    ]);

    let model = &analysis.model;
    let unknown_targets: Vec<&str> = model
        .associations()
        .filter(|(_, a)| model.is_unknown(a.target))
        .map(|(_, a)| a.owner_end.name.as_str())
        .collect();
    assert_eq!(unknown_targets, ["ghost"]);
}

#[test]
fn test_array_ref_items_resolve_with_unbounded_upper() {
    let analysis = analyze(&[(
        "fleet",
        json!({
            "type": "object",
            "properties": {
                "cars": {
                    "type": "array",
                    "minItems": 2,
                    "items": {"$ref": "#/definitions/Car"}
                }
            },
            "definitions": {
                "Car": {"type": "object", "properties": {"vin": {"type": "string"}}}
            }
        }),
    )]);

    let model = &analysis.model;
    let fleet_id = model.concept_named("Fleet").unwrap();
    let car_id = model.concept_named("Car").unwrap();
    let association = model.associations_of(fleet_id).next().unwrap();
    assert_eq!(association.target, car_id);
    assert_eq!(association.owner_end.multiplicity, Multiplicity::new(2, None));
}

#[test]
fn test_cross_document_reference_by_bare_name() {
    let analysis = analyze(&[
        (
            "person.json",
            json!({
                "type": "object",
                "properties": {"home": {"$ref": "address.json"}}
            }),
        ),
        (
            "address.json",
            json!({
                "type": "object",
                "properties": {"street": {"type": "string"}}
            }),
        ),
    ]);

    let model = &analysis.model;
    let person_id = model.concept_named("Person").unwrap();
    let address_id = model.concept_named("Address").unwrap();
    let association = model.associations_of(person_id).next().unwrap();
    assert_eq!(association.target, address_id);
    assert_eq!(association.target_end.name, "address");
}

#[test]
fn test_self_recursive_reference_resolves() {
    let analysis = analyze(&[(
        "node.json",
        json!({
            "type": "object",
            "properties": {
                "value": {"type": "integer"},
                "next": {"$ref": "node.json"}
            }
        }),
    )]);

    let model = &analysis.model;
    let node_id = model.concept_named("Node").unwrap();
    let association = model.associations_of(node_id).next().unwrap();
    assert_eq!(association.target, node_id);
}

#[test]
fn test_symbol_table_is_exposed_and_complete() {
    let analysis = analyze(&[(
        "a",
        json!({
            "type": "object",
            "properties": {"x": {"type": "string"}},
            "definitions": {
                "Inner": {"type": "object", "properties": {"y": {"type": "integer"}}}
            }
        }),
    )]);

    assert_eq!(analysis.symbols.len(), 2);
    assert!(analysis.symbols.lookup_name("a").is_some());
    assert!(analysis.symbols.lookup_name("Inner").is_some());
}
