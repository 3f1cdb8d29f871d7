//! Deferred resolution pass.
//!
//! During analysis every cross-document or forward reference is recorded as a
//! pending edge instead of being chased eagerly — a `$ref` target may not
//! have been visited yet, may live in a sibling file, or may never exist.
//! After the whole corpus is analyzed, this pass binds every pending edge
//! against the symbol table, falling back to the Unknown placeholder so no
//! edge in the finished model ever dangles.

use crate::base::SchemaReference;
use crate::model::{AssociationEnd, ConceptId, Model};

use super::diagnostics::DiagnosticCollector;
use super::symbol_table::SymbolTable;

/// A superclass reference awaiting resolution (recorded from `allOf`).
#[derive(Debug)]
pub(crate) struct PendingSuperclassEdge {
    pub owner: ConceptId,
    pub target: SchemaReference,
}

/// An association whose target is a reference awaiting resolution. Carries
/// the full set of end attributes so the association can be materialized
/// without revisiting schema content.
#[derive(Debug)]
pub(crate) struct PendingAssociationEdge {
    pub owner: ConceptId,
    pub target: SchemaReference,
    pub owner_end: AssociationEnd,
    pub target_end: AssociationEnd,
}

/// The pending-edge arena: unresolved edges in registration order.
///
/// Plain vectors rather than reference-keyed maps, so two edges to the same
/// target are never lost.
#[derive(Debug, Default)]
pub(crate) struct PendingEdges {
    pub superclasses: Vec<PendingSuperclassEdge>,
    pub associations: Vec<PendingAssociationEdge>,
}

/// Consume all pending edges against the symbol table.
///
/// Runs once per analysis; taking `edges` by value makes re-entry impossible.
/// Does not revisit or re-analyze schema content.
pub(crate) fn resolve(
    model: &mut Model,
    symbols: &SymbolTable,
    edges: PendingEdges,
    diagnostics: &mut DiagnosticCollector,
) {
    tracing::debug!(
        "resolving {} superclass and {} association edge(s)",
        edges.superclasses.len(),
        edges.associations.len()
    );

    for edge in edges.superclasses {
        let target = bind(model, symbols, edge.owner, &edge.target, diagnostics);
        let owner = model.concept_mut(edge.owner);
        if !owner.superclasses.contains(&target) {
            owner.superclasses.push(target);
        }
    }

    for edge in edges.associations {
        let target = bind(model, symbols, edge.owner, &edge.target, diagnostics);
        model.new_association(edge.owner, target, edge.owner_end, edge.target_end);
    }
}

/// Fragment-qualified lookup first, then bare name; Unknown if neither hits.
fn bind(
    model: &Model,
    symbols: &SymbolTable,
    owner: ConceptId,
    target: &SchemaReference,
    diagnostics: &mut DiagnosticCollector,
) -> ConceptId {
    match symbols.lookup(target) {
        Some(found) => found,
        None => {
            let owner_name = &model.concept(owner).name;
            tracing::debug!("'{target}' referenced by '{owner_name}' did not resolve");
            diagnostics.unresolved_reference(owner_name, target.raw());
            model.unknown_concept()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Multiplicity;

    #[test]
    fn test_superclass_binds_to_registered_concept() {
        let mut model = Model::new("test");
        let root = model.root();
        let sub = model.new_concept("Sub", root);
        let base = model.new_concept("Base", root);

        let mut symbols = SymbolTable::new();
        symbols
            .register(SchemaReference::parse("#/definitions/Base").unwrap(), base)
            .unwrap();

        let mut edges = PendingEdges::default();
        edges.superclasses.push(PendingSuperclassEdge {
            owner: sub,
            target: SchemaReference::parse("#/definitions/Base").unwrap(),
        });

        let mut diagnostics = DiagnosticCollector::new();
        resolve(&mut model, &symbols, edges, &mut diagnostics);

        assert_eq!(model.concept(sub).superclasses, vec![base]);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn test_missing_target_binds_to_unknown() {
        let mut model = Model::new("test");
        let root = model.root();
        let owner = model.new_concept("Owner", root);

        let mut edges = PendingEdges::default();
        edges.associations.push(PendingAssociationEdge {
            owner,
            target: SchemaReference::parse("#/definitions/Ghost").unwrap(),
            owner_end: AssociationEnd::new("ghost", Multiplicity::optional())
                .navigable()
                .composite(),
            target_end: AssociationEnd::new("Ghost", Multiplicity::one()),
        });

        let mut diagnostics = DiagnosticCollector::new();
        resolve(&mut model, &symbols_empty(), edges, &mut diagnostics);

        let association = model.associations_of(owner).next().unwrap();
        assert!(model.is_unknown(association.target));
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_duplicate_superclass_edges_collapse() {
        let mut model = Model::new("test");
        let root = model.root();
        let sub = model.new_concept("Sub", root);
        let base = model.new_concept("Base", root);

        let mut symbols = SymbolTable::new();
        symbols
            .register(SchemaReference::parse("#/definitions/Base").unwrap(), base)
            .unwrap();

        let mut edges = PendingEdges::default();
        for _ in 0..2 {
            edges.superclasses.push(PendingSuperclassEdge {
                owner: sub,
                target: SchemaReference::parse("#/definitions/Base").unwrap(),
            });
        }

        let mut diagnostics = DiagnosticCollector::new();
        resolve(&mut model, &symbols, edges, &mut diagnostics);
        assert_eq!(model.concept(sub).superclasses, vec![base]);
    }

    fn symbols_empty() -> SymbolTable {
        SymbolTable::new()
    }
}
