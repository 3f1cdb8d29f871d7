//! The symbol table (Oracle): canonical reference → concept lookups.
//!
//! Concepts are registered under their [`SchemaReference`] the moment they
//! are created, before their properties are filled in, so self- and mutually
//! recursive references resolve correctly in the deferred pass. The table
//! only grows during a run; there is no deletion.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::base::SchemaReference;
use crate::model::ConceptId;

/// Internal invariant violation: a [`SchemaReference`] was registered twice.
///
/// Unreachable under correct traversal (concepts register exactly once, on
/// creation); if hit, it is a programming-error-class fault that aborts the
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a concept is already registered for reference '{reference}'")]
pub struct DuplicateConceptError {
    pub reference: String,
}

/// Maps canonical schema references to the concepts created for them.
///
/// Lookups are supported both by fragment-qualified reference and by bare
/// display name, because `$ref` targets may be spelled either way depending
/// on whether they point within the current document or across documents.
#[derive(Debug, Default)]
pub struct SymbolTable {
    by_reference: IndexMap<SchemaReference, ConceptId>,
    by_name: FxHashMap<SmolStr, ConceptId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `reference` to `concept`.
    ///
    /// The bare-name index is first-registration-wins; the canonical map
    /// rejects duplicates outright.
    pub fn register(
        &mut self,
        reference: SchemaReference,
        concept: ConceptId,
    ) -> Result<(), DuplicateConceptError> {
        if self.by_reference.contains_key(&reference) {
            return Err(DuplicateConceptError {
                reference: reference.to_string(),
            });
        }
        tracing::trace!("registering concept for '{reference}'");
        self.by_name
            .entry(reference.display_name())
            .or_insert(concept);
        self.by_reference.insert(reference, concept);
        Ok(())
    }

    /// Resolve a reference to a concept.
    ///
    /// Policy: exact canonical match first, then the fragment-qualified
    /// display name, then the bare document name.
    pub fn lookup(&self, reference: &SchemaReference) -> Option<ConceptId> {
        if let Some(found) = self.by_reference.get(reference) {
            return Some(*found);
        }
        if let Some(name) = reference.digest_fragment_name() {
            if let Some(found) = self.by_name.get(&name) {
                return Some(*found);
            }
        }
        reference
            .digest_name()
            .and_then(|name| self.by_name.get(&name).copied())
    }

    /// Look up a concept by bare display name.
    pub fn lookup_name(&self, name: &str) -> Option<ConceptId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, reference: &SchemaReference) -> bool {
        self.by_reference.contains_key(reference)
    }

    /// Registered references in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&SchemaReference, ConceptId)> {
        self.by_reference.iter().map(|(r, c)| (r, *c))
    }

    pub fn len(&self) -> usize {
        self.by_reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_reference.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    fn concept(model: &mut Model, name: &str) -> ConceptId {
        let root = model.root();
        model.new_concept(name, root)
    }

    #[test]
    fn test_register_and_exact_lookup() {
        let mut model = Model::new("test");
        let base = concept(&mut model, "Base");

        let mut table = SymbolTable::new();
        let reference = SchemaReference::parse("vehicle.json#/definitions/Base").unwrap();
        table.register(reference.clone(), base).unwrap();

        assert_eq!(table.lookup(&reference), Some(base));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut model = Model::new("test");
        let base = concept(&mut model, "Base");

        let mut table = SymbolTable::new();
        let reference = SchemaReference::parse("vehicle.json").unwrap();
        table.register(reference.clone(), base).unwrap();

        // Same canonical identity, different spelling.
        let respelled = SchemaReference::parse("vehicle.json#").unwrap();
        assert!(table.register(respelled, base).is_err());
    }

    #[test]
    fn test_fragment_name_fallback() {
        let mut model = Model::new("test");
        let base = concept(&mut model, "Base");

        let mut table = SymbolTable::new();
        table
            .register(
                SchemaReference::parse("vehicle.json#/definitions/Base").unwrap(),
                base,
            )
            .unwrap();

        // A document-local spelling has a different canonical identity but
        // digests to the same fragment name.
        let local = SchemaReference::parse("#/definitions/Base").unwrap();
        assert_eq!(table.lookup(&local), Some(base));
    }

    #[test]
    fn test_bare_document_name_fallback() {
        let mut model = Model::new("test");
        let address = concept(&mut model, "Address");

        let mut table = SymbolTable::new();
        table
            .register(
                SchemaReference::from_segments(["schemas", "address.json"]).unwrap(),
                address,
            )
            .unwrap();

        let cross_document = SchemaReference::parse("address.json").unwrap();
        assert_eq!(table.lookup(&cross_document), Some(address));
    }

    #[test]
    fn test_missing_reference() {
        let table = SymbolTable::new();
        let reference = SchemaReference::parse("#/definitions/Nope").unwrap();
        assert_eq!(table.lookup(&reference), None);
    }
}
