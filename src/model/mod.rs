//! The class-diagram-shaped output model.
//!
//! Elements live in typed arenas on [`Model`] and reference each other by
//! compact ids, so the finished model is cheap to traverse and trivially
//! serializable for an external persistence tool:
//!
//! ```text
//! Model
//! ├── namespaces: Vec<Namespace>      (tree rooted at `root`)
//! ├── concepts: Vec<Concept>          (incl. the Unknown placeholder)
//! ├── enumerations: Vec<Enumeration>
//! └── associations: Vec<Association>
//! ```
//!
//! The Unknown placeholder is created at initialization and is the resolved
//! target of every reference the resolution pass cannot bind, so no edge in a
//! finished model ever dangles.

mod elements;

use serde::Serialize;
use smol_str::SmolStr;
use uuid::Uuid;

pub use elements::{
    Association, AssociationEnd, Concept, Constraint, ConstraintKind, Enumeration, Multiplicity,
    Namespace, PrimitiveKind, Property, PropertyType,
};

/// Generate a new unique element id for interchange.
pub fn new_element_id() -> SmolStr {
    SmolStr::new(Uuid::new_v4().to_string())
}

// ============================================================================
// IDS
// ============================================================================

/// Arena index of a [`Namespace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NamespaceId(u32);

/// Arena index of a [`Concept`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ConceptId(u32);

/// Arena index of an [`Enumeration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EnumerationId(u32);

/// Arena index of an [`Association`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AssociationId(u32);

macro_rules! impl_arena_id {
    ($($id:ident),+) => {$(
        impl $id {
            fn new(index: usize) -> Self {
                Self(index as u32)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    )+};
}

impl_arena_id!(NamespaceId, ConceptId, EnumerationId, AssociationId);

// ============================================================================
// MODEL
// ============================================================================

/// The in-memory model produced by an analysis run.
#[derive(Clone, Debug, Serialize)]
pub struct Model {
    pub name: SmolStr,
    namespaces: Vec<Namespace>,
    concepts: Vec<Concept>,
    enumerations: Vec<Enumeration>,
    associations: Vec<Association>,
    root: NamespaceId,
    unknown: ConceptId,
}

impl Model {
    /// Create a model with its root namespace and the Unknown placeholder
    /// concept already in place.
    pub fn new(name: &str) -> Self {
        let root = NamespaceId::new(0);
        let mut model = Self {
            name: SmolStr::new(name),
            namespaces: vec![Namespace::new(SmolStr::new(name), None)],
            concepts: Vec::new(),
            enumerations: Vec::new(),
            associations: Vec::new(),
            root,
            unknown: ConceptId::new(0),
        };
        model.unknown = model.new_concept(SmolStr::new("Unknown"), root);
        model
    }

    /// The single root namespace of this run.
    pub fn root(&self) -> NamespaceId {
        self.root
    }

    /// The process-wide sentinel concept used for unresolvable references.
    pub fn unknown_concept(&self) -> ConceptId {
        self.unknown
    }

    pub fn is_unknown(&self, id: ConceptId) -> bool {
        id == self.unknown
    }

    // ------------------------------------------------------------------
    // Element creation
    // ------------------------------------------------------------------

    pub fn new_namespace(&mut self, name: impl Into<SmolStr>, parent: NamespaceId) -> NamespaceId {
        let id = NamespaceId::new(self.namespaces.len());
        self.namespaces.push(Namespace::new(name.into(), Some(parent)));
        self.namespaces[parent.index()].namespaces.push(id);
        id
    }

    pub fn new_concept(&mut self, name: impl Into<SmolStr>, namespace: NamespaceId) -> ConceptId {
        let id = ConceptId::new(self.concepts.len());
        self.concepts.push(Concept {
            name: name.into(),
            element_id: new_element_id(),
            namespace,
            is_abstract: false,
            properties: Vec::new(),
            superclasses: Vec::new(),
            constraints: Vec::new(),
            associations: Vec::new(),
            docs: Vec::new(),
        });
        self.namespaces[namespace.index()].concepts.push(id);
        id
    }

    pub fn new_enumeration(
        &mut self,
        name: impl Into<SmolStr>,
        namespace: NamespaceId,
        literals: Vec<SmolStr>,
    ) -> EnumerationId {
        let id = EnumerationId::new(self.enumerations.len());
        self.enumerations.push(Enumeration {
            name: name.into(),
            element_id: new_element_id(),
            namespace,
            literals,
        });
        self.namespaces[namespace.index()].enumerations.push(id);
        id
    }

    /// Materialize an association and record it on its owner concept.
    pub fn new_association(
        &mut self,
        owner: ConceptId,
        target: ConceptId,
        owner_end: AssociationEnd,
        target_end: AssociationEnd,
    ) -> AssociationId {
        let id = AssociationId::new(self.associations.len());
        self.associations.push(Association {
            element_id: new_element_id(),
            owner,
            target,
            owner_end,
            target_end,
            docs: Vec::new(),
        });
        self.concepts[owner.index()].associations.push(id);
        id
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    pub fn namespace_mut(&mut self, id: NamespaceId) -> &mut Namespace {
        &mut self.namespaces[id.index()]
    }

    pub fn concept(&self, id: ConceptId) -> &Concept {
        &self.concepts[id.index()]
    }

    pub fn concept_mut(&mut self, id: ConceptId) -> &mut Concept {
        &mut self.concepts[id.index()]
    }

    pub fn enumeration(&self, id: EnumerationId) -> &Enumeration {
        &self.enumerations[id.index()]
    }

    pub fn association(&self, id: AssociationId) -> &Association {
        &self.associations[id.index()]
    }

    pub fn association_mut(&mut self, id: AssociationId) -> &mut Association {
        &mut self.associations[id.index()]
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (NamespaceId, &Namespace)> {
        self.namespaces
            .iter()
            .enumerate()
            .map(|(i, n)| (NamespaceId::new(i), n))
    }

    pub fn concepts(&self) -> impl Iterator<Item = (ConceptId, &Concept)> {
        self.concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (ConceptId::new(i), c))
    }

    pub fn enumerations(&self) -> impl Iterator<Item = (EnumerationId, &Enumeration)> {
        self.enumerations
            .iter()
            .enumerate()
            .map(|(i, e)| (EnumerationId::new(i), e))
    }

    pub fn associations(&self) -> impl Iterator<Item = (AssociationId, &Association)> {
        self.associations
            .iter()
            .enumerate()
            .map(|(i, a)| (AssociationId::new(i), a))
    }

    /// Find a concept by display name (first match in creation order).
    pub fn concept_named(&self, name: &str) -> Option<ConceptId> {
        self.concepts()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id)
    }

    /// Find a direct child namespace by name.
    pub fn child_namespace(&self, parent: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.namespace(parent)
            .namespaces
            .iter()
            .copied()
            .find(|id| self.namespace(*id).name == name)
    }

    /// Associations owned by the given concept.
    pub fn associations_of(&self, owner: ConceptId) -> impl Iterator<Item = &Association> {
        self.concept(owner)
            .associations
            .iter()
            .map(|id| self.association(*id))
    }
}
