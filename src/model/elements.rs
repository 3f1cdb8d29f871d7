//! Model element types: namespaces, concepts, properties, associations,
//! enumerations, and constraints.

use serde::Serialize;
use smol_str::SmolStr;

use super::{AssociationId, ConceptId, EnumerationId, NamespaceId};

// ============================================================================
// MULTIPLICITY
// ============================================================================

/// Lower/upper cardinality bounds of a property or association end.
///
/// `upper == None` means unbounded. Invariant: `lower <= upper` whenever the
/// upper bound is present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    pub fn new(lower: u32, upper: Option<u32>) -> Self {
        Self { lower, upper }
    }

    /// `0..1`
    pub fn optional() -> Self {
        Self::new(0, Some(1))
    }

    /// `1..1`
    pub fn one() -> Self {
        Self::new(1, Some(1))
    }

    /// `0..*`
    pub fn many() -> Self {
        Self::new(0, None)
    }

    /// `1..*`
    pub fn at_least_one() -> Self {
        Self::new(1, None)
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper.is_none()
    }

    /// True when more than one value can be held.
    pub fn is_multivalued(&self) -> bool {
        match self.upper {
            None => true,
            Some(upper) => upper > 1,
        }
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{}..{}", self.lower, upper),
            None => write!(f, "{}..*", self.lower),
        }
    }
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// The closed set of primitive value types the analyzer produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    String,
    Integer,
    Boolean,
    Date,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
        }
    }
}

// ============================================================================
// NAMESPACES
// ============================================================================

/// A node in the namespace tree mirroring the folder structure of the corpus.
///
/// Owns concepts and enumerations; exactly one root namespace exists per run.
#[derive(Clone, Debug, Serialize)]
pub struct Namespace {
    pub name: SmolStr,
    pub parent: Option<NamespaceId>,
    pub namespaces: Vec<NamespaceId>,
    pub concepts: Vec<ConceptId>,
    pub enumerations: Vec<EnumerationId>,
}

impl Namespace {
    pub(super) fn new(name: SmolStr, parent: Option<NamespaceId>) -> Self {
        Self {
            name,
            parent,
            namespaces: Vec::new(),
            concepts: Vec::new(),
            enumerations: Vec::new(),
        }
    }
}

// ============================================================================
// CONCEPTS AND PROPERTIES
// ============================================================================

/// A class-like model element produced from a schema object type.
#[derive(Clone, Debug, Serialize)]
pub struct Concept {
    pub name: SmolStr,
    /// Stable identity for interchange with external persistence tools.
    pub element_id: SmolStr,
    pub namespace: NamespaceId,
    /// Abstract concepts are the synthesized roots of variant hierarchies.
    pub is_abstract: bool,
    /// Declaration-ordered; names are unique within a concept.
    pub properties: Vec<Property>,
    pub superclasses: Vec<ConceptId>,
    pub constraints: Vec<Constraint>,
    /// Associations owned by (outgoing from) this concept.
    pub associations: Vec<AssociationId>,
    /// Free-text annotations (`Title: …`, `Description: …`).
    pub docs: Vec<String>,
}

/// The value type of a [`Property`].
///
/// Object-valued and array-of-object properties become [`Association`]s
/// rather than properties, so only primitives and enumerations appear here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PropertyType {
    Primitive(PrimitiveKind),
    Enumeration(EnumerationId),
}

/// An attribute of a [`Concept`].
#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub name: SmolStr,
    pub ty: PropertyType,
    pub multiplicity: Multiplicity,
    /// Declared nullable via a trailing `"null"` type entry. Metadata only;
    /// does not alter the declared cardinality.
    pub nullable: bool,
    pub docs: Vec<String>,
}

impl Property {
    pub fn new(name: SmolStr, ty: PropertyType, multiplicity: Multiplicity) -> Self {
        Self {
            name,
            ty,
            multiplicity,
            nullable: false,
            docs: Vec::new(),
        }
    }
}

// ============================================================================
// ASSOCIATIONS
// ============================================================================

/// One end of an [`Association`].
#[derive(Clone, Debug, Serialize)]
pub struct AssociationEnd {
    pub name: SmolStr,
    pub multiplicity: Multiplicity,
    pub composite: bool,
    pub navigable: bool,
}

impl AssociationEnd {
    pub fn new(name: impl Into<SmolStr>, multiplicity: Multiplicity) -> Self {
        Self {
            name: name.into(),
            multiplicity,
            composite: false,
            navigable: false,
        }
    }

    pub fn navigable(mut self) -> Self {
        self.navigable = true;
        self
    }

    pub fn composite(mut self) -> Self {
        self.composite = true;
        self
    }
}

/// A typed, directed relationship from an owner concept to a target concept
/// (possibly the Unknown placeholder).
///
/// Owned by the source concept; the target is referenced, never owned.
#[derive(Clone, Debug, Serialize)]
pub struct Association {
    pub element_id: SmolStr,
    pub owner: ConceptId,
    pub target: ConceptId,
    pub owner_end: AssociationEnd,
    pub target_end: AssociationEnd,
    pub docs: Vec<String>,
}

// ============================================================================
// ENUMERATIONS
// ============================================================================

/// A named closed set of literal values, owned by the namespace in which the
/// declaring property appears.
#[derive(Clone, Debug, Serialize)]
pub struct Enumeration {
    pub name: SmolStr,
    pub element_id: SmolStr,
    pub namespace: NamespaceId,
    /// Literals in declaration order.
    pub literals: Vec<SmolStr>,
}

// ============================================================================
// CONSTRAINTS
// ============================================================================

/// The kind of a validation constraint, mapped from the JSON Schema keyword
/// that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConstraintKind {
    MaxLength,
    MinLength,
    MultipleOf,
    Maximum,
    ExclusiveMaximum,
    Minimum,
    ExclusiveMinimum,
}

impl ConstraintKind {
    /// Suffix used in the derived constraint name.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::MaxLength => "maxLengthConstraint",
            Self::MinLength => "minLengthConstraint",
            Self::MultipleOf => "multipleOfConstraint",
            Self::Maximum => "maximumConstraint",
            Self::ExclusiveMaximum => "exclusiveMaximumConstraint",
            Self::Minimum => "minimumConstraint",
            Self::ExclusiveMinimum => "exclusiveMinimumConstraint",
        }
    }
}

/// A named validation rule attached to a concept, expressed as OCL-style
/// constraint text.
#[derive(Clone, Debug, Serialize)]
pub struct Constraint {
    /// `<Concept>-<property>-<kind suffix>`; unique per concept.
    pub name: SmolStr,
    pub kind: ConstraintKind,
    pub expression: String,
}

impl Constraint {
    pub fn new(
        concept_name: &str,
        property_name: &str,
        kind: ConstraintKind,
        expression: String,
    ) -> Self {
        Self {
            name: SmolStr::new(format!(
                "{concept_name}-{property_name}-{}",
                kind.suffix()
            )),
            kind,
            expression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicity_display() {
        assert_eq!(Multiplicity::optional().to_string(), "0..1");
        assert_eq!(Multiplicity::many().to_string(), "0..*");
        assert_eq!(Multiplicity::new(2, Some(5)).to_string(), "2..5");
    }

    #[test]
    fn test_multiplicity_multivalued() {
        assert!(Multiplicity::many().is_multivalued());
        assert!(Multiplicity::new(0, Some(3)).is_multivalued());
        assert!(!Multiplicity::one().is_multivalued());
    }

    #[test]
    fn test_constraint_name() {
        let c = Constraint::new(
            "Person",
            "age",
            ConstraintKind::Minimum,
            "self.age >= 0".to_string(),
        );
        assert_eq!(c.name, "Person-age-minimumConstraint");
    }
}
