//! Recursive-descent semantic analysis of JSON Schema documents.
//!
//! The analyzer walks one document at a time, classifying each node (see
//! [`super::node`]) and materializing concepts, properties, associations,
//! enumerations, and constraints. Cross-document and forward references are
//! never chased during the walk — they are recorded as pending edges and
//! bound by the deferred resolution pass when [`Analyzer::finish`] runs.
//!
//! Traversal context (current namespace, enclosing document identity) is an
//! explicit [`Ctx`] value threaded through the recursive calls, so sibling
//! calls cannot observe each other's state.

use std::path::{Path, PathBuf};

use serde_json::Value;
use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{MalformedReferenceError, SchemaReference, capitalize};
use crate::model::{
    AssociationEnd, AssociationId, ConceptId, Model, Multiplicity, NamespaceId, PrimitiveKind,
    Property, PropertyType,
};

use super::constraints;
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::node::{self, JsonObject, PrimitiveName, SchemaNode, classify};
use super::resolver::{self, PendingAssociationEdge, PendingEdges, PendingSuperclassEdge};
use super::symbol_table::{DuplicateConceptError, SymbolTable};

/// Model name used when the caller does not provide one.
pub const DEFAULT_MODEL_NAME: &str = "test";

/// Errors that abort more than a single document.
///
/// `MalformedReference` never escapes a run: it is caught at the document
/// boundary, recorded as a diagnostic, and the run continues with the next
/// document. `DuplicateConcept` is an internal invariant violation and
/// propagates to the caller.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    MalformedReference(#[from] MalformedReferenceError),
    #[error(transparent)]
    DuplicateConcept(#[from] DuplicateConceptError),
    #[error("input path does not exist: {}", .0.display())]
    InvalidInput(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The finished result of a run: the model, the lookup-complete symbol
/// table, and every diagnostic collected along the way.
#[derive(Debug)]
pub struct Analysis {
    pub model: Model,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Immutable traversal context threaded through recursive calls.
#[derive(Clone)]
pub(crate) struct Ctx {
    /// Namespace receiving concepts created by the current call.
    pub namespace: NamespaceId,
    /// Identity of the enclosing document; `definitions` references derive
    /// from it.
    pub document: SchemaReference,
}

/// What a property expansion produced, for follow-up attachment of
/// documentation, nullability, and outer cardinality bounds.
enum Created {
    /// Index into the owner's property vector.
    Attribute(usize),
    Association(AssociationId),
    Nothing,
}

/// The schema semantic analyzer.
///
/// Feed it documents (via [`crate::project::WorkspaceLoader`] or
/// [`Analyzer::analyze_value`]), then call [`Analyzer::finish`] exactly once
/// to run the deferred resolution pass and obtain the [`Analysis`].
pub struct Analyzer {
    pub(super) model: Model,
    pub(super) symbols: SymbolTable,
    pub(super) pending: PendingEdges,
    pub(super) diagnostics: DiagnosticCollector,
}

impl Analyzer {
    pub fn new(model_name: &str) -> Self {
        Self {
            model: Model::new(model_name),
            symbols: SymbolTable::new(),
            pending: PendingEdges::default(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// The model as analyzed so far (pending edges not yet bound).
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub(crate) fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut DiagnosticCollector {
        &mut self.diagnostics
    }

    /// Analyze an in-memory document under the root namespace.
    ///
    /// `name` plays the role of the file name for concept naming and
    /// document identity; a declared root `id` overrides it.
    pub fn analyze_value(&mut self, name: &str, document: &Value) -> Result<(), AnalyzeError> {
        let reference = SchemaReference::from_segments([name])?;
        let namespace = self.model.root();
        self.analyze_document(None, reference, namespace, document)
    }

    /// Run the deferred resolution pass and hand over the finished model.
    ///
    /// Consuming `self` makes re-entering the pass impossible.
    pub fn finish(mut self) -> Analysis {
        let edges = std::mem::take(&mut self.pending);
        resolver::resolve(&mut self.model, &self.symbols, edges, &mut self.diagnostics);
        Analysis {
            model: self.model,
            symbols: self.symbols,
            diagnostics: self.diagnostics.take(),
        }
    }

    // ------------------------------------------------------------------
    // Document analysis
    // ------------------------------------------------------------------

    /// Analyze one parsed document. Per-document failures (root not an
    /// object, malformed `id`/`$ref`) are recorded and skipped; only
    /// internal invariant violations propagate.
    pub(crate) fn analyze_document(
        &mut self,
        path: Option<&Path>,
        document: SchemaReference,
        namespace: NamespaceId,
        value: &Value,
    ) -> Result<(), AnalyzeError> {
        let label = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(document.raw()),
        };
        let Some(root) = value.as_object() else {
            self.diagnostics
                .invalid_document(&label, "the document root is not a JSON object");
            return Ok(());
        };

        // A declared `id` overrides the location-derived name and identity.
        let (name, document) = match node::string_field(root, "id") {
            Some(id) => match SchemaReference::parse(id) {
                Ok(parsed) => (parsed.digest_id_name(), parsed),
                Err(error) => {
                    self.diagnostics
                        .malformed_reference(Some(&label), &error.to_string());
                    return Ok(());
                }
            },
            None => (document.digest_id_name(), document),
        };

        tracing::debug!("analyzing document '{document}' as '{name}'");
        let ctx = Ctx {
            namespace,
            document,
        };
        let register = Some(ctx.document.clone());
        match self.analyze_root_schema(&ctx, &name, root, register) {
            Err(AnalyzeError::MalformedReference(error)) => {
                self.diagnostics
                    .malformed_reference(Some(&label), &error.to_string());
                Ok(())
            }
            other => other,
        }
    }

    /// Analyze a root schema element: the document root or a `definitions`
    /// entry, both of which follow the same name-derivation rule.
    fn analyze_root_schema(
        &mut self,
        ctx: &Ctx,
        name: &str,
        obj: &JsonObject,
        register: Option<SchemaReference>,
    ) -> Result<(), AnalyzeError> {
        match classify(obj) {
            Some(SchemaNode::Reference(reference)) => {
                tracing::trace!("root '{name}' is a bare reference to '{reference}', skipped");
            }
            Some(_) => {
                self.analyze_object(ctx, name, obj, register)?;
            }
            None => {}
        }

        // Each definition is an independent root schema.
        if let Some(Value::Object(definitions)) = obj.get("definitions") {
            for (key, value) in definitions {
                if let Some(definition) = value.as_object() {
                    let reference = ctx.document.definition(key);
                    self.analyze_root_schema(ctx, key, definition, Some(reference))?;
                }
            }
        }
        Ok(())
    }

    /// Materialize a concept for an object-shaped schema node.
    ///
    /// The concept is registered in the symbol table (when it has an
    /// authoritative reference) before its content is expanded, so
    /// recursive references resolve.
    pub(super) fn analyze_object(
        &mut self,
        ctx: &Ctx,
        name: &str,
        obj: &JsonObject,
        register: Option<SchemaReference>,
    ) -> Result<ConceptId, AnalyzeError> {
        let concept = self.model.new_concept(capitalize(name), ctx.namespace);
        tracing::debug!("created concept '{}'", self.model.concept(concept).name);

        if let Some(title) = node::string_field(obj, "title") {
            self.model
                .concept_mut(concept)
                .docs
                .push(format!("Title: {title}"));
        }
        if let Some(description) = node::string_field(obj, "description") {
            self.model
                .concept_mut(concept)
                .docs
                .push(format!("Description: {description}"));
        }

        if let Some(reference) = register {
            self.symbols.register(reference, concept)?;
        }

        match classify(obj) {
            Some(SchemaNode::AllOf(elements)) => {
                // `$ref` elements become superclasses, `properties` elements
                // compose into this concept directly.
                for element in elements {
                    let Some(element) = element.as_object() else {
                        continue;
                    };
                    if let Some(reference) = node::string_field(element, "$ref") {
                        let target = SchemaReference::parse(reference)?;
                        self.pending.superclasses.push(PendingSuperclassEdge {
                            owner: concept,
                            target,
                        });
                    } else if let Some(properties) = node::properties_of(element) {
                        self.expand_properties(ctx, concept, properties)?;
                    }
                }
            }
            Some(SchemaNode::OneOf(options)) | Some(SchemaNode::AnyOf(options)) => {
                // Top-level variant set: the concept itself holds the
                // hierarchy, no association is synthesized.
                self.analyze_variant_root(ctx, concept, options)?;
            }
            Some(SchemaNode::Object(properties)) => {
                if let Some(properties) = properties {
                    self.expand_properties(ctx, concept, properties)?;
                }
            }
            Some(SchemaNode::Enum(_)) | Some(SchemaNode::Primitive(_)) | Some(SchemaNode::Array) => {
                // The element is not really an object: wrap its own
                // type/validation rules in a single attribute.
                let attribute = format!("{}Attribute", self.model.concept(concept).name);
                self.analyze_property(ctx, concept, &attribute, obj)?;
            }
            Some(SchemaNode::Reference(reference)) => {
                tracing::trace!("'{name}' is a bare reference to '{reference}', nothing to expand");
            }
            None => {}
        }

        self.apply_required(concept, obj);
        Ok(concept)
    }

    fn expand_properties(
        &mut self,
        ctx: &Ctx,
        concept: ConceptId,
        properties: &JsonObject,
    ) -> Result<(), AnalyzeError> {
        for (name, value) in properties {
            if let Some(schema) = value.as_object() {
                self.analyze_property(ctx, concept, name, schema)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Property expansion
    // ------------------------------------------------------------------

    pub(super) fn analyze_property(
        &mut self,
        ctx: &Ctx,
        owner: ConceptId,
        name: &str,
        obj: &JsonObject,
    ) -> Result<(), AnalyzeError> {
        let nullable = node::is_nullable(obj);
        let created = match classify(obj) {
            Some(SchemaNode::Enum(values)) => Created::Attribute(self.enum_attribute(
                ctx,
                owner,
                name,
                values,
                Multiplicity::optional(),
            )),
            Some(SchemaNode::Primitive(primitive)) => {
                self.primitive_attribute(owner, name, primitive, obj)
            }
            Some(SchemaNode::Object(_)) => {
                // Object-valued properties nest as their own concept plus an
                // association, rather than embedding.
                let target = self.analyze_object(ctx, name, obj, None)?;
                Created::Association(self.object_association(
                    owner,
                    name,
                    target,
                    Multiplicity::optional(),
                ))
            }
            Some(SchemaNode::Array) => self.analyze_array_property(ctx, owner, name, obj)?,
            Some(SchemaNode::Reference(reference)) => {
                self.push_pending_reference(owner, name, reference, Multiplicity::optional())?;
                Created::Nothing
            }
            Some(SchemaNode::OneOf(options)) => Created::Association(
                self.analyze_variant_property(ctx, owner, name, options, Multiplicity::one())?,
            ),
            Some(SchemaNode::AnyOf(options)) => {
                Created::Association(self.analyze_variant_property(
                    ctx,
                    owner,
                    name,
                    options,
                    Multiplicity::at_least_one(),
                )?)
            }
            Some(SchemaNode::AllOf(_)) => {
                tracing::debug!("`allOf` in property position is not supported, '{name}' skipped");
                Created::Nothing
            }
            None => {
                tracing::trace!("property '{name}' carries no recognized schema shape, skipped");
                Created::Nothing
            }
        };

        match created {
            Created::Attribute(index) => {
                let property = &mut self.model.concept_mut(owner).properties[index];
                property.nullable = nullable;
                if let Some(description) = node::string_field(obj, "description") {
                    property.docs.push(format!("Description: {description}"));
                }
            }
            Created::Association(id) => {
                if let Some(description) = node::string_field(obj, "description") {
                    self.model
                        .association_mut(id)
                        .docs
                        .push(format!("Description: {description}"));
                }
            }
            Created::Nothing => {}
        }
        Ok(())
    }

    fn primitive_attribute(
        &mut self,
        owner: ConceptId,
        name: &str,
        primitive: PrimitiveName,
        obj: &JsonObject,
    ) -> Created {
        let concept_name = self.model.concept(owner).name.clone();
        let kind = match primitive {
            PrimitiveName::String => {
                let constraints = constraints::string_constraints(&concept_name, name, obj);
                self.model.concept_mut(owner).constraints.extend(constraints);
                if node::string_field(obj, "format") == Some("date-time") {
                    PrimitiveKind::Date
                } else {
                    PrimitiveKind::String
                }
            }
            PrimitiveName::Integer | PrimitiveName::Number => {
                let constraints = constraints::numeric_constraints(&concept_name, name, obj);
                self.model.concept_mut(owner).constraints.extend(constraints);
                PrimitiveKind::Integer
            }
            PrimitiveName::Boolean => PrimitiveKind::Boolean,
        };
        Created::Attribute(self.push_attribute(
            owner,
            name,
            PropertyType::Primitive(kind),
            Multiplicity::optional(),
        ))
    }

    /// Expand an array-typed property by inspecting its `items` sub-schema.
    fn analyze_array_property(
        &mut self,
        ctx: &Ctx,
        owner: ConceptId,
        name: &str,
        obj: &JsonObject,
    ) -> Result<Created, AnalyzeError> {
        // When `items` is itself an array, only the first element counts (a
        // multi-valued property cannot carry multiple types).
        let items = match obj.get("items") {
            Some(Value::Array(elements)) => elements.first().and_then(Value::as_object),
            Some(Value::Object(items)) => Some(items),
            _ => None,
        };
        let Some(items) = items else {
            tracing::debug!("array property '{name}' has no usable `items` schema, skipped");
            return Ok(Created::Nothing);
        };

        let outer_lower = node::u32_field(obj, "minItems");
        let outer_upper = node::u32_field(obj, "maxItems");
        let element_multiplicity = Multiplicity::new(outer_lower.unwrap_or(0), outer_upper);

        let created = match classify(items) {
            Some(SchemaNode::Enum(values)) => Created::Attribute(self.enum_attribute(
                ctx,
                owner,
                name,
                values,
                Multiplicity::many(),
            )),
            Some(SchemaNode::Primitive(PrimitiveName::String)) => {
                Created::Attribute(self.push_attribute(
                    owner,
                    name,
                    PropertyType::Primitive(PrimitiveKind::String),
                    Multiplicity::many(),
                ))
            }
            Some(SchemaNode::Primitive(PrimitiveName::Integer | PrimitiveName::Number)) => {
                Created::Attribute(self.push_attribute(
                    owner,
                    name,
                    PropertyType::Primitive(PrimitiveKind::Integer),
                    Multiplicity::many(),
                ))
            }
            Some(SchemaNode::OneOf(options)) | Some(SchemaNode::AnyOf(options)) => {
                Created::Association(self.analyze_variant_property(
                    ctx,
                    owner,
                    name,
                    options,
                    element_multiplicity,
                )?)
            }
            Some(SchemaNode::Object(Some(_))) => {
                // An array of objects defines an inner concept.
                let target = self.analyze_object(ctx, name, items, None)?;
                Created::Association(self.object_association(
                    owner,
                    name,
                    target,
                    element_multiplicity,
                ))
            }
            Some(SchemaNode::Reference(reference)) => {
                self.push_pending_reference(owner, name, reference, element_multiplicity)?;
                Created::Nothing
            }
            Some(SchemaNode::AllOf(_)) => {
                tracing::debug!("`allOf` inside array items is not supported, '{name}' skipped");
                Created::Nothing
            }
            Some(SchemaNode::Primitive(PrimitiveName::Boolean))
            | Some(SchemaNode::Object(None))
            | Some(SchemaNode::Array)
            | None => {
                tracing::trace!("array property '{name}' has items the analyzer does not map");
                Created::Nothing
            }
        };

        // Explicit bounds on the outer property tighten the already-created
        // attribute once the element kind is resolved.
        if let Created::Attribute(index) = created {
            let property = &mut self.model.concept_mut(owner).properties[index];
            if let Some(upper) = outer_upper {
                property.multiplicity.upper = Some(upper);
            }
            if let Some(lower) = outer_lower {
                property.multiplicity.lower = lower;
            }
        }
        Ok(created)
    }

    // ------------------------------------------------------------------
    // Element helpers
    // ------------------------------------------------------------------

    /// Append an attribute, keeping property names unique per concept.
    pub(super) fn push_attribute(
        &mut self,
        owner: ConceptId,
        name: &str,
        ty: PropertyType,
        multiplicity: Multiplicity,
    ) -> usize {
        let concept = self.model.concept_mut(owner);
        if let Some(index) = concept.properties.iter().position(|p| p.name == name) {
            tracing::trace!(
                "property '{name}' redeclared on '{}', keeping the first declaration",
                concept.name
            );
            return index;
        }
        concept
            .properties
            .push(Property::new(SmolStr::new(name), ty, multiplicity));
        concept.properties.len() - 1
    }

    /// Create the `<property>Enum` enumeration and an attribute typed by it.
    pub(super) fn enum_attribute(
        &mut self,
        ctx: &Ctx,
        owner: ConceptId,
        name: &str,
        values: &[Value],
        multiplicity: Multiplicity,
    ) -> usize {
        let literals = values
            .iter()
            .map(|value| match value {
                Value::String(literal) => SmolStr::new(literal),
                other => SmolStr::new(other.to_string()),
            })
            .collect();
        let enumeration = self
            .model
            .new_enumeration(format!("{name}Enum"), ctx.namespace, literals);
        self.push_attribute(
            owner,
            name,
            PropertyType::Enumeration(enumeration),
            multiplicity,
        )
    }

    /// Association from `owner` to a locally analyzed concept.
    pub(super) fn object_association(
        &mut self,
        owner: ConceptId,
        property: &str,
        target: ConceptId,
        owner_multiplicity: Multiplicity,
    ) -> AssociationId {
        let owner_name = self.model.concept(owner).name.clone();
        self.model.new_association(
            owner,
            target,
            AssociationEnd::new(property, owner_multiplicity).navigable(),
            AssociationEnd::new(owner_name, Multiplicity::one()),
        )
    }

    /// Record a `$ref`-valued property as a pending association edge,
    /// composite on the owner side.
    fn push_pending_reference(
        &mut self,
        owner: ConceptId,
        property: &str,
        raw: &str,
        multiplicity: Multiplicity,
    ) -> Result<(), AnalyzeError> {
        let target = SchemaReference::parse(raw)?;
        tracing::trace!("pending association '{property}' -> '{target}'");
        self.pending.associations.push(PendingAssociationEdge {
            owner,
            owner_end: AssociationEnd::new(property, multiplicity)
                .navigable()
                .composite(),
            target_end: AssociationEnd::new(target.display_name(), Multiplicity::one()),
            target,
        });
        Ok(())
    }

    /// `required` pins the lower bound of the listed properties to 1.
    /// Multi-valued properties (upper bound absent or above 1) are left
    /// untouched.
    fn apply_required(&mut self, concept: ConceptId, obj: &JsonObject) {
        let Some(Value::Array(required)) = obj.get("required") else {
            return;
        };
        for name in required.iter().filter_map(Value::as_str) {
            let properties = &mut self.model.concept_mut(concept).properties;
            if let Some(property) = properties.iter_mut().find(|p| p.name == name) {
                if matches!(property.multiplicity.upper, Some(upper) if upper <= 1) {
                    property.multiplicity.lower = 1;
                }
            }
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_NAME)
    }
}
