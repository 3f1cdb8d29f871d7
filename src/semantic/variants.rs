//! `oneOf`/`anyOf` variant hierarchy synthesis.
//!
//! A variant set becomes an abstract "Option" concept with one generated,
//! letter-suffixed subclass per alternative. In property position the owner
//! additionally gets an association to the option concept (`oneOf`: exactly
//! one; `anyOf`: one-to-many; array items: array-style bounds). At the top
//! level the concept under analysis is itself the hierarchy root.

use serde_json::Value;
use smol_str::SmolStr;

use crate::base::capitalize;
use crate::model::{AssociationId, ConceptId, Multiplicity};

use super::analyzer::{AnalyzeError, Analyzer, Ctx};

impl Analyzer {
    /// Variant set in property (or array items) position: synthesize the
    /// abstract option concept, its subclasses, and the owning association.
    pub(super) fn analyze_variant_property(
        &mut self,
        ctx: &Ctx,
        owner: ConceptId,
        property: &str,
        options: &[Value],
        owner_multiplicity: Multiplicity,
    ) -> Result<AssociationId, AnalyzeError> {
        let base = format!("{}Option", capitalize(property));
        let option_concept = self.model.new_concept(SmolStr::new(&base), ctx.namespace);
        self.model.concept_mut(option_concept).is_abstract = true;

        let association =
            self.object_association(owner, property, option_concept, owner_multiplicity);
        self.analyze_variant_options(ctx, option_concept, &base, options)?;
        Ok(association)
    }

    /// Variant set at the top level of a concept: the concept itself is the
    /// hierarchy root and no association is synthesized.
    pub(super) fn analyze_variant_root(
        &mut self,
        ctx: &Ctx,
        holder: ConceptId,
        options: &[Value],
    ) -> Result<(), AnalyzeError> {
        let base = format!("{}Option", self.model.concept(holder).name);
        self.analyze_variant_options(ctx, holder, &base, options)
    }

    /// Generate one subclass per alternative, each with a superclass edge to
    /// `holder`.
    fn analyze_variant_options(
        &mut self,
        ctx: &Ctx,
        holder: ConceptId,
        base: &str,
        options: &[Value],
    ) -> Result<(), AnalyzeError> {
        for (index, option) in options.iter().enumerate() {
            let Some(option_obj) = option.as_object() else {
                continue;
            };
            let name = format!("{base}{}", option_suffix(index));

            let subclass = if option_obj.contains_key("type") || option_obj.contains_key("$ref") {
                // Inline alternative with no schema header: wrap its rules
                // in a synthetic attribute.
                let subclass = self.model.new_concept(SmolStr::new(&name), ctx.namespace);
                self.analyze_property(ctx, subclass, "optionAttribute", option_obj)?;
                subclass
            } else if option_obj.contains_key("properties") {
                // A full schema definition (with headers like `title`).
                self.analyze_object(ctx, &name, option_obj, None)?
            } else {
                tracing::trace!("variant option {index} of '{base}' has no usable shape, skipped");
                continue;
            };

            self.model.concept_mut(subclass).superclasses.push(holder);
        }
        Ok(())
    }
}

/// Sequential suffix for generated option subclasses: `A`..`Z`, then `AA`,
/// `AB`, …
fn option_suffix(index: usize) -> SmolStr {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut out = Vec::new();
    let mut remaining = index;
    loop {
        out.push(ALPHABET[remaining % 26]);
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }
    out.reverse();
    SmolStr::new(std::str::from_utf8(&out).expect("ASCII alphabet"))
}
