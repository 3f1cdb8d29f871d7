//! Canonical schema references.
//!
//! A [`SchemaReference`] is the normalized identity of a schema document, or
//! of a definition inside one, derived from an `id` declaration or a `$ref`
//! string. It is the sole key used by the symbol table and the pending-edge
//! arenas: two references denote the same target iff their document and
//! fragment segments match, regardless of how the raw string was spelled.

use std::fmt;
use std::hash::{Hash, Hasher};

use smol_str::SmolStr;
use thiserror::Error;

/// An `id`/`$ref` string with no usable path or fragment segments.
///
/// Fatal to the schema document being analyzed, not to the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed schema reference '{0}': no usable segments")]
pub struct MalformedReferenceError(pub String);

/// Canonical (document, fragment) identity of a schema element.
///
/// The raw spelling is kept for display and diagnostics only; it does not
/// participate in equality or hashing, because the same target can be spelled
/// with or without a leading document path.
#[derive(Debug, Clone)]
pub struct SchemaReference {
    raw: String,
    document: Vec<SmolStr>,
    fragment: Vec<SmolStr>,
}

impl SchemaReference {
    /// Parse a raw `id` or `$ref` string into its canonical form.
    ///
    /// The document part is split on path separators and the fragment part
    /// (introduced by `#`) on `/`; empty segments are discarded. A string
    /// that yields no segments at all is malformed.
    pub fn parse(raw: &str) -> Result<Self, MalformedReferenceError> {
        let (document_part, fragment_part) = match raw.split_once('#') {
            Some((doc, frag)) => (doc, frag),
            None => (raw, ""),
        };

        let document: Vec<SmolStr> = document_part
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .map(SmolStr::new)
            .collect();
        let fragment: Vec<SmolStr> = fragment_part
            .split('/')
            .filter(|s| !s.is_empty())
            .map(SmolStr::new)
            .collect();

        if document.is_empty() && fragment.is_empty() {
            return Err(MalformedReferenceError(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            document,
            fragment,
        })
    }

    /// Build a document reference from path segments (no fragment).
    ///
    /// Used for documents identified by their location in the corpus rather
    /// than by a declared `id`.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, MalformedReferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let document: Vec<SmolStr> = segments
            .into_iter()
            .map(|s| SmolStr::new(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        if document.is_empty() {
            return Err(MalformedReferenceError(String::new()));
        }
        let raw = document
            .iter()
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            raw,
            document,
            fragment: Vec::new(),
        })
    }

    /// Derive the reference of a `definitions` entry of this document.
    pub fn definition(&self, key: &str) -> SchemaReference {
        SchemaReference {
            raw: format!("{}#/definitions/{key}", self.raw),
            document: self.document.clone(),
            fragment: vec![SmolStr::new("definitions"), SmolStr::new(key)],
        }
    }

    /// The raw string this reference was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized document path segments.
    pub fn document(&self) -> &[SmolStr] {
        &self.document
    }

    /// Normalized fragment segments.
    pub fn fragment(&self) -> &[SmolStr] {
        &self.fragment
    }

    pub fn has_fragment(&self) -> bool {
        !self.fragment.is_empty()
    }

    /// Display name derived from the last document path segment, with any
    /// extension suffix removed (`address.schema.json` → `address`).
    pub fn digest_name(&self) -> Option<SmolStr> {
        self.document.last().map(|s| strip_extension(s))
    }

    /// Display name derived from the last fragment segment. Used when a
    /// reference targets a `definitions` entry.
    pub fn digest_fragment_name(&self) -> Option<SmolStr> {
        self.fragment.last().cloned()
    }

    /// Display name for a document's own declared `id`: the fragment name if
    /// the `id` carries one, otherwise the document name.
    ///
    /// Construction guarantees at least one segment, so this never fails.
    pub fn digest_id_name(&self) -> SmolStr {
        self.digest_fragment_name()
            .or_else(|| self.digest_name())
            .expect("a schema reference has at least one segment")
    }

    /// Preferred display name of the referenced element.
    pub fn display_name(&self) -> SmolStr {
        self.digest_id_name()
    }
}

fn strip_extension(segment: &str) -> SmolStr {
    match segment.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => SmolStr::new(stem),
        _ => SmolStr::new(segment),
    }
}

impl PartialEq for SchemaReference {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document && self.fragment == other.fragment
    }
}

impl Eq for SchemaReference {}

impl Hash for SchemaReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
        self.fragment.hash(state);
    }
}

impl fmt::Display for SchemaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
