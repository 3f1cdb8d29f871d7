//! # skema-base
//!
//! Core library for JSON Schema semantic analysis and class-model discovery.
//!
//! Given a schema document (or a folder corpus of them), skema builds an
//! object/class model: concepts, properties, associations, enumerations,
//! inheritance, and validation constraints. References between schemas are
//! not required to be declared before use, so analysis runs in two phases —
//! observe-and-register, then a deferred bind-and-resolve pass over the
//! completed symbol table.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → corpus loading, validation seam, folder → namespace mapping
//!   ↓
//! semantic  → analyzer, symbol table, pending edges, resolution pass
//!   ↓
//! model     → class-diagram-shaped output model (arena storage)
//!   ↓
//! base      → SchemaReference, name derivation
//! ```

// ============================================================================
// MODULES (dependency order: base → model → semantic → project)
// ============================================================================

/// Foundation types: SchemaReference, name derivation
pub mod base;

/// The class-diagram-shaped output model
pub mod model;

/// Semantic analysis: two-phase schema walking and reference resolution
pub mod semantic;

/// Project management: corpus loading, validation seam
pub mod project;

// Re-export the common entry points
pub use base::{MalformedReferenceError, SchemaReference};
pub use model::Model;
pub use project::WorkspaceLoader;
pub use semantic::{Analysis, AnalyzeError, Analyzer, DEFAULT_MODEL_NAME};

use std::path::Path;

/// Analyze a schema document or folder corpus and return the finished model.
///
/// Folders are traversed recursively, each subfolder becoming a nested
/// namespace. Invalid documents are skipped and reported through
/// [`Analysis::diagnostics`].
pub fn analyze_path(path: impl AsRef<Path>, model_name: &str) -> Result<Analysis, AnalyzeError> {
    let mut analyzer = Analyzer::new(model_name);
    WorkspaceLoader::new().load_path_into(path.as_ref(), &mut analyzer)?;
    Ok(analyzer.finish())
}
