//! Corpus traversal: files and folders into the analyzer.
//!
//! A folder corpus is traversed recursively in file-name order; each
//! subfolder becomes a nested namespace named after it. Documents that fail
//! to parse or to validate are skipped with a diagnostic and the traversal
//! continues with the next sibling.

use std::path::Path;

use smol_str::SmolStr;

use crate::base::SchemaReference;
use crate::model::NamespaceId;
use crate::semantic::{AnalyzeError, Analyzer};

use super::file_loader;
use super::validator::{DocumentValidator, MetaSchemaCheck};

/// Feeds a schema corpus from disk into an [`Analyzer`].
pub struct WorkspaceLoader {
    validator: Box<dyn DocumentValidator>,
}

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self::with_validator(Box::new(MetaSchemaCheck))
    }

    /// Use a custom meta-schema validation gate.
    pub fn with_validator(validator: Box<dyn DocumentValidator>) -> Self {
        Self { validator }
    }

    /// Analyze a single schema document or a folder corpus.
    pub fn load_path_into(&self, path: &Path, analyzer: &mut Analyzer) -> Result<(), AnalyzeError> {
        let root = analyzer.model().root();
        if path.is_file() {
            self.load_file_into(path, &[], root, analyzer)
        } else if path.is_dir() {
            self.load_directory_into(path, &[], root, analyzer)
        } else {
            Err(AnalyzeError::InvalidInput(path.to_path_buf()))
        }
    }

    fn load_directory_into(
        &self,
        dir: &Path,
        rel: &[SmolStr],
        namespace: NamespaceId,
        analyzer: &mut Analyzer,
    ) -> Result<(), AnalyzeError> {
        let entries = file_loader::collect_sorted_entries(dir).map_err(|source| AnalyzeError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            if entry.is_dir() {
                let Some(name) = entry.file_name().map(|n| n.to_string_lossy().into_owned())
                else {
                    continue;
                };
                tracing::debug!("entering folder '{name}'");
                let child = analyzer.model_mut().new_namespace(&*name, namespace);
                let mut segments = rel.to_vec();
                segments.push(SmolStr::new(&name));
                self.load_directory_into(&entry, &segments, child, analyzer)?;
            } else if file_loader::is_schema_file(&entry) {
                self.load_file_into(&entry, rel, namespace, analyzer)?;
            }
        }
        Ok(())
    }

    fn load_file_into(
        &self,
        path: &Path,
        rel: &[SmolStr],
        namespace: NamespaceId,
        analyzer: &mut Analyzer,
    ) -> Result<(), AnalyzeError> {
        let document = match file_loader::load_document(path) {
            Ok(document) => document,
            Err(reason) => {
                analyzer.diagnostics_mut().invalid_document(path, &reason);
                return Ok(());
            }
        };
        if let Err(reason) = self.validator.validate(path, &document) {
            analyzer.diagnostics_mut().invalid_document(path, &reason);
            return Ok(());
        }

        let mut segments = rel.to_vec();
        if let Some(file_name) = path.file_name() {
            segments.push(SmolStr::new(file_name.to_string_lossy()));
        }
        let reference = SchemaReference::from_segments(segments)?;
        analyzer.analyze_document(Some(path), reference, namespace, &document)
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new()
    }
}
