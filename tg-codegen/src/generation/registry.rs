//! Collection of artifacts from several generators.
//!
//! Artifacts are kept in registration order. Registering a path a second
//! time replaces the earlier content in place, so shared files (such as
//! `models/BaseModel.java`) are written once.

use std::path::Path;

use eyre::Result;
use indexmap::IndexMap;
use tablegen_core::{Artifact, WriteResult};
use tracing::debug;

/// Registry for collecting and managing generated artifacts.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: IndexMap<String, Artifact>,
}

impl FileRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact.
    pub fn register(&mut self, artifact: Artifact) {
        if self.entries.contains_key(&artifact.path) {
            debug!(path = %artifact.path, "replacing registered artifact");
        }
        self.entries.insert(artifact.path.clone(), artifact);
    }

    /// Register multiple artifacts.
    pub fn register_all(&mut self, artifacts: impl IntoIterator<Item = Artifact>) {
        for artifact in artifacts {
            self.register(artifact);
        }
    }

    /// Registered artifacts, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &Artifact> {
        self.entries.values()
    }

    /// Consume the registry, returning the artifacts.
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.entries.into_values().collect()
    }

    /// Write all artifacts below `base`, reporting which were skipped
    /// because they already exist and are only written when missing.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();
        for artifact in self.entries() {
            let bucket = match artifact.write(base)? {
                WriteResult::Written => &mut stats.written,
                WriteResult::Skipped => &mut stats.skipped,
            };
            bucket.push(artifact.path.clone());
        }
        debug!(
            written = stats.written.len(),
            skipped = stats.skipped.len(),
            "wrote artifacts"
        );
        Ok(stats)
    }
}

/// Paths touched by [`FileRegistry::write_all`], in registration order.
#[derive(Debug, Default)]
pub struct WriteStats {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}
