//! Persistence module for export/import of the graph store
//!
//! Serializes the store, names and relation order included, to JSON or to a
//! compact binary form, and restores it. Layouts are never persisted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KinError, Result};
use crate::model::{GraphStore, PersonNode};

/// Current export schema version
pub const EXPORT_VERSION: u8 = 1;

// ============================================================================
// Export Data Structures
// ============================================================================

/// Complete store state for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub version: u8, // Schema version for forward compatibility
    pub nodes: Vec<PersonNode>,
}

/// Summary of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub people: usize,
    pub named: usize,
    pub relations: usize,
}

// ============================================================================
// Export / Import Implementation
// ============================================================================

impl GraphStore {
    fn export_data(&self) -> ExportData {
        ExportData {
            version: EXPORT_VERSION,
            nodes: self.nodes.clone(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_data())?)
    }

    pub fn export_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.export_data())?)
    }

    /// Import from JSON, replacing the current contents.
    pub fn import_json(&mut self, json: &str) -> Result<ImportResult> {
        let data: ExportData = serde_json::from_str(json)?;
        self.restore(data)
    }

    /// Import from the binary form, replacing the current contents.
    pub fn import_binary(&mut self, bytes: &[u8]) -> Result<ImportResult> {
        let data: ExportData = bincode::deserialize(bytes)?;
        self.restore(data)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<(Self, ImportResult)> {
        let json = std::fs::read_to_string(path)?;
        let mut store = GraphStore::new();
        let result = store.import_json(&json)?;
        Ok((store, result))
    }

    fn restore(&mut self, data: ExportData) -> Result<ImportResult> {
        if data.version != EXPORT_VERSION {
            return Err(KinError::UnsupportedVersion(data.version));
        }

        let result = ImportResult {
            people: data.nodes.len(),
            named: data.nodes.iter().filter(|n| n.name.is_some()).count(),
            relations: data.nodes.iter().map(|n| n.relations.len()).sum(),
        };

        self.nodes = data.nodes;
        self.sort_by_id();
        Ok(result)
    }
}
