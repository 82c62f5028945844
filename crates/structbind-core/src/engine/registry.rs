use crate::core::models::ids::SequenceId;
use crate::core::models::mapping::StructureMapping;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Mapping registry is unavailable: {0}")]
    Unavailable(String),
    #[error("Structure file '{0}' is not known to the registry")]
    UnknownFile(String),
}

/// The external collaborator that owns sequence-to-structure residue mappings.
///
/// Mappings are keyed by structure file locator. A file that has not finished loading is
/// reported either as an empty mapping list or as an error; both mean "not ready yet".
pub trait MappingRegistry {
    /// All mappings currently registered for a structure file.
    fn mappings(&self, file_id: &str) -> Result<Vec<StructureMapping>, RegistryError>;

    /// Human-readable description of how `sequences` map onto the structure in `file_id`.
    ///
    /// The provided implementation lists one line per matching mapping with its sequence
    /// position range and residue number range. Sequences are numbered by their position
    /// in `sequences`, starting at 1.
    fn describe_mapping(
        &self,
        file_id: &str,
        sequences: &[SequenceId],
    ) -> Result<String, RegistryError> {
        let mappings = self.mappings(file_id)?;
        let mut out = format!("{}\n", file_id);
        for (seq_number, seq_id) in sequences.iter().enumerate() {
            for mapping in mappings.iter().filter(|m| m.sequence == *seq_id) {
                let _ = write!(
                    out,
                    "  sequence {} -> chain '{}' of {} ({})",
                    seq_number + 1,
                    mapping.chain,
                    mapping.structure_id,
                    mapping.kind
                );
                match (mapping.sequence_range(), mapping.residue_range()) {
                    (Some((seq_first, seq_last)), Some((res_first, res_last))) => {
                        let _ = writeln!(
                            out,
                            ": positions {}-{} map to residues {}-{} ({} mapped)",
                            seq_first,
                            seq_last,
                            res_first,
                            res_last,
                            mapping.mapped_count()
                        );
                    }
                    _ => {
                        let _ = writeln!(out, ": no residues mapped");
                    }
                }
            }
        }
        Ok(out)
    }
}

/// A thread-safe, in-process mapping registry.
///
/// Loaders register mappings as structures become available while other tasks poll it,
/// so all access goes through an `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    files: RwLock<HashMap<String, Vec<StructureMapping>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, file_id: &str, mapping: StructureMapping) -> Result<(), RegistryError> {
        let mut files = self
            .files
            .write()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        files.entry(file_id.to_string()).or_default().push(mapping);
        Ok(())
    }

    /// Drops every mapping held for `file_id`, returning how many were removed.
    pub fn clear(&self, file_id: &str) -> Result<usize, RegistryError> {
        let mut files = self
            .files
            .write()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(files.remove(file_id).map_or(0, |m| m.len()))
    }

    pub fn file_ids(&self) -> Result<Vec<String>, RegistryError> {
        let files = self
            .files
            .read()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        let mut ids: Vec<_> = files.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl MappingRegistry for InMemoryRegistry {
    fn mappings(&self, file_id: &str) -> Result<Vec<StructureMapping>, RegistryError> {
        let files = self
            .files
            .read()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(files.get(file_id).cloned().unwrap_or_default())
    }
}
