use super::ids::EntryKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Descriptive, non-identifying information about a structure source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMetadata {
    pub method: Option<String>, // Experimental method (e.g., "X-RAY DIFFRACTION")
    pub chains: Vec<String>,    // Chain codes advertised by the source
}

/// One macromolecular structure source bound to an alignment.
///
/// Identity is fixed when the entry is created: clones compare equal, while two entries
/// created separately never do, even for the same id and file. Metadata never takes part
/// in equality.
#[derive(Debug, Clone)]
pub struct StructureEntry {
    key: EntryKey,
    id: String,
    file: String,
    pub metadata: StructureMetadata,
}

impl StructureEntry {
    pub fn new(id: &str, file: &str) -> Self {
        Self {
            key: EntryKey::mint(),
            id: id.to_string(),
            file: file.to_string(),
            metadata: StructureMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: StructureMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn key(&self) -> EntryKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Locator of the structure file; this is the key used against the mapping registry.
    pub fn file(&self) -> &str {
        &self.file
    }
}

impl PartialEq for StructureEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for StructureEntry {}

impl Hash for StructureEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for StructureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn clones_share_identity_regardless_of_metadata() {
        let plain = StructureEntry::new("1ABC", "/data/1abc.cif");
        let mut rich = plain.clone();
        rich.metadata = StructureMetadata {
            method: Some("X-RAY DIFFRACTION".to_string()),
            chains: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(plain, rich);
        assert_eq!(plain.key(), rich.key());
    }

    #[test]
    fn separately_created_entries_are_distinct() {
        let first = StructureEntry::new("1ABC", "/data/1abc.cif");
        let second = StructureEntry::new("1ABC", "/data/1abc.cif");
        assert_ne!(first, second);

        let set: HashSet<_> = [first.clone(), second, first].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_shows_id_and_file() {
        let entry = StructureEntry::new("2XYZ", "2xyz.pdb");
        assert_eq!(entry.to_string(), "2XYZ (2xyz.pdb)");
    }
}
