use crate::core::models::alignment::Alignment;
use crate::core::models::mapping::{MoleculeKind, StructureMapping};
use crate::core::models::structure::{StructureEntry, StructureMetadata};
use crate::core::models::ids::SequenceId;
use crate::core::utils::symbols::looks_like_nucleotide;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid manifest: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Structure '{structure}' maps unknown sequence '{sequence}'")]
    UnknownSequence { structure: String, sequence: String },
    #[error("Structure '{structure}' has an invalid mapping for '{sequence}': {reason}")]
    InvalidMapping {
        structure: String,
        sequence: String,
        reason: String,
    },
}

/// Declares structure sources and how alignment sequences map onto their residues.
///
/// ```toml
/// [[structure]]
/// id = "1ABC"
/// file = "structures/1abc.cif"
/// method = "X-RAY DIFFRACTION"
///
/// [[structure.mapping]]
/// sequence = "1abc_A"
/// chain = "A"
/// first-residue = 25
///
/// [[structure.mapping]]
/// sequence = "1abc_B"
/// chain = "B"
/// residues = [4, 5, 0, 6]
/// ```
///
/// A `first-residue` mapping is contiguous from `sequence-start` (default: the row's own
/// start position) to the end of the row, or for `length` residues. A `residues` list
/// gives one residue number per sequence position from `sequence-start`, with `0` meaning
/// unmapped.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct StructureManifest {
    #[serde(default, rename = "structure")]
    pub structures: Vec<ManifestStructure>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ManifestStructure {
    pub id: String,
    pub file: String,
    pub method: Option<String>,
    #[serde(default, rename = "mapping")]
    pub mappings: Vec<ManifestMapping>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ManifestMapping {
    pub sequence: String,
    pub chain: Option<String>,
    pub molecule: Option<String>,
    pub sequence_start: Option<usize>,
    pub first_residue: Option<isize>,
    pub length: Option<usize>,
    pub residues: Option<Vec<isize>>,
}

/// One manifest structure resolved against an alignment.
///
/// `sequences`, `chains` and `mappings` run parallel, in declaration order.
#[derive(Debug, Clone)]
pub struct ResolvedStructure {
    pub entry: StructureEntry,
    pub sequences: Vec<SequenceId>,
    pub chains: Vec<Option<String>>,
    pub mappings: Vec<StructureMapping>,
}

impl StructureManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        debug!("Loading structure manifest from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolves sequence names against `alignment` and builds mappings.
    pub fn resolve(&self, alignment: &Alignment) -> Result<Vec<ResolvedStructure>, ManifestError> {
        let mut resolved = Vec::with_capacity(self.structures.len());

        for structure in &self.structures {
            let mut sequences = Vec::with_capacity(structure.mappings.len());
            let mut chains = Vec::with_capacity(structure.mappings.len());
            let mut mappings = Vec::with_capacity(structure.mappings.len());
            let mut advertised_chains: Vec<String> = Vec::new();

            for declared in &structure.mappings {
                let mapping = build_mapping(structure, declared, alignment)?;
                if let Some(chain) = &declared.chain {
                    if !advertised_chains.contains(chain) {
                        advertised_chains.push(chain.clone());
                    }
                }
                sequences.push(mapping.sequence);
                chains.push(declared.chain.clone());
                mappings.push(mapping);
            }

            let entry = StructureEntry::new(&structure.id, &structure.file).with_metadata(
                StructureMetadata {
                    method: structure.method.clone(),
                    chains: advertised_chains,
                },
            );
            resolved.push(ResolvedStructure {
                entry,
                sequences,
                chains,
                mappings,
            });
        }

        Ok(resolved)
    }
}

fn build_mapping(
    structure: &ManifestStructure,
    declared: &ManifestMapping,
    alignment: &Alignment,
) -> Result<StructureMapping, ManifestError> {
    let invalid = |reason: &str| ManifestError::InvalidMapping {
        structure: structure.id.clone(),
        sequence: declared.sequence.clone(),
        reason: reason.to_string(),
    };

    let seq_id = alignment
        .find_by_name(&declared.sequence)
        .ok_or_else(|| ManifestError::UnknownSequence {
            structure: structure.id.clone(),
            sequence: declared.sequence.clone(),
        })?;
    let sequence = alignment
        .sequence(seq_id)
        .ok_or_else(|| invalid("sequence vanished from alignment"))?;
    let ungapped = sequence.ungapped();

    let kind = match &declared.molecule {
        Some(text) => text.parse().map_err(|_| invalid("unknown molecule kind"))?,
        None if looks_like_nucleotide(&ungapped) => MoleculeKind::Nucleotide,
        None => MoleculeKind::Protein,
    };

    let start = declared.sequence_start.unwrap_or(sequence.start());
    let chain = declared.chain.as_deref().unwrap_or("");
    let mut mapping = StructureMapping::new(seq_id, chain, &structure.id, kind);

    match (declared.first_residue, &declared.residues) {
        (Some(_), Some(_)) => {
            return Err(invalid("'first-residue' and 'residues' are mutually exclusive"));
        }
        (None, None) => {
            return Err(invalid("one of 'first-residue' or 'residues' is required"));
        }
        (Some(first_residue), None) => {
            let available = sequence
                .start()
                .saturating_add(ungapped.chars().count())
                .saturating_sub(start);
            let count = declared.length.unwrap_or(available);
            if count > available {
                return Err(invalid("'length' runs past the end of the sequence"));
            }
            let last_offset = isize::try_from(count.saturating_sub(1))
                .map_err(|_| invalid("'length' is too large"))?;
            if first_residue.checked_add(last_offset).is_none() {
                return Err(invalid("residue numbers overflow"));
            }
            mapping = mapping.with_contiguous(start, first_residue, count);
        }
        (None, Some(residues)) => {
            for (offset, residue) in residues.iter().enumerate() {
                let position = start
                    .checked_add(offset)
                    .ok_or_else(|| invalid("sequence positions overflow"))?;
                if *residue != 0 {
                    mapping = mapping.with_residue(position, *residue);
                }
            }
        }
    }

    Ok(mapping)
}
