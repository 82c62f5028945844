use super::ids::SequenceId;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MoleculeKind {
    #[default]
    Protein,
    Nucleotide,
}

#[derive(Debug, Error)]
#[error("Invalid molecule kind string: '{0}'")]
pub struct ParseMoleculeKindError(String);

impl FromStr for MoleculeKind {
    type Err = ParseMoleculeKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" | "peptide" => Ok(MoleculeKind::Protein),
            "nucleotide" | "dna" | "rna" => Ok(MoleculeKind::Nucleotide),
            _ => Err(ParseMoleculeKindError(s.to_string())),
        }
    }
}

impl fmt::Display for MoleculeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MoleculeKind::Protein => "Protein",
                MoleculeKind::Nucleotide => "Nucleotide",
            }
        )
    }
}

/// A resolved correspondence between one bound sequence and one chain of a structure.
///
/// Instances are produced by whatever component aligned the sequence against the
/// structure's chain; this crate only consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMapping {
    pub sequence: SequenceId,
    pub chain: String,
    pub structure_id: String,
    pub kind: MoleculeKind,
    residues: BTreeMap<usize, isize>, // Sequence position -> structure residue number
}

impl StructureMapping {
    pub fn new(sequence: SequenceId, chain: &str, structure_id: &str, kind: MoleculeKind) -> Self {
        Self {
            sequence,
            chain: chain.to_string(),
            structure_id: structure_id.to_string(),
            kind,
            residues: BTreeMap::new(),
        }
    }

    /// Maps `count` consecutive sequence positions starting at `sequence_start` onto
    /// consecutive residue numbers starting at `first_residue`.
    ///
    /// Mapping stops early at the first position or residue number that would overflow.
    pub fn with_contiguous(mut self, sequence_start: usize, first_residue: isize, count: usize) -> Self {
        let mut next = Some((sequence_start, first_residue));
        for _ in 0..count {
            let Some((position, residue)) = next else {
                break;
            };
            self.residues.insert(position, residue);
            next = position.checked_add(1).zip(residue.checked_add(1));
        }
        self
    }

    pub fn with_residue(mut self, position: usize, residue_number: isize) -> Self {
        self.residues.insert(position, residue_number);
        self
    }

    /// Residue number for a 1-based sequence position, or `None` when unmapped.
    pub fn residue_for_position(&self, position: usize) -> Option<isize> {
        self.residues.get(&position).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn mapped_count(&self) -> usize {
        self.residues.len()
    }

    /// First and last mapped sequence positions.
    pub fn sequence_range(&self) -> Option<(usize, usize)> {
        let first = self.residues.keys().next()?;
        let last = self.residues.keys().next_back()?;
        Some((*first, *last))
    }

    /// Smallest and largest mapped residue numbers.
    pub fn residue_range(&self) -> Option<(isize, isize)> {
        let min = self.residues.values().min()?;
        let max = self.residues.values().max()?;
        Some((*min, *max))
    }
}
