use crate::core::utils::symbols::is_gap;
use std::fmt;

/// One gapped row of a multiple sequence alignment.
///
/// Residue positions are 1-based and count only non-gap symbols, offset by `start`
/// (the position of the first residue, normally 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSequence {
    pub name: String,          // Row label (e.g., FASTA header without '>')
    residues: Vec<char>,       // Aligned symbols, gaps included
    start: usize,              // Sequence position of the first non-gap symbol
}

impl AlignedSequence {
    pub fn new(name: &str, residues: &str) -> Self {
        Self {
            name: name.to_string(),
            residues: residues.chars().collect(),
            start: 1,
        }
    }

    /// Sets the sequence position of the first residue.
    ///
    /// A `start` of zero is clamped to 1 so that positions stay 1-based.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start.max(1);
        self
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Aligned length of the row, gaps included.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn char_at(&self, column: usize) -> Option<char> {
        self.residues.get(column).copied()
    }

    /// Returns `true` for gap symbols and for columns past the end of the row.
    pub fn is_gap_at(&self, column: usize) -> bool {
        self.char_at(column).is_none_or(is_gap)
    }

    /// Converts an alignment column into a sequence position.
    ///
    /// # Return
    ///
    /// `Some(position)` when the column holds a residue, `None` for gaps and for columns
    /// at or beyond the aligned length.
    pub fn position_at(&self, column: usize) -> Option<usize> {
        if self.is_gap_at(column) {
            return None;
        }
        let preceding = self.residues[..column]
            .iter()
            .filter(|c| !is_gap(**c))
            .count();
        Some(self.start + preceding)
    }

    /// The residues with all gap symbols removed.
    pub fn ungapped(&self) -> String {
        self.residues.iter().filter(|c| !is_gap(**c)).collect()
    }

    /// Last sequence position covered by this row, or `None` if it holds no residues.
    pub fn end(&self) -> Option<usize> {
        let count = self.residues.iter().filter(|c| !is_gap(**c)).count();
        (count > 0).then(|| self.start + count - 1)
    }
}

impl fmt::Display for AlignedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let residues: String = self.residues.iter().collect();
        write!(f, "{}: {}", self.name, residues)
    }
}
