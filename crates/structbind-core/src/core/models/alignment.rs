use super::ids::SequenceId;
use super::sequence::AlignedSequence;
use slotmap::SlotMap;

/// A multiple sequence alignment.
///
/// Sequences live in a slot map so their [`SequenceId`] handles stay valid, and stay
/// distinct, for as long as the alignment exists, even when other rows are removed.
/// Row order is tracked separately.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// Arena of aligned sequences keyed by stable handle.
    sequences: SlotMap<SequenceId, AlignedSequence>,
    /// Row order of the alignment.
    rows: Vec<SequenceId>,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sequence as the last row and returns its handle.
    pub fn add_sequence(&mut self, sequence: AlignedSequence) -> SequenceId {
        let id = self.sequences.insert(sequence);
        self.rows.push(id);
        id
    }

    /// Removes a sequence from the alignment.
    ///
    /// The handle is never reused, so any association still holding it simply stops
    /// matching a row.
    pub fn remove_sequence(&mut self, id: SequenceId) -> Option<AlignedSequence> {
        let removed = self.sequences.remove(id)?;
        self.rows.retain(|row| *row != id);
        Some(removed)
    }

    pub fn sequence(&self, id: SequenceId) -> Option<&AlignedSequence> {
        self.sequences.get(id)
    }

    /// Row index of a sequence, or `None` if it is not part of this alignment.
    pub fn find_index(&self, id: SequenceId) -> Option<usize> {
        self.rows.iter().position(|row| *row == id)
    }

    /// Handle of the first row carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<SequenceId> {
        self.rows
            .iter()
            .copied()
            .find(|id| self.sequences.get(*id).is_some_and(|s| s.name == name))
    }

    /// Number of columns, taken as the length of the longest row.
    pub fn width(&self) -> usize {
        self.sequences.values().map(AlignedSequence::len).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over rows in alignment order.
    pub fn rows(&self) -> impl Iterator<Item = (SequenceId, &AlignedSequence)> {
        self.rows
            .iter()
            .filter_map(|id| self.sequences.get(*id).map(|seq| (*id, seq)))
    }
}
