use crate::core::models::ids::SequenceId;
use crate::core::models::structure::StructureEntry;
use crate::core::utils::symbols::is_blank_chain;
use tracing::{debug, info};

/// A sequence bound to a structure, optionally restricted to one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSequence {
    pub sequence: SequenceId,
    pub chain: Option<String>,
}

/// One structure entry together with the sequences bound to it, in binding order.
///
/// Invariant: a sequence handle appears at most once in `members`.
#[derive(Debug, Clone)]
pub struct StructureBinding {
    entry: StructureEntry,
    members: Vec<BoundSequence>,
}

impl StructureBinding {
    fn new(entry: StructureEntry) -> Self {
        Self {
            entry,
            members: Vec::new(),
        }
    }

    pub fn entry(&self) -> &StructureEntry {
        &self.entry
    }

    pub fn members(&self) -> &[BoundSequence] {
        &self.members
    }

    /// Bound sequence handles in binding order.
    pub fn sequences(&self) -> Vec<SequenceId> {
        self.members.iter().map(|m| m.sequence).collect()
    }

    /// Chain codes parallel to [`Self::sequences`].
    ///
    /// # Return
    ///
    /// `None` when no member was ever bound with a real chain code, otherwise one entry per
    /// member (absent chains as `None`).
    pub fn chains(&self) -> Option<Vec<Option<&str>>> {
        if self.members.iter().all(|m| m.chain.is_none()) {
            return None;
        }
        Some(self.members.iter().map(|m| m.chain.as_deref()).collect())
    }

    pub fn contains(&self, sequence: SequenceId) -> bool {
        self.members.iter().any(|m| m.sequence == sequence)
    }

    /// The first sequence bound with the given chain code.
    pub fn sequence_for_chain(&self, chain: &str) -> Option<SequenceId> {
        self.members
            .iter()
            .find(|m| m.chain.as_deref() == Some(chain))
            .map(|m| m.sequence)
    }

    fn push_if_absent(&mut self, sequence: SequenceId, chain: Option<String>) -> bool {
        if self.contains(sequence) {
            return false;
        }
        self.members.push(BoundSequence { sequence, chain });
        true
    }
}

/// An incoming structure with the sequences (and optional chains) to bind to it.
#[derive(Debug, Clone)]
pub struct BindingRequest {
    pub entry: StructureEntry,
    pub sequences: Vec<SequenceId>,
    pub chains: Option<Vec<Option<String>>>,
}

impl BindingRequest {
    pub fn new(entry: StructureEntry, sequences: Vec<SequenceId>) -> Self {
        Self {
            entry,
            sequences,
            chains: None,
        }
    }

    pub fn with_chains(mut self, chains: Vec<Option<String>>) -> Self {
        self.chains = Some(chains);
        self
    }
}

/// Ordered store of structure bindings for one structure-viewing session.
///
/// Entry order is the processing order used by the column selector, so the first entry
/// bound is the first candidate for the reference structure.
#[derive(Debug, Clone, Default)]
pub struct AssociationStore {
    bindings: Vec<StructureBinding>,
}

impl AssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn binding(&self, index: usize) -> Option<&StructureBinding> {
        self.bindings.get(index)
    }

    pub fn bindings(&self) -> &[StructureBinding] {
        &self.bindings
    }

    pub fn entry(&self, index: usize) -> Option<&StructureEntry> {
        self.bindings.get(index).map(StructureBinding::entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = &StructureEntry> {
        self.bindings.iter().map(StructureBinding::entry)
    }

    pub fn index_of(&self, entry: &StructureEntry) -> Option<usize> {
        self.bindings.iter().position(|b| b.entry == *entry)
    }

    /// Index of the first entry loaded from `file`.
    pub fn index_of_file(&self, file: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.entry.file() == file)
    }

    /// Index of the first entry whose structure id matches, ignoring ASCII case.
    pub fn index_of_id(&self, structure_id: &str) -> Option<usize> {
        self.bindings
            .iter()
            .position(|b| b.entry.id().eq_ignore_ascii_case(structure_id))
    }

    /// Structure file locators in store order.
    pub fn file_ids(&self) -> Vec<String> {
        self.entries().map(|e| e.file().to_string()).collect()
    }

    /// Returns `true` if any entry currently has `sequence` bound to it.
    pub fn is_bound(&self, sequence: SequenceId) -> bool {
        self.bindings.iter().any(|b| b.contains(sequence))
    }

    /// Every distinct bound sequence, in first-bound order.
    pub fn bound_sequences(&self) -> Vec<SequenceId> {
        let mut seen = Vec::new();
        for member in self.bindings.iter().flat_map(|b| b.members.iter()) {
            if !seen.contains(&member.sequence) {
                seen.push(member.sequence);
            }
        }
        seen
    }

    /// Adds sequences (and their chains) to an existing entry, skipping sequences that are
    /// already bound to it.
    ///
    /// Blank chain codes are stored as absent.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not name an existing entry, or if `chains` is given with a
    /// length different from `sequences`. Both are caller contract violations.
    pub fn merge_sequences(
        &mut self,
        index: usize,
        sequences: &[SequenceId],
        chains: Option<&[Option<String>]>,
    ) {
        let len = self.bindings.len();
        let Some(binding) = self.bindings.get_mut(index) else {
            panic!("structure entry index {index} is out of range ({len} entries bound)");
        };
        if let Some(chains) = chains {
            assert_eq!(
                chains.len(),
                sequences.len(),
                "chain list must parallel the sequence list"
            );
        }

        let mut added = 0;
        for (i, sequence) in sequences.iter().enumerate() {
            let chain = chains
                .and_then(|c| c[i].as_deref())
                .filter(|c| !is_blank_chain(c))
                .map(str::to_string);
            if binding.push_if_absent(*sequence, chain) {
                added += 1;
            }
        }
        debug!(
            entry = %binding.entry,
            added,
            total = binding.members.len(),
            "Merged sequences into structure binding."
        );
    }

    /// Reconciles a batch of structures and their sequences into the store.
    ///
    /// Requests for an entry already in the store (or added earlier in the same batch) are
    /// merged into that entry; all others become new entries. Entries match by instance
    /// identity, so a separately created entry for the same file is a new entry.
    ///
    /// # Return
    ///
    /// The entries that were not previously present, in batch order. Callers use this to
    /// start loading only the genuinely new structure sources.
    ///
    /// # Panics
    ///
    /// Panics if a request carries a chain list whose length differs from its sequences.
    pub fn merge_batch(
        &mut self,
        batch: impl IntoIterator<Item = BindingRequest>,
    ) -> Vec<StructureEntry> {
        let mut added = Vec::new();
        for request in batch {
            let index = match self.index_of(&request.entry) {
                Some(index) => index,
                None => {
                    info!(entry = %request.entry, "Binding new structure.");
                    added.push(request.entry.clone());
                    self.bindings.push(StructureBinding::new(request.entry));
                    self.bindings.len() - 1
                }
            };
            self.merge_sequences(index, &request.sequences, request.chains.as_deref());
        }
        added
    }

    /// Unbinds one structure, returning its entry.
    pub fn remove_entry(&mut self, index: usize) -> Option<StructureEntry> {
        if index >= self.bindings.len() {
            return None;
        }
        let binding = self.bindings.remove(index);
        info!(entry = %binding.entry, "Released structure binding.");
        Some(binding.entry)
    }

    /// Ends the session: every binding is discarded.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
