use super::error::EngineError;
use super::registry::MappingRegistry;
use super::resolver::mapped_position;
use super::store::AssociationStore;
use crate::core::models::alignment::Alignment;
use crate::core::models::ids::SequenceId;
use crate::core::models::mapping::{MoleculeKind, StructureMapping};
use crate::core::models::sequence::AlignedSequence;
use crate::core::utils::symbols::is_blank_chain;
use tracing::{debug, info, instrument};

/// Per-column eligibility of an alignment for use as a superposition fit point.
///
/// Entries can only be cleared, never set again, so a mask handed through several
/// structures ends up as the intersection of what each of them allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMask(Vec<bool>);

impl ColumnMask {
    /// A mask with every one of `width` columns eligible.
    pub fn all(width: usize) -> Self {
        Self(vec![true; width])
    }

    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `column` is still eligible; columns beyond the mask are not.
    pub fn is_set(&self, column: usize) -> bool {
        self.0.get(column).copied().unwrap_or(false)
    }

    pub fn clear(&mut self, column: usize) {
        if let Some(flag) = self.0.get_mut(column) {
            *flag = false;
        }
    }

    /// Number of eligible columns.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|f| **f).count()
    }

    /// Indices of eligible columns, ascending.
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(column, flag)| flag.then_some(column))
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// `true` if every column set here is also set in `other`.
    pub fn is_subset_of(&self, other: &ColumnMask) -> bool {
        self.columns().all(|column| other.is_set(column))
    }
}

/// What one structure contributes to a superposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperposeRecord {
    pub chain: Option<String>,
    pub structure_id: Option<String>,
    pub kind: MoleculeKind,
    residues: Vec<Option<isize>>, // Structure residue number per alignment column
}

impl SuperposeRecord {
    fn with_width(width: usize) -> Self {
        Self {
            residues: vec![None; width],
            ..Self::default()
        }
    }

    pub fn residue_at(&self, column: usize) -> Option<isize> {
        self.residues.get(column).copied().flatten()
    }

    pub fn residues(&self) -> &[Option<isize>] {
        &self.residues
    }

    /// `true` if the structure had no representative sequence in the alignment.
    pub fn is_unresolved(&self) -> bool {
        self.structure_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperposeSelection {
    /// Index (in store order) of the structure that fixes the superposition frame.
    pub reference: Option<usize>,
    /// Columns where every resolved structure has a usable residue.
    pub mask: ColumnMask,
    /// One record per bound structure, in store order.
    pub records: Vec<SuperposeRecord>,
}

/// Computes the alignment columns usable as common fit points for all bound structures.
///
/// Structures are visited in store order. For each one, the first bound sequence that is
/// both present in `alignment` and covered by one of the structure's mappings becomes its
/// representative; no later sequence is consulted. The first structure that yields a
/// representative becomes the reference. Each representative then clears every
/// still-eligible column where it has a gap, has no mapped residue, or repeats the residue
/// number assigned to its previous eligible column.
///
/// A structure without any representative leaves the mask untouched and gets an empty
/// record.
///
/// # Errors
///
/// Returns [`EngineError::Registry`] if the registry cannot be queried.
#[instrument(skip_all, name = "select_superposable_columns")]
pub fn select_superposable_columns<R: MappingRegistry + ?Sized>(
    store: &AssociationStore,
    registry: &R,
    alignment: &Alignment,
    initial_mask: ColumnMask,
) -> Result<SuperposeSelection, EngineError> {
    let mut mask = initial_mask;
    let width = mask.len();
    let mut reference = None;
    let mut records = Vec::with_capacity(store.len());

    for (structure_index, binding) in store.bindings().iter().enumerate() {
        let mut record = SuperposeRecord::with_width(width);
        let mappings = registry.mappings(binding.entry().file())?;

        let Some((sequence, mapping)) = find_representative(binding.sequences(), &mappings, alignment)
        else {
            debug!(
                entry = %binding.entry(),
                "No bound sequence is both mapped and present in the alignment."
            );
            records.push(record);
            continue;
        };

        if reference.is_none() {
            reference = Some(structure_index);
        }

        let cleared = restrict_mask(&mut mask, &mut record, sequence, mapping);

        if !is_blank_chain(&mapping.chain) {
            record.chain = Some(mapping.chain.clone());
        }
        record.structure_id = Some(mapping.structure_id.clone());
        record.kind = mapping.kind;

        debug!(
            entry = %binding.entry(),
            representative = %sequence.name,
            cleared,
            remaining = mask.count(),
            "Restricted fit columns to structure."
        );
        records.push(record);
    }

    info!(
        reference = ?reference,
        columns = mask.count(),
        structures = records.len(),
        "Superposable column selection complete."
    );

    Ok(SuperposeSelection {
        reference,
        mask,
        records,
    })
}

fn find_representative<'a>(
    sequences: Vec<SequenceId>,
    mappings: &'a [StructureMapping],
    alignment: &'a Alignment,
) -> Option<(&'a AlignedSequence, &'a StructureMapping)> {
    sequences.into_iter().find_map(|seq_id| {
        alignment.find_index(seq_id)?;
        let mapping = mappings.iter().find(|m| m.sequence == seq_id)?;
        Some((alignment.sequence(seq_id)?, mapping))
    })
}

/// Clears the columns `sequence` cannot contribute and records the residues it can.
///
/// Returns the number of columns cleared.
fn restrict_mask(
    mask: &mut ColumnMask,
    record: &mut SuperposeRecord,
    sequence: &AlignedSequence,
    mapping: &StructureMapping,
) -> usize {
    let mut cleared = 0;
    let mut last_residue = None;

    for column in 0..mask.len() {
        if !mask.is_set(column) {
            continue;
        }
        if sequence.is_gap_at(column) {
            mask.clear(column);
            cleared += 1;
            continue;
        }
        match mapped_position(sequence, column, mapping) {
            Some(residue) if Some(residue) != last_residue => {
                last_residue = Some(residue);
                record.residues[column] = Some(residue);
            }
            _ => {
                mask.clear(column);
                cleared += 1;
            }
        }
    }
    cleared
}
