use crate::core::models::mapping::StructureMapping;
use crate::core::models::sequence::AlignedSequence;

/// Structure residue number aligned at `column` of `sequence`.
///
/// Returns `None` when the column is a gap, lies at or beyond the row's aligned length,
/// or when the mapping has no residue for the corresponding sequence position.
pub fn mapped_position(
    sequence: &AlignedSequence,
    column: usize,
    mapping: &StructureMapping,
) -> Option<isize> {
    let position = sequence.position_at(column)?;
    mapping.residue_for_position(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::SequenceId;
    use crate::core::models::mapping::MoleculeKind;
    use slotmap::SlotMap;

    fn mapping_from(first_residue: isize, count: usize) -> StructureMapping {
        let mut arena: SlotMap<SequenceId, ()> = SlotMap::with_key();
        StructureMapping::new(arena.insert(()), "A", "1ABC", MoleculeKind::Protein)
            .with_contiguous(1, first_residue, count)
    }

    #[test]
    fn resolves_ungapped_position_through_mapping() {
        let sequence = AlignedSequence::new("s", "-MK-LV");
        let mapping = mapping_from(100, 4);
        assert_eq!(mapped_position(&sequence, 1, &mapping), Some(100));
        assert_eq!(mapped_position(&sequence, 2, &mapping), Some(101));
        assert_eq!(mapped_position(&sequence, 4, &mapping), Some(102));
        assert_eq!(mapped_position(&sequence, 5, &mapping), Some(103));
    }

    #[test]
    fn gap_and_overhang_columns_are_unmapped() {
        let sequence = AlignedSequence::new("s", "-MK");
        let mapping = mapping_from(1, 10);
        assert_eq!(mapped_position(&sequence, 0, &mapping), None);
        assert_eq!(mapped_position(&sequence, 3, &mapping), None);
        assert_eq!(mapped_position(&sequence, 50, &mapping), None);
    }

    #[test]
    fn positions_outside_the_mapping_are_unmapped() {
        let sequence = AlignedSequence::new("s", "MKLV");
        let mapping = mapping_from(7, 2);
        assert_eq!(mapped_position(&sequence, 1, &mapping), Some(8));
        assert_eq!(mapped_position(&sequence, 2, &mapping), None);
    }
}
