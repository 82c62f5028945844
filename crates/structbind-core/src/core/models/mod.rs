//! # Core Models Module
//!
//! Data structures describing the two sides of a structure binding: the multiple sequence
//! alignment on one side, and structure sources with their residue mappings on the other.
//!
//! ## Key Components
//!
//! - [`ids`] - Stable arena handles for aligned sequences
//! - [`sequence`] - A single gapped sequence row and its column/position arithmetic
//! - [`alignment`] - The ordered collection of aligned sequences
//! - [`structure`] - Identity and metadata of one structure source
//! - [`mapping`] - Resolved sequence-position to structure-residue correspondences
//!
//! ## Usage
//!
//! ```ignore
//! use structbind::core::models::alignment::Alignment;
//! use structbind::core::models::sequence::AlignedSequence;
//!
//! let mut alignment = Alignment::new();
//! let seq_id = alignment.add_sequence(AlignedSequence::new("1abc_A", "MK-LV"));
//! assert_eq!(alignment.find_index(seq_id), Some(0));
//! ```

pub mod alignment;
pub mod ids;
pub mod mapping;
pub mod sequence;
pub mod structure;
