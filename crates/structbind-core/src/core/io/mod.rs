//! Readers for alignment and structure-binding input.
//!
//! - [`fasta`] - Aligned FASTA, gaps preserved
//! - [`manifest`] - TOML manifests declaring structures and their residue mappings

pub mod fasta;
pub mod manifest;
