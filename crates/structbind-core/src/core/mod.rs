//! # Core Module
//!
//! Fundamental data structures and readers shared by the engine and the workflows.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Alignments, aligned sequences, structure entries and the
//!   sequence-to-structure residue mappings supplied by external collaborators
//! - **File I/O** ([`io`]) - Aligned FASTA input and TOML structure mapping manifests
//! - **Utilities** ([`utils`]) - Alignment character classification
//!
//! Structure files themselves are never parsed here; the residue correspondence is always
//! handed in already resolved.

pub mod io;
pub mod models;
pub mod utils;
