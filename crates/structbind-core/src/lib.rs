//! # structbind Core Library
//!
//! Binds three-dimensional macromolecular structures to the sequences (and chains) of a
//! multiple sequence alignment, and works out which alignment columns can serve as common
//! fit points when those structures are superposed.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that data, logic and entry points stay apart.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Alignment`, `StructureEntry`,
//!   `StructureMapping`), small shared utilities, and readers for aligned FASTA files and
//!   structure mapping manifests.
//!
//! - **[`engine`]: The Logic Core.** The association store that tracks which sequences are
//!   bound to which structures, the mapping registry seam, the superposable column selector,
//!   the structure-load wait gate and the mapping reporter.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a complete
//!   superposition preparation procedure with progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;
