//! High-level procedures that chain the engine's building blocks.
//!
//! - [`superpose`] binds manifest structures, waits for them to load, and turns the
//!   selected fit columns into per-structure residue ranges.

pub mod superpose;
