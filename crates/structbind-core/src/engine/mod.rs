//! # Engine Module
//!
//! The stateful layer that keeps track of which alignment sequences are bound to which
//! structure sources, and computes the alignment columns every bound structure can
//! contribute to a rigid-body superposition.
//!
//! ## Architecture
//!
//! - **Association Store** ([`store`]) - Ordered structure entries with their bound
//!   sequences and optional chain codes, merged without duplication
//! - **Mapping Registry** ([`registry`]) - The seam to the external component that owns
//!   sequence-to-structure residue mappings, plus an in-memory implementation
//! - **Position Resolution** ([`resolver`]) - Alignment column to structure residue number
//! - **Column Selection** ([`selector`]) - The multi-structure intersection over columns
//! - **Load Gate** ([`wait`]) - Bounded, cancellable wait for mappings to appear
//! - **Reporting** ([`report`]) - Human-readable mapping diagnostics
//! - **Configuration** ([`config`]) - Timing and selection parameters
//! - **Progress Monitoring** ([`progress`]) - Phase events for user interfaces
//! - **Error Handling** ([`error`]) - Engine error types

pub mod config;
pub mod error;
pub mod progress;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod selector;
pub mod store;
pub mod wait;
