//! # Engine Module
//!
//! The mutagenesis engine: everything between a loaded structural model and a
//! frozen result matrix.
//!
//! ## Overview
//!
//! The engine enumerates the (chain, position, substitution) space, decides
//! which residues the external placement tool should treat with extra rotamer
//! search, runs one variant job per pair through the external tools, and
//! accumulates outcomes into the result matrix. Per-variant failures are
//! recorded, never propagated; only precondition violations and matrix
//! invariant breaks are fatal.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - The immutable per-run `ScanConfig` and
//!   external tool settings
//! - **Enumeration** ([`enumeration`]) - Ordered position listing per chain
//! - **Substitution Policy** ([`substitution`]) - Full/manual target sets
//! - **Activation Control** ([`activation`]) - Rotamer-correction hint sets
//! - **Tool Adapters** ([`tools`]) - Placement and scoring subprocess seams
//! - **Variant Jobs** ([`variant`]) - One staged, placed, scored mutant
//! - **Result Matrix** ([`matrix`]) - Duplicate-rejecting outcome grid
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Fatal precondition error taxonomy

pub mod activation;
pub mod config;
pub mod enumeration;
pub mod error;
pub mod matrix;
pub mod progress;
pub mod substitution;
pub mod tools;
pub mod variant;
