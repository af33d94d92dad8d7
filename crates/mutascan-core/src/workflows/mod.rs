//! # Workflows Module
//!
//! High-level entry points that drive a complete mutagenesis scan.
//!
//! ## Overview
//!
//! Workflows tie the engine components together: enumeration, substitution
//! policy, activation control, per-variant jobs, and matrix accumulation.
//! They own the run-level failure policy: precondition problems abort before
//! any variant runs, while per-variant problems are recorded and the run
//! continues. Progress and summary counts are reported to the caller.
//!
//! - **Scan Workflow** ([`scan`]) - Saturation mutagenesis over the target
//!   chains, producing a frozen result matrix and run summary.

pub mod scan;
