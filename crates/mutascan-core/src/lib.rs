//! # Mutascan Core Library
//!
//! A library for saturation mutagenesis scanning of protein structures: every
//! residue position in one or more target chains is substituted with a set of
//! candidate amino acids, each mutant is rebuilt by an external side-chain
//! placement tool, scored by an external binding-energy tool, and the outcomes
//! are collected into a deterministic per-position, per-substitution matrix.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a strict dependency direction:
//!
//! - **[`core`]: The Foundation.** Stateless structural data models
//!   (`StructuralModel`, chains, residues) and PDB topology I/O, including the
//!   mutant-stub writer used to stage each variant.
//!
//! - **[`engine`]: The Logic Core.** Position enumeration, the substitution
//!   policy, rotamer-correction activation control, the external tool
//!   adapters, the per-variant job, and the result matrix. This layer owns
//!   failure isolation: one variant's failure never crosses into another's.
//!
//! - **[`workflows`]: The Public API.** The [`workflows::scan`] entry point
//!   drives a complete scan from a loaded model and an immutable
//!   configuration to a frozen result matrix and run summary.

pub mod core;
pub mod engine;
pub mod workflows;
