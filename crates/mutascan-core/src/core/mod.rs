//! # Core Module
//!
//! Fundamental building blocks for representing the structure being scanned.
//!
//! ## Overview
//!
//! The core module holds the stateless pieces the mutagenesis engine operates
//! on: a lightweight structural model (chains, residues, atom records) and the
//! PDB topology I/O needed to load a structure and to stage per-variant mutant
//! files for the external tools. No energetics or conformational search lives
//! here; those are external collaborators.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Chains, residues, amino acid
//!   identities, and the `StructuralModel` container
//! - **File I/O** ([`io`]) - Minimal PDB reading/writing and mutant staging

pub mod io;
pub mod models;
