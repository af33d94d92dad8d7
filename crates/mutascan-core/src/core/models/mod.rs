//! Data structures describing the structure under mutagenesis.
//!
//! The model is intentionally topological: chains, residues, and per-residue
//! atom records with coordinates, enough to enumerate mutation positions and
//! to write mutant stub files for the external placement tool. Bonding,
//! parameterization, and geometry analysis are out of scope.

pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
