//! Provides input/output functionality for the structures being scanned.
//!
//! Only the PDB subset the pipeline needs is implemented: ATOM/HETATM
//! topology, MODEL/ENDMDL bookkeeping for multi-model files, and writers for
//! the reference structure and the per-variant mutant stubs handed to the
//! external side-chain placement tool.

pub mod pdb;
