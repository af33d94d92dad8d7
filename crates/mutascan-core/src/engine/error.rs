use crate::core::io::pdb::PdbError;
use thiserror::Error;

/// Fatal, run-aborting errors.
///
/// Anything recoverable at the scale of a single variant is *not* here: those
/// outcomes are recorded in the result matrix as tagged failures instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Chain '{chain}' not found in the structure")]
    ChainNotFound { chain: char },

    #[error("Chain '{chain}' contains no residues")]
    EmptyChain { chain: char },

    #[error(
        "Chain '{chain}' residue {residue_number} ('{name}') is not a standard amino acid"
    )]
    NonStandardResidue {
        chain: char,
        residue_number: isize,
        name: String,
    },

    #[error("Invalid residue code(s): {}", codes.join(", "))]
    InvalidResidues { codes: Vec<String> },

    #[error("Duplicate matrix entry for {position} -> {substitution}")]
    DuplicateEntry {
        position: String,
        substitution: char,
    },

    #[error("Structure I/O failed: {source}")]
    Structure {
        #[from]
        source: PdbError,
    },

    #[error("Workspace error at '{path}': {source}", path = path.display())]
    Workspace {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
