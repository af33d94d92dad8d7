use crate::core::models::residue::AminoAcid;
use crate::core::models::system::StructuralModel;
use crate::engine::error::EngineError;
use std::fmt;
use tracing::debug;

/// One residue location targeted for mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub chain: char,
    pub residue_number: isize,
    /// PDB insertion code; `' '` when the residue has none. Residues 100 and
    /// 100A are distinct positions.
    pub insertion_code: char,
    pub original: AminoAcid,
}

impl Position {
    /// Chain, residue number, and insertion code when present, e.g. `A100A`.
    pub fn site_label(&self) -> String {
        if self.insertion_code == ' ' {
            format!("{}{}", self.chain, self.residue_number)
        } else {
            format!("{}{}{}", self.chain, self.residue_number, self.insertion_code)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.site_label(), self.original)
    }
}

/// Lists every mutation position across the requested chains.
///
/// Positions come back in chain-list order, then sequence order within each
/// chain; this order fixes the result matrix's row order, so it must be
/// stable across repeated calls on the same model. The model is not touched.
///
/// # Errors
///
/// `ChainNotFound` for a chain identifier the model does not contain,
/// `EmptyChain` for a chain with zero residues, and `NonStandardResidue`
/// when a target-chain residue is not one of the 20 canonical amino acids.
pub fn enumerate_positions(
    model: &StructuralModel,
    chains: &[char],
) -> Result<Vec<Position>, EngineError> {
    let mut positions = Vec::new();
    for &chain_char in chains {
        let chain_id = model
            .find_chain(chain_char)
            .ok_or(EngineError::ChainNotFound { chain: chain_char })?;
        let mut residue_count = 0usize;
        for residue in model.chain_residues(chain_id) {
            residue_count += 1;
            let original =
                residue
                    .amino_acid()
                    .ok_or_else(|| EngineError::NonStandardResidue {
                        chain: chain_char,
                        residue_number: residue.number,
                        name: residue.name.clone(),
                    })?;
            positions.push(Position {
                chain: chain_char,
                residue_number: residue.number,
                insertion_code: residue.insertion_code,
                original,
            });
        }
        if residue_count == 0 {
            return Err(EngineError::EmptyChain { chain: chain_char });
        }
        debug!(chain = %chain_char, residues = residue_count, "enumerated chain");
    }
    Ok(positions)
}
