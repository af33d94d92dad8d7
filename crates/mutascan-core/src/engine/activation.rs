use crate::core::models::residue::AminoAcid;
use crate::engine::error::EngineError;
use tracing::warn;

/// Default residues flagged for rotamer correction when none are specified.
pub const DEFAULT_ACTIVATION: [AminoAcid; 5] = [
    AminoAcid::AsparticAcid,
    AminoAcid::GlutamicAcid,
    AminoAcid::Arginine,
    AminoAcid::Lysine,
    AminoAcid::Histidine,
];

/// Residue identities the placement tool should treat with extra
/// conformational search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivationSet {
    residues: Vec<AminoAcid>,
}

impl ActivationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default `{D, E, R, K, H}` set.
    pub fn default_set() -> Self {
        Self {
            residues: DEFAULT_ACTIVATION.to_vec(),
        }
    }

    /// Builds a set from one-letter codes, validated like a manual
    /// substitution list (all invalid entries reported).
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, EngineError> {
        let mut residues = Vec::new();
        let mut invalid = Vec::new();
        for code in codes {
            match code.as_ref().parse::<AminoAcid>() {
                Ok(aa) => {
                    if !residues.contains(&aa) {
                        residues.push(aa);
                    }
                }
                Err(_) => invalid.push(code.as_ref().to_string()),
            }
        }
        if !invalid.is_empty() {
            return Err(EngineError::InvalidResidues { codes: invalid });
        }
        Ok(Self { residues })
    }

    pub fn residues(&self) -> &[AminoAcid] {
        &self.residues
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Concatenated one-letter codes, the form the placement tool accepts.
    pub fn one_letter_string(&self) -> String {
        self.residues.iter().map(|aa| aa.one_letter()).collect()
    }
}

/// Resolves the activation set a run will actually use.
///
/// When rotamer correction is globally disabled the effective set is empty no
/// matter what was requested; the suppression is decided here, once per run,
/// and logged once. Callers must not re-evaluate this per variant.
pub fn effective_activation(rotamer_correction: bool, requested: &ActivationSet) -> ActivationSet {
    if rotamer_correction {
        return requested.clone();
    }
    if !requested.is_empty() {
        warn!(
            requested = %requested.one_letter_string(),
            "rotamer correction is disabled; ignoring requested activation residues"
        );
    }
    ActivationSet::empty()
}
