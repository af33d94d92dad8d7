use crate::core::models::residue::AminoAcid;
use crate::engine::error::EngineError;

/// Default mutable residue list used by `full` mode.
///
/// Covers the charged, aromatic, and polar sweep of a standard BUDE-style
/// saturation scan; positions are mutated to each of these regardless of
/// their original identity.
pub const DEFAULT_MUTABLE: [AminoAcid; 11] = [
    AminoAcid::Alanine,
    AminoAcid::AsparticAcid,
    AminoAcid::GlutamicAcid,
    AminoAcid::Phenylalanine,
    AminoAcid::Histidine,
    AminoAcid::Lysine,
    AminoAcid::Leucine,
    AminoAcid::Asparagine,
    AminoAcid::Glutamine,
    AminoAcid::Arginine,
    AminoAcid::Tyrosine,
];

/// The set of residue identities each position is mutated to.
///
/// Column order of the result matrix follows this set's order, so it is kept
/// stable: declaration order for `full`, first-occurrence order for `manual`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionSet {
    targets: Vec<AminoAcid>,
}

impl SubstitutionSet {
    /// The fixed default set for `full` mode.
    pub fn full() -> Self {
        Self {
            targets: DEFAULT_MUTABLE.to_vec(),
        }
    }

    /// Builds a set from user-supplied one-letter codes (`manual` mode).
    ///
    /// Every code is validated against the 20-letter alphabet before any
    /// variant work can start; the error names all invalid entries, not just
    /// the first. Duplicates are collapsed, keeping first-occurrence order.
    pub fn manual<S: AsRef<str>>(codes: &[S]) -> Result<Self, EngineError> {
        let mut targets = Vec::new();
        let mut invalid = Vec::new();
        for code in codes {
            match code.as_ref().parse::<AminoAcid>() {
                Ok(aa) => {
                    if !targets.contains(&aa) {
                        targets.push(aa);
                    }
                }
                Err(_) => invalid.push(code.as_ref().to_string()),
            }
        }
        if !invalid.is_empty() {
            return Err(EngineError::InvalidResidues { codes: invalid });
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[AminoAcid] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Substitutions actually scheduled for a position: the set minus the
    /// original identity. The self-identity pair is never run as a variant;
    /// the matrix shows it as "not applicable" instead.
    pub fn targets_for(&self, original: AminoAcid) -> impl Iterator<Item = AminoAcid> + '_ {
        self.targets.iter().copied().filter(move |&aa| aa != original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mode_uses_the_default_eleven() {
        let set = SubstitutionSet::full();
        assert_eq!(set.len(), 11);
        assert_eq!(set.targets(), &DEFAULT_MUTABLE);
    }

    #[test]
    fn manual_mode_keeps_user_order_and_dedups() {
        let set = SubstitutionSet::manual(&["W", "F", "w", "F"]).unwrap();
        assert_eq!(
            set.targets(),
            &[AminoAcid::Tryptophan, AminoAcid::Phenylalanine]
        );
    }

    #[test]
    fn manual_mode_accepts_three_letter_codes() {
        let set = SubstitutionSet::manual(&["TRP"]).unwrap();
        assert_eq!(set.targets(), &[AminoAcid::Tryptophan]);
    }

    #[test]
    fn manual_mode_names_every_invalid_code() {
        let err = SubstitutionSet::manual(&["F", "X", "W", "ZZZ"]).unwrap_err();
        match err {
            EngineError::InvalidResidues { codes } => {
                assert_eq!(codes, vec!["X".to_string(), "ZZZ".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn targets_for_excludes_the_original_identity() {
        let set = SubstitutionSet::manual(&["F", "W"]).unwrap();
        let for_phe: Vec<AminoAcid> = set.targets_for(AminoAcid::Phenylalanine).collect();
        assert_eq!(for_phe, vec![AminoAcid::Tryptophan]);
        let for_gly: Vec<AminoAcid> = set.targets_for(AminoAcid::Glycine).collect();
        assert_eq!(
            for_gly,
            vec![AminoAcid::Phenylalanine, AminoAcid::Tryptophan]
        );
    }
}
