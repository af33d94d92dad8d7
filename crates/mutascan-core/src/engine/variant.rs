use crate::core::io::pdb::PdbFile;
use crate::core::models::residue::AminoAcid;
use crate::core::models::system::StructuralModel;
use crate::engine::activation::ActivationSet;
use crate::engine::enumeration::Position;
use crate::engine::matrix::VariantOutcome;
use crate::engine::tools::{EnergyScorer, SidechainPlacer};
use std::path::Path;
use tracing::debug;

/// One (position, substitution) unit of work.
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    pub position: Position,
    pub substitution: AminoAcid,
}

impl Variant {
    /// Stable human-readable tag, also used for the working directory name,
    /// e.g. `A42D-to-W`.
    pub fn label(&self) -> String {
        format!(
            "{}-to-{}",
            self.position,
            self.substitution.one_letter()
        )
    }
}

/// Runs one variant end to end: stage the mutant stub, invoke placement,
/// invoke scoring, parse the score.
///
/// Every failure mode is folded into a tagged [`VariantOutcome`]; this
/// function never aborts the surrounding run and never retries. Intermediate
/// files stay in the variant's working directory for inspection; cleanup is
/// the caller's decision.
pub fn run_variant(
    model: &StructuralModel,
    variant: Variant,
    activation: &ActivationSet,
    variants_dir: &Path,
    reference: &Path,
    placer: &dyn SidechainPlacer,
    scorer: &dyn EnergyScorer,
) -> VariantOutcome {
    let work_dir = variants_dir.join(variant.label());
    let mutant = work_dir.join("mutant.pdb");
    let refined = work_dir.join("refined.pdb");

    if let Err(e) = stage_mutant(model, &variant, &work_dir, &mutant) {
        return VariantOutcome::PlacementFailure(e);
    }

    debug!(variant = %variant.label(), "placing side chains");
    if let Err(e) = placer.place(&mutant, &refined, activation) {
        return VariantOutcome::PlacementFailure(e.to_string());
    }

    debug!(variant = %variant.label(), "scoring refined mutant");
    match scorer.score(&refined, reference) {
        Ok(score) => VariantOutcome::Score(score),
        Err(e) => VariantOutcome::ScoringFailure(e.to_string()),
    }
}

fn stage_mutant(
    model: &StructuralModel,
    variant: &Variant,
    work_dir: &Path,
    mutant: &Path,
) -> Result<(), String> {
    std::fs::create_dir_all(work_dir)
        .map_err(|e| format!("failed to create working directory: {e}"))?;
    PdbFile::write_mutant_to_path(
        model,
        variant.position.chain,
        variant.position.residue_number,
        variant.position.insertion_code,
        variant.substitution,
        mutant,
    )
    .map_err(|e| format!("failed to stage mutant topology: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matrix::EnergyScore;
    use crate::engine::tools::ToolFailure;
    use std::sync::Mutex;

    const CHAIN_PDB: &str = "\
ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       1.000   0.000   0.000  1.00  0.00           C
END
";

    fn model() -> StructuralModel {
        let mut reader = CHAIN_PDB.as_bytes();
        PdbFile::read_model_from(&mut reader, 0).unwrap()
    }

    fn variant() -> Variant {
        Variant {
            position: Position {
                chain: 'A',
                residue_number: 1,
                insertion_code: ' ',
                original: AminoAcid::Glycine,
            },
            substitution: AminoAcid::Tryptophan,
        }
    }

    /// Scripted placer: copies the mutant to the refined path (or fails) and
    /// records the activation hints it was handed.
    struct ScriptedPlacer {
        fail: bool,
        seen_activation: Mutex<Vec<String>>,
    }

    impl ScriptedPlacer {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                seen_activation: Mutex::new(Vec::new()),
            }
        }
    }

    impl SidechainPlacer for ScriptedPlacer {
        fn place(
            &self,
            mutant: &Path,
            refined: &Path,
            activation: &ActivationSet,
        ) -> Result<(), ToolFailure> {
            self.seen_activation
                .lock()
                .unwrap()
                .push(activation.one_letter_string());
            if self.fail {
                return Err(ToolFailure::NonZeroExit {
                    status: 1,
                    stderr: "placement blew up".into(),
                });
            }
            std::fs::copy(mutant, refined)?;
            Ok(())
        }
    }

    struct ScriptedScorer {
        result: Result<f64, String>,
    }

    impl EnergyScorer for ScriptedScorer {
        fn score(&self, _refined: &Path, _reference: &Path) -> Result<EnergyScore, ToolFailure> {
            match &self.result {
                Ok(total) => Ok(EnergyScore {
                    total: *total,
                    terms: vec![],
                }),
                Err(detail) => Err(ToolFailure::Unparsable {
                    detail: detail.clone(),
                }),
            }
        }
    }

    #[test]
    fn successful_variant_yields_a_score() {
        let dir = tempfile::tempdir().unwrap();
        let placer = ScriptedPlacer::new(false);
        let scorer = ScriptedScorer { result: Ok(-5.5) };
        let outcome = run_variant(
            &model(),
            variant(),
            &ActivationSet::default_set(),
            dir.path(),
            &dir.path().join("reference.pdb"),
            &placer,
            &scorer,
        );
        match outcome {
            VariantOutcome::Score(score) => assert_eq!(score.total, -5.5),
            other => panic!("unexpected outcome: {other:?}"),
        }
        // Intermediates are retained for inspection.
        assert!(dir.path().join("A1G-to-W/mutant.pdb").exists());
        assert!(dir.path().join("A1G-to-W/refined.pdb").exists());
        assert_eq!(
            placer.seen_activation.lock().unwrap().as_slice(),
            &["DERKH".to_string()]
        );
    }

    #[test]
    fn placement_failure_is_tagged_and_scoring_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let placer = ScriptedPlacer::new(true);
        let scorer = ScriptedScorer {
            result: Err("should not be reached".into()),
        };
        let outcome = run_variant(
            &model(),
            variant(),
            &ActivationSet::empty(),
            dir.path(),
            &dir.path().join("reference.pdb"),
            &placer,
            &scorer,
        );
        match outcome {
            VariantOutcome::PlacementFailure(cause) => {
                assert!(cause.contains("placement blew up"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn scoring_failure_is_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let placer = ScriptedPlacer::new(false);
        let scorer = ScriptedScorer {
            result: Err("garbled output".into()),
        };
        let outcome = run_variant(
            &model(),
            variant(),
            &ActivationSet::empty(),
            dir.path(),
            &dir.path().join("reference.pdb"),
            &placer,
            &scorer,
        );
        assert!(matches!(outcome, VariantOutcome::ScoringFailure(_)));
    }

    #[test]
    fn unwritable_working_area_is_a_placement_failure() {
        let placer = ScriptedPlacer::new(false);
        let scorer = ScriptedScorer { result: Ok(0.0) };
        let outcome = run_variant(
            &model(),
            variant(),
            &ActivationSet::empty(),
            Path::new("/proc/no-such-place"),
            Path::new("/proc/no-such-place/reference.pdb"),
            &placer,
            &scorer,
        );
        assert!(matches!(outcome, VariantOutcome::PlacementFailure(_)));
    }
}
