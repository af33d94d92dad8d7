use crate::core::io::pdb::PdbFile;
use crate::core::models::system::StructuralModel;
use crate::engine::activation::effective_activation;
use crate::engine::config::ScanConfig;
use crate::engine::enumeration::enumerate_positions;
use crate::engine::error::EngineError;
use crate::engine::matrix::{FrozenMatrix, ResultMatrix};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tools::{EnergyScorer, SidechainPlacer};
use crate::engine::variant::{Variant, run_variant};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};

/// Cooperative run-level cancellation flag.
///
/// The driver checks it between variants: no new variant starts after
/// cancellation, while the in-flight one finishes (its subprocesses are
/// bounded by the tool timeout).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Run summary handed back to the caller alongside the frozen matrix.
#[derive(Debug)]
pub struct ScanReport {
    pub matrix: FrozenMatrix,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Runs a complete saturation mutagenesis scan.
///
/// Enumerates positions over the configured chains, schedules every
/// (position, substitution) pair exactly once, and records each outcome in
/// the matrix. One variant's failure never prevents another from running; a
/// run in which every variant fails still completes with `Ok`. Only
/// precondition failures (bad chains, workspace I/O, matrix invariant
/// violations) return an error.
#[instrument(skip_all, name = "scan_workflow")]
pub fn run(
    model: &StructuralModel,
    config: &ScanConfig,
    placer: &dyn SidechainPlacer,
    scorer: &dyn EnergyScorer,
    reporter: &ProgressReporter,
    cancel: &CancelToken,
) -> Result<ScanReport, EngineError> {
    let positions = enumerate_positions(model, &config.chains)?;
    info!(
        positions = positions.len(),
        substitutions = config.substitutions.len(),
        "enumerated scan space"
    );

    // Resolved once per run; suppression of a requested set is logged inside.
    let activation = effective_activation(config.rotamer_correction, &config.activation);

    let variants_dir = config.workspace.join("variants");
    std::fs::create_dir_all(&variants_dir).map_err(|e| EngineError::Workspace {
        path: variants_dir.clone(),
        source: e,
    })?;
    let reference = config.workspace.join("reference.pdb");
    PdbFile::write_model_to_path(model, &reference)?;

    let mut matrix = ResultMatrix::new(positions.clone(), config.substitutions.targets().to_vec());

    let total: usize = positions
        .iter()
        .map(|p| config.substitutions.targets_for(p.original).count())
        .sum();
    reporter.report(Progress::ScanStart {
        total_variants: total as u64,
    });

    let mut attempted = 0usize;
    let mut succeeded = 0usize;
    let mut cancelled = false;

    'positions: for position in &positions {
        for substitution in config.substitutions.targets_for(position.original) {
            if cancel.is_cancelled() {
                cancelled = true;
                break 'positions;
            }
            let variant = Variant {
                position: *position,
                substitution,
            };
            let outcome = run_variant(
                model,
                variant,
                &activation,
                &variants_dir,
                &reference,
                placer,
                scorer,
            );
            attempted += 1;
            let ok = outcome.is_success();
            if ok {
                succeeded += 1;
            }
            info!(variant = %variant.label(), succeeded = ok, "variant finished");
            matrix.record(position, substitution, outcome)?;
            reporter.report(Progress::VariantFinish {
                label: variant.label(),
                succeeded: ok,
            });
        }
    }

    reporter.report(Progress::ScanFinish);
    if cancelled {
        warn!(
            attempted,
            remaining = total - attempted,
            "scan cancelled; remaining variants were not scheduled"
        );
    }

    let failed = attempted - succeeded;
    info!(attempted, succeeded, failed, cancelled, "scan complete");
    Ok(ScanReport {
        matrix: matrix.freeze(),
        attempted,
        succeeded,
        failed,
        cancelled,
    })
}
