use crate::cli::ScanArgs;
use crate::error::{CliError, Result};
use crate::preflight;
use crate::utils::progress::ScanProgressHandler;
use mutascan::{
    core::io::pdb::PdbFile,
    engine::config::{ScanConfig, ScanConfigBuilder, ScanMode, ToolSettings},
    engine::progress::ProgressReporter,
    engine::tools::{BudeScorer, ScwrlPlacer},
    workflows::scan::{self, CancelToken, ScanReport},
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub async fn run(args: ScanArgs, mode: ScanMode) -> Result<()> {
    let tools = resolve_tool_settings(&args)?;
    info!(
        placer = %tools.placer_path.display(),
        scorer = %tools.scorer_path.display(),
        "external tools resolved"
    );

    let workspace = args
        .work_dir
        .clone()
        .unwrap_or_else(|| default_workspace(&args.pdb_file));
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| workspace.join(default_report_name(&args.pdb_file)));

    // All validation (manual lists, activation codes) happens in the builder,
    // before the structure is loaded or any working area exists.
    let mut builder = ScanConfigBuilder::new()
        .chains(args.chains.clone())
        .mode(mode)
        .rotamer_correction(!args.disable_rotamer_correction)
        .model_index(args.model)
        .workspace(workspace.clone())
        .tools(tools.clone());
    if let Some(codes) = &args.activate {
        builder = builder.activation_codes(codes.clone());
    }
    let config = builder.build()?;

    info!("Loading input structure from {:?}", &args.pdb_file);
    let model = PdbFile::read_model_from_path(&args.pdb_file, config.model_index).map_err(|e| {
        CliError::FileParsing {
            path: args.pdb_file.clone(),
            source: e.into(),
        }
    })?;
    if model.is_multi_model() {
        info!(
            models = model.model_count(),
            selected = config.model_index,
            "multi-model structure; scanning the selected model only"
        );
    }

    let placer = ScwrlPlacer {
        executable: config.tools.placer_path.clone(),
        timeout: Duration::from_secs(config.tools.timeout_secs),
    };
    let scorer = BudeScorer {
        executable: config.tools.scorer_path.clone(),
        timeout: Duration::from_secs(config.tools.timeout_secs),
    };

    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; finishing the current variant and stopping");
            signal_token.cancel();
        }
    });

    let progress_handler = ScanProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting saturation mutagenesis scan...");
    let report = tokio::task::block_in_place(|| {
        scan::run(&model, &config, &placer, &scorer, &reporter, &cancel)
    })?;

    write_report(&report, &report_path)?;
    if args.clean {
        clean_intermediates(&config);
    }
    print_summary(&report, &report_path);

    Ok(())
}

fn resolve_tool_settings(args: &ScanArgs) -> Result<ToolSettings> {
    let mut settings = match &args.tool_config {
        Some(path) => ToolSettings::from_toml_path(path)?,
        None => ToolSettings::default(),
    };
    if let Some(path) = &args.placer_path {
        settings.placer_path = path.clone();
    }
    if let Some(path) = &args.scorer_path {
        settings.scorer_path = path.clone();
    }
    if let Some(secs) = args.tool_timeout {
        settings.timeout_secs = secs;
    }

    settings.placer_path = preflight::resolve_executable(&settings.placer_path)?;
    settings.scorer_path = preflight::resolve_executable(&settings.scorer_path)?;
    Ok(settings)
}

fn default_workspace(pdb_file: &Path) -> PathBuf {
    let stem = pdb_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "structure".to_string());
    pdb_file
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}_mutascan"))
}

fn default_report_name(pdb_file: &Path) -> String {
    let stem = pdb_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "structure".to_string());
    format!("{stem}_mutascan.csv")
}

fn write_report(report: &ScanReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    report
        .matrix
        .write_csv(file)
        .map_err(|e| CliError::Other(anyhow::anyhow!("failed to write CSV report: {e}")))?;
    info!(report = %path.display(), "score matrix written");
    Ok(())
}

fn clean_intermediates(config: &ScanConfig) {
    let variants_dir = config.workspace.join("variants");
    if let Err(e) = std::fs::remove_dir_all(&variants_dir) {
        warn!(
            path = %variants_dir.display(),
            error = %e,
            "could not remove intermediate files"
        );
    }
}

fn print_summary(report: &ScanReport, report_path: &Path) {
    // The summary is part of the tool's contract; it prints regardless of
    // verbosity or quiet flags.
    if report.cancelled {
        println!("Scan cancelled before completion.");
    }
    println!(
        "Variants attempted: {}, succeeded: {}, failed: {}",
        report.attempted, report.succeeded, report.failed
    );
    println!("Score matrix written to: {}", report_path.display());
}
