use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mutascan - saturation mutagenesis scanning over a protein structure, driving external side-chain placement and binding-energy scoring per variant.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mutate every position to the default list of mutable residues.
    Full(FullArgs),
    /// Mutate every position to the residues given on the command line.
    Manual(ManualArgs),
}

/// Arguments shared by both scan modes.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to the input structure in PDB format.
    #[arg(short = 'p', long = "pdb-file", required = true, value_name = "PATH")]
    pub pdb_file: PathBuf,

    /// Chain identifier(s) to run the mutagenesis on.
    #[arg(short = 'l', long = "chains", required = true, num_args(1..), value_name = "A")]
    pub chains: Vec<char>,

    /// Residues to activate for rotamer correction [default: D E R K H].
    #[arg(short = 'a', long = "activate", num_args(1..), value_name = "D")]
    pub activate: Option<Vec<String>>,

    /// Disable rotamer correction; any activation request is ignored.
    #[arg(short = 'i', long = "disable-rotamer-correction")]
    pub disable_rotamer_correction: bool,

    /// Workspace directory for reference and per-variant files.
    /// Defaults to `<pdb-stem>_mutascan/` next to the input.
    #[arg(short = 'w', long = "work-dir", value_name = "PATH")]
    pub work_dir: Option<PathBuf>,

    /// Path for the CSV score matrix.
    /// Defaults to `<pdb-stem>_mutascan.csv` in the working directory.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Which model of a multi-model structure to scan (zero-based).
    #[arg(long = "model", default_value_t = 0, value_name = "N")]
    pub model: usize,

    /// Delete per-variant intermediate files after the scan.
    /// They are retained for inspection by default.
    #[arg(long = "clean")]
    pub clean: bool,

    /// TOML file with external tool settings.
    #[arg(long = "tool-config", value_name = "PATH")]
    pub tool_config: Option<PathBuf>,

    /// Override the side-chain placement executable.
    #[arg(long = "placer-path", value_name = "PATH")]
    pub placer_path: Option<PathBuf>,

    /// Override the energy scoring executable.
    #[arg(long = "scorer-path", value_name = "PATH")]
    pub scorer_path: Option<PathBuf>,

    /// Per-invocation timeout for the external tools, in seconds.
    #[arg(long = "tool-timeout", value_name = "SECS")]
    pub tool_timeout: Option<u64>,
}

/// Arguments for the `full` subcommand.
#[derive(Args, Debug)]
pub struct FullArgs {
    #[command(flatten)]
    pub scan: ScanArgs,
}

/// Arguments for the `manual` subcommand.
#[derive(Args, Debug)]
pub struct ManualArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// One-letter code(s) of the residues to mutate to.
    #[arg(short = 'm', long = "mutate", required = true, num_args(1..), value_name = "W")]
    pub mutate: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mode_parses_mandatory_arguments() {
        let cli = Cli::try_parse_from([
            "mutascan", "full", "-p", "complex.pdb", "-l", "A", "B",
        ])
        .unwrap();
        match cli.command {
            Commands::Full(args) => {
                assert_eq!(args.scan.pdb_file, PathBuf::from("complex.pdb"));
                assert_eq!(args.scan.chains, vec!['A', 'B']);
                assert!(!args.scan.disable_rotamer_correction);
                assert_eq!(args.scan.model, 0);
            }
            _ => panic!("expected full mode"),
        }
    }

    #[test]
    fn manual_mode_requires_mutation_residues() {
        assert!(Cli::try_parse_from(["mutascan", "manual", "-p", "x.pdb", "-l", "A"]).is_err());
        let cli = Cli::try_parse_from([
            "mutascan", "manual", "-p", "x.pdb", "-l", "A", "-m", "F", "W",
        ])
        .unwrap();
        match cli.command {
            Commands::Manual(args) => {
                assert_eq!(args.mutate, vec!["F".to_string(), "W".to_string()]);
            }
            _ => panic!("expected manual mode"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(
            Cli::try_parse_from(["mutascan", "-q", "-v", "full", "-p", "x.pdb", "-l", "A"])
                .is_err()
        );
    }

    #[test]
    fn global_flags_parse_before_the_subcommand() {
        let cli = Cli::try_parse_from([
            "mutascan",
            "-vv",
            "--log-file",
            "run.log",
            "full",
            "-p",
            "x.pdb",
            "-l",
            "A",
            "-i",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        match cli.command {
            Commands::Full(args) => assert!(args.scan.disable_rotamer_correction),
            _ => panic!("expected full mode"),
        }
    }
}
