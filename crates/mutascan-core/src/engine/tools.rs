use crate::engine::activation::ActivationSet;
use crate::engine::matrix::EnergyScore;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

const CHILD_POLL_INTERVAL_MS: u64 = 25;

/// Why one external tool invocation failed. Always local to a single
/// variant; the variant job translates this into a tagged outcome.
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },

    #[error("timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("expected output file '{path}' was not produced", path = path.display())]
    MissingOutput { path: PathBuf },

    #[error("unparsable output: {detail}")]
    Unparsable { detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Capability seam for the external side-chain placement tool.
///
/// Rebuilds the mutant's side chains from the stub topology, writing the
/// refined structure to `refined`. A non-empty activation set is passed as
/// rotamer-correction hints.
pub trait SidechainPlacer {
    fn place(
        &self,
        mutant: &Path,
        refined: &Path,
        activation: &ActivationSet,
    ) -> Result<(), ToolFailure>;
}

/// Capability seam for the external binding-energy scoring tool.
pub trait EnergyScorer {
    fn score(&self, refined: &Path, reference: &Path) -> Result<EnergyScore, ToolFailure>;
}

/// Captured output of a finished (or killed) child process.
#[derive(Debug)]
struct ProcessOutput {
    status: Option<i32>,
    stdout: String,
    stderr: String,
}

fn drain(stream: Option<impl Read + Send + 'static>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buffer);
        }
        buffer
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<Option<i32>, ToolFailure> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status.code());
        }
        if Instant::now() >= deadline {
            // Kill and reap so no orphaned tool process outlives the variant.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ToolFailure::Timeout {
                seconds: timeout.as_secs(),
            });
        }
        thread::sleep(Duration::from_millis(CHILD_POLL_INTERVAL_MS));
    }
}

/// Runs a command to completion under a timeout, draining both output
/// streams so a chatty tool cannot deadlock on a full pipe.
fn run_with_timeout(command: &mut Command, timeout: Duration) -> Result<ProcessOutput, ToolFailure> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());
    let status = wait_with_deadline(&mut child, timeout)?;

    Ok(ProcessOutput {
        status,
        stdout: stdout_handle.join().unwrap_or_default(),
        stderr: stderr_handle.join().unwrap_or_default(),
    })
}

fn check_status(output: &ProcessOutput) -> Result<(), ToolFailure> {
    match output.status {
        Some(0) => Ok(()),
        status => Err(ToolFailure::NonZeroExit {
            status: status.unwrap_or(-1),
            stderr: output.stderr.trim().to_string(),
        }),
    }
}

/// Subprocess adapter for a Scwrl4-style side-chain placement tool.
#[derive(Debug, Clone)]
pub struct ScwrlPlacer {
    pub executable: PathBuf,
    pub timeout: Duration,
}

impl SidechainPlacer for ScwrlPlacer {
    fn place(
        &self,
        mutant: &Path,
        refined: &Path,
        activation: &ActivationSet,
    ) -> Result<(), ToolFailure> {
        let mut command = Command::new(&self.executable);
        command.arg("-i").arg(mutant).arg("-o").arg(refined);
        if !activation.is_empty() {
            command.arg("-a").arg(activation.one_letter_string());
        }
        debug!(tool = %self.executable.display(), mutant = %mutant.display(), "invoking placement tool");

        let output = run_with_timeout(&mut command, self.timeout)?;
        check_status(&output)?;
        if !refined.exists() {
            return Err(ToolFailure::MissingOutput {
                path: refined.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Subprocess adapter for a BUDE-style binding-energy scoring tool.
///
/// Output contract: the last stdout line whose whitespace-separated tokens
/// all parse as floats is taken as the score vector, first value being the
/// binding total.
#[derive(Debug, Clone)]
pub struct BudeScorer {
    pub executable: PathBuf,
    pub timeout: Duration,
}

impl EnergyScorer for BudeScorer {
    fn score(&self, refined: &Path, reference: &Path) -> Result<EnergyScore, ToolFailure> {
        let mut command = Command::new(&self.executable);
        command.arg(refined).arg(reference);
        debug!(tool = %self.executable.display(), refined = %refined.display(), "invoking scoring tool");

        let output = run_with_timeout(&mut command, self.timeout)?;
        check_status(&output)?;
        parse_score(&output.stdout)
    }
}

/// Extracts the score vector from scoring tool stdout.
pub(crate) fn parse_score(stdout: &str) -> Result<EnergyScore, ToolFailure> {
    let values = stdout
        .lines()
        .rev()
        .filter(|line| !line.trim().is_empty())
        .find_map(|line| {
            line.split_whitespace()
                .map(|token| token.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .ok()
        })
        .ok_or_else(|| ToolFailure::Unparsable {
            detail: format!("no numeric score line in output: '{}'", stdout.trim()),
        })?;
    let (total, terms) = values
        .split_first()
        .ok_or_else(|| ToolFailure::Unparsable {
            detail: "empty score line".to_string(),
        })?;
    Ok(EnergyScore {
        total: *total,
        terms: terms.to_vec(),
    })
}
