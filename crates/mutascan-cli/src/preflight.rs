use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves an external tool executable before any work starts.
///
/// Paths with a directory component are taken literally; bare names are
/// searched on `$PATH`. A tool that cannot be resolved is a fatal
/// precondition failure, surfaced before the structure is even loaded.
pub fn resolve_executable(program: &Path) -> Result<PathBuf> {
    if program.components().count() > 1 {
        if program.is_file() {
            return Ok(program.to_path_buf());
        }
        return Err(CliError::MissingExecutable(
            program.display().to_string(),
        ));
    }

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            debug!(tool = %program.display(), resolved = %candidate.display(), "resolved executable");
            return Ok(candidate);
        }
    }
    Err(CliError::MissingExecutable(program.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn finds_binaries_on_path() {
        // sh is guaranteed on any platform the external tools run on.
        let resolved = resolve_executable(Path::new("sh")).unwrap();
        assert!(resolved.is_file());
    }

    #[test]
    fn missing_binaries_are_fatal() {
        let err = resolve_executable(Path::new("definitely-not-a-real-tool")).unwrap_err();
        assert!(matches!(err, CliError::MissingExecutable(_)));
    }

    #[test]
    fn explicit_paths_bypass_the_path_search() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("budeScan");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(resolve_executable(&tool).unwrap(), tool);

        let missing = dir.path().join("nope");
        assert!(resolve_executable(&missing).is_err());
    }
}
