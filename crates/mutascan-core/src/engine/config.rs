use crate::engine::activation::ActivationSet;
use crate::engine::error::EngineError;
use crate::engine::substitution::SubstitutionSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Validation(#[from] EngineError),

    #[error("Failed to read tool settings from '{path}': {message}", path = path.display())]
    ToolSettings { path: PathBuf, message: String },
}

/// Which substitution policy the scan uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanMode {
    /// Mutate every position to the fixed default list.
    Full,
    /// Mutate every position to the given one-letter codes.
    Manual(Vec<String>),
}

/// Settings for the external placement and scoring tools.
///
/// Loadable from a TOML file, with every field optional so the CLI can layer
/// its own overrides on top of the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub placer_path: PathBuf,
    pub scorer_path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            placer_path: PathBuf::from("scwrl4"),
            scorer_path: PathBuf::from("budeScan"),
            timeout_secs: 600,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct ToolSettingsFile {
    #[serde(rename = "placer-path")]
    placer_path: Option<PathBuf>,
    #[serde(rename = "scorer-path")]
    scorer_path: Option<PathBuf>,
    #[serde(rename = "timeout-secs")]
    timeout_secs: Option<u64>,
}

impl ToolSettings {
    /// Reads settings from a TOML file; absent keys keep their defaults.
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ToolSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file: ToolSettingsFile =
            toml::from_str(&text).map_err(|e| ConfigError::ToolSettings {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let defaults = Self::default();
        Ok(Self {
            placer_path: file.placer_path.unwrap_or(defaults.placer_path),
            scorer_path: file.scorer_path.unwrap_or(defaults.scorer_path),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        })
    }
}

/// Immutable per-run configuration, built once at startup and passed by
/// reference into the workflow. There is no ambient process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Target chain identifiers, in scan order.
    pub chains: Vec<char>,
    /// The validated substitution set (full defaults or manual list).
    pub substitutions: SubstitutionSet,
    /// Requested activation set, before the rotamer-correction flag is
    /// applied by the workflow.
    pub activation: ActivationSet,
    /// Whether rotamer correction is enabled at all.
    pub rotamer_correction: bool,
    /// Which model of a multi-model structure is scanned (zero-based).
    pub model_index: usize,
    /// Run workspace; per-variant working directories are created beneath it.
    pub workspace: PathBuf,
    pub tools: ToolSettings,
}

#[derive(Default)]
pub struct ScanConfigBuilder {
    chains: Option<Vec<char>>,
    mode: Option<ScanMode>,
    activation_codes: Option<Vec<String>>,
    rotamer_correction: Option<bool>,
    model_index: Option<usize>,
    workspace: Option<PathBuf>,
    tools: Option<ToolSettings>,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chains(mut self, chains: Vec<char>) -> Self {
        self.chains = Some(chains);
        self
    }
    pub fn mode(mut self, mode: ScanMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn activation_codes(mut self, codes: Vec<String>) -> Self {
        self.activation_codes = Some(codes);
        self
    }
    pub fn rotamer_correction(mut self, enabled: bool) -> Self {
        self.rotamer_correction = Some(enabled);
        self
    }
    pub fn model_index(mut self, index: usize) -> Self {
        self.model_index = Some(index);
        self
    }
    pub fn workspace(mut self, path: PathBuf) -> Self {
        self.workspace = Some(path);
        self
    }
    pub fn tools(mut self, tools: ToolSettings) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// Manual substitution lists and activation codes are validated here,
    /// before any variant or working directory exists; a single invalid code
    /// rejects the whole run.
    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        let mut chains = self.chains.ok_or(ConfigError::MissingParameter("chains"))?;
        if chains.is_empty() {
            return Err(ConfigError::MissingParameter("chains"));
        }
        // A repeated chain would enumerate the same positions twice and the
        // driver would trip the matrix duplicate check; keep first occurrences.
        let mut seen = Vec::with_capacity(chains.len());
        chains.retain(|&chain| {
            if seen.contains(&chain) {
                false
            } else {
                seen.push(chain);
                true
            }
        });
        let mode = self.mode.ok_or(ConfigError::MissingParameter("mode"))?;
        let substitutions = match &mode {
            ScanMode::Full => SubstitutionSet::full(),
            ScanMode::Manual(codes) => SubstitutionSet::manual(codes)?,
        };
        let activation = match &self.activation_codes {
            Some(codes) => ActivationSet::from_codes(codes)?,
            None => ActivationSet::default_set(),
        };
        Ok(ScanConfig {
            chains,
            substitutions,
            activation,
            rotamer_correction: self.rotamer_correction.unwrap_or(true),
            model_index: self.model_index.unwrap_or(0),
            workspace: self
                .workspace
                .ok_or(ConfigError::MissingParameter("workspace"))?,
            tools: self.tools.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::AminoAcid;
    use std::io::Write;

    fn minimal_builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
            .chains(vec!['A'])
            .mode(ScanMode::Full)
            .workspace(PathBuf::from("/tmp/scan"))
    }

    #[test]
    fn build_requires_chains_mode_and_workspace() {
        assert!(matches!(
            ScanConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("chains"))
        ));
        assert!(matches!(
            ScanConfigBuilder::new().chains(vec!['A']).build(),
            Err(ConfigError::MissingParameter("mode"))
        ));
        assert!(matches!(
            ScanConfigBuilder::new()
                .chains(vec!['A'])
                .mode(ScanMode::Full)
                .build(),
            Err(ConfigError::MissingParameter("workspace"))
        ));
    }

    #[test]
    fn empty_chain_list_is_rejected() {
        let result = ScanConfigBuilder::new()
            .chains(vec![])
            .mode(ScanMode::Full)
            .workspace(PathBuf::from("/tmp/scan"))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter("chains"))
        ));
    }

    #[test]
    fn repeated_chain_identifiers_are_deduplicated() {
        let config = ScanConfigBuilder::new()
            .chains(vec!['A', 'B', 'A', 'B'])
            .mode(ScanMode::Full)
            .workspace(PathBuf::from("/tmp/scan"))
            .build()
            .unwrap();
        assert_eq!(config.chains, vec!['A', 'B']);
    }

    #[test]
    fn defaults_are_applied() {
        let config = minimal_builder().build().unwrap();
        assert!(config.rotamer_correction);
        assert_eq!(config.model_index, 0);
        assert_eq!(config.activation.one_letter_string(), "DERKH");
        assert_eq!(config.substitutions.len(), 11);
        assert_eq!(config.tools, ToolSettings::default());
    }

    #[test]
    fn manual_mode_is_validated_at_build_time() {
        let result = minimal_builder()
            .mode(ScanMode::Manual(vec!["F".into(), "X".into()]))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::Validation(EngineError::InvalidResidues { .. }))
        ));

        let config = minimal_builder()
            .mode(ScanMode::Manual(vec!["F".into(), "W".into()]))
            .build()
            .unwrap();
        assert_eq!(
            config.substitutions.targets(),
            &[AminoAcid::Phenylalanine, AminoAcid::Tryptophan]
        );
    }

    #[test]
    fn activation_codes_are_validated_at_build_time() {
        let result = minimal_builder()
            .activation_codes(vec!["D".into(), "B".into()])
            .build();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn tool_settings_load_from_toml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "placer-path = \"/opt/scwrl4/Scwrl4\"").unwrap();
        writeln!(file, "timeout-secs = 120").unwrap();
        let settings = ToolSettings::from_toml_path(file.path()).unwrap();
        assert_eq!(settings.placer_path, PathBuf::from("/opt/scwrl4/Scwrl4"));
        assert_eq!(settings.scorer_path, PathBuf::from("budeScan"));
        assert_eq!(settings.timeout_secs, 120);
    }

    #[test]
    fn tool_settings_reject_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no-such-key = 1").unwrap();
        assert!(ToolSettings::from_toml_path(file.path()).is_err());
    }
}
