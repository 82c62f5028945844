use crate::cli::SuperposeArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use structbind::engine::config::{SuperposeConfig, SuperposeConfigBuilder};
use structbind::engine::error::EngineError;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialWaitConfig {
    pub base_timeout_ms: Option<u64>,
    pub per_file_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

/// Superposition settings as read from a TOML file; anything left out falls back to the
/// library defaults.
///
/// ```toml
/// min-fit-columns = 5
///
/// [wait]
/// base-timeout-ms = 20000
/// per-file-timeout-ms = 500
/// poll-interval-ms = 25
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialSuperposeConfig {
    #[serde(default)]
    pub wait: PartialWaitConfig,
    pub min_fit_columns: Option<usize>,
}

impl PartialSuperposeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Layers command-line overrides on top of the file values and validates the result.
    pub fn merge_with_cli(self, args: &SuperposeArgs) -> Result<SuperposeConfig> {
        let mut builder = SuperposeConfigBuilder::new();

        if let Some(ms) = args.timeout_ms.or(self.wait.base_timeout_ms) {
            builder = builder.base_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.wait.per_file_timeout_ms {
            builder = builder.per_file_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.wait.poll_interval_ms {
            builder = builder.poll_interval(Duration::from_millis(ms));
        }
        if let Some(columns) = args.min_columns.or(self.min_fit_columns) {
            builder = builder.min_fit_columns(columns);
        }

        let config = builder.build().map_err(EngineError::from)?;
        debug!("Final superposition configuration: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use structbind::engine::config::{ConfigError, DEFAULT_BASE_TIMEOUT, DEFAULT_MIN_FIT_COLUMNS};
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn superpose_args(extra: &[&str]) -> SuperposeArgs {
        let mut argv = vec!["structbind", "superpose", "-a", "aln.fasta", "-s", "structures.toml"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Superpose(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn empty_config_uses_library_defaults() {
        let config = PartialSuperposeConfig::default()
            .merge_with_cli(&superpose_args(&[]))
            .unwrap();
        assert_eq!(config, SuperposeConfig::default());
    }

    #[test]
    fn file_values_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            min-fit-columns = 5

            [wait]
            base-timeout-ms = 2000
            per-file-timeout-ms = 100
            poll-interval-ms = 25
            "#,
        );

        let config = PartialSuperposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&superpose_args(&[]))
            .unwrap();

        assert_eq!(config.min_fit_columns, 5);
        assert_eq!(config.wait.base_timeout, Duration::from_millis(2000));
        assert_eq!(config.wait.per_file_timeout, Duration::from_millis(100));
        assert_eq!(config.wait.poll_interval, Duration::from_millis(25));
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "min-fit-columns = 5\n[wait]\nbase-timeout-ms = 2000\n",
        );

        let config = PartialSuperposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&superpose_args(&["--min-columns", "8", "--timeout-ms", "750"]))
            .unwrap();

        assert_eq!(config.min_fit_columns, 8);
        assert_eq!(config.wait.base_timeout, Duration::from_millis(750));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "[wait]\npoll-interval-ms = 10\n");

        let config = PartialSuperposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&superpose_args(&[]))
            .unwrap();

        assert_eq!(config.wait.base_timeout, DEFAULT_BASE_TIMEOUT);
        assert_eq!(config.min_fit_columns, DEFAULT_MIN_FIT_COLUMNS);
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "min-columns = 5\n");

        let result = PartialSuperposeConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_values_are_a_config_error() {
        let result =
            PartialSuperposeConfig::default().merge_with_cli(&superpose_args(&["-m", "0"]));
        assert!(matches!(
            result,
            Err(CliError::Core(EngineError::Config {
                source: ConfigError::InvalidValue {
                    parameter: "min_fit_columns",
                    ..
                }
            }))
        ));
    }
}
