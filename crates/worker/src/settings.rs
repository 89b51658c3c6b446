//! Pipeline settings from command-line arguments and environment

use anyhow::{bail, Context, Result};
use clap::Args;
use std::time::Duration;

use dfextract_core::application::{ExitStatusPolicy, PipelineConfig};

/// Settings shared by every task run
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Seconds between heartbeats while a tool runs
    #[arg(long, env = "DFEXTRACT_PROGRESS_INTERVAL_SECS", default_value_t = 2)]
    pub progress_interval_secs: u64,

    /// Per-process time limit in seconds (no limit when unset)
    #[arg(long, env = "DFEXTRACT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Non-zero exit handling: ignore or error-only
    #[arg(long, env = "DFEXTRACT_EXIT_POLICY", default_value = "ignore")]
    pub exit_policy: String,

    /// dfindexeddb executable (name on PATH or path)
    #[arg(long, env = "DFEXTRACT_INDEXEDDB_BIN")]
    pub indexeddb_bin: Option<String>,

    /// dfleveldb executable (name on PATH or path)
    #[arg(long, env = "DFEXTRACT_LEVELDB_BIN")]
    pub leveldb_bin: Option<String>,
}

impl SettingsArgs {
    pub fn into_pipeline_config(self) -> Result<PipelineConfig> {
        if self.progress_interval_secs == 0 {
            bail!("Progress interval must be at least one second");
        }

        let exit_status_policy: ExitStatusPolicy = self
            .exit_policy
            .parse()
            .context("Invalid exit status policy")?;

        let mut config = PipelineConfig {
            progress_interval: Duration::from_secs(self.progress_interval_secs),
            timeout: self.timeout_secs.map(Duration::from_secs),
            exit_status_policy,
            ..Default::default()
        };
        if let Some(bin) = self.indexeddb_bin {
            config.indexeddb_program = expand(&bin);
        }
        if let Some(bin) = self.leveldb_bin {
            config.leveldb_program = expand(&bin);
        }

        Ok(config)
    }
}

/// `~` expansion for user supplied paths
pub fn expand(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: SettingsArgs,
    }

    fn parse(args: &[&str]) -> SettingsArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().settings
    }

    #[test]
    fn test_explicit_arguments() {
        let config = parse(&[
            "--progress-interval-secs",
            "5",
            "--timeout-secs",
            "600",
            "--exit-policy",
            "error-only",
            "--leveldb-bin",
            "/opt/dfindexeddb/bin/dfleveldb",
        ])
        .into_pipeline_config()
        .unwrap();

        assert_eq!(config.progress_interval, Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(600)));
        assert_eq!(config.exit_status_policy, ExitStatusPolicy::ErrorOnly);
        assert_eq!(config.leveldb_program, "/opt/dfindexeddb/bin/dfleveldb");
        assert_eq!(config.indexeddb_program, "dfindexeddb");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let settings = parse(&["--progress-interval-secs", "0"]);
        assert!(settings.into_pipeline_config().is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let settings = parse(&["--exit-policy", "strict"]);
        assert!(settings.into_pipeline_config().is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let expanded = expand("~/tools/dfindexeddb");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/tools/dfindexeddb"));
    }
}
