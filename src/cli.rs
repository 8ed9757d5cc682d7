// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::MergePolicy;

/// Command-line arguments for `watchpoints`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchpoints",
    version,
    about = "Watch requested files and directory trees with a minimal set of non-recursive watches.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Watchpoints.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Watchpoints.toml")]
    pub config: String,

    /// Override `[config].merge_policy` ("collapse" or "append").
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<MergePolicy>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHPOINTS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Register every request, print the resulting watch points and
    /// directories, but don't start watching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_policy_override() {
        let args = CliArgs::try_parse_from(["watchpoints"]).unwrap();
        assert_eq!(args.config, "Watchpoints.toml");
        assert!(args.policy.is_none());
        assert!(!args.dry_run);

        let args = CliArgs::try_parse_from([
            "watchpoints",
            "--config",
            "ci/Watchpoints.toml",
            "--policy",
            "append",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.config, "ci/Watchpoints.toml");
        assert_eq!(args.policy, Some(MergePolicy::Append));
        assert!(args.dry_run);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(CliArgs::try_parse_from(["watchpoints", "--policy", "nested"]).is_err());
    }
}
