//! CLI command definitions for the `qualifier` binary.
//!
//! Uses clap derive macros for argument parsing. Identity values can come from
//! flags or `QUALIFIER_*` environment variables and override `qualifier.toml`.

pub mod config;
pub mod run;
pub mod select;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use qualifier_infra::config::{ConfigOverrides, load_config, resolve_config_path};
use qualifier_types::config::QualifierConfig;

/// Register, pick the parity query, store it, and submit it.
#[derive(Parser)]
#[command(name = "qualifier", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to qualifier.toml (defaults to ./qualifier.toml, then ~/.qualifier/qualifier.toml).
    #[arg(long, global = true, env = "QUALIFIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry. The exporter writes to
    /// stdout, so this cannot be combined with `--json`.
    #[arg(long, global = true, conflicts_with = "json")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full flow: register, select, store, submit.
    Run {
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Show which artifact an identifier selects, without any I/O.
    Select {
        /// Registration identifier (defaults to the configured reg_no, after overrides).
        identifier: Option<String>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Print the resolved configuration.
    Config {
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Per-run overrides for values in qualifier.toml.
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Candidate name.
    #[arg(long, env = "QUALIFIER_NAME")]
    pub name: Option<String>,

    /// Registration identifier; its digits decide the artifact.
    #[arg(long, env = "QUALIFIER_REG_NO")]
    pub reg_no: Option<String>,

    /// Candidate email.
    #[arg(long, env = "QUALIFIER_EMAIL")]
    pub email: Option<String>,

    /// Output file for the selected query.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<&OverrideArgs> for ConfigOverrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            name: args.name.clone(),
            reg_no: args.reg_no.clone(),
            email: args.email.clone(),
            output: args.output.clone(),
        }
    }
}

/// Resolve, load, and validate the configuration.
pub async fn load(
    explicit: Option<&Path>,
    overrides: &OverrideArgs,
) -> anyhow::Result<QualifierConfig> {
    let path = resolve_config_path(explicit);
    let overrides = ConfigOverrides::from(overrides);
    let config = load_config(&path, &overrides)
        .await
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(config)
}
