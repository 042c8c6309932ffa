//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Report view to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Routing, consultations, debate trail and both report views
    Full,
    /// Clinical report only
    Clinical,
    /// Plain-language report only
    Plain,
    /// Machine-readable JSON
    Json,
}

impl From<OutputFormat> for consilium_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => consilium_domain::OutputFormat::Full,
            OutputFormat::Clinical => consilium_domain::OutputFormat::Clinical,
            OutputFormat::Plain => consilium_domain::OutputFormat::Plain,
            OutputFormat::Json => consilium_domain::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the full multi-specialist diagnosis on a case file
    Diagnose {
        /// Case document (plain text)
        file: PathBuf,
    },
    /// Score a case file and route it to the local, hybrid or remote tier
    Route {
        /// Case document (plain text)
        file: PathBuf,
    },
    /// Upload queued local results to the remote tier
    Sync,
    /// Show local tier status (offline mode, pending queue)
    Status,
}

/// CLI arguments for consilium
#[derive(Parser, Debug)]
#[command(name = "consilium")]
#[command(author, version, about = "Multi-specialist diagnostic consensus with tiered routing")]
#[command(long_about = r#"
Consilium asks several specialist models for an opinion on a medical case,
lets them revise against each other until they agree or the round budget runs
out, and merges the result into a clinical and a plain-language report.

`route` scores the case first: simple cases stay on the local model, medium
cases get a local assessment verified remotely, complex cases go straight to
the full specialist panel. While offline, local results are queued for `sync`.

Configuration files are loaded from (in priority order):
1. CONSILIUM_* environment variables
2. --config <path>     Explicit config file
3. ./consilium.toml    Project-level config
4. ~/.config/consilium/config.toml   Global config

Example:
  consilium diagnose case.txt
  consilium route --offline -o json case.txt
  consilium sync
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Force offline mode for the local tier
    #[arg(long, global = true)]
    pub offline: bool,

    /// Skip the debate and merge the initial opinions
    #[arg(long, global = true)]
    pub no_debate: bool,

    /// Maximum number of debate rounds
    #[arg(long, value_name = "N", global = true)]
    pub rounds: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnose_with_flags() {
        let cli = Cli::try_parse_from([
            "consilium", "diagnose", "case.txt", "--no-debate", "--rounds", "2", "-o", "clinical",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Diagnose {
                file: PathBuf::from("case.txt")
            })
        );
        assert!(cli.no_debate);
        assert_eq!(cli.rounds, Some(2));
        assert_eq!(cli.output, Some(OutputFormat::Clinical));
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["consilium", "-vv", "--offline", "route", "x.txt"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.offline);
        assert!(matches!(cli.command, Some(Command::Route { .. })));
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::try_parse_from(["consilium", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_negative_rounds_rejected() {
        assert!(Cli::try_parse_from(["consilium", "diagnose", "x", "--rounds", "-1"]).is_err());
    }

    #[test]
    fn test_format_maps_to_domain() {
        assert_eq!(
            consilium_domain::OutputFormat::from(OutputFormat::Plain),
            consilium_domain::OutputFormat::Plain
        );
    }
}
