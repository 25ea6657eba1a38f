//! Command-line interface for the `fatal-force` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::states::normalize_state;
use crate::data::{SelectionError, StateSelection, YearSelection};
use crate::logging::Verbosity;

/// fatal-force - explore U.S. police fatal force incidents
///
/// Opens the interactive dashboard by default, or exports the chart
/// configurations and summaries for one selection.
#[derive(Debug, Parser)]
#[command(name = "fatal-force")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Read incidents from a local CSV instead of the remote source
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "url")]
    pub csv: Option<PathBuf>,

    /// Fetch incidents from this URL
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// The command to execute (defaults to `dashboard`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive dashboard
    Dashboard,

    /// Write chart configurations for one selection to a directory
    Export(ExportCommand),

    /// Print counts for one selection
    Summary(SummaryCommand),
}

/// Year and state filters shared by the batch commands.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Restrict to one year
    #[arg(short, long)]
    pub year: Option<i64>,

    /// Restrict to these states (repeatable, full names or abbreviations)
    #[arg(short, long = "state", value_name = "STATE")]
    pub states: Vec<String>,
}

impl SelectionArgs {
    pub fn year(&self) -> YearSelection {
        YearSelection::from(self.year)
    }

    /// No `--state` means every state.
    pub fn states(&self) -> Result<StateSelection, SelectionError> {
        if self.states.is_empty() {
            return Ok(StateSelection::All);
        }
        let names: Vec<String> = self
            .states
            .iter()
            .map(|s| normalize_state(s))
            .collect();
        StateSelection::from_choices(&names)
    }
}

#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output directory
    #[arg(short, long, default_value = "fatal-force-export")]
    pub out: PathBuf,

    /// Also render PNG images of the bar charts and age distributions
    #[arg(long)]
    pub png: bool,

    /// Open the output directory when done
    #[arg(long)]
    pub open: bool,
}

#[derive(Debug, Args)]
pub struct SummaryCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "fatal-force");
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["fatal-force"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["fatal-force", "-vv", "dashboard"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
        let cli = Cli::try_parse_from(["fatal-force", "-q", "-v"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "fatal-force",
            "export",
            "--year",
            "2017",
            "-s",
            "TX",
            "--state",
            "Ohio",
            "--out",
            "charts",
            "--png",
        ])
        .unwrap();
        let Some(Command::Export(cmd)) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(cmd.selection.year(), YearSelection::Year(2017));
        assert_eq!(
            cmd.selection.states().unwrap(),
            StateSelection::States(vec!["Texas".into(), "Ohio".into()])
        );
        assert_eq!(cmd.out, PathBuf::from("charts"));
        assert!(cmd.png);
        assert!(!cmd.open);
    }

    #[test]
    fn test_summary_defaults_to_everything() {
        let cli = Cli::try_parse_from(["fatal-force", "summary", "--json"]).unwrap();
        let Some(Command::Summary(cmd)) = cli.command else {
            panic!("expected summary");
        };
        assert!(cmd.json);
        assert_eq!(cmd.selection.year(), YearSelection::All);
        assert_eq!(cmd.selection.states().unwrap(), StateSelection::All);
    }

    #[test]
    fn test_csv_and_url_conflict() {
        let result = Cli::try_parse_from(["fatal-force", "--csv", "a.csv", "--url", "http://x"]);
        assert!(result.is_err());
    }
}
