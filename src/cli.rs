//! CLI argument definitions for docstress.

use crate::{ServiceOpts, StressOpts};
use clap::{Parser, Subcommand, ValueEnum};
use stress_framework::ScenarioKind;

/// Concurrent update stress testing for hierarchical document stores.
#[derive(Parser)]
#[command(name = "docstress")]
#[command(about = "Concurrent update stress testing for hierarchical document stores")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one scenario
    Run(RunArgs),

    /// Run insert then delete for one configuration, or the standard matrix
    Suite(SuiteArgs),
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Scenario choice for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioChoice {
    Insert,
    Delete,
}

impl From<ScenarioChoice> for ScenarioKind {
    fn from(choice: ScenarioChoice) -> Self {
        match choice {
            ScenarioChoice::Insert => ScenarioKind::Insert,
            ScenarioChoice::Delete => ScenarioKind::Delete,
        }
    }
}

/// Arguments for the run command.
#[derive(clap::Args, Clone)]
pub struct RunArgs {
    /// Mutation scenario
    #[arg(long, short = 's')]
    pub scenario: ScenarioChoice,

    /// Number of concurrent clients
    #[arg(long, short = 'c', default_value = "10")]
    pub clients: usize,

    /// Statements per client
    #[arg(long, short = 'r', default_value = "10")]
    pub runs: usize,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub service: ServiceOpts,

    #[command(flatten)]
    pub stress: StressOpts,
}

/// Arguments for the suite command.
#[derive(clap::Args, Clone)]
pub struct SuiteArgs {
    /// Number of concurrent clients (standard matrix when omitted)
    #[arg(long, short = 'c', requires = "runs")]
    pub clients: Option<usize>,

    /// Statements per client (standard matrix when omitted)
    #[arg(long, short = 'r', requires = "clients")]
    pub runs: Option<usize>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub service: ServiceOpts,

    #[command(flatten)]
    pub stress: StressOpts,
}

impl SuiteArgs {
    /// Configurations the suite runs.
    pub fn configurations(&self) -> Vec<(usize, usize)> {
        match (self.clients, self.runs) {
            (Some(clients), Some(runs)) => vec![(clients, runs)],
            _ => stress_framework::STANDARD_MATRIX.to_vec(),
        }
    }
}
