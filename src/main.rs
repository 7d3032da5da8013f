//! Command-line interface for docstress
//!
//! # Usage Examples
//!
//! ```bash
//! # Insert scenario, 10 clients x 10 runs, in-process store
//! docstress run --scenario insert --clients 10 --runs 10
//!
//! # Delete scenario against SurrealDB with a 5 minute barrier deadline
//! docstress run --scenario delete --clients 50 --runs 50 \
//!   --backend surreal --surreal-endpoint ws://localhost:8000 \
//!   --deadline-secs 300
//!
//! # Insert then delete for the standard matrix, JSON output
//! docstress suite --output json
//! ```

use anyhow::Context;
use clap::Parser;
use docstress::cli::{Cli, Commands, OutputFormat};
use docstress::{run_context, Orchestrator, ScenarioKind};
use stress_framework::format::{format_suite_table, format_table};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let orchestrator = Orchestrator::new(run_context(&args.service, &args.stress));
            let scenario = ScenarioKind::from(args.scenario);

            let report = orchestrator
                .execute(args.clients, args.runs, scenario)
                .await
                .with_context(|| {
                    format!(
                        "{} run with {} clients x {} runs did not start",
                        scenario, args.clients, args.runs
                    )
                })?;

            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => print!("{}", format_table(&report)),
            }

            if !report.passed() {
                anyhow::bail!("{} scenario failed", scenario);
            }
        }
        Commands::Suite(args) => {
            let orchestrator = Orchestrator::new(run_context(&args.service, &args.stress));

            let mut outcomes = Vec::new();
            for (clients, runs) in args.configurations() {
                info!("Suite configuration: {} clients x {} runs", clients, runs);
                outcomes.extend(orchestrator.run_suite(clients, runs).await);
            }

            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
                OutputFormat::Table => print!("{}", format_suite_table(&outcomes)),
            }

            let failed = outcomes.iter().filter(|o| o.failed()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} suite entries failed", failed, outcomes.len());
            }
        }
    }

    Ok(())
}
