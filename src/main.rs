use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use course_probe::cli::Cli;
use course_probe::{ConsoleReporter, ProbeConfig, ProbeRunner, RunEnd, default_plan, logging};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init_cli();

    let cli = Cli::parse();
    let config = ProbeConfig::default().with_base_url(cli.url);

    let now = Local::now();
    let plan = default_plan(&config, &now.format("%H%M%S").to_string());
    let reporter = ConsoleReporter::new();
    reporter.print_banner(&config.base_url, &now.format("%Y-%m-%d %H:%M:%S").to_string());

    let mut runner = ProbeRunner::new(&config).context("Failed to initialise probe runner")?;

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let end = runner
        .run_until(
            &plan,
            |index, step, result| reporter.print_probe(index, step, result),
            interrupt,
        )
        .await;

    if let RunEnd::Aborted(_, err) = &end {
        reporter.print_abort(&err.to_string());
    }
    reporter.print_summary(end.report());

    Ok(match end {
        RunEnd::Aborted(..) => ExitCode::FAILURE,
        RunEnd::Completed(_) | RunEnd::Interrupted(_) => ExitCode::SUCCESS,
    })
}
