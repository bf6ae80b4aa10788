//! markscan: static analysis of HTML, JSP, PHP and Vue templates.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args = Args::parse();

    // MARKSCAN_LOG takes precedence over -v
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("MARKSCAN_LOG")
                .unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let summary = orchestrator::run(&args).into_diagnostic()?;

    if args.fail_on_issues && summary.issue_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}
