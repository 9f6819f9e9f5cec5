use std::process::ExitCode;

use clap::Parser;
use envctl::cli::{execute, Cli};
use lib_core::Printer;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CRATES: &[&str] = &["envctl", "lib_core", "lib_aws", "lib_git"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("ENVCTL_LOG").unwrap_or_else(|_| {
        let level = if cli.global.verbose { "debug" } else { "warn" };
        let directives: Vec<String> = CRATES.iter().map(|c| format!("{}={}", c, level)).collect();
        EnvFilter::new(directives.join(","))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match execute(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            debug!(kind = e.kind(), context = %e.details().context, "command failed");
            Printer::new().error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
