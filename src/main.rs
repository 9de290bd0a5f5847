#![allow(dead_code)]

mod application;
mod cli;
mod domain;
mod infra;
mod provision;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use domain::{error::SetupError, traits::StatusSink};
use infra::console::Console;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help / --version are not failures; usage errors exit 1
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let directive = log_directive(cli.verbose, std::env::var("RUST_LOG").ok());
    let filter    = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(log_directive(cli.verbose, None)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let console = Console::new(cli.no_color);

    match cli.run(&console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<SetupError>() {
            Some(setup) => {
                tracing::debug!("aborted: {}", setup.error_code());
                console.error(&setup.to_string());
                if let Some(hint) = setup.hint() {
                    console.hint(hint);
                }
                ExitCode::from(setup.exit_code())
            }
            None => {
                console.error(&format!("{err:#}"));
                ExitCode::FAILURE
            }
        },
    }
}

/// Log filter directive: a non-empty `RUST_LOG` wins at any
/// verbosity, otherwise `-v` picks the level.
fn log_directive(verbose: u8, rust_log: Option<String>) -> String {
    if let Some(directive) = rust_log.filter(|d| !d.trim().is_empty()) {
        return directive;
    }
    match verbose {
        0 => "bert_env_setup=warn",
        1 => "bert_env_setup=info",
        2 => "bert_env_setup=debug",
        _ => "trace",
    }
    .to_string()
}
