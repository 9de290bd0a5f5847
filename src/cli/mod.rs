// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and routes to a use case.
// Plan and channel listings are formatted here; the install run
// reports through the Console it is handed.
//
// With no subcommand the top-level options are an install:
//
//   bert-env-setup --env conda --device gpu --cuda 111
//
// Top-level install options and a subcommand cannot be mixed;
// `--device gpu install` is a usage error, not a CPU install.

pub mod commands;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use commands::{ChannelsArgs, Commands, InstallArgs, PlanArgs};

use crate::application::{
    channels_use_case::ChannelsUseCase,
    install_use_case::{InstallConfig, InstallUseCase},
    plan_use_case::PlanUseCase,
};
use crate::domain::traits::StatusSink;
use crate::infra::{console::Console, process::SystemRunner};

#[derive(Parser, Debug)]
#[command(
    name = "bert-env-setup",
    version,
    about = "Set up a Python environment with PyTorch for BERT text classification.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable coloured status output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Install options used when no subcommand is given
    #[command(flatten)]
    pub install: InstallArgs,
}

impl Cli {
    /// Dispatch to the selected use case.
    pub fn run(self, console: &Console) -> Result<()> {
        match self.command {
            Some(Commands::Install(args))  => run_install(args, console),
            Some(Commands::Plan(args))     => run_plan(args),
            Some(Commands::Channels(args)) => run_channels(args),
            None                           => run_install(self.install, console),
        }
    }
}

fn run_install(args: InstallArgs, console: &Console) -> Result<()> {
    // Validation happens before anything is spawned
    let options = InstallConfig::from(args).resolve()?;

    console.info(&format!(
        "Setting up {} environment for {}",
        options.env_kind,
        options.device.label()
    ));

    let runner = SystemRunner::new();
    let report = InstallUseCase::new(options, &runner, console).execute()?;

    if report.framework.is_none() {
        tracing::warn!("Install finished without a passing PyTorch import check");
    }
    tracing::info!(
        "Verified {} packages; activate with `{}`",
        report.packages.entries.len(),
        report.env.activation_command()
    );
    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let options = InstallConfig::from(args.install).resolve()?;
    let plan    = PlanUseCase::new(options).execute()?;

    if args.json {
        let json = serde_json::to_string_pretty(&plan).context("Cannot serialise plan")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "Plan: {} environment, {} build ({} commands)",
        plan.options.env_kind,
        plan.options.device.label(),
        plan.commands.len()
    );
    for (i, cmd) in plan.commands.iter().enumerate() {
        println!("{:>3}. {}", i + 1, cmd);
    }
    Ok(())
}

fn run_channels(args: ChannelsArgs) -> Result<()> {
    let rows = ChannelsUseCase.rows();

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Cannot serialise channels")?;
        println!("{json}");
        return Ok(());
    }

    println!("{:<6} {:<8} {:<10} INDEX", "CODE", "CHANNEL", "TOOLKIT");
    for row in rows {
        let marker = if row.default { " (default)" } else { "" };
        println!(
            "{:<6} {:<8} {:<10} {}{}",
            row.code, row.channel, row.label, row.index_url, marker
        );
    }
    Ok(())
}
