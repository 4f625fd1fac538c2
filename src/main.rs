use clap::Parser;
use colored::Colorize;
use raw_k8s_tfc::{cli::Cli, config};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> raw_k8s_tfc::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    raw_k8s_tfc::run_command(cli.command, &config, cli.quiet)
}
