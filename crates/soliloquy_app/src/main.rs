mod cli;
mod terminal;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();
    terminal::run_app(args)
}
