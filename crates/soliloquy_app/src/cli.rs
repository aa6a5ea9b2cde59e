use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about = "Find reading music for a book title", long_about = None)]
pub struct Cli {
    /// Book title. When given, submit it once, print the result and exit.
    pub title: Option<String>,

    /// RON configuration file. Defaults to ./soliloquy.ron when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Recommendation endpoint, overriding the configuration file.
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Write each recommendation as an HTML page to this path.
    #[arg(long)]
    pub results_page: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Print the heading without the letter-by-letter reveal.
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}
