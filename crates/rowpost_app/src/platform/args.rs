use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Send one HTTP request per row of a delimited file.
#[derive(Debug, Parser)]
#[command(name = "rowpost", version, about)]
pub struct Args {
    /// RON configuration file.
    #[arg(short, long, default_value = "rowpost.ron")]
    pub config: PathBuf,

    /// Named profile from the configuration file.
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Directory listing the input files to choose from.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Diagnostic log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Also write diagnostic logs to the terminal.
    #[arg(long)]
    pub log_to_terminal: bool,
}
