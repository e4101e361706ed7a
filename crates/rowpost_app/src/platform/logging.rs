//! Diagnostic logging setup for the shell.
//!
//! Logs go to `./rowpost.log` so they do not mix with the interactive output.

use std::path::PathBuf;

use rowpost_logging::{LogDestination, DEFAULT_LOG_FILE};

use super::Args;

pub(crate) fn initialize(args: &Args) {
    let file = PathBuf::from(DEFAULT_LOG_FILE);
    let destination = if args.log_to_terminal {
        LogDestination::Both(file)
    } else {
        LogDestination::File(file)
    };
    rowpost_logging::initialize(destination, args.log_level);
}
