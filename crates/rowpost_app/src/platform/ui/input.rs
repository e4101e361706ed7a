//! Translation of typed commands into shell events.

use std::path::PathBuf;

use rowpost_core::Msg;

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Dispatch(Msg),
    RefreshFiles,
    Unknown(String),
}

pub(crate) fn parse_command(line: &str, files: &[PathBuf]) -> Command {
    let line = line.trim();
    match line {
        "" | "r" | "l" => Command::RefreshFiles,
        "c" => Command::Dispatch(Msg::CancelRequested),
        "q" => Command::Dispatch(Msg::QuitRequested),
        _ => match line.parse::<usize>() {
            Ok(index) if (1..=files.len()).contains(&index) => {
                Command::Dispatch(Msg::FileSelected(files[index - 1].clone()))
            }
            _ => Command::Unknown(line.to_string()),
        },
    }
}
