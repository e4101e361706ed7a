use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Local;
use rowpost_core::{AppViewModel, SessionState};

/// Prints the status line and, when no run is active, the file menu.
pub(crate) fn render_view(
    out: &mut impl Write,
    view: &AppViewModel,
    files: &[PathBuf],
) -> io::Result<()> {
    writeln!(out, "-- {}", view.status_line())?;
    if view.session != SessionState::Running {
        if files.is_empty() {
            writeln!(out, "   (no .csv/.tsv/.txt files found)")?;
        }
        for (idx, path) in files.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            writeln!(out, "   {:>2}) {}", idx + 1, name)?;
        }
        writeln!(out, "   <n> run file, r refresh, q quit")?;
    }
    out.flush()
}

/// Prints freshly appended log lines with a local timestamp.
pub(crate) fn render_log_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    let stamp = Local::now().format("%H:%M:%S");
    for line in lines {
        writeln!(out, "{stamp} {line}")?;
    }
    out.flush()
}
