use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const INPUT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Regular files in `dir` that look like delimited input, sorted by name.
pub(crate) fn list_input_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    INPUT_EXTENSIONS
                        .iter()
                        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
                })
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_only_delimited_files_in_order() {
        let temp = TempDir::new().unwrap();
        for name in ["b.csv", "a.TSV", "notes.md", "c.txt"] {
            fs::write(temp.path().join(name), "x").unwrap();
        }
        fs::create_dir(temp.path().join("dir.csv")).unwrap();

        let names: Vec<String> = list_input_files(temp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.TSV", "b.csv", "c.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(list_input_files(&temp.path().join("absent")).is_err());
    }
}
