use std::path::PathBuf;

/// Upper bound for the worker count of a run.
pub const MAX_WORKERS: usize = 5;

/// Everything the engine needs to know about one kind of run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Placed verbatim in `Authorization: Bearer <token>`.
    pub token: String,
    pub method: String,
    pub url_template: String,
    pub body_template: String,
    /// Extra request headers; they replace defaults with the same name.
    pub headers: Vec<(String, String)>,
    /// Single character; empty means comma.
    pub separator: String,
    /// Header names to keep; empty keeps every column.
    pub fields: Vec<String>,
    pub workers: usize,
    pub max_workers: usize,
    /// Structured output file; `None` disables it.
    pub output_path: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            method: "POST".to_string(),
            url_template: String::new(),
            body_template: String::new(),
            headers: Vec::new(),
            separator: ",".to_string(),
            fields: Vec::new(),
            workers: 1,
            max_workers: MAX_WORKERS,
            output_path: None,
        }
    }
}

impl RunSettings {
    /// Requested worker count clamped to `[1, max_workers]`.
    pub fn effective_workers(&self) -> usize {
        self.workers.clamp(1, self.max_workers.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workers_are_clamped() {
        let mut settings = RunSettings::default();
        settings.workers = 0;
        assert_eq!(settings.effective_workers(), 1);
        settings.workers = 3;
        assert_eq!(settings.effective_workers(), 3);
        settings.workers = 50;
        assert_eq!(settings.effective_workers(), MAX_WORKERS);
        settings.max_workers = 0;
        assert_eq!(settings.effective_workers(), 1);
    }
}
