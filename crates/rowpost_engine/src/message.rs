use std::fmt;

/// Category of a user-facing log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Info,
    Config,
    Csv,
    Request,
    Warning,
    Sink,
    Cancel,
    Summary,
}

impl MessageKind {
    pub fn icon(self) -> &'static str {
        match self {
            MessageKind::Info => "ℹ️",
            MessageKind::Config => "⚙️",
            MessageKind::Csv => "📄",
            MessageKind::Request => "🌐",
            MessageKind::Warning => "⚠️",
            MessageKind::Sink => "💾",
            MessageKind::Cancel => "🛑",
            MessageKind::Summary => "🏁",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Info => "INFO",
            MessageKind::Config => "CONFIG",
            MessageKind::Csv => "CSV",
            MessageKind::Request => "REQUEST",
            MessageKind::Warning => "WARNING",
            MessageKind::Sink => "OUTPUT",
            MessageKind::Cancel => "CANCEL",
            MessageKind::Summary => "SUMMARY",
        }
    }
}

/// An immutable line of the in-memory log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    kind: MessageKind,
    text: String,
}

impl LogMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, text)
    }

    pub fn csv(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Csv, text)
    }

    pub fn request(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Request, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, text)
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Single-line form shown by the shell. Embedded newlines are flattened.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: ", self.kind.icon(), self.kind.label())?;
        for (idx, line) in self.text.lines().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}
