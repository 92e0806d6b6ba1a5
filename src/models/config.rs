use camino::Utf8PathBuf;

/// Inputs of a single export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub target_file: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    /// Plan only; nothing is created or copied
    pub dry_run: bool,
}

impl ExportConfig {
    pub fn new(target_file: impl Into<Utf8PathBuf>, output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            target_file: target_file.into(),
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Console verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Debug,
}

impl LogLevel {
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (_, true) => LogLevel::Debug,
            (true, false) => LogLevel::Quiet,
            (false, false) => LogLevel::Normal,
        }
    }

    /// Filter directive understood by `EnvFilter`
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "warn",
            LogLevel::Normal => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Directory for daily-rotated log files; console only when unset
    pub log_dir: Option<Utf8PathBuf>,
}
