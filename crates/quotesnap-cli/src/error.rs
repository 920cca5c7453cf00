use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Lookup failures never reach this type. Only logging setup and a broken
/// stdout do, and main treats a logging failure as a warning.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to init logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Logging(_) => 1,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
