//! Domain error types.

/// Top-level error type for masweep.
#[derive(Debug, thiserror::Error)]
pub enum MasweepError {
    #[error("data error: {reason}")]
    DataLoad { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid strategy config: {reason}")]
    StrategyInvalid { reason: String },

    #[error("series is missing indicator column MA{period}")]
    MissingIndicator { period: usize },

    #[error("cannot satisfy {slow} > {fast} within {attempts} draws")]
    UnsatisfiableConstraint {
        fast: String,
        slow: String,
        attempts: usize,
    },

    #[error("constraint references unknown parameter {name}")]
    UnknownParameter { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MasweepError> for std::process::ExitCode {
    fn from(err: &MasweepError) -> Self {
        let code: u8 = match err {
            MasweepError::Io(_) => 1,
            MasweepError::ConfigParse { .. }
            | MasweepError::ConfigMissing { .. }
            | MasweepError::ConfigInvalid { .. } => 2,
            MasweepError::DataLoad { .. } | MasweepError::Report { .. } => 3,
            MasweepError::StrategyInvalid { .. } | MasweepError::MissingIndicator { .. } => 4,
            MasweepError::UnsatisfiableConstraint { .. } | MasweepError::UnknownParameter { .. } => {
                5
            }
        };
        std::process::ExitCode::from(code)
    }
}
