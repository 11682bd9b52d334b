//! Domain error types.

/// Top-level error type for taframe.
#[derive(Debug, thiserror::Error)]
pub enum TaframeError {
    #[error("no input supplied for '{parameter}' and no default column")]
    Configuration { parameter: String },

    #[error("column '{requested}' not found in [{}]", .available.join(", "))]
    ColumnNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("unknown indicator '{name}'")]
    UnknownIndicator { name: String },

    #[error("indicator '{indicator}' failed: {source}")]
    Dispatch {
        indicator: String,
        #[source]
        source: Box<TaframeError>,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TaframeError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Fails with [`TaframeError::Validation`] unless both lengths agree.
    pub fn check_lengths(what: &str, left: usize, right: usize) -> Result<(), Self> {
        if left == right {
            Ok(())
        } else {
            Err(Self::validation(format!(
                "{what}: observations do not match ({left} != {right})"
            )))
        }
    }

    /// The innermost error, looking through dispatch wrappers.
    pub fn root_cause(&self) -> &TaframeError {
        match self {
            TaframeError::Dispatch { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Process exit status for this error, decided by its root cause.
    pub fn exit_status(&self) -> u8 {
        match self.root_cause() {
            TaframeError::Io(_) | TaframeError::Data { .. } => 1,
            TaframeError::ConfigParse { .. } | TaframeError::ConfigInvalid { .. } => 2,
            TaframeError::Configuration { .. } | TaframeError::ColumnNotFound { .. } => 3,
            TaframeError::Validation { .. } => 4,
            TaframeError::UnknownIndicator { .. } | TaframeError::Dispatch { .. } => 5,
        }
    }
}

impl From<&TaframeError> for std::process::ExitCode {
    fn from(err: &TaframeError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
