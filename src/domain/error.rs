//! Domain error types.

/// Top-level error type for matrader.
#[derive(Debug, thiserror::Error)]
pub enum MatraderError {
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

    #[error("data error for {ticker}: {reason}")]
    Data { ticker: String, reason: String },

    #[error("invalid moving-average window {window} for series of {len} observations")]
    InvalidWindow { window: usize, len: usize },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("misaligned series: {reason}")]
    MisalignedSeries { reason: String },

    #[error("no valid window pair among {candidates} candidates for series of {len} observations")]
    NoValidParameter { candidates: usize, len: usize },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {have} observations, need {need}")]
    InsufficientData {
        ticker: String,
        have: usize,
        need: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MatraderError> for std::process::ExitCode {
    fn from(err: &MatraderError) -> Self {
        let code: u8 = match err {
            MatraderError::Io(_) => 1,
            MatraderError::ConfigParse { .. }
            | MatraderError::ConfigMissing { .. }
            | MatraderError::ConfigInvalid { .. } => 2,
            MatraderError::Data { .. } => 3,
            MatraderError::InvalidWindow { .. }
            | MatraderError::InvalidParameter { .. }
            | MatraderError::MisalignedSeries { .. }
            | MatraderError::NoValidParameter { .. } => 4,
            MatraderError::NoData { .. } | MatraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
