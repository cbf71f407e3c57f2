use thiserror::Error;

#[derive(Error, Debug)]
pub enum GinfoError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Ambiguous attribute: {token} (could be {})", .candidates.join(", "))]
    AmbiguousAttribute {
        token: String,
        candidates: Vec<String>,
    },

    #[error("Unable to query {host}: {reason}")]
    FetchFailure { host: String, reason: String },

    #[error("Timeout of {seconds} second(s) expired while querying {host}")]
    FetchTimeout { host: String, seconds: u64 },

    #[error("{0}")]
    Usage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GinfoError {
    /// Exit status the CLI reports for this error.
    ///
    /// Usage-class errors (a name the user typed that does not resolve) use 2,
    /// matching clap's own usage errors; everything else uses 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GinfoError::UnknownAttribute(_)
            | GinfoError::AmbiguousAttribute { .. }
            | GinfoError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GinfoError>;
