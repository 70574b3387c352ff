use std::path::PathBuf;
use thiserror::Error;

/// Rejected `ASSESSOR_*` settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `ASSESSOR_PORT` is not a number in 1..=65535.
    #[error("ASSESSOR_PORT='{value}' is not a usable port: {reason}")]
    InvalidPort { value: String, reason: String },

    #[error("ASSESSOR_BIND_ADDR='{value}' is not an IP address")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{name}='{value}' rejected: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{setting} points at {path}, which does not exist")]
    PathNotFound { setting: &'static str, path: PathBuf },

    /// The path exists but is a file where a directory is needed, or the reverse.
    #[error("{setting} points at {path}, which is not a {expected}")]
    WrongPathKind {
        setting: &'static str,
        path: PathBuf,
        expected: &'static str,
    },
}
