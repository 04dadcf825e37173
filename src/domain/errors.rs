//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure (RPC) errors into these. Each variant carries
//! the exit code the process terminates with when it reaches the top level.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OsintError {
    #[error("Target not found: {0}")]
    NotFound(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Admin rights required: {0}")]
    AdminRequired(String),

    /// FloodWait: the platform mandates a wait. Surfaced to the operator,
    /// never retried automatically.
    #[error("Rate limited. Retry after {seconds}s")]
    FloodWait { seconds: u64 },

    #[error("Telegram RPC error: {0}")]
    Rpc(String),

    /// Malformed message URL. Raised before any network call.
    #[error("Unsupported message URL: {0}")]
    BadUrl(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl OsintError {
    /// Process exit code for this error when it aborts the invocation.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::InvalidHandle(_) | Self::BadUrl(_) => 2,
            Self::AccessDenied(_) => 3,
            Self::AdminRequired(_) => 4,
            Self::FloodWait { .. } => 5,
            Self::Rpc(_) => 6,
            Self::Auth(_) | Self::Config(_) => 1,
            Self::Unexpected(_) => 10,
        }
    }
}
