/// Core error type for the relay.
///
/// Adapter crates map their specific errors (SQLite, Telegram) into this type
/// so the service layer can decide between a user-facing notice, a degraded
/// default and a log line.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
