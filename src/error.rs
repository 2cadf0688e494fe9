use thiserror::Error;

/// Failure taxonomy for the screening core.
///
/// `MissingData`, `Lookup`, and `Provider` are recoverable: the derivation
/// or ticker that hit them is skipped with a warning and processing moves
/// on. `InvalidInput` indicates a caller bug and always propagates.
#[derive(Debug, Error)]
pub enum Error {
    /// A required table or row is absent or not yet populated.
    #[error("missing data: {what}")]
    MissingData { what: String },

    /// An unknown key was looked up (ticker, ticker group, period label).
    #[error("unknown {kind}: {key}")]
    Lookup { kind: &'static str, key: String },

    /// Malformed caller input (bad shares-outstanding string, empty or
    /// zero SMA window, colliding row name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The market-data collaborator failed to produce a table.
    #[error("provider error for {ticker}: {message}")]
    Provider { ticker: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn missing(what: impl Into<String>) -> Self {
        Error::MissingData { what: what.into() }
    }

    /// Recoverable errors are skipped per-derivation / per-ticker;
    /// unrecoverable ones abort the batch.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::InvalidInput(_))
    }
}
