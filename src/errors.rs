use crate::entities::invoice::InvoiceStatus;
use thiserror::Error;

/// Every failure the invoicing core can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A referenced row does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of row that was looked up (e.g. "Invoice")
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Caller is not the owner or lacks the admin role
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Why access was refused
        message: String,
    },

    /// A lifecycle guard was violated
    #[error("Invalid transition: cannot {action} an invoice in {from} state")]
    InvalidTransition {
        /// Status the invoice was in
        from: InvoiceStatus,
        /// Transition that was attempted
        action: &'static str,
    },

    /// Aggregation selected nothing to invoice
    #[error("No draft entries found for this period")]
    NoEntriesFound,

    /// Rows changed underneath a transition
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting change
        message: String,
    },

    /// config.toml could not be read or holds invalid values
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP-style status code a request handler should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::InvalidTransition { .. } | Self::NoEntriesFound => 400,
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => 500,
        }
    }

    /// True for storage and process failures, as opposed to domain errors.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.status_code() == 500
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub(crate) fn invoice_not_found(invoice_id: i64) -> Self {
        Self::NotFound {
            entity: "Invoice",
            id: invoice_id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
