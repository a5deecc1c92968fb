use crate::types::{Amount, ClientKind};
use thiserror::Error;

pub const AMOUNT_NOT_VALID_MSG: &str = "Amount must be a number";

/// **Input rejected before it reaches the store**
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("document has {0} characters; it must have 11 (PF) or 14 (PJ)")]
    DocumentLength(usize),

    #[error("document cannot contain control characters")]
    DocumentControlChar,

    #[error("unknown client type \"{0}\"; expected pf or pj")]
    UnknownKind(String),

    #[error("name cannot be empty")]
    EmptyName,

    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Amount),

    #[error("amount must be a finite number")]
    NonFiniteAmount,
}

/// **An application-specific error type**
///
/// Every store and ledger operation returns this.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("client {0} already exists")]
    DuplicateClient(String),

    #[error("no {kind} client with document {document}")]
    NotFound { kind: ClientKind, document: String },

    #[error("client {document} has balance {balance:.2}, cannot withdraw {requested:.2}")]
    InsufficientFunds {
        document: String,
        balance: Amount,
        requested: Amount,
    },

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl RegistryError {
    pub(crate) fn not_found(kind: ClientKind, document: &str) -> Self {
        RegistryError::NotFound {
            kind,
            document: document.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
