//! Core data types: the two client kinds and a client row.

use crate::errors::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Monetary amount as stored in the `balance` column (SQLite `REAL`).
pub type Amount = f64;

/// Length of an individual's document identifier.
pub const INDIVIDUAL_DOCUMENT_LEN: usize = 11;

/// Length of an organization's document identifier.
pub const ORGANIZATION_DOCUMENT_LEN: usize = 14;

/// **The category of a client**
///
/// The category is never stored; it is derived from the length of the
/// document identifier, and it selects the table the client lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// A natural person, with an 11-character document
    Individual,

    /// A legal entity, with a 14-character document
    Organization,
}

impl ClientKind {
    pub const ALL: [ClientKind; 2] = [ClientKind::Individual, ClientKind::Organization];

    /// **Classifies a document by its length**
    ///
    /// Length is counted in characters, not bytes.
    /// Control characters are rejected: SQLite's `length()` stops at a NUL,
    /// so such a document would never satisfy the table's length check.
    ///
    /// # Errors
    /// - A control character (`\0`, `\n`, ...), `ValidationError::DocumentControlChar`;
    /// - Any other length, `ValidationError::DocumentLength`.
    pub fn classify(document: &str) -> Result<Self, ValidationError> {
        if document.chars().any(char::is_control) {
            return Err(ValidationError::DocumentControlChar);
        }

        match document.chars().count() {
            INDIVIDUAL_DOCUMENT_LEN => Ok(ClientKind::Individual),
            ORGANIZATION_DOCUMENT_LEN => Ok(ClientKind::Organization),
            len => Err(ValidationError::DocumentLength(len)),
        }
    }

    /// The table holding clients of this kind
    pub fn table(&self) -> &'static str {
        match self {
            ClientKind::Individual => "clients_pf",
            ClientKind::Organization => "clients_pj",
        }
    }

    /// The short token users type at the prompt
    pub fn token(&self) -> &'static str {
        match self {
            ClientKind::Individual => "pf",
            ClientKind::Organization => "pj",
        }
    }

    pub fn document_len(&self) -> usize {
        match self {
            ClientKind::Individual => INDIVIDUAL_DOCUMENT_LEN,
            ClientKind::Organization => ORGANIZATION_DOCUMENT_LEN,
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKind::Individual => write!(f, "individual"),
            ClientKind::Organization => write!(f, "organization"),
        }
    }
}

impl FromStr for ClientKind {
    type Err = ValidationError;

    /// Accepts the `pf`/`pj` tokens and the full names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pf" | "individual" => Ok(ClientKind::Individual),
            "pj" | "organization" => Ok(ClientKind::Organization),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// **A registered client, as stored in its table**
#[derive(Clone, Debug, PartialEq)]
pub struct Client {
    pub kind: ClientKind,
    pub document: String,
    pub name: String,
    pub email: String,
    pub balance: Amount,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document: {}\nName: {}\nEmail: {}\nBalance: {:.2}",
            self.document, self.name, self.email, self.balance
        )
    }
}
