use crate::types::{Amount, ClientKind};
use std::fmt;

/// **A transaction type**
///
/// One record per balance change that was committed to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Tx {
    Deposit {
        kind: ClientKind,
        document: String,
        amount: Amount,
    },
    Withdraw {
        kind: ClientKind,
        document: String,
        amount: Amount,
    },
}

impl fmt::Display for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tx::Deposit {
                kind,
                document,
                amount,
            } => write!(f, "deposit  {} {} {:.2}", kind.token(), document, amount),
            Tx::Withdraw {
                kind,
                document,
                amount,
            } => write!(f, "withdraw {} {} {:.2}", kind.token(), document, amount),
        }
    }
}
