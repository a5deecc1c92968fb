//! Ledger operations: deposit, withdraw and transfer.
//!
//! Each operation runs in its own `BEGIN IMMEDIATE` transaction, so the
//! balance check and the update cannot interleave with another writer.
//! A transfer is one transaction: either both sides are written or neither is.

use crate::errors::{RegistryError, Result};
use crate::store::{add_to_balance, select_balance, ClientStore};
use crate::tx::Tx;
use crate::types::{Amount, ClientKind};
use crate::validation::{validate_finite, validate_positive};
use log::debug;
use rusqlite::Connection;

/// **Deposits `amount` into an existing client's account**
///
/// The sign of `amount` is not checked: a negative deposit is accepted
/// and debits the account, without the funds check that `withdraw` does.
///
/// # Errors
/// - `amount` is NaN or infinite, `RegistryError::Validation`;
/// - No such client, `RegistryError::NotFound`.
pub fn deposit(
    store: &mut ClientStore,
    kind: ClientKind,
    document: &str,
    amount: Amount,
) -> Result<Tx> {
    validate_finite(amount)?;

    let tx = store.begin_immediate()?;
    let deposit = deposit_in(&tx, kind, document, amount)?;
    tx.commit()?;

    Ok(deposit)
}

/// **Withdraws `amount` from an existing client's account**
///
/// # Errors
/// - `amount` is not a positive finite number, `RegistryError::Validation`;
/// - No such client, `RegistryError::NotFound`;
/// - Balance smaller than `amount`, `RegistryError::InsufficientFunds`.
pub fn withdraw(
    store: &mut ClientStore,
    kind: ClientKind,
    document: &str,
    amount: Amount,
) -> Result<Tx> {
    validate_positive(amount)?;

    let tx = store.begin_immediate()?;
    let withdrawal = withdraw_in(&tx, kind, document, amount)?;
    tx.commit()?;

    Ok(withdrawal)
}

/// **Moves `amount` from the sender's account to the recipient's account**
///
/// Sender and recipient may be of different kinds.
/// Nothing is written unless both the withdrawal and the deposit succeed;
/// in particular, a missing recipient leaves the sender's balance untouched.
///
/// # Errors
/// - `amount` is not a positive finite number, `RegistryError::Validation`;
/// - Either client doesn't exist, `RegistryError::NotFound`;
/// - Sender's balance smaller than `amount`, `RegistryError::InsufficientFunds`.
pub fn transfer(
    store: &mut ClientStore,
    from_kind: ClientKind,
    from_document: &str,
    to_kind: ClientKind,
    to_document: &str,
    amount: Amount,
) -> Result<(Tx, Tx)> {
    validate_positive(amount)?;

    // Dropping `tx` on an early return rolls the withdrawal back.
    let tx = store.begin_immediate()?;
    let withdrawal = withdraw_in(&tx, from_kind, from_document, amount)?;
    let deposit = deposit_in(&tx, to_kind, to_document, amount)?;
    tx.commit()?;

    Ok((withdrawal, deposit))
}

fn deposit_in(conn: &Connection, kind: ClientKind, document: &str, amount: Amount) -> Result<Tx> {
    if add_to_balance(conn, kind, document, amount)? == 0 {
        return Err(RegistryError::not_found(kind, document));
    }

    debug!("deposited {} into {} {}", amount, kind, document);
    Ok(Tx::Deposit {
        kind,
        document: document.to_string(),
        amount,
    })
}

fn withdraw_in(conn: &Connection, kind: ClientKind, document: &str, amount: Amount) -> Result<Tx> {
    let balance = select_balance(conn, kind, document)?
        .ok_or_else(|| RegistryError::not_found(kind, document))?;

    if balance < amount {
        return Err(RegistryError::InsufficientFunds {
            document: document.to_string(),
            balance,
            requested: amount,
        });
    }

    add_to_balance(conn, kind, document, -amount)?;

    debug!("withdrew {} from {} {}", amount, kind, document);
    Ok(Tx::Withdraw {
        kind,
        document: document.to_string(),
        amount,
    })
}
