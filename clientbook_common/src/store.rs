//! SQLite storage for clients
//!
//! Individuals and organizations live in two tables of identical shape,
//! `clients_pf` and `clients_pj`; [`ClientKind::table`] picks the one to use.

use crate::errors::{RegistryError, Result};
use crate::types::{Amount, Client, ClientKind};
use crate::validation::{validate_email, validate_name};
use log::{debug, info};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another connection's write lock before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// **A handle on the client database**
///
/// Owns the one connection used for the whole session;
/// the connection is closed when the store is dropped.
pub struct ClientStore {
    conn: Connection,
}

impl ClientStore {
    /// Opens (creating if needed) the database file at `path`
    /// and makes sure both tables exist.
    ///
    /// Several stores may be open on the same file; their writes queue up
    /// for at most [`BUSY_TIMEOUT`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        info!("opened client database at {}", path.display());
        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Creates an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// **Creates both client tables if they don't exist yet**
    ///
    /// Idempotent. Both statements run in one transaction,
    /// so a failure leaves the schema as it was.
    pub fn ensure_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for kind in ClientKind::ALL {
            tx.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        document TEXT PRIMARY KEY NOT NULL CHECK (length(document) = {}),
                        name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        balance REAL NOT NULL DEFAULT 0.0
                    )",
                    kind.table(),
                    kind.document_len()
                ),
                [],
            )?;
        }
        tx.commit()?;
        debug!("client schema is in place");
        Ok(())
    }

    /// **Registers a new client with a zero balance**
    ///
    /// The table is chosen by the document's length.
    ///
    /// # Errors
    /// - Document length is neither 11 nor 14, document contains a control
    ///   character, or name or email is blank, `RegistryError::Validation`;
    /// - Document already registered, `RegistryError::DuplicateClient`;
    /// - Anything else the database reports, `RegistryError::Store`.
    pub fn register(&mut self, document: &str, name: &str, email: &str) -> Result<Client> {
        let kind = ClientKind::classify(document)?;
        validate_name(name)?;
        validate_email(email)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO {} (document, name, email) VALUES (?1, ?2, ?3)",
                kind.table()
            ),
            params![document, name, email],
        )
        .map_err(|e| duplicate_or_store(e, document))?;
        tx.commit()?;

        debug!("registered {} client {}", kind, document);
        Ok(Client {
            kind,
            document: document.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            balance: 0.0,
        })
    }

    /// **Looks up a single client of the given kind**
    ///
    /// There is no fallback to the other table.
    ///
    /// # Errors
    /// - No such client, `RegistryError::NotFound`
    pub fn find(&self, kind: ClientKind, document: &str) -> Result<Client> {
        self.conn
            .query_row(
                &format!(
                    "SELECT document, name, email, balance FROM {} WHERE document = ?1",
                    kind.table()
                ),
                params![document],
                |row| client_from_row(kind, row),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RegistryError::not_found(kind, document),
                other => RegistryError::Store(other),
            })
    }

    /// **Lists all clients of the given kind**
    ///
    /// In the table's natural order. An empty table yields an empty vector.
    pub fn list(&self, kind: ClientKind) -> Result<Vec<Client>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT document, name, email, balance FROM {}",
            kind.table()
        ))?;

        let clients = stmt
            .query_map([], |row| client_from_row(kind, row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(clients)
    }

    /// **Retrieves the balance of a client**
    ///
    /// # Errors
    /// - No such client, `RegistryError::NotFound`
    pub fn balance_of(&self, kind: ClientKind, document: &str) -> Result<Amount> {
        select_balance(&self.conn, kind, document)?
            .ok_or_else(|| RegistryError::not_found(kind, document))
    }

    /// Closes the connection, reporting any error SQLite raises while doing so.
    /// Dropping the store closes it too, but silently.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| RegistryError::Store(err))?;
        info!("closed client database");
        Ok(())
    }

    /// Starts a write transaction that holds SQLite's writer lock from the start,
    /// so a balance read inside it cannot go stale before the update.
    pub(crate) fn begin_immediate(&mut self) -> Result<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

fn client_from_row(kind: ClientKind, row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        kind,
        document: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        balance: row.get(3)?,
    })
}

fn duplicate_or_store(err: rusqlite::Error, document: &str) -> RegistryError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RegistryError::DuplicateClient(document.to_string())
        }
        other => RegistryError::Store(other),
    }
}

/// Current balance, or `None` if the client doesn't exist.
pub(crate) fn select_balance(
    conn: &Connection,
    kind: ClientKind,
    document: &str,
) -> Result<Option<Amount>> {
    let balance = conn
        .query_row(
            &format!("SELECT balance FROM {} WHERE document = ?1", kind.table()),
            params![document],
            |row| row.get(0),
        )
        .optional()?;

    Ok(balance)
}

/// Adds `delta` to a client's balance; returns the number of rows touched (0 or 1).
pub(crate) fn add_to_balance(
    conn: &Connection,
    kind: ClientKind,
    document: &str,
    delta: Amount,
) -> Result<usize> {
    let rows = conn.execute(
        &format!(
            "UPDATE {} SET balance = balance + ?1 WHERE document = ?2",
            kind.table()
        ),
        params![delta, document],
    )?;

    Ok(rows)
}
