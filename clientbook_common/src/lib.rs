pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod store;
pub mod tx;
pub mod types;
pub mod validation;

pub use config::Config;
pub use errors::{RegistryError, ValidationError};
pub use store::ClientStore;
pub use types::{Amount, Client, ClientKind};
