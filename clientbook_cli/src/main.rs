//! The "Clientbook CLI" app's entry point.

use anyhow::Context;
use clientbook_cli::logic::main_loop;
use clientbook_common::{ClientStore, Config};
use log::info;
use std::env;
use std::io::{stdin, stdout};

/// The "Clientbook CLI" app's entry point.
///
/// The optional first argument is the path of the database file.
fn main() -> anyhow::Result<()> {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "clientbook=warn");
    }
    pretty_env_logger::init();

    let config = Config::load(env::args().nth(1)).context("failed to load configuration")?;
    info!("using database {}", config.database.display());

    let mut store = ClientStore::open(&config.database).with_context(|| {
        format!(
            "failed to open client database {}",
            config.database.display()
        )
    })?;

    main_loop(&mut store, stdin().lock(), stdout().lock()).context("console I/O failed")?;

    store.close().context("failed to close client database")?;

    Ok(())
}
