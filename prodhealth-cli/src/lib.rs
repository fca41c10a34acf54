//! Command-line interface for scoring packaged food with ProdHealth.
//!
//! Commands fetch products from Open Food Facts, score them with
//! `prodhealth-scorer`, and keep preferences and scan history in a local
//! SQLite database. Every command prints JSON to stdout.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use prodhealth_core::CatalogProvider;
use prodhealth_data::catalog::{HttpCatalogProvider, HttpCatalogProviderConfig};
use prodhealth_data::store::SqliteStore;
use serde::Serialize;
use time::OffsetDateTime;

mod error;
mod history;
mod prefs;
mod scan;
mod search;

pub use error::CliError;

use history::{HistoryArgs, StatsArgs};
use prefs::PrefsCommand;
use scan::{ProductArgs, ScanArgs};
use search::SearchArgs;

pub(crate) const ARG_BARCODE: &str = "barcode";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_CATALOG_URL: &str = "catalog-url";
pub(crate) const ARG_WEIGHTS: &str = "weights";
pub(crate) const ARG_GOAL: &str = "goal";
pub(crate) const ARG_DIET: &str = "diet";
pub(crate) const ARG_ALLERGEN: &str = "allergen";
pub(crate) const ARG_LIMIT: &str = "limit";

pub(crate) const ENV_SCAN_BARCODE: &str = "PRODHEALTH_CMDS_SCAN_BARCODE";
pub(crate) const ENV_PRODUCT_BARCODE: &str = "PRODHEALTH_CMDS_PRODUCT_BARCODE";
pub(crate) const ENV_SEARCH_QUERY: &str = "PRODHEALTH_CMDS_SEARCH_QUERY";
pub(crate) const ENV_PREFS_SHOW_USER: &str = "PRODHEALTH_CMDS_SHOW_USER";
pub(crate) const ENV_PREFS_SET_USER: &str = "PRODHEALTH_CMDS_SET_USER";
pub(crate) const ENV_HISTORY_USER: &str = "PRODHEALTH_CMDS_HISTORY_USER";

/// Database file used when `--database` is not given.
pub(crate) const DEFAULT_DATABASE: &str = "prodhealth.db";

/// Run the ProdHealth CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, a lookup, the
/// store or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &DefaultServices, &mut stdout)
}

fn dispatch(
    command: Command,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Scan(args) => scan::run_scan(args, services, writer),
        Command::Product(args) => scan::run_product(args, services, writer),
        Command::Search(args) => search::run_search(args, services, writer),
        Command::Prefs { action } => prefs::run_prefs(action, services, writer),
        Command::History(args) => history::run_history(args, services, writer),
        Command::Stats(args) => history::run_stats(args, services, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "prodhealth",
    about = "Score packaged food against your health goals",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a product and record the scan in your history.
    Scan(ScanArgs),
    /// Score a product without recording it.
    Product(ProductArgs),
    /// Search the catalog by name.
    Search(SearchArgs),
    /// Show or replace stored preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsCommand,
    },
    /// List recent scans for a user.
    History(HistoryArgs),
    /// Summarise scan activity.
    Stats(StatsArgs),
}

/// Builds the collaborators a command needs.
///
/// Tests substitute stub catalogs and a fixed clock.
pub(crate) trait Services {
    fn catalog(&self, base_url: &str) -> Result<Box<dyn CatalogProvider>, CliError>;
    fn store(&self, database: &Utf8Path) -> Result<SqliteStore, CliError>;
    fn now(&self) -> OffsetDateTime;
}

pub(crate) struct DefaultServices;

impl Services for DefaultServices {
    fn catalog(&self, base_url: &str) -> Result<Box<dyn CatalogProvider>, CliError> {
        let config = HttpCatalogProviderConfig::new(base_url);
        let provider =
            HttpCatalogProvider::with_config(config).map_err(|source| CliError::BuildCatalog {
                base_url: base_url.to_owned(),
                source,
            })?;
        Ok(Box::new(provider))
    }

    fn store(&self, database: &Utf8Path) -> Result<SqliteStore, CliError> {
        Ok(SqliteStore::open(database)?)
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
