//! `search` command: list catalog matches for a free-text query.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use prodhealth_data::catalog::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

use crate::{ARG_CATALOG_URL, ARG_QUERY, CliError, ENV_SEARCH_QUERY, Services, write_json};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "search", about = "Search the catalog by product name")]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct SearchArgs {
    /// Search terms.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Base URL of the Open Food Facts instance.
    #[arg(long = ARG_CATALOG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
}

pub(crate) fn run_search(
    args: SearchArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let query = merged.query.ok_or(CliError::MissingArgument {
        field: ARG_QUERY,
        env: ENV_SEARCH_QUERY,
    })?;
    let base_url = merged
        .catalog_url
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
    let hits = services.catalog(&base_url)?.search(&query)?;
    write_json(writer, &hits)
}
