//! `history` and `stats` commands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use prodhealth_core::{DayCount, HistoryReader, HistoryStats, UserId, daily_series};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::prefs::{database_or_default, require_user};
use crate::{ARG_DATABASE, ARG_LIMIT, ARG_USER, CliError, ENV_HISTORY_USER, Services, write_json};

/// Number of scans `history` lists when `--limit` is not given.
pub(crate) const DEFAULT_HISTORY_LIMIT: usize = 25;

/// Days covered by the global statistics window.
const STATS_WINDOW_DAYS: i64 = 7;

/// CLI arguments for the `history` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "history", about = "List a user's most recent scans, newest first")]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct HistoryArgs {
    /// User whose scans to list.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// SQLite database holding history.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Maximum number of scans to list.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

/// CLI arguments for the `stats` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "stats",
    long_about = "Without --user, summarise every scan from the last seven \
                 days: average score, weekly progress, per-day counts and \
                 grade and NOVA distributions. With --user, print that user's \
                 scan count per day over their whole history.",
    about = "Summarise scan activity"
)]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct StatsArgs {
    /// Print a per-day series for this user instead of global statistics.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// SQLite database holding history.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct UserSeries<'a> {
    user: &'a UserId,
    days: Vec<DayCount>,
}

pub(crate) fn run_history(
    args: HistoryArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let user = require_user(merged.user, ENV_HISTORY_USER)?;
    let limit = merged.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let store = services.store(&database_or_default(merged.database))?;
    let entries = store.recent(&user, limit)?;
    write_json(writer, &entries)
}

pub(crate) fn run_stats(
    args: StatsArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let store = services.store(&database_or_default(merged.database))?;
    match merged.user {
        Some(raw) => {
            let user = UserId::new(raw)?;
            let days = daily_series(&store.for_user(&user)?);
            write_json(writer, &UserSeries { user: &user, days })
        }
        None => {
            let now = services.now();
            let window = store.since(now - Duration::days(STATS_WINDOW_DAYS))?;
            let stats = HistoryStats::from_entries(store.count()?, &window, now);
            write_json(writer, &stats)
        }
    }
}
