//! `prefs show` and `prefs set` commands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use prodhealth_core::{Diet, Goal, PreferenceStore, Preferences, UserId};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ALLERGEN, ARG_DATABASE, ARG_DIET, ARG_GOAL, ARG_USER, CliError, DEFAULT_DATABASE,
    ENV_PREFS_SET_USER, ENV_PREFS_SHOW_USER, Services, write_json,
};

#[derive(Debug, Subcommand)]
pub(crate) enum PrefsCommand {
    /// Print a user's stored preferences.
    Show(PrefsShowArgs),
    /// Replace a user's preferences.
    Set(PrefsSetArgs),
}

/// CLI arguments for `prefs show`.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "show", about = "Print stored preferences")]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct PrefsShowArgs {
    /// User whose preferences to print.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// SQLite database holding preferences.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for `prefs set`.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "set",
    long_about = "Replace a user's goals, diet types and allergens. Omitted \
                 lists are stored empty. Well-known goals and diets are \
                 matched case-insensitively and stored under their canonical \
                 names; anything else is kept as a custom entry.",
    about = "Replace stored preferences"
)]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct PrefsSetArgs {
    /// User whose preferences to replace.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// SQLite database holding preferences.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Health goal; repeat for several.
    #[arg(long = ARG_GOAL, value_name = "goal")]
    #[serde(default)]
    pub(crate) goal: Vec<String>,
    /// Diet type; repeat for several.
    #[arg(long = ARG_DIET, value_name = "diet")]
    #[serde(default)]
    pub(crate) diet: Vec<String>,
    /// Allergen to avoid; repeat for several.
    #[arg(long = ARG_ALLERGEN, value_name = "allergen")]
    #[serde(default)]
    pub(crate) allergen: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PrefsReport<'a> {
    user: &'a UserId,
    preferences: Option<&'a Preferences>,
}

pub(crate) fn run_prefs(
    command: PrefsCommand,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        PrefsCommand::Show(args) => {
            let merged = args.load_and_merge().map_err(CliError::Configuration)?;
            let user = require_user(merged.user, ENV_PREFS_SHOW_USER)?;
            let store = services.store(&database_or_default(merged.database))?;
            let preferences = store.load(&user)?;
            write_json(
                writer,
                &PrefsReport {
                    user: &user,
                    preferences: preferences.as_ref(),
                },
            )
        }
        PrefsCommand::Set(args) => {
            let merged = args.load_and_merge().map_err(CliError::Configuration)?;
            let user = require_user(merged.user, ENV_PREFS_SET_USER)?;
            let preferences = build_preferences(&merged.goal, &merged.diet, &merged.allergen);
            let store = services.store(&database_or_default(merged.database))?;
            store.save(&user, &preferences)?;
            write_json(
                writer,
                &PrefsReport {
                    user: &user,
                    preferences: Some(&preferences),
                },
            )
        }
    }
}

pub(crate) fn require_user(user: Option<String>, env: &'static str) -> Result<UserId, CliError> {
    let raw = user.ok_or(CliError::MissingArgument {
        field: ARG_USER,
        env,
    })?;
    Ok(UserId::new(raw)?)
}

pub(crate) fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Canonicalise well-known goals and diets; keep custom entries verbatim.
pub(crate) fn build_preferences(goals: &[String], diets: &[String], allergens: &[String]) -> Preferences {
    let mut preferences = Preferences::default();
    for raw in goals {
        preferences.goals.insert(
            raw.parse::<Goal>()
                .map_or_else(|_| raw.clone(), |goal| goal.as_str().to_owned()),
        );
    }
    for raw in diets {
        preferences.dietary.insert(
            raw.parse::<Diet>()
                .map_or_else(|_| raw.clone(), |diet| diet.as_str().to_owned()),
        );
    }
    for raw in allergens {
        preferences.allergens.insert(raw);
    }
    preferences
}
