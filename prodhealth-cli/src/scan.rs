//! `scan` and `product` commands: fetch, score and optionally record.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use prodhealth_core::{
    HistoryStore, NutritionGrade, PreferenceStore, Product, ScanEntry, UserId,
};
use prodhealth_data::catalog::DEFAULT_BASE_URL;
use prodhealth_data::fs::open_utf8_file;
use prodhealth_scorer::{
    Analyser, Analysis, BaselineScorer, BaselineWeights, PersonalizationWeights, Personalizer,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BARCODE, ARG_CATALOG_URL, ARG_DATABASE, ARG_USER, ARG_WEIGHTS, CliError,
    DEFAULT_DATABASE, ENV_PRODUCT_BARCODE, ENV_SCAN_BARCODE, Services, write_json,
};

/// CLI arguments for the `scan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "scan",
    long_about = "Fetch a product by barcode, score it, personalise the score \
                 with the user's stored preferences and append the result to \
                 the user's scan history.",
    about = "Score a product and record the scan"
)]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct ScanArgs {
    /// Product barcode.
    #[arg(value_name = "barcode")]
    #[serde(default)]
    pub(crate) barcode: Option<String>,
    /// User whose preferences and history apply.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// SQLite database holding preferences and history.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL of the Open Food Facts instance.
    #[arg(long = ARG_CATALOG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    /// JSON file overriding scoring weights.
    #[arg(long = ARG_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
}

/// CLI arguments for the `product` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "product",
    long_about = "Fetch a product by barcode and score it. Stored preferences \
                 are applied when a user is given; nothing is recorded.",
    about = "Score a product without recording it"
)]
#[ortho_config(prefix = "PRODHEALTH")]
pub(crate) struct ProductArgs {
    /// Product barcode.
    #[arg(value_name = "barcode")]
    #[serde(default)]
    pub(crate) barcode: Option<String>,
    /// User whose preferences apply.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// SQLite database holding preferences.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL of the Open Food Facts instance.
    #[arg(long = ARG_CATALOG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    /// JSON file overriding scoring weights.
    #[arg(long = ARG_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
}

/// Resolved configuration shared by `scan` and `product`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnalyseConfig {
    pub(crate) barcode: String,
    pub(crate) user: Option<UserId>,
    pub(crate) database: Utf8PathBuf,
    pub(crate) catalog_url: String,
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) record: bool,
}

impl TryFrom<ScanArgs> for AnalyseConfig {
    type Error = CliError;

    fn try_from(args: ScanArgs) -> Result<Self, Self::Error> {
        let barcode = args.barcode.ok_or(CliError::MissingArgument {
            field: ARG_BARCODE,
            env: ENV_SCAN_BARCODE,
        })?;
        Ok(Self {
            barcode,
            user: args.user.map(UserId::new).transpose()?,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            catalog_url: args
                .catalog_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            weights: args.weights,
            record: true,
        })
    }
}

impl TryFrom<ProductArgs> for AnalyseConfig {
    type Error = CliError;

    fn try_from(args: ProductArgs) -> Result<Self, Self::Error> {
        let scan = ScanArgs {
            barcode: args.barcode,
            user: args.user,
            database: args.database,
            catalog_url: args.catalog_url,
            weights: args.weights,
        };
        let config = Self::try_from(scan).map_err(|err| match err {
            CliError::MissingArgument { field, .. } => CliError::MissingArgument {
                field,
                env: ENV_PRODUCT_BARCODE,
            },
            other => other,
        })?;
        Ok(Self {
            record: false,
            ..config
        })
    }
}

/// Weight tables read from `--weights`; missing sections keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeightsFile {
    baseline: BaselineWeights,
    personalization: PersonalizationWeights,
}

/// Build an analyser from a weights file, or the defaults when none is given.
pub(crate) fn load_analyser(path: Option<&Utf8Path>) -> Result<Analyser, CliError> {
    let Some(weights_path) = path else {
        return Ok(Analyser::default());
    };
    let file = open_utf8_file(weights_path).map_err(|source| CliError::OpenWeights {
        path: weights_path.to_path_buf(),
        source,
    })?;
    let weights: WeightsFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            CliError::ParseWeights {
                path: weights_path.to_path_buf(),
                source,
            }
        })?;
    Ok(Analyser::new(
        BaselineScorer::new(weights.baseline)?,
        Personalizer::new(weights.personalization)?,
    ))
}

/// JSON printed by `scan` and `product`.
#[derive(Debug, Serialize)]
pub(crate) struct ScanReport {
    pub(crate) barcode: String,
    pub(crate) name: Option<String>,
    pub(crate) brand: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) nutrition_grade: Option<NutritionGrade>,
    pub(crate) nova_group: Option<u8>,
    #[serde(flatten)]
    pub(crate) analysis: Analysis,
    pub(crate) recorded: bool,
}

impl ScanReport {
    fn new(product: Product, analysis: Analysis, recorded: bool) -> Self {
        Self {
            barcode: product.code,
            name: product.name,
            brand: product.brand,
            image_url: product.image_url,
            nutrition_grade: product.record.nutrition_grade,
            nova_group: product.record.nova_group,
            analysis,
            recorded,
        }
    }
}

pub(crate) fn run_scan(
    args: ScanArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let report = execute_analysis(AnalyseConfig::try_from(merged)?, services)?;
    write_json(writer, &report)
}

pub(crate) fn run_product(
    args: ProductArgs,
    services: &dyn Services,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let report = execute_analysis(AnalyseConfig::try_from(merged)?, services)?;
    write_json(writer, &report)
}

/// Fetch, score, personalise and, for `scan` with a user, record.
///
/// Preferences are only loaded when a user is given; a user with no stored
/// row gets the baseline score and no warnings.
pub(crate) fn execute_analysis(
    config: AnalyseConfig,
    services: &dyn Services,
) -> Result<ScanReport, CliError> {
    let analyser = load_analyser(config.weights.as_deref())?;
    let catalog = services.catalog(&config.catalog_url)?;
    let product = catalog
        .product(&config.barcode)?
        .ok_or_else(|| CliError::ProductNotFound {
            barcode: config.barcode.clone(),
        })?;

    let Some(user) = config.user else {
        let analysis = analyser.analyse(&product.record, None);
        return Ok(ScanReport::new(product, analysis, false));
    };

    let store = services.store(&config.database)?;
    let preferences = store.load(&user)?;
    let analysis = analyser.analyse(&product.record, preferences.as_ref());
    if config.record {
        let entry = ScanEntry::from_product(user, &product, analysis.score, services.now());
        store.append(&entry)?;
        info!("recorded scan of {} for {}", entry.barcode, entry.user_id);
    }
    Ok(ScanReport::new(product, analysis, config.record))
}
