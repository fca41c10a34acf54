//! Focused unit tests covering argument conversion and preference building.

use super::helpers::StubServices;
use super::*;
use crate::prefs::build_preferences;
use crate::scan::{AnalyseConfig, ProductArgs, ScanArgs, load_analyser};
use prodhealth_core::test_support::StubCatalogProvider;
use prodhealth_core::{Diet, Goal, UserId};
use rstest::rstest;

#[rstest]
fn converting_scan_without_barcode_errors() {
    let err = AnalyseConfig::try_from(ScanArgs::default()).expect_err("missing barcode");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_BARCODE);
            assert_eq!(env, ENV_SCAN_BARCODE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_product_without_barcode_names_product_env() {
    let err = AnalyseConfig::try_from(ProductArgs::default()).expect_err("missing barcode");
    match err {
        CliError::MissingArgument { env, .. } => assert_eq!(env, ENV_PRODUCT_BARCODE),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn scan_config_applies_defaults() {
    let args = ScanArgs {
        barcode: Some("123".to_owned()),
        user: Some("  alice ".to_owned()),
        ..ScanArgs::default()
    };
    let config = AnalyseConfig::try_from(args).expect("config should build");
    assert_eq!(config.database, DEFAULT_DATABASE);
    assert_eq!(config.catalog_url, "https://world.openfoodfacts.org");
    assert_eq!(config.user.as_ref().map(UserId::as_str), Some("alice"));
    assert!(config.record);
}

#[rstest]
fn product_config_never_records() {
    let args = ProductArgs {
        barcode: Some("123".to_owned()),
        ..ProductArgs::default()
    };
    let config = AnalyseConfig::try_from(args).expect("config should build");
    assert!(!config.record);
    assert_eq!(config.user, None);
}

#[rstest]
fn blank_user_is_rejected() {
    let args = ScanArgs {
        barcode: Some("123".to_owned()),
        user: Some("   ".to_owned()),
        ..ScanArgs::default()
    };
    let err = AnalyseConfig::try_from(args).expect_err("blank user");
    assert!(matches!(err, CliError::InvalidUser(_)));
}

#[rstest]
fn well_known_preferences_are_canonicalised() {
    let prefs = build_preferences(
        &["heart health".to_owned(), "Run a marathon".to_owned()],
        &["VEGAN".to_owned()],
        &["Peanuts".to_owned(), " ".to_owned()],
    );
    assert!(prefs.has_goal(Goal::HeartHealth));
    assert!(prefs.goals.contains("Run a marathon"));
    assert!(prefs.follows(Diet::Vegan));
    assert_eq!(prefs.allergens.len(), 1);
}

#[rstest]
fn missing_weights_file_reports_path() {
    let services = StubServices::new(StubCatalogProvider::default());
    let path = services.root().join("absent.json");
    let err = load_analyser(Some(&path)).expect_err("missing file");
    match err {
        CliError::OpenWeights { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected OpenWeights, found {other:?}"),
    }
}

#[rstest]
#[case(r#"{"baseline": {"grade_e": -1.0}}"#)]
#[case(r#"{"personalization": {"vegan": -5.0}}"#)]
fn negative_weights_are_rejected(#[case] json: &str) {
    let services = StubServices::new(StubCatalogProvider::default());
    let path = services.root().join("weights.json");
    std::fs::write(&path, json).expect("write weights");
    let err = load_analyser(Some(&path)).expect_err("negative weight");
    assert!(matches!(err, CliError::InvalidWeights(_)));
}

#[rstest]
fn malformed_weights_are_reported() {
    let services = StubServices::new(StubCatalogProvider::default());
    let path = services.root().join("weights.json");
    std::fs::write(&path, "not json").expect("write weights");
    let err = load_analyser(Some(&path)).expect_err("malformed");
    assert!(matches!(err, CliError::ParseWeights { .. }));
}

#[rstest]
fn missing_command_is_a_parse_error() {
    let services = StubServices::new(StubCatalogProvider::default());
    let err = services.invoke(&[]).expect_err("no subcommand");
    assert!(matches!(err, CliError::ArgumentParsing(_)));
}
