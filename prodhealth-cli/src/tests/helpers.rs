//! Test doubles for the CLI collaborators.

use super::*;
use camino::Utf8PathBuf;
use prodhealth_core::test_support::StubCatalogProvider;
use prodhealth_core::{NutritionGrade, NutritionRecord, Product};
use tempfile::TempDir;
use time::macros::datetime;

/// Fixed clock used by every stubbed command.
pub(super) const NOW: OffsetDateTime = datetime!(2026-03-10 12:00 UTC);

pub(super) struct StubServices {
    _dir: TempDir,
    database: Utf8PathBuf,
    catalog: StubCatalogProvider,
}

impl StubServices {
    pub(super) fn new(catalog: StubCatalogProvider) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _dir: dir,
            database: root.join("prodhealth.db"),
            catalog,
        }
    }

    pub(super) fn with_sample_products() -> Self {
        Self::new(StubCatalogProvider::with_products([
            peanut_bar(),
            salted_crackers(),
        ]))
    }

    pub(super) fn database(&self) -> &Utf8Path {
        &self.database
    }

    pub(super) fn root(&self) -> &Utf8Path {
        self.database.parent().expect("database has a parent")
    }

    /// Run a command line against the stubs, returning captured stdout.
    pub(super) fn invoke(&self, argv: &[&str]) -> Result<String, CliError> {
        let mut full = vec!["prodhealth"];
        full.extend_from_slice(argv);
        let cli = Cli::try_parse_from(full)?;
        let mut stdout = Vec::new();
        dispatch(cli.command, self, &mut stdout)?;
        Ok(String::from_utf8(stdout).expect("utf-8 output"))
    }

    /// Run a command and parse its JSON output.
    pub(super) fn invoke_json(&self, argv: &[&str]) -> serde_json::Value {
        let out = self.invoke(argv).expect("command should succeed");
        serde_json::from_str(&out).expect("output should be JSON")
    }
}

impl Services for StubServices {
    fn catalog(&self, _base_url: &str) -> Result<Box<dyn CatalogProvider>, CliError> {
        Ok(Box::new(self.catalog.clone()))
    }

    fn store(&self, _database: &Utf8Path) -> Result<SqliteStore, CliError> {
        Ok(SqliteStore::open(&self.database)?)
    }

    fn now(&self) -> OffsetDateTime {
        NOW
    }
}

pub(super) const PEANUT_BAR: &str = "8901000000017";
pub(super) const CRACKERS: &str = "8901000000024";

/// Grade D, sugar 15 g: baseline 73.
pub(super) fn peanut_bar() -> Product {
    Product {
        code: PEANUT_BAR.to_owned(),
        name: Some("Peanut Chikki Bar".to_owned()),
        brand: Some("Acme".to_owned()),
        image_url: None,
        record: NutritionRecord::default()
            .with_grade(NutritionGrade::D)
            .with_sugars(15.0)
            .with_ingredients("Jaggery, roasted peanuts, glucose"),
    }
}

/// Salt 1.2 g: baseline 85.
pub(super) fn salted_crackers() -> Product {
    Product {
        code: CRACKERS.to_owned(),
        name: Some("Salted Crackers".to_owned()),
        brand: None,
        image_url: None,
        record: NutritionRecord::default()
            .with_salt(1.2)
            .with_ingredients("Wheat flour, palm oil, salt"),
    }
}
