//! HTTP-based `CatalogProvider` backed by the Open Food Facts API.
//!
//! The [`CatalogProvider`] trait is synchronous so the scoring pipeline stays
//! embeddable in synchronous callers. This provider bridges to async HTTP by
//! blocking on a Tokio runtime it owns.

use std::time::Duration;

use log::debug;
use prodhealth_core::{CatalogError, CatalogProvider, Product, ProductSummary, normalise_barcode};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::off::{ProductResponse, SearchResponse};

/// Errors raised while building an [`HttpCatalogProvider`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL could not be parsed.
    #[error("invalid catalog base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Public Open Food Facts instance.
pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Default user agent for catalog requests.
pub const DEFAULT_USER_AGENT: &str = "ProdHealth/1.0 (health scanner replica)";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of search hits requested.
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration for [`HttpCatalogProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCatalogProviderConfig {
    /// Base URL of the catalog service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Restrict searches to products sold in this country, when set.
    pub country: Option<String>,
    /// Number of search hits requested per query.
    pub page_size: u32,
}

impl Default for HttpCatalogProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            country: Some("india".to_owned()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HttpCatalogProviderConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Restrict searches to a country, or search worldwide with `None`.
    #[must_use]
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    /// Set the number of search hits requested.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Open Food Facts catalog client.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it reuses that runtime through
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it
/// falls back to its own runtime, which may deadlock if the caller's runtime
/// drives IO this request depends on.
///
/// # Examples
///
/// ```no_run
/// use prodhealth_core::CatalogProvider;
/// use prodhealth_data::catalog::HttpCatalogProvider;
///
/// let catalog = HttpCatalogProvider::new("https://world.openfoodfacts.org")?;
/// if let Some(product) = catalog.product("8901063010031")? {
///     println!("{}", product.name.unwrap_or_default());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HttpCatalogProvider {
    client: Client,
    base_url: Url,
    config: HttpCatalogProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpCatalogProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpCatalogProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpCatalogProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpCatalogProviderConfig) -> Result<Self, ProviderBuildError> {
        let trimmed = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            base_url,
            config,
            runtime,
        })
    }

    /// Return the active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpCatalogProviderConfig {
        &self.config
    }

    /// `{base}/api/v2/product/{barcode}.json`
    fn product_url(&self, barcode: &str) -> Url {
        let mut url = self.base_url.clone();
        let file = format!("{barcode}.json");
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v2", "product", file.as_str()]);
        }
        url
    }

    /// `{base}/cgi/search.pl?search_terms=...&json=1`
    fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["cgi", "search.pl"]);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("search_terms", query)
                .append_pair("search_simple", "1")
                .append_pair("action", "process")
                .append_pair("json", "1");
            if let Some(country) = &self.config.country {
                pairs.append_pair("countries_tags_en", country);
            }
            pairs.append_pair("page_size", &self.config.page_size.to_string());
        }
        url
    }

    async fn fetch_body(&self, url: &Url) -> Result<Option<String>, CatalogError> {
        debug!("fetching {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        Ok(Some(body))
    }

    async fn fetch_product_async(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
        let url = self.product_url(barcode);
        match self.fetch_body(&url).await? {
            Some(body) => parse_product(&body, barcode),
            None => Ok(None),
        }
    }

    async fn search_async(&self, query: &str) -> Result<Vec<ProductSummary>, CatalogError> {
        let url = self.search_url(query);
        match self.fetch_body(&url).await? {
            Some(body) => parse_search(&body),
            None => Err(CatalogError::HttpError {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "search endpoint not found".to_owned(),
            }),
        }
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> CatalogError {
        if error.is_timeout() {
            return CatalogError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return CatalogError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        if error.is_decode() {
            return CatalogError::ParseError {
                message: error.to_string(),
            };
        }
        CatalogError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl CatalogProvider for HttpCatalogProvider {
    fn product(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
        let code = normalise_barcode(barcode)?;
        self.block_on(self.fetch_product_async(code))
    }

    fn search(&self, query: &str) -> Result<Vec<ProductSummary>, CatalogError> {
        let terms = query.trim();
        if terms.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }
        self.block_on(self.search_async(terms))
    }
}

/// Decode a product endpoint body.
///
/// # Errors
/// Returns [`CatalogError::ParseError`] when the body is not JSON.
pub fn parse_product(body: &str, barcode: &str) -> Result<Option<Product>, CatalogError> {
    let response: ProductResponse = serde_json::from_str(body).map_err(parse_error)?;
    Ok(response.into_product(barcode))
}

/// Decode a search endpoint body.
///
/// # Errors
/// Returns [`CatalogError::ParseError`] when the body is not JSON.
pub fn parse_search(body: &str) -> Result<Vec<ProductSummary>, CatalogError> {
    let response: SearchResponse = serde_json::from_str(body).map_err(parse_error)?;
    Ok(response.into_summaries())
}

fn parse_error(err: serde_json::Error) -> CatalogError {
    CatalogError::ParseError {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> HttpCatalogProvider {
        HttpCatalogProvider::new("https://off.example.com").expect("provider should build")
    }

    #[rstest]
    fn product_url_appends_api_path(provider: HttpCatalogProvider) {
        assert_eq!(
            provider.product_url("8901063010031").as_str(),
            "https://off.example.com/api/v2/product/8901063010031.json"
        );
    }

    #[rstest]
    fn base_url_trailing_slash_is_ignored() {
        let provider =
            HttpCatalogProvider::new("https://off.example.com/mirror/").expect("provider should build");
        assert_eq!(
            provider.product_url("42").as_str(),
            "https://off.example.com/mirror/api/v2/product/42.json"
        );
    }

    #[rstest]
    fn search_url_encodes_terms(provider: HttpCatalogProvider) {
        let url = provider.search_url("masala & oats");
        assert_eq!(url.path(), "/cgi/search.pl");
        assert_eq!(
            url.query(),
            Some(
                "search_terms=masala+%26+oats&search_simple=1&action=process&json=1\
                 &countries_tags_en=india&page_size=20"
            )
        );
    }

    #[rstest]
    fn search_url_omits_country_when_unset() {
        let config = HttpCatalogProviderConfig::new("https://off.example.com")
            .with_country(None)
            .with_page_size(5);
        let provider = HttpCatalogProvider::with_config(config).expect("provider should build");
        let url = provider.search_url("tea");
        assert_eq!(
            url.query(),
            Some("search_terms=tea&search_simple=1&action=process&json=1&page_size=5")
        );
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = HttpCatalogProvider::new("not a url").expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("12/34")]
    fn malformed_barcodes_fail_before_any_request(provider: HttpCatalogProvider, #[case] raw: &str) {
        let err = provider.product(raw).expect_err("should fail");
        assert!(matches!(err, CatalogError::InvalidBarcode { .. }));
    }

    #[rstest]
    fn blank_search_fails_before_any_request(provider: HttpCatalogProvider) {
        assert_eq!(provider.search("  "), Err(CatalogError::EmptyQuery));
    }

    #[rstest]
    fn parse_product_reports_malformed_json() {
        let err = parse_product("<html>", "1").expect_err("should fail");
        assert!(matches!(err, CatalogError::ParseError { .. }));
    }

    #[rstest]
    fn parse_product_uses_requested_barcode_when_unechoed() {
        let product = parse_product(r#"{"status":1,"product":{"product_name":"Tea"}}"#, "77")
            .expect("should parse")
            .expect("product should be present");
        assert_eq!(product.code, "77");
        assert_eq!(product.name.as_deref(), Some("Tea"));
    }

    #[rstest]
    fn parse_search_tolerates_missing_products() {
        assert_eq!(parse_search("{}"), Ok(Vec::new()));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpCatalogProviderConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_country(Some("france".to_owned()));
        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.country.as_deref(), Some("france"));
        assert_eq!(config.page_size, 20);
    }
}
