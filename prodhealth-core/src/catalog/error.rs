use thiserror::Error;

/// Errors from [`crate::catalog::CatalogProvider`] lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The search query was empty or whitespace.
    #[error("search query must not be empty")]
    EmptyQuery,
    /// The barcode was empty or contained characters other than ASCII
    /// letters and digits.
    #[error("invalid barcode '{barcode}'")]
    InvalidBarcode {
        /// Barcode as supplied by the caller.
        barcode: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The catalog answered with a non-success HTTP status.
    #[error("catalog returned HTTP {status} for {url}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse catalog response: {message}")]
    ParseError {
        /// Decoder error detail.
        message: String,
    },
}
