//! Commonly used helpers to construct JSON-RPC clients and `Provider`s

use crate::{API_KEY_HEADER, REQUEST_TIMEOUT};
use alloy_provider::RootProvider;
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::{str::FromStr, time::Duration};
use url::Url;

/// Helper type alias for a read-only chain provider
pub type ChainProvider = RootProvider;

/// Errors that can occur while building a client
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// The url could not be parsed
    #[error("invalid provider URL {url:?}: {source}")]
    InvalidUrl {
        /// The offending url
        url: String,
        /// The parse error
        source: url::ParseError,
    },
    /// Only http(s) endpoints are supported
    #[error("URL scheme is not supported: {0}")]
    BadScheme(String),
    /// A header was not in `name: value` form or contained invalid characters
    #[error("invalid HTTP header: {0}")]
    BadHeader(String),
    /// The underlying HTTP client could not be constructed
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Helper type to construct JSON-RPC clients bound to one endpoint
#[derive(Debug)]
pub struct ProviderBuilder {
    // Note: this is a result, so we can easily chain builder calls
    url: Result<Url, ClientBuildError>,
    timeout: Duration,
    api_key: Option<String>,
    headers: Vec<String>,
}

// === impl ProviderBuilder ===

impl ProviderBuilder {
    /// Creates a new builder instance
    pub fn new(url_str: &str) -> Self {
        // non-prefixed URL scheme is not allowed, so we prepend the default http prefix
        let url_str = if url_str.starts_with("localhost:") {
            format!("http://{url_str}")
        } else {
            url_str.to_string()
        };

        let url = Url::parse(&url_str)
            .map_err(|source| ClientBuildError::InvalidUrl { url: url_str.clone(), source });

        Self { url, timeout: REQUEST_TIMEOUT, api_key: None, headers: vec![] }
    }

    /// Sets the request timeout.
    ///
    /// The timeout is applied from when the request starts connecting until the
    /// response body has finished.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `api_key` in the `x-api-key` header of every request.
    ///
    /// An empty or absent key is not an error here, the endpoint will reject the request instead.
    pub fn api_key(mut self, api_key: Option<impl Into<String>>) -> Self {
        self.api_key = api_key.map(Into::into);
        self
    }

    /// Sets additional http headers in `name: value` form
    pub fn headers(mut self, headers: Vec<String>) -> Self {
        self.headers = headers;
        self
    }

    /// Returns the endpoint url, if it parsed.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref().ok()
    }

    /// Constructs a raw JSON-RPC client taking all configs into account.
    pub fn build_client(self) -> Result<RpcClient, ClientBuildError> {
        let Self { url, timeout, api_key, headers } = self;
        let url = url?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(ClientBuildError::BadScheme(scheme.to_string())),
        }

        let mut header_map = HeaderMap::new();
        if let Some(api_key) = api_key {
            let make_err = || ClientBuildError::BadHeader(API_KEY_HEADER.to_string());
            let mut value = HeaderValue::from_str(&api_key).map_err(|_| make_err())?;
            value.set_sensitive(true);
            header_map.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }
        for header in &headers {
            let make_err = || ClientBuildError::BadHeader(header.clone());
            let (key, val) = header.split_once(':').ok_or_else(make_err)?;
            header_map.insert(
                HeaderName::from_str(key.trim()).map_err(|_| make_err())?,
                HeaderValue::from_str(val.trim()).map_err(|_| make_err())?,
            );
        }

        let client =
            reqwest::Client::builder().timeout(timeout).default_headers(header_map).build()?;
        let is_local = is_local_url(&url);
        trace!(%url, is_local, "built JSON-RPC client");
        Ok(RpcClient::new(Http::with_client(client, url), is_local))
    }

    /// Constructs a read-only [`ChainProvider`].
    pub fn build(self) -> Result<ChainProvider, ClientBuildError> {
        Ok(RootProvider::new(self.build_client()?))
    }
}

fn is_local_url(url: &Url) -> bool {
    matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
}
