//! Commonly used constants.

use std::time::Duration;

/// The default timeout applied to HTTP requests made by vanguard clients.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Header carrying the API key of the bundler and paymaster service.
pub const API_KEY_HEADER: &str = "x-api-key";
