//! Connection handle construction and the startup capability check.

use crate::{Error, Result};
use std::time::Duration;

/// Builds a connection handle with the per-call timeout applied.
///
/// Certificate and hostname verification stay enabled; there is no switch to
/// turn them off.
pub(crate) fn connection_handle(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("moneybird-rust/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Verifies that an HTTP client with TLS support can be created here and
/// returns the first connection handle.
///
/// Called once by [`crate::ClientBuilder::build`].
///
/// # Errors
///
/// Returns [`Error::IncompatiblePlatform`] if the TLS backend or HTTP client
/// cannot be initialised.
pub fn check_compatibility(timeout: Duration) -> Result<reqwest::Client> {
    connection_handle(timeout).map_err(|e| {
        tracing::error!(error = %e, "HTTP client is unavailable on this platform");
        Error::IncompatiblePlatform(format!("Failed to initialise HTTP client: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_compatibility_succeeds() {
        assert!(check_compatibility(Duration::from_secs(10)).is_ok());
    }
}
