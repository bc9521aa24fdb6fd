//! HTTP plumbing shared by the remote providers.

use std::time::Duration;

use anyhow::{Context, Result};

use studycomp_core::error::ProviderError;

/// Seconds assumed when a 429 carries no usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

/// Classify a transport failure.
pub(crate) fn send_error(e: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Map error statuses onto `ProviderError`, passing successful responses
/// through.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
            * 1000;
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        401 | 403 => ProviderError::AuthenticationFailed(body),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError {
            status,
            message: body,
        },
    })
}

pub(crate) fn parse_error(e: reqwest::Error) -> ProviderError {
    ProviderError::ApiError {
        status: 0,
        message: format!("failed to parse response: {e}"),
    }
}
