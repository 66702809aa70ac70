//! Response handling shared by the provider REST clients.

use crate::{Error, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

/// Error bodies are logged and surfaced only up to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Decode a provider reply into `T`, classifying failures.
///
/// A 401/403 means the configured credential was refused, so the provider is
/// unusable until the configuration changes. Every other non-2xx status and
/// any undecodable body is a failed call.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let detail = truncate_body(&body);
        tracing::error!("{} API error (status {}): {}", provider, status, detail);
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::ProviderUnavailable(
                format!("{} rejected the configured credential (status {})", provider, status),
            ),
            _ => Error::AiProvider(format!(
                "{} API error (status {}): {}",
                provider, status, detail
            )),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            "Failed to parse {} response: {}\nBody: {}",
            provider,
            e,
            truncate_body(&body)
        );
        Error::AiProvider(format!("Failed to parse {} response: {}", provider, e))
    })
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(MAX_ERROR_BODY_CHARS + 10);
        assert_eq!(truncate_body(&long).chars().count(), MAX_ERROR_BODY_CHARS);
    }
}
