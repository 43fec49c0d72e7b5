//! Shared HTTP plumbing for outbound calls
//!
//! One client configuration for the hosted backend, the metadata API and
//! the recommendation function, plus conversion of failed responses into
//! [`AppError::Remote`].

use crate::config::HTTP_USER_AGENT;
use crate::error::{AppError, Result};
use std::time::Duration;

/// Build the HTTP client used for every outbound request
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(HTTP_USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Pass successful responses through; turn anything else into an error
/// carrying the server's message.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    tracing::warn!("Remote call failed with {}: {}", status, message);
    Err(AppError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of an error body.
///
/// The hosted platform uses different field names per service
/// (`message` for tables, `msg`/`error_description` for auth, `error`
/// for functions).
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_fields() {
        assert_eq!(
            error_message(r#"{"code":"PGRST301","message":"JWT expired"}"#).as_deref(),
            Some("JWT expired")
        );
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            error_message(r#"{"error":"Rate limited"}"#).as_deref(),
            Some("Rate limited")
        );
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("   "), None);
        assert_eq!(error_message(r#"{"unexpected":1}"#), None);
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(5).is_ok());
    }
}
