//! Request/response models for the organizer API

use crate::agent::backend::DispatchError;
use crate::agent::{Provider, ProviderProbe};
use crate::context::RetrievedContext;
use crate::error::OrganizerError;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    pub message: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub provider: Option<Provider>,
}

/// Metadata attached to successful agent responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseMetadata {
    pub fn new(user_id: &str, kind: &'static str) -> Self {
        Self {
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub success: bool,
    pub response: String,
    pub metadata: ResponseMetadata,
}

/// Insight response (suggestions, daily plan, analysis, motivation)
#[derive(Debug, Serialize)]
pub struct InsightResponseBody {
    pub success: bool,
    pub result: String,
    pub metadata: ResponseMetadata,
}

/// Context inspection response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponseBody {
    pub success: bool,
    pub context: RetrievedContext,
    pub formatted_context: String,
}

/// Provider probe query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TestProviderQuery {
    #[serde(default)]
    pub provider: Option<Provider>,
}

/// Provider probe response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestProviderResponseBody {
    pub success: bool,
    pub test_result: ProviderProbe,
}

/// Per-provider credential availability
#[derive(Debug, Serialize)]
pub struct ProviderHealth {
    pub deepseek: bool,
    pub openrouter: bool,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub providers: ProviderHealth,
    pub features: &'static [&'static str],
}

/// API error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Standard error codes
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const PROVIDER_NOT_CONFIGURED: &str = "PROVIDER_NOT_CONFIGURED";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Map an organizer error to its HTTP status and error body
pub fn error_response(error: &OrganizerError) -> (StatusCode, axum::Json<ApiError>) {
    let (status, code) = match error {
        OrganizerError::InvalidIdentifier(_) | OrganizerError::InvalidRequest(_) => {
            (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR)
        }
        OrganizerError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
        OrganizerError::NoProviderConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::PROVIDER_NOT_CONFIGURED,
        ),
        OrganizerError::Dispatch(DispatchError::Timeout(_)) => {
            (StatusCode::GATEWAY_TIMEOUT, error_codes::TIMEOUT)
        }
        OrganizerError::Dispatch(_) => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
        OrganizerError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
    };

    (status, axum::Json(ApiError::new(code, error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let (status, body) = error_response(&OrganizerError::NotFound("u1".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, error_codes::NOT_FOUND);

        let (status, _) = error_response(&OrganizerError::InvalidIdentifier("x".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&OrganizerError::NoProviderConfigured);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = error_response(&OrganizerError::Dispatch(DispatchError::Timeout(
            "deadline".to_string(),
        )));
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

        let (status, _) = error_response(&OrganizerError::Dispatch(
            DispatchError::UpstreamError {
                status: 502,
                message: "bad gateway".to_string(),
            },
        ));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_chat_request_parsing() {
        let body: ChatRequestBody = serde_json::from_str(
            r#"{"message":"plan my day","temperature":0.5,"provider":"openrouter"}"#,
        )
        .unwrap();
        assert_eq!(body.message, "plan my day");
        assert_eq!(body.temperature, Some(0.5));
        assert_eq!(body.provider, Some(Provider::Openrouter));
        assert!(body.max_tokens.is_none());
    }

    #[test]
    fn test_api_error_with_details() {
        let error = ApiError::new("VALIDATION_ERROR", "bad input")
            .with_details(serde_json::json!({"field": "message"}));
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["details"]["field"], "message");
    }
}
