use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::ParseError;

use crate::types::FigmaErrorResponse;

#[derive(Debug, Error)]
pub enum FigmaError {
    #[error("Figma API error (status: {status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Invalid Figma URL: {0}")]
    InvalidFigmaUrl(String),

    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),

    #[error("Node not found: {0}")]
    MissingNode(String),

    #[error("Cyclic parent chain detected at node {0}")]
    CyclicParentChain(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FigmaError {
    pub fn api(status: StatusCode, message: impl Into<String>, body: Option<Value>) -> Self {
        FigmaError::Api {
            status,
            message: message.into(),
            body,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FigmaError::Config(message.into())
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FigmaError::Api { status, .. } => Some(*status),
            FigmaError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// The error body decoded into Figma's documented error shape.
    pub fn error_response(&self) -> Option<FigmaErrorResponse> {
        match self {
            FigmaError::Api {
                body: Some(body), ..
            } => serde_json::from_value(body.clone()).ok(),
            _ => None,
        }
    }

    /// Rate limits, server errors and transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FigmaError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            FigmaError::Network(e) => e.is_connect() || e.is_request() || e.is_timeout(),
            FigmaError::Timeout(_) => true,
            _ => false,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            FigmaError::Api {
                status, message, ..
            } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {}): {}", status.as_u16(), message),
                match status.as_u16() {
                    401 | 403 => "Check FIGMA_TOKEN/FIGMA_OAUTH_TOKEN and its scopes.",
                    404 => "Verify the file key and node ids exist and are shared with you.",
                    429 => "Rate limited; retry after waiting.",
                    _ => "Retry later; run with --verbose for request details.",
                },
            ),
            FigmaError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            FigmaError::Timeout(d) => ErrorPayload::new(
                ErrorCategory::Network,
                format!("Request timed out after {:?}", d),
                "Raise [api] timeout in the config file or retry.",
            ),
            FigmaError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Verify URL/format (e.g., https://api.figma.com).",
            ),
            FigmaError::InvalidFigmaUrl(url) => ErrorPayload::new(
                ErrorCategory::Input,
                format!("Invalid Figma URL: {}", url),
                "Pass a link like https://www.figma.com/design/<key>/<name>?node-id=1-2.",
            ),
            FigmaError::InvalidHexColor(hex) => ErrorPayload::new(
                ErrorCategory::Input,
                format!("Invalid hex color: {}", hex),
                "Use the #RRGGBB form.",
            ),
            FigmaError::MissingNode(id) | FigmaError::CyclicParentChain(id) => ErrorPayload::new(
                ErrorCategory::Data,
                self.to_string(),
                format!("Inspect node {} in the fetched document.", id),
            ),
            FigmaError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Data,
                e.to_string(),
                "The response did not match the expected shape; run with --verbose.",
            ),
            FigmaError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.to_string(),
                "Check flags, config file and required tokens.",
            ),
            FigmaError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, FigmaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Input,
    Network,
    Figma,
    Data,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
