use std::time::Duration;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use common::{error, log, warn};
use serde::{Deserialize, Serialize};

use crate::site_config::ContactConfig;
use crate::web_server::WebServerState;

const SUBMISSION_FAILED: &str = "Submission failed.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Invalid request body.")]
    InvalidBody,
    #[error("Missing required fields.")]
    MissingFields,
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Server not configured.")]
    NotConfigured,
    #[error("{0}")]
    Upstream(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody | RelayError::MissingFields | RelayError::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            RelayError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Body of `POST /api/contact`. Every field is optional here so that a
/// missing one is reported as a validation failure, not a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub role: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    name: &'a str,
    email: &'a str,
    role: &'a str,
    message: &'a str,
    source: &'a str,
    token: &'a str,
}

#[derive(Deserialize)]
struct WebhookReply {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

pub fn parse_request(body: &[u8]) -> Result<ContactRequest, RelayError> {
    serde_json::from_slice(body).map_err(|_| RelayError::InvalidBody)
}

pub fn validate_request(request: ContactRequest) -> Result<ContactSubmission, RelayError> {
    fn required(value: Option<String>) -> Result<String, RelayError> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(RelayError::MissingFields),
        }
    }

    let submission = ContactSubmission {
        name: required(request.name)?,
        email: required(request.email)?,
        role: required(request.role)?,
        message: required(request.message)?,
    };

    if !is_valid_email(&submission.email) {
        return Err(RelayError::InvalidEmail);
    }

    Ok(submission)
}

/// Shape check only: `local@domain.tld`, no whitespace, no empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

pub struct ContactRelay {
    client: reqwest::Client,
    config: ContactConfig,
}

impl ContactRelay {
    pub fn new(config: ContactConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub async fn submit(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let (Some(webhook_url), Some(token)) = (
            self.config.webhook_url.as_deref().filter(|v| !v.is_empty()),
            self.config.token.as_deref().filter(|v| !v.is_empty()),
        ) else {
            return Err(RelayError::NotConfigured);
        };

        let payload = WebhookPayload {
            name: &submission.name,
            email: &submission.email,
            role: &submission.role,
            message: &submission.message,
            source: &self.config.source,
            token,
        };

        let response = self
            .client
            .post(webhook_url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Contact webhook request failed: {}", e);
                RelayError::Upstream(SUBMISSION_FAILED.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read contact webhook response: {}", e);
            RelayError::Upstream(SUBMISSION_FAILED.to_string())
        })?;

        let reply: Option<WebhookReply> = serde_json::from_str(&text).ok();
        match reply {
            Some(reply) if status.is_success() && reply.ok => Ok(()),
            reply => {
                let message = reply
                    .and_then(|r| r.error)
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| SUBMISSION_FAILED.to_string());
                warn!("Contact webhook rejected submission ({}): {}", status, message);
                Err(RelayError::Upstream(message))
            }
        }
    }
}

pub async fn handle_contact(
    State(state): State<WebServerState>,
    body: Bytes,
) -> (StatusCode, Json<ContactResponse>) {
    let result = match parse_request(&body).and_then(validate_request) {
        Ok(submission) => state.contact_relay.submit(&submission).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            log!("Contact submission relayed");
            (StatusCode::OK, Json(ContactResponse::success()))
        }
        Err(e) => {
            if e == RelayError::NotConfigured {
                error!("Contact relay is missing its webhook URL or token");
            }
            (e.status(), Json(ContactResponse::failure(e.to_string())))
        }
    }
}

pub async fn handle_contact_wrong_method() -> (StatusCode, Json<ContactResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ContactResponse::failure("Use POST method.")),
    )
}
