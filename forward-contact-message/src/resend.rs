use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Thin client for Resend's send-email endpoint. The underlying
/// `reqwest::Client` is shared across invocations to reuse connections.
pub struct ResendMailer {
    client: Client,
}

#[derive(Serialize)]
pub struct OutgoingEmail<'a> {
    pub from: &'a str,
    pub to: [&'a str; 1],
    pub subject: &'a str,
    pub html: &'a str,
    pub text: &'a str,
    pub reply_to: &'a str,
}

#[derive(Deserialize, Default)]
struct SendReceipt {
    id: Option<String>,
}

#[derive(Deserialize, Default)]
struct ProviderErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ResendMailer {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Performs the single send attempt. On success returns the message id
    /// Resend assigned, if its response body contained one.
    pub async fn send(
        &self,
        api_key: &str,
        email: &OutgoingEmail<'_>,
    ) -> Result<Option<String>, ResendError> {
        let response = self
            .client
            .post(Self::api_url().as_ref())
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await
            .map_err(ResendError::Request)?;

        let status = response.status();
        if status.is_success() {
            // A malformed success body still counts as a delivered email.
            let receipt: SendReceipt = response.json().await.unwrap_or_default();
            Ok(receipt.id)
        } else {
            let body: ProviderErrorBody = response.json().await.unwrap_or_default();
            Err(ResendError::Rejected {
                status,
                message: body.message.or(body.error),
            })
        }
    }

    fn api_url() -> Cow<'static, str> {
        std::env::var("RESEND_API_URL")
            .map(Cow::Owned)
            .unwrap_or(RESEND_API_URL.into())
    }
}

#[derive(Debug)]
pub enum ResendError {
    Request(reqwest::Error),
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
}

impl std::fmt::Display for ResendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResendError::Request(error) => write!(f, "Error calling email provider: {error}"),
            ResendError::Rejected {
                status,
                message: Some(message),
            } => write!(f, "Email provider returned {status}: {message}"),
            ResendError::Rejected {
                status,
                message: None,
            } => write!(f, "Email provider returned {status}"),
        }
    }
}

impl std::error::Error for ResendError {}
