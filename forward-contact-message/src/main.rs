mod notification;
mod resend;
mod settings;
mod validation;

use lambda_http::{
    http::{Method, StatusCode},
    run, service_fn, Body, Error, Request, RequestPayloadExt, Response,
};
use notification::render_notification;
use resend::{OutgoingEmail, ResendError, ResendMailer};
use serde_json::json;
use settings::{EnvironmentError, Settings};
use tracing::error;
use validation::ContactSubmission;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let handler = ContactSubmissionHandler::new();
    run(service_fn(|event| handler.handle(event))).await
}

struct ContactSubmissionHandler {
    mailer: ResendMailer,
}

impl ContactSubmissionHandler {
    fn new() -> Self {
        Self {
            mailer: ResendMailer::new(),
        }
    }

    async fn handle(&self, event: Request) -> Result<Response<Body>, Error> {
        if event.method() == Method::OPTIONS {
            return Ok(no_content_response());
        }
        if event.method() != Method::POST {
            let error = SubmissionError::MethodNotAllowed;
            error.log();
            return Ok(error.into_response());
        }

        let submission: ContactSubmission = event.payload().ok().flatten().unwrap_or_default();

        // A filled honeypot gets a normal success answer so that automated
        // senders receive no signal that they were detected.
        if submission.is_bot() {
            return Ok(success_response(None));
        }

        match self.process(&submission).await {
            Ok(message_id) => Ok(success_response(message_id)),
            Err(error) => {
                error.log();
                Ok(error.into_response())
            }
        }
    }

    async fn process(
        &self,
        submission: &ContactSubmission,
    ) -> Result<Option<String>, SubmissionError> {
        let valid = submission
            .validate()
            .map_err(|error| SubmissionError::ClientError(error.to_string()))?;
        let settings = Settings::from_env()?;
        let bodies = render_notification(&valid);
        let subject = format!("{}: {}", settings.subject_prefix, valid.subject);
        let email = OutgoingEmail {
            from: &settings.from_address,
            to: [&settings.to_address],
            subject: &subject,
            html: &bodies.html,
            text: &bodies.text,
            reply_to: valid.email,
        };
        let message_id = self.mailer.send(&settings.api_key, &email).await?;
        Ok(message_id)
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.to_string().into())
        .unwrap()
}

fn success_response(message_id: Option<String>) -> Response<Body> {
    let body = match message_id {
        Some(id) => json!({"ok": true, "id": id}),
        None => json!({"ok": true}),
    };
    json_response(StatusCode::OK, body)
}

fn no_content_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "POST")
        .body(Body::Empty)
        .unwrap()
}

#[derive(Debug)]
enum SubmissionError {
    MethodNotAllowed,
    ClientError(String),
    ConfigurationError {
        missing: &'static str,
    },
    DeliveryError {
        description: String,
        reason: String,
    },
}

impl SubmissionError {
    fn log(&self) {
        match self {
            SubmissionError::MethodNotAllowed => {
                error!("Rejected contact submission with unsupported method");
            }
            SubmissionError::ClientError(description) => {
                error!("Client error processing contact submission: {description}");
            }
            SubmissionError::ConfigurationError { missing } => {
                error!("Server configuration incomplete: missing {missing}");
            }
            SubmissionError::DeliveryError { description, .. } => {
                error!("Error delivering contact submission: {description}");
            }
        }
    }

    fn into_response(self) -> Response<Body> {
        match self {
            SubmissionError::MethodNotAllowed => Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header("Allow", "POST")
                .header("Content-Type", "application/json")
                .body(
                    json!({"ok": false, "error": "Method not allowed."})
                        .to_string()
                        .into(),
                )
                .unwrap(),
            SubmissionError::ClientError(description) => json_response(
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "error": description}),
            ),
            SubmissionError::ConfigurationError { missing } => json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"ok": false, "error": format!("Server missing {missing}.")}),
            ),
            SubmissionError::DeliveryError { reason, .. } => json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"ok": false, "error": reason}),
            ),
        }
    }
}

impl From<EnvironmentError> for SubmissionError {
    fn from(error: EnvironmentError) -> Self {
        SubmissionError::ConfigurationError {
            missing: error.variable(),
        }
    }
}

impl From<ResendError> for SubmissionError {
    fn from(error: ResendError) -> Self {
        let reason = match &error {
            ResendError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => "Failed to send email.".into(),
        };
        SubmissionError::DeliveryError {
            description: error.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::MethodNotAllowed => write!(f, "Method not allowed"),
            SubmissionError::ClientError(description) => write!(f, "Client error: {description}"),
            SubmissionError::ConfigurationError { missing } => {
                write!(f, "Configuration error: missing {missing}")
            }
            SubmissionError::DeliveryError { description, .. } => {
                write!(f, "Delivery error: {description}")
            }
        }
    }
}

impl std::error::Error for SubmissionError {}
