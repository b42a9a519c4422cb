use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const FAKE_RESEND_PORT: u16 = 5641;
const SEND_PATH: &str = "/emails";

/// In-process stand-in for Resend's send-email endpoint. Records every
/// payload it receives and can be configured to reject sends.
pub struct FakeResend {
    state: Arc<Mutex<FakeResendState>>,
}

#[derive(Default)]
struct FakeResendState {
    sent: Vec<SentEmail>,
    failure: Option<(u16, String)>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SentEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: String,
}

impl FakeResend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeResendState::default())),
        }
    }

    /// Points the handler under test at this fake.
    pub fn setup_environment() {
        std::env::set_var(
            "RESEND_API_URL",
            format!("http://localhost:{FAKE_RESEND_PORT}{SEND_PATH}"),
        );
    }

    /// Answer every send with the given status and error message instead of
    /// accepting it.
    pub fn reject_with(self, status: u16, message: impl AsRef<str>) -> Self {
        self.state.lock().unwrap().failure = Some((status, message.as_ref().into()));
        self
    }

    /// Binds the listener before returning, so requests sent immediately
    /// afterwards cannot race the server startup.
    pub async fn start(&self) {
        let app = Router::new()
            .route(SEND_PATH, post(send_email))
            .with_state(self.state.clone());
        let listener = TcpListener::bind(("127.0.0.1", FAKE_RESEND_PORT))
            .await
            .unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl Default for FakeResend {
    fn default() -> Self {
        Self::new()
    }
}

async fn send_email(
    State(state): State<Arc<Mutex<FakeResendState>>>,
    headers: axum::http::HeaderMap,
    Json(email): Json<SentEmail>,
) -> (StatusCode, Json<Value>) {
    if !headers.contains_key("Authorization") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Missing API key"})),
        );
    }
    let mut state = state.lock().unwrap();
    if let Some((status, message)) = state.failure.clone() {
        return (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"message": message})),
        );
    }
    state.sent.push(email);
    let id = format!("fake-message-{}", state.sent.len());
    (StatusCode::OK, Json(json!({"id": id})))
}
