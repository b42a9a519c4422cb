use std::fmt::Display;

pub const API_KEY_VARIABLE: &str = "RESEND_API_KEY";
pub const TO_ADDRESS_VARIABLE: &str = "CONTACT_TO_EMAIL";
pub const FROM_ADDRESS_VARIABLE: &str = "CONTACT_FROM_EMAIL";
pub const SUBJECT_PREFIX_VARIABLE: &str = "CONTACT_SUBJECT_PREFIX";

const DEFAULT_FROM_ADDRESS: &str = "Contact form <onboarding@resend.dev>";
const DEFAULT_SUBJECT_PREFIX: &str = "Website contact";

/// Immutable settings for one invocation, resolved from the process
/// environment when the request arrives.
pub struct Settings {
    pub api_key: String,
    pub to_address: String,
    pub from_address: String,
    pub subject_prefix: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, EnvironmentError> {
        Ok(Self {
            api_key: required(API_KEY_VARIABLE)?,
            to_address: required(TO_ADDRESS_VARIABLE)?,
            from_address: optional(FROM_ADDRESS_VARIABLE, DEFAULT_FROM_ADDRESS),
            subject_prefix: optional(SUBJECT_PREFIX_VARIABLE, DEFAULT_SUBJECT_PREFIX),
        })
    }
}

// An empty value counts as unset so that clearing a variable in the hosting
// console behaves the same as deleting it.
fn required(key: &'static str) -> Result<String, EnvironmentError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(EnvironmentError::MissingVariable(key))
}

fn optional(key: &'static str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.into())
}

#[derive(Debug)]
pub enum EnvironmentError {
    MissingVariable(&'static str),
}

impl EnvironmentError {
    pub fn variable(&self) -> &'static str {
        match self {
            EnvironmentError::MissingVariable(key) => key,
        }
    }
}

impl Display for EnvironmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentError::MissingVariable(key) => {
                write!(f, "Missing environment variable {key}")
            }
        }
    }
}

impl std::error::Error for EnvironmentError {}
