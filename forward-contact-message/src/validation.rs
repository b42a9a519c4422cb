use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

pub const MAX_NAME_LENGTH: usize = 80;
pub const MAX_EMAIL_LENGTH: usize = 120;
pub const MAX_SUBJECT_LENGTH: usize = 120;
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// One contact-form submission as it arrives off the wire.
///
/// Fields are kept as raw JSON values so that a missing or wrong-typed field
/// coerces to the empty string instead of failing deserialization. An
/// unparseable request body maps to the all-empty submission via `Default`.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct ContactSubmission {
    name: Value,
    email: Value,
    subject: Value,
    message: Value,
    company: Value,
}

impl ContactSubmission {
    /// Bots tend to fill the hidden `company` field; humans never see it.
    pub fn is_bot(&self) -> bool {
        !coerce(&self.company).is_empty()
    }

    pub fn validate(&self) -> Result<ValidSubmission<'_>, ValidationError> {
        let name = coerce(&self.name);
        let email = coerce(&self.email);
        let subject = coerce(&self.subject);
        let message = coerce(&self.message);

        if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        check_length("name", name, MAX_NAME_LENGTH)?;
        check_length("email", email, MAX_EMAIL_LENGTH)?;
        check_length("subject", subject, MAX_SUBJECT_LENGTH)?;
        check_length("message", message, MAX_MESSAGE_LENGTH)?;
        if !email_shape().is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(ValidSubmission {
            name,
            email,
            subject,
            message,
        })
    }
}

/// Borrowed view of a submission which has passed every validation gate.
#[derive(Debug)]
pub struct ValidSubmission<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    TooLong {
        field: &'static str,
        limit: usize,
    },
    InvalidEmail,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingFields => write!(f, "Missing required fields."),
            ValidationError::TooLong { field, limit } => {
                write!(f, "Field {field} is too long (maximum {limit} characters).")
            }
            ValidationError::InvalidEmail => write!(f, "Invalid email."),
        }
    }
}

impl std::error::Error for ValidationError {}

fn coerce(value: &Value) -> &str {
    value.as_str().map(str::trim).unwrap_or("")
}

fn check_length(
    field: &'static str,
    value: &str,
    limit: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > limit {
        Err(ValidationError::TooLong { field, limit })
    } else {
        Ok(())
    }
}

// local@domain.tld shape: no whitespace, no second @, a dot in the domain part.
fn email_shape() -> &'static Regex {
    static EMAIL_SHAPE: OnceLock<Regex> = OnceLock::new();
    EMAIL_SHAPE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}
