use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

use crate::form::{FieldKey, FieldLens, FormModel, ValidationError};
use crate::sender::ContactMessage;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Keys of the required fields that are still empty, in field order.
    pub fn missing_fields(&self) -> Vec<FieldKey> {
        let fields = Self::fields();
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(fields.name().key());
        }
        if self.email.is_empty() {
            missing.push(fields.email().key());
        }
        if self.message.is_empty() {
            missing.push(fields.message().key());
        }
        missing
    }

    pub fn value_by_key(&self, key: FieldKey) -> Option<&str> {
        let fields = Self::fields();
        if key == fields.name().key() {
            Some(&self.name)
        } else if key == fields.email().key() {
            Some(&self.email)
        } else if key == fields.message().key() {
            Some(&self.message)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == Self::field_keys().len()
    }
}

impl From<ContactForm> for ContactMessage {
    fn from(form: ContactForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            body: form.message,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Submission,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContactError {
    MissingFields,
    InvalidEmail,
    SendFailed { reason: String },
}

impl ContactError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContactError::MissingFields | ContactError::InvalidEmail => ErrorKind::Validation,
            ContactError::SendFailed { .. } => ErrorKind::Submission,
        }
    }
}

impl ValidationError for ContactError {
    fn message_key(&self) -> &'static str {
        match self {
            ContactError::MissingFields => "contact.error.missing_fields",
            ContactError::InvalidEmail => "contact.error.invalid_email",
            ContactError::SendFailed { .. } => "contact.error.send_failed",
        }
    }
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactError::MissingFields => f.write_str("required contact fields are empty"),
            ContactError::InvalidEmail => f.write_str("email address is malformed"),
            ContactError::SendFailed { reason } => {
                write!(f, "contact message delivery failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ContactError {}

/// `local@domain.tld` shape check. Not RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_contact(form: &ContactForm) -> Result<(), ContactError> {
    if !form.missing_fields().is_empty() {
        return Err(ContactError::MissingFields);
    }
    if !is_valid_email(&form.email) {
        return Err(ContactError::InvalidEmail);
    }
    Ok(())
}
