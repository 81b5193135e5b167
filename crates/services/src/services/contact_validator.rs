//! Validation of untrusted contact submissions.
//!
//! [`validate_contact`] is the single place where a raw JSON body becomes a
//! typed [`CreateContact`]; nothing downstream re-checks the fields.

use std::{collections::BTreeMap, fmt};

use db::models::contact::CreateContact;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const MESSAGE_MAX_CHARS: usize = 5000;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Field name to human-readable reason, for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.insert(field.into(), reason.into());
    }

    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert(field, reason);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Check a raw request body and narrow it to a [`CreateContact`].
///
/// Strings are trimmed before the length checks, and the trimmed values are
/// what gets returned. Every failing field is reported, not just the first.
pub fn validate_contact(input: &Value) -> Result<CreateContact, FieldErrors> {
    let mut errors = FieldErrors::default();

    let Some(object) = input.as_object() else {
        errors.insert("body", "Request body must be a JSON object");
        return Err(errors);
    };

    let name = required_text(object, "name", "Name", NAME_MAX_CHARS, &mut errors);
    let email = required_text(object, "email", "Email", EMAIL_MAX_CHARS, &mut errors).filter(
        |email| {
            let ok = EMAIL_PATTERN.is_match(email);
            if !ok {
                errors.insert("email", "Email must be a valid email address");
            }
            ok
        },
    );
    let message = required_text(object, "message", "Message", MESSAGE_MAX_CHARS, &mut errors);

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(CreateContact {
            name,
            email,
            message,
        }),
        _ => Err(errors),
    }
}

/// `true` when [`validate_contact`] would accept the input.
pub fn is_valid_contact(input: &Value) -> bool {
    validate_contact(input).is_ok()
}

fn required_text(
    object: &Map<String, Value>,
    field: &'static str,
    label: &str,
    max_chars: usize,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = match object.get(field) {
        None | Some(Value::Null) => {
            errors.insert(field, format!("{label} is required"));
            return None;
        }
        Some(Value::String(value)) => value.trim(),
        Some(_) => {
            errors.insert(field, format!("{label} must be a string"));
            return None;
        }
    };

    if value.is_empty() {
        errors.insert(field, format!("{label} is required"));
        return None;
    }
    if value.chars().count() > max_chars {
        errors.insert(
            field,
            format!("{label} must be at most {max_chars} characters"),
        );
        return None;
    }

    Some(value.to_string())
}
