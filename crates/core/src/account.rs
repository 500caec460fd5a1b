//! Account field rules shared by registration, admin edits, and bulk import.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::CoreError;

/// Minimum password length accepted anywhere a password is set.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Length of the random part of a generated password.
const GENERATED_PASSWORD_LENGTH: usize = 8;

/// Suffix appended to generated passwords so they satisfy common
/// upper/digit/symbol rules downstream.
const GENERATED_PASSWORD_SUFFIX: &str = "A1!";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Emails are compared and stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Profile fields of an account, already trimmed and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFields {
    pub residence_number: String,
    pub email: String,
    pub phone: String,
}

impl AccountFields {
    /// Trim and validate raw profile input.
    pub fn parse(residence_number: &str, email: &str, phone: &str) -> Result<Self, CoreError> {
        let fields = Self {
            residence_number: residence_number.trim().to_string(),
            email: normalize_email(email),
            phone: phone.trim().to_string(),
        };

        let mut problems = Vec::new();
        if fields.residence_number.is_empty() {
            problems.push("Residence number is required");
        }
        if !is_valid_email(&fields.email) {
            problems.push("Email must be valid");
        }
        if fields.phone.is_empty() {
            problems.push("Phone number is required");
        }
        if [&fields.residence_number, &fields.email, &fields.phone]
            .iter()
            .any(|v| v.contains('\0'))
        {
            problems.push("Fields must not contain NUL bytes");
        }

        if problems.is_empty() {
            Ok(fields)
        } else {
            Err(CoreError::Validation(problems.join("; ")))
        }
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Random password for imported accounts that did not provide one.
pub fn generate_random_password() -> String {
    let random: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect();
    format!("{random}{GENERATED_PASSWORD_SUFFIX}")
}
