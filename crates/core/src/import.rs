//! Row parsing and validation for the CSV user bulk import.
//!
//! The file has a header row with `residenceNumber`, `email`, `phone`,
//! `password` and `role` columns (snake_case headers are accepted too).
//! Data rows are numbered from 2 so reported row numbers match what the
//! administrator sees in a spreadsheet.
//!
//! Nothing here touches the database. Duplicate detection against existing
//! accounts happens in the handler; this module only decides whether a row
//! is well-formed and keeps the tally.

use serde::{Deserialize, Serialize};

use crate::account::{
    generate_random_password, is_valid_email, normalize_email, AccountFields, MIN_PASSWORD_LENGTH,
};
use crate::error::CoreError;
use crate::roles::Role;

// ── Constants ────────────────────────────────────────────────────────

/// Row number of the first data row (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

/// Largest accepted upload, in bytes.
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

// ── Types ────────────────────────────────────────────────────────────

/// One raw CSV record. Every column is optional so that a missing value
/// becomes a row-level error instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportRow {
    #[serde(default, rename = "residenceNumber", alias = "residence_number")]
    pub residence_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A row that passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub account: AccountFields,
    pub password: String,
    /// `true` when no password was supplied and one was generated.
    pub password_generated: bool,
    pub role: Role,
}

/// Outcome counts for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_duplicate(&mut self, row_number: usize, detail: &str) {
        self.duplicates += 1;
        self.errors.push(format!("Row {row_number}: {detail}"));
    }

    pub fn record_skipped(&mut self, row_number: usize, problems: &[String]) {
        self.skipped += 1;
        self.errors
            .push(format!("Row {row_number}: {}", problems.join(", ")));
    }
}

// ── Parsing ──────────────────────────────────────────────────────────

/// Parse an uploaded CSV file into raw rows, each paired with its row
/// number in the file.
///
/// Fails only when the file as a whole is unreadable (bad UTF-8, broken
/// quoting). Blank records are dropped without shifting later numbers.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<(usize, ImportRow)>, CoreError> {
    if bytes.len() > MAX_IMPORT_BYTES {
        return Err(CoreError::Validation(format!(
            "Import file exceeds {} MB",
            MAX_IMPORT_BYTES / (1024 * 1024)
        )));
    }

    let invalid = |e: csv::Error| CoreError::Validation(format!("Invalid CSV file: {e}"));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers().map_err(invalid)?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(invalid)?;
        let row_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(FIRST_DATA_ROW + index);
        let row: ImportRow = record.deserialize(Some(&headers)).map_err(invalid)?;
        if row != ImportRow::default() {
            rows.push((row_number, row));
        }
    }

    if rows.is_empty() {
        return Err(CoreError::Validation(
            "The file contains no data rows".to_string(),
        ));
    }
    Ok(rows)
}

// ── Validation ───────────────────────────────────────────────────────

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validate a raw row. On failure returns every problem found, so the
/// administrator can fix the row in one pass.
pub fn validate_row(row: &ImportRow) -> Result<ValidatedRow, Vec<String>> {
    let mut problems = Vec::new();

    // PostgreSQL text cannot hold NUL.
    for (column, value) in [
        ("residenceNumber", &row.residence_number),
        ("email", &row.email),
        ("phone", &row.phone),
        ("password", &row.password),
        ("role", &row.role),
    ] {
        if value.as_deref().is_some_and(|v| v.contains('\0')) {
            problems.push(format!("{column} contains a NUL byte"));
        }
    }

    let residence = non_blank(&row.residence_number);
    let email = non_blank(&row.email);
    let phone = non_blank(&row.phone);

    if residence.is_none() {
        problems.push("residenceNumber is required".to_string());
    }
    if email.is_none() {
        problems.push("email is required".to_string());
    }
    if phone.is_none() {
        problems.push("phone is required".to_string());
    }

    let role = match non_blank(&row.role) {
        None => Some(Role::Resident),
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                problems.push(format!("invalid role '{raw}'"));
                None
            }
        },
    };

    let (password, password_generated) = match non_blank(&row.password) {
        None => (generate_random_password(), true),
        Some(p) if p.chars().count() < MIN_PASSWORD_LENGTH => {
            problems.push(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
            (String::new(), false)
        }
        Some(p) => (p.to_string(), false),
    };

    let account = match (residence, email, phone) {
        (Some(r), Some(e), Some(p)) => match AccountFields::parse(r, e, p) {
            Ok(fields) => Some(fields),
            Err(_) => {
                if !is_valid_email(&normalize_email(e)) {
                    problems.push(format!("invalid email '{e}'"));
                }
                None
            }
        },
        _ => None,
    };

    match (account, role) {
        (Some(account), Some(role)) if problems.is_empty() => Ok(ValidatedRow {
            account,
            password,
            password_generated,
            role,
        }),
        _ => Err(problems),
    }
}
