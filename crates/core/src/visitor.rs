//! Visitor-side domain rules: registration validation, visit status, and
//! the outcome of a gate verification.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Message shown at the gate when a code does not match a visit for today.
pub const CODE_NOT_VALID_MESSAGE: &str = "Code invalid or expired";

/// Maximum number of photo references accepted in one attachment.
pub const MAX_PHOTOS_PER_VISIT: usize = 10;

/// Result of checking a code at the gate.
///
/// `NotValid` is an expected outcome (wrong code, or a pass for another
/// day), not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification<T> {
    Valid(T),
    NotValid,
}

impl<T> Verification<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid(_))
    }
}

/// A visit is pending until a guard records its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Pending,
    Visited,
}

impl VisitStatus {
    pub fn from_visited_at(visited_at: Option<Timestamp>) -> Self {
        if visited_at.is_some() {
            VisitStatus::Visited
        } else {
            VisitStatus::Pending
        }
    }
}

/// Photo filter for the admin visitor listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFilter {
    With,
    Without,
}

impl PhotoFilter {
    /// The `photos_uploaded` value this filter selects.
    pub fn uploaded(self) -> bool {
        matches!(self, PhotoFilter::With)
    }
}

/// Required free-text fields of a visitor registration.
#[derive(Debug, Clone, Copy)]
pub struct VisitorFields<'a> {
    pub visitor_name: &'a str,
    pub visitor_phone: &'a str,
    pub visit_time: &'a str,
    pub visit_reason: &'a str,
}

/// Every registration field must be non-blank. All problems are reported
/// together.
pub fn validate_visitor_fields(fields: &VisitorFields<'_>) -> Result<(), CoreError> {
    let missing: Vec<&str> = [
        ("visitor_name", fields.visitor_name),
        ("visitor_phone", fields.visitor_phone),
        ("visit_time", fields.visit_time),
        ("visit_reason", fields.visit_reason),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Required fields are empty: {}",
            missing.join(", ")
        )));
    }

    let values = [
        fields.visitor_name,
        fields.visitor_phone,
        fields.visit_time,
        fields.visit_reason,
    ];
    if values.iter().any(|v| v.contains('\0')) {
        return Err(CoreError::Validation(
            "Fields must not contain NUL bytes".into(),
        ));
    }
    Ok(())
}

/// Validate a batch of photo references before attaching it to a visit.
pub fn validate_photo_refs(photos: &[String]) -> Result<(), CoreError> {
    if photos.is_empty() {
        return Err(CoreError::Validation("At least one photo is required".into()));
    }
    if photos.len() > MAX_PHOTOS_PER_VISIT {
        return Err(CoreError::Validation(format!(
            "At most {MAX_PHOTOS_PER_VISIT} photos can be attached to a visit"
        )));
    }
    if photos.iter().any(|p| p.trim().is_empty() || p.contains('\0')) {
        return Err(CoreError::Validation(
            "Photo references must not be blank or contain NUL bytes".into(),
        ));
    }
    Ok(())
}
