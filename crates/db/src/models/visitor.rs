//! Visitor entity model, read projections, and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use visitgate_core::types::{DbId, Timestamp};
use visitgate_core::visitor::{PhotoFilter, VisitStatus};

/// Full row from the `visitors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Visitor {
    pub id: DbId,
    pub visit_code: String,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub visit_reason: String,
    pub resident_id: Option<DbId>,
    pub visited_at: Option<Timestamp>,
    pub photos: Vec<String>,
    pub photos_uploaded: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A visit as the gate sees it: visitor fields plus the host's residence.
///
/// `residence` is `None` when the hosting resident has been deleted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct VisitProjection {
    pub id: DbId,
    pub visit_code: String,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visit_reason: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub residence: Option<String>,
    pub visited_at: Option<Timestamp>,
    pub photos_uploaded: bool,
    pub created_at: Timestamp,
}

impl VisitProjection {
    pub fn status(&self) -> VisitStatus {
        VisitStatus::from_visited_at(self.visited_at)
    }
}

/// A projection enriched with host contact details and photo references,
/// used by the guard details view and the admin listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisitorDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub visit: VisitProjection,
    pub host_email: Option<String>,
    pub host_phone: Option<String>,
    pub photos: Vec<String>,
}

/// DTO for inserting a visitor. The code is generated by the caller.
#[derive(Debug, Clone)]
pub struct CreateVisitor {
    pub visit_code: String,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub visit_reason: String,
    pub resident_id: DbId,
}

/// Filters for the admin visitor listing. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitorFilter {
    /// Case-insensitive substring of visitor name, visit code, or residence.
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<VisitStatus>,
    pub photos: Option<PhotoFilter>,
}

impl VisitorFilter {
    /// `ILIKE` pattern for the search term, with wildcards in the term escaped.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }

    /// `Some(true)` selects visited rows, `Some(false)` pending ones.
    pub fn visited(&self) -> Option<bool> {
        self.status.map(|s| s == VisitStatus::Visited)
    }

    pub fn photos_uploaded(&self) -> Option<bool> {
        self.photos.map(PhotoFilter::uploaded)
    }
}
