//! Account roles and the per-route capability check.
//!
//! Every user holds exactly one [`Role`]. Routes declare the [`Capability`]
//! they need and ask [`authorize`] for an [`Access`] decision instead of
//! comparing role strings inline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_RESIDENT: &str = "resident";
pub const ROLE_GUARD: &str = "guard";
pub const ROLE_ADMINISTRATOR: &str = "administrator";

/// The closed set of account roles. Stored as text in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    Guard,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Resident, Role::Guard, Role::Administrator];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Resident => ROLE_RESIDENT,
            Role::Guard => ROLE_GUARD,
            Role::Administrator => ROLE_ADMINISTRATOR,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Parses a role name case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == lowered)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid role '{s}'. Must be one of: resident, guard, administrator"
                ))
            })
    }
}

/// Lets row decoders read the stored text column straight into a [`Role`].
impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Something a route lets the caller do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Register visitors hosted by the caller and view their own history.
    RegisterVisitors,
    /// Verify codes, list today's visits, mark visits, attach photos.
    GuardGate,
    /// User accounts and bulk import, visitor management, and statistics.
    Administer,
}

/// Outcome of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Decide whether `role` may exercise `capability`.
///
/// Administrators can do everything a guard can.
pub fn authorize(role: Role, capability: Capability) -> Access {
    let allowed = match capability {
        Capability::RegisterVisitors => true,
        Capability::GuardGate => matches!(role, Role::Guard | Role::Administrator),
        Capability::Administer => role == Role::Administrator,
    };
    if allowed {
        Access::Allow
    } else {
        Access::Deny
    }
}
