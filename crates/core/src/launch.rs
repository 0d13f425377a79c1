//! Launch tiers, launch lifecycle states, and the launch record.
//!
//! Tier and status IDs match the seed data of the `launch_tiers` and
//! `launch_statuses` lookup tables (1-based SMALLINT).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, LaunchDate, Timestamp};

/// Lookup-table ID type matching SMALLINT in the database.
pub type LookupId = i16;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Pricing/priority class of a launch submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchTier {
    Free,
    Premium,
    PremiumPlus,
}

impl LaunchTier {
    /// Every tier, in display order.
    pub const ALL: [LaunchTier; 3] = [Self::Free, Self::Premium, Self::PremiumPlus];

    /// Return the database lookup ID.
    pub fn id(self) -> LookupId {
        match self {
            Self::Free => 1,
            Self::Premium => 2,
            Self::PremiumPlus => 3,
        }
    }

    /// Resolve a database lookup ID.
    pub fn from_id(id: LookupId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Free),
            2 => Ok(Self::Premium),
            3 => Ok(Self::PremiumPlus),
            other => Err(CoreError::Internal(format!("Unknown launch tier id {other}"))),
        }
    }

    /// Wire name, e.g. `"premium_plus"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::PremiumPlus => "premium_plus",
        }
    }

    /// Whether a launch in this tier goes through the external payment flow.
    pub fn requires_payment(self) -> bool {
        !matches!(self, Self::Free)
    }
}

impl fmt::Display for LaunchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "premium_plus" => Ok(Self::PremiumPlus),
            other => Err(CoreError::Validation(format!(
                "Unknown launch tier '{other}' (expected free, premium or premium_plus)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a committed launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchStatus {
    Scheduled,
    Ongoing,
    Launched,
}

impl LaunchStatus {
    /// Return the database lookup ID.
    pub fn id(self) -> LookupId {
        match self {
            Self::Scheduled => 1,
            Self::Ongoing => 2,
            Self::Launched => 3,
        }
    }

    /// Resolve a database lookup ID.
    pub fn from_id(id: LookupId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Scheduled),
            2 => Ok(Self::Ongoing),
            3 => Ok(Self::Launched),
            other => Err(CoreError::Internal(format!(
                "Unknown launch status id {other}"
            ))),
        }
    }

    /// Committed launches occupy capacity; launched ones no longer do.
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Scheduled | Self::Ongoing)
    }

    /// Ongoing and launched launches appear in public category listings.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Ongoing | Self::Launched)
    }

    /// The only status reachable from `self`, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Scheduled => Some(Self::Ongoing),
            Self::Ongoing => Some(Self::Launched),
            Self::Launched => None,
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: Self) -> bool {
        self.next() == Some(to)
    }
}

/// Status IDs that count against daily capacity.
pub const COMMITTED_STATUS_IDS: [LookupId; 2] = [1, 2];

/// Status IDs shown in public category listings.
pub const PUBLIC_STATUS_IDS: [LookupId; 2] = [2, 3];

// ---------------------------------------------------------------------------
// Launch record
// ---------------------------------------------------------------------------

/// One project's commitment to launch on a date under a tier.
///
/// `tier` and `scheduled_date` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRecord {
    pub id: DbId,
    pub project_id: DbId,
    pub tier: LaunchTier,
    pub scheduled_date: LaunchDate,
    pub status: LaunchStatus,
    pub created_by: DbId,
    pub upvote_count: i64,
    pub daily_ranking: Option<i16>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for committing a new launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLaunch {
    pub project_id: DbId,
    pub tier: LaunchTier,
    pub scheduled_date: LaunchDate,
    pub created_by: DbId,
}
