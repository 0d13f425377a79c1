//! Slot capacity policy: per-tier daily limits and scheduling windows.
//!
//! The policy is built once at startup and passed explicitly to the
//! availability calculator, rate limiter and scheduler.

use chrono::Duration;
use serde::Serialize;

use crate::availability::MAX_AVAILABILITY_RANGE_DAYS;
use crate::error::CoreError;
use crate::launch::LaunchTier;
use crate::types::LaunchDate;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_FREE_DAILY_LIMIT: i64 = 10;
pub const DEFAULT_FREE_MIN_DAYS_AHEAD: i64 = 1;
pub const DEFAULT_FREE_MAX_DAYS_AHEAD: i64 = 90;

pub const DEFAULT_PREMIUM_DAILY_LIMIT: i64 = 5;
pub const DEFAULT_PREMIUM_MIN_DAYS_AHEAD: i64 = 1;
pub const DEFAULT_PREMIUM_MAX_DAYS_AHEAD: i64 = 30;

pub const DEFAULT_PREMIUM_PLUS_DAILY_LIMIT: i64 = 3;
pub const DEFAULT_PREMIUM_PLUS_MIN_DAYS_AHEAD: i64 = 1;
pub const DEFAULT_PREMIUM_PLUS_MAX_DAYS_AHEAD: i64 = 14;

/// Launches a single user may have committed on one day, across all tiers.
pub const DEFAULT_USER_DAILY_LAUNCH_LIMIT: i64 = 1;

/// Furthest ahead any tier may schedule. Keeps every tier window inside a
/// single availability query.
pub const MAX_DAYS_AHEAD: i64 = MAX_AVAILABILITY_RANGE_DAYS - 1;

// ---------------------------------------------------------------------------
// Tier limits
// ---------------------------------------------------------------------------

/// Capacity and scheduling window for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    pub daily_limit: i64,
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
}

impl TierLimits {
    pub const fn new(daily_limit: i64, min_days_ahead: i64, max_days_ahead: i64) -> Self {
        Self {
            daily_limit,
            min_days_ahead,
            max_days_ahead,
        }
    }

    fn validate(&self, tier: LaunchTier) -> Result<(), CoreError> {
        if self.daily_limit < 0 {
            return Err(CoreError::Validation(format!(
                "{tier} daily_limit must be >= 0, got {}",
                self.daily_limit
            )));
        }
        if self.min_days_ahead < 0 {
            return Err(CoreError::Validation(format!(
                "{tier} min_days_ahead must be >= 0, got {}",
                self.min_days_ahead
            )));
        }
        if self.max_days_ahead > MAX_DAYS_AHEAD {
            return Err(CoreError::Validation(format!(
                "{tier} max_days_ahead must be <= {MAX_DAYS_AHEAD}, got {}",
                self.max_days_ahead
            )));
        }
        if self.min_days_ahead > self.max_days_ahead {
            return Err(CoreError::Validation(format!(
                "{tier} min_days_ahead ({}) must not exceed max_days_ahead ({})",
                self.min_days_ahead, self.max_days_ahead
            )));
        }
        Ok(())
    }
}

/// Inclusive range of dates a tier may schedule into, relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchWindow {
    pub earliest: LaunchDate,
    pub latest: LaunchDate,
}

impl LaunchWindow {
    pub fn contains(&self, date: LaunchDate) -> bool {
        self.earliest <= date && date <= self.latest
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Immutable capacity configuration for every tier plus the per-user limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCapacityPolicy {
    free: TierLimits,
    premium: TierLimits,
    premium_plus: TierLimits,
    per_user_daily_limit: i64,
}

impl SlotCapacityPolicy {
    /// Build a policy, rejecting negative limits, inverted windows and windows
    /// reaching past [`MAX_DAYS_AHEAD`].
    pub fn new(
        free: TierLimits,
        premium: TierLimits,
        premium_plus: TierLimits,
        per_user_daily_limit: i64,
    ) -> Result<Self, CoreError> {
        free.validate(LaunchTier::Free)?;
        premium.validate(LaunchTier::Premium)?;
        premium_plus.validate(LaunchTier::PremiumPlus)?;
        if per_user_daily_limit < 0 {
            return Err(CoreError::Validation(format!(
                "per_user_daily_limit must be >= 0, got {per_user_daily_limit}"
            )));
        }
        Ok(Self {
            free,
            premium,
            premium_plus,
            per_user_daily_limit,
        })
    }

    pub fn limits_for(&self, tier: LaunchTier) -> TierLimits {
        match tier {
            LaunchTier::Free => self.free,
            LaunchTier::Premium => self.premium,
            LaunchTier::PremiumPlus => self.premium_plus,
        }
    }

    pub fn daily_limit(&self, tier: LaunchTier) -> i64 {
        self.limits_for(tier).daily_limit
    }

    pub fn per_user_daily_limit(&self) -> i64 {
        self.per_user_daily_limit
    }

    /// The dates `tier` may schedule into when "today" is `today`.
    pub fn window_for(&self, tier: LaunchTier, today: LaunchDate) -> LaunchWindow {
        let limits = self.limits_for(tier);
        LaunchWindow {
            earliest: today + Duration::days(limits.min_days_ahead),
            latest: today + Duration::days(limits.max_days_ahead),
        }
    }

    pub fn is_within_window(&self, tier: LaunchTier, today: LaunchDate, date: LaunchDate) -> bool {
        self.window_for(tier, today).contains(date)
    }
}

impl Default for SlotCapacityPolicy {
    fn default() -> Self {
        Self {
            free: TierLimits::new(
                DEFAULT_FREE_DAILY_LIMIT,
                DEFAULT_FREE_MIN_DAYS_AHEAD,
                DEFAULT_FREE_MAX_DAYS_AHEAD,
            ),
            premium: TierLimits::new(
                DEFAULT_PREMIUM_DAILY_LIMIT,
                DEFAULT_PREMIUM_MIN_DAYS_AHEAD,
                DEFAULT_PREMIUM_MAX_DAYS_AHEAD,
            ),
            premium_plus: TierLimits::new(
                DEFAULT_PREMIUM_PLUS_DAILY_LIMIT,
                DEFAULT_PREMIUM_PLUS_MIN_DAYS_AHEAD,
                DEFAULT_PREMIUM_PLUS_MAX_DAYS_AHEAD,
            ),
            per_user_daily_limit: DEFAULT_USER_DAILY_LAUNCH_LIMIT,
        }
    }
}
