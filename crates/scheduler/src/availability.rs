//! Availability calculator over a [`LaunchStore`].

use std::sync::Arc;

use openlaunch_core::availability::{build_daily_availability, validate_range, DailyAvailability};
use openlaunch_core::capacity::SlotCapacityPolicy;
use openlaunch_core::launch::LaunchTier;
use openlaunch_core::types::LaunchDate;

use crate::error::ScheduleError;
use crate::store::LaunchStore;

/// Computes remaining slots per tier for each day of a date range.
///
/// Read-only. Results are rebuilt from the store on every call.
#[derive(Clone)]
pub struct AvailabilityCalculator {
    policy: Arc<SlotCapacityPolicy>,
    store: Arc<dyn LaunchStore>,
}

impl AvailabilityCalculator {
    pub fn new(policy: Arc<SlotCapacityPolicy>, store: Arc<dyn LaunchStore>) -> Self {
        Self { policy, store }
    }

    /// One entry per calendar day in `[start, end]`, ascending.
    ///
    /// The range is not checked against any tier window.
    pub async fn availability(
        &self,
        start: LaunchDate,
        end: LaunchDate,
    ) -> Result<Vec<DailyAvailability>, ScheduleError> {
        validate_range(start, end).map_err(|e| ScheduleError::InvalidRequest(e.to_string()))?;

        let usage = self.store.slot_usage(start, end).await?;
        let days = build_daily_availability(&self.policy, start, end, &usage);

        for day in days.iter().filter(|d| d.overbooked) {
            tracing::warn!(date = %day.date, "Launch day holds more committed launches than its capacity");
        }

        Ok(days)
    }

    /// Availability across `tier`'s own scheduling window as seen from `today`.
    pub async fn availability_for_tier(
        &self,
        tier: LaunchTier,
        today: LaunchDate,
    ) -> Result<Vec<DailyAvailability>, ScheduleError> {
        let window = self.policy.window_for(tier, today);
        self.availability(window.earliest, window.latest).await
    }
}
