//! Per-day slot availability derived from committed launch counts.
//!
//! Availability is never stored; it is rebuilt from the latest per-day,
//! per-tier counts on every query.

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::capacity::SlotCapacityPolicy;
use crate::error::CoreError;
use crate::launch::LaunchTier;
use crate::types::LaunchDate;

/// Longest date range a single availability query may cover.
pub const MAX_AVAILABILITY_RANGE_DAYS: i64 = 366;

/// Committed launches for one `(date, tier)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUsage {
    pub date: LaunchDate,
    pub tier: LaunchTier,
    pub count: i64,
}

/// Remaining slots per tier for one calendar day.
///
/// Remainders are clamped at zero. `overbooked` is set when any tier holds
/// more committed launches than its daily limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyAvailability {
    pub date: LaunchDate,
    pub free_slots: i64,
    pub premium_slots: i64,
    pub premium_plus_slots: i64,
    pub total_slots: i64,
    pub overbooked: bool,
}

impl DailyAvailability {
    pub fn slots_for(&self, tier: LaunchTier) -> i64 {
        match tier {
            LaunchTier::Free => self.free_slots,
            LaunchTier::Premium => self.premium_slots,
            LaunchTier::PremiumPlus => self.premium_plus_slots,
        }
    }
}

/// Validate an inclusive date range for an availability query.
pub fn validate_range(start: LaunchDate, end: LaunchDate) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::Validation(format!(
            "start date {start} must not be after end date {end}"
        )));
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_AVAILABILITY_RANGE_DAYS {
        return Err(CoreError::Validation(format!(
            "date range covers {days} days, maximum is {MAX_AVAILABILITY_RANGE_DAYS}"
        )));
    }
    Ok(())
}

/// Every date in `[start, end]`, ascending. Empty when `start > end`.
pub fn dates_in_range(start: LaunchDate, end: LaunchDate) -> impl Iterator<Item = LaunchDate> {
    let days = if start > end {
        0
    } else {
        (end - start).num_days() + 1
    };
    (0..days).map(move |offset| start + Duration::days(offset))
}

/// Build one [`DailyAvailability`] per date in `[start, end]`.
///
/// Usage rows outside the range are ignored; duplicated `(date, tier)` rows
/// are summed.
pub fn build_daily_availability(
    policy: &SlotCapacityPolicy,
    start: LaunchDate,
    end: LaunchDate,
    usage: &[SlotUsage],
) -> Vec<DailyAvailability> {
    let mut counts: HashMap<(LaunchDate, LaunchTier), i64> = HashMap::new();
    for row in usage {
        *counts.entry((row.date, row.tier)).or_default() += row.count;
    }

    dates_in_range(start, end)
        .map(|date| {
            let raw = |tier: LaunchTier| {
                policy.daily_limit(tier) - counts.get(&(date, tier)).copied().unwrap_or(0)
            };
            let free = raw(LaunchTier::Free);
            let premium = raw(LaunchTier::Premium);
            let premium_plus = raw(LaunchTier::PremiumPlus);
            let overbooked = free < 0 || premium < 0 || premium_plus < 0;

            let free_slots = free.max(0);
            let premium_slots = premium.max(0);
            let premium_plus_slots = premium_plus.max(0);

            DailyAvailability {
                date,
                free_slots,
                premium_slots,
                premium_plus_slots,
                total_slots: free_slots + premium_slots + premium_plus_slots,
                overbooked,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::TierLimits;

    fn date(s: &str) -> LaunchDate {
        s.parse().unwrap()
    }

    fn policy() -> SlotCapacityPolicy {
        SlotCapacityPolicy::new(
            TierLimits::new(5, 1, 90),
            TierLimits::new(3, 1, 30),
            TierLimits::new(2, 1, 14),
            1,
        )
        .unwrap()
    }

    #[test]
    fn covers_every_day_once_in_order() {
        let days = build_daily_availability(&policy(), date("2024-06-01"), date("2024-06-10"), &[]);
        assert_eq!(days.len(), 10);
        assert_eq!(days[0].date, date("2024-06-01"));
        assert_eq!(days[9].date, date("2024-06-10"));
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn single_day_range() {
        let days = build_daily_availability(&policy(), date("2024-06-01"), date("2024-06-01"), &[]);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].total_slots, 10);
    }

    #[test]
    fn crosses_month_boundary() {
        let days = build_daily_availability(&policy(), date("2024-02-27"), date("2024-03-02"), &[]);
        let dates: Vec<_> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(
            dates,
            ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
    }

    #[test]
    fn subtracts_usage_per_tier() {
        let usage = [
            SlotUsage { date: date("2024-06-02"), tier: LaunchTier::Free, count: 4 },
            SlotUsage { date: date("2024-06-02"), tier: LaunchTier::PremiumPlus, count: 1 },
            SlotUsage { date: date("2024-06-03"), tier: LaunchTier::Premium, count: 3 },
        ];
        let days = build_daily_availability(&policy(), date("2024-06-01"), date("2024-06-03"), &usage);

        assert_eq!(days[0].total_slots, 10);
        assert_eq!(days[1].free_slots, 1);
        assert_eq!(days[1].premium_slots, 3);
        assert_eq!(days[1].premium_plus_slots, 1);
        assert_eq!(days[1].total_slots, 5);
        assert_eq!(days[2].slots_for(LaunchTier::Premium), 0);
        assert!(!days[2].overbooked);
    }

    #[test]
    fn overbooked_day_clamps_and_flags() {
        let usage = [SlotUsage { date: date("2024-06-01"), tier: LaunchTier::PremiumPlus, count: 4 }];
        let days = build_daily_availability(&policy(), date("2024-06-01"), date("2024-06-01"), &usage);
        assert_eq!(days[0].premium_plus_slots, 0);
        assert_eq!(days[0].total_slots, 8);
        assert!(days[0].overbooked);
    }

    #[test]
    fn ignores_usage_outside_range() {
        let usage = [SlotUsage { date: date("2024-05-31"), tier: LaunchTier::Free, count: 5 }];
        let days = build_daily_availability(&policy(), date("2024-06-01"), date("2024-06-01"), &usage);
        assert_eq!(days[0].free_slots, 5);
    }

    #[test]
    fn range_validation() {
        assert!(validate_range(date("2024-06-01"), date("2024-06-01")).is_ok());
        assert!(validate_range(date("2024-06-02"), date("2024-06-01")).is_err());
        assert!(validate_range(date("2024-01-01"), date("2024-12-31")).is_ok());
        assert!(validate_range(date("2024-01-01"), date("2025-01-01")).is_err());
    }

    #[test]
    fn inverted_range_yields_no_dates() {
        assert_eq!(dates_in_range(date("2024-06-02"), date("2024-06-01")).count(), 0);
    }
}
