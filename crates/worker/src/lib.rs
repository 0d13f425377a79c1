//! Background jobs for Open-Launch.
//!
//! - [`promotion`] -- moves launches through their daily lifecycle and ranks
//!   each finished day.

pub mod promotion;

pub use promotion::{PromotionJob, DEFAULT_PROMOTION_INTERVAL};
