//! Open-Launch event bus and launch notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the domain event envelope.
//! - [`delivery`] -- external delivery over HTTP webhooks.
//! - [`LaunchNotifier`] -- background task that announces newly scheduled
//!   launches to a chat webhook.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{EventBus, PlatformEvent, LAUNCH_SCHEDULED};
pub use delivery::webhook::{WebhookDelivery, WebhookError};
pub use notifier::LaunchNotifier;
