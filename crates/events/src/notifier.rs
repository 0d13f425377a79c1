//! Chat notifications for newly scheduled launches.
//!
//! [`LaunchNotifier`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and posts a short announcement to a chat webhook for every
//! [`LAUNCH_SCHEDULED`] event. Delivery runs detached from the request that
//! scheduled the launch: a failed or slow webhook is logged and never
//! reaches the caller.

use openlaunch_core::launch::LaunchTier;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::{PlatformEvent, LAUNCH_SCHEDULED};
use crate::delivery::webhook::WebhookDelivery;

/// Background service announcing scheduled launches.
#[derive(Clone)]
pub struct LaunchNotifier {
    delivery: WebhookDelivery,
    webhook_url: String,
    app_url: String,
}

impl LaunchNotifier {
    /// `app_url` is the public site root used to link the project page.
    pub fn new(webhook_url: impl Into<String>, app_url: impl Into<String>) -> Self {
        Self {
            delivery: WebhookDelivery::new(),
            webhook_url: webhook_url.into(),
            app_url: app_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Use a specific delivery client (e.g. with a shorter backoff).
    pub fn with_delivery(mut self, delivery: WebhookDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Build the chat message for an event.
    ///
    /// Returns `None` for events other than [`LAUNCH_SCHEDULED`].
    pub fn chat_message(&self, event: &PlatformEvent) -> Option<serde_json::Value> {
        if event.event_type != LAUNCH_SCHEDULED {
            return None;
        }
        let payload = &event.payload;
        let field = |key: &str| payload[key].as_str().unwrap_or_default().to_string();

        let tier = match field("tier").parse::<LaunchTier>() {
            Ok(LaunchTier::Free) => "Free",
            Ok(LaunchTier::Premium) => "Premium",
            Ok(LaunchTier::PremiumPlus) => "Premium Plus",
            Err(_) => "Unknown",
        };

        let content = format!(
            "New launch scheduled: **{name}** on {date} ({tier})\nWebsite: {website}\nProject: {app}/projects/{slug}",
            name = field("project_name"),
            date = field("scheduled_date"),
            website = field("website_url"),
            app = self.app_url,
            slug = field("project_slug"),
        );
        Some(serde_json::json!({ "content": content }))
    }

    /// Run the notification loop until `cancel` fires or the bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>, cancel: CancellationToken) {
        tracing::info!(url = %self.webhook_url, "Launch notifier started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Launch notifier stopping");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.dispatch(&event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Launch notifier lagged, some notifications were dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, launch notifier shutting down");
                        break;
                    }
                },
            }
        }
    }

    fn dispatch(&self, event: &PlatformEvent) {
        let Some(message) = self.chat_message(event) else {
            return;
        };
        let delivery = self.delivery.clone();
        let url = self.webhook_url.clone();
        let launch_id = event.source_entity_id;
        tokio::spawn(async move {
            match delivery.deliver(&url, &message).await {
                Ok(()) => tracing::debug!(?launch_id, "Launch notification delivered"),
                Err(e) => tracing::warn!(?launch_id, error = %e, "Launch notification not delivered"),
            }
        });
    }
}
