//! Alerting for CostGuard
//!
//! Formats cost-risk decisions into notifications and delivers them.

mod handler;
mod notifier;

pub use handler::EventHandler;
pub use notifier::{from_config, LogNotifier, Notification, Notifier, WebhookNotifier};
