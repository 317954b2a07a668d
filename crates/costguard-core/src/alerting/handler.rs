//! Classify-then-notify event handling

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::Result;
use crate::models::{ActivityEvent, Decision, HandlerStatus};

use super::notifier::{self, Notification, Notifier};

/// Handles one activity event per call: classify, then notify on alert
pub struct EventHandler {
    classifier: Classifier,
    notifier: Arc<dyn Notifier>,
    destination: String,
}

impl EventHandler {
    /// Create a handler that sends alerts to `destination`
    pub fn new(
        classifier: Classifier,
        notifier: Arc<dyn Notifier>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            notifier,
            destination: destination.into(),
        }
    }

    /// Build a handler from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let notifier = notifier::from_config(&config.notifier)?;
        Ok(Self::new(
            Classifier::new(config.classifier.clone()),
            notifier,
            config.notifier.topic_arn.clone(),
        ))
    }

    /// The classifier used by this handler
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Handle a raw event, unwrapping an EventBridge envelope if present
    pub async fn handle_value(&self, value: Value) -> Result<HandlerStatus> {
        let event = ActivityEvent::from_value(value)?;
        self.handle(&event).await
    }

    /// Handle a parsed event
    ///
    /// Returns "alert sent" only once the notifier has accepted the alert.
    /// Notifier errors are returned unchanged.
    pub async fn handle(&self, event: &ActivityEvent) -> Result<HandlerStatus> {
        let (rule, decision) = self.classifier.evaluate(event);

        match decision {
            Decision::Ignored { reason } => {
                debug!(event_name = %event.event_name, ?reason, "Event ignored");
                Ok(HandlerStatus::ignored(reason))
            }
            Decision::Alert { severity, reason } => {
                info!(
                    event_name = %event.event_name,
                    rule = rule.unwrap_or_default(),
                    %severity,
                    reason = %reason,
                    "Cost-risk event detected"
                );

                let notification =
                    Notification::for_alert(self.destination.as_str(), severity, &reason, event);
                self.notifier.notify(&notification).await?;

                Ok(HandlerStatus::alert_sent())
            }
        }
    }
}
