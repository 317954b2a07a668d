//! Notification delivery for alerts

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::NotifierConfig;
use crate::error::{Error, Result};
use crate::models::{ActivityEvent, Severity};

/// A formatted alert, ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Destination identifier (SNS topic ARN)
    pub destination: String,
    /// Alert severity
    pub severity: Severity,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub message: String,
}

impl Notification {
    /// Format the notification for an alerting event
    pub fn for_alert(
        destination: impl Into<String>,
        severity: Severity,
        reason: &str,
        event: &ActivityEvent,
    ) -> Self {
        let message = format!(
            "Severity: {severity}\n\
             Reason: {reason}\n\
             \n\
             Event: {}\n\
             Service: {}\n\
             Time: {}\n\
             Source IP: {}\n\
             User ARN: {}\n\
             \n\
             Recommended Action:\n\
             Review resource immediately to avoid unexpected charges.\n",
            event.event_name,
            event.event_source,
            event.timestamp(),
            event.source_ip_or_unknown(),
            event.user_identity.arn_or_unknown(),
        );

        Self {
            destination: destination.into(),
            severity,
            subject: format!("{severity} AWS Cost Protection Alert"),
            message,
        }
    }
}

/// Delivers notifications to the alert destination
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single notification
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Build the notifier selected by configuration
///
/// A configured webhook URL selects [`WebhookNotifier`]; otherwise alerts
/// go to the log through [`LogNotifier`].
pub fn from_config(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    match &config.webhook_url {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(url.clone(), config.timeout)?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}

/// Posts notifications as JSON to a webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a webhook notifier with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let payload = WebhookPayload {
            id: Uuid::new_v4(),
            destination: &notification.destination,
            subject: &notification.subject,
            message: &notification.message,
            severity: notification.severity,
            sent_at: Utc::now(),
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::notification(format!(
                "webhook returned {status}: {body}"
            )));
        }

        info!(
            notification_id = %payload.id,
            destination = %notification.destination,
            severity = %notification.severity,
            "Webhook notification sent"
        );
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        warn!(
            destination = %notification.destination,
            severity = %notification.severity,
            subject = %notification.subject,
            message = %notification.message,
            "Cost protection alert"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    id: Uuid,
    destination: &'a str,
    subject: &'a str,
    message: &'a str,
    severity: Severity,
    sent_at: DateTime<Utc>,
}
