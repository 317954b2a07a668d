//! Classification results and handler status records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Cost exposure that needs a look soon
    High,
    /// Billing has likely started already
    Critical,
}

impl Severity {
    /// Upper-case label used in notification subjects
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an event that matched a rule was still let through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// EC2 launch of an allow-listed instance type
    FreeTierEc2,
    /// EBS volume within the free storage allowance
    FreeTierEbs,
}

/// Outcome of classifying one activity event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// No notification; `reason` is set when a rule matched but found no cost risk
    Ignored {
        /// Sub-reason, absent for events no rule cares about
        reason: Option<IgnoreReason>,
    },
    /// Notify with the given severity and explanation
    Alert {
        /// Alert severity
        severity: Severity,
        /// Human-readable explanation
        reason: String,
    },
}

impl Decision {
    /// An ignored decision with no sub-reason
    pub fn ignored() -> Self {
        Self::Ignored { reason: None }
    }

    /// An ignored decision carrying a sub-reason
    pub fn ignored_because(reason: IgnoreReason) -> Self {
        Self::Ignored {
            reason: Some(reason),
        }
    }

    /// An alert decision
    pub fn alert(severity: Severity, reason: impl Into<String>) -> Self {
        Self::Alert {
            severity,
            reason: reason.into(),
        }
    }

    /// Whether this decision requires a notification
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }
}

/// Status value returned to the invoker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Event not relevant to cost protection
    #[serde(rename = "ignored")]
    Ignored,
    /// Free-tier EC2 launch
    #[serde(rename = "ignored - free tier EC2")]
    IgnoredFreeTierEc2,
    /// Free-tier EBS volume
    #[serde(rename = "ignored - free tier EBS")]
    IgnoredFreeTierEbs,
    /// Notification dispatched
    #[serde(rename = "alert sent")]
    AlertSent,
}

/// The `{"status": ...}` record returned for every handled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerStatus {
    /// Outcome of handling the event
    pub status: Status,
}

impl HandlerStatus {
    /// Status for an ignored decision
    pub fn ignored(reason: Option<IgnoreReason>) -> Self {
        let status = match reason {
            None => Status::Ignored,
            Some(IgnoreReason::FreeTierEc2) => Status::IgnoredFreeTierEc2,
            Some(IgnoreReason::FreeTierEbs) => Status::IgnoredFreeTierEbs,
        };
        Self { status }
    }

    /// Status after a notification was dispatched
    pub fn alert_sent() -> Self {
        Self {
            status: Status::AlertSent,
        }
    }
}
