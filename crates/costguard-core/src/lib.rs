//! # CostGuard
//!
//! Cost-risk alerting for AWS account activity.
//!
//! CostGuard looks at one CloudTrail event at a time and decides whether it
//! is likely to start billing outside the Free Tier. Cost-risk events raise
//! a single notification; everything else is ignored.
//!
//! ## Architecture
//!
//! - **Classifier**: priority-ordered rule list, event in, decision out
//! - **Alerting**: notification formatting and delivery, plus the handler
//!   that ties classification to dispatch
//! - **API**: HTTP endpoint for webhook-style delivery
//!
//! ## Quick Start
//!
//! ```bash
//! # Classify a saved CloudTrail record without notifying
//! costguard classify --input event.json
//!
//! # Classify and notify
//! costguard handle --input event.json
//!
//! # Accept events over HTTP
//! costguard serve
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{EventHandler, Notification, Notifier};
    pub use crate::classifier::Classifier;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
}
