//! Data models for CostGuard

mod decision;
mod event;

pub use decision::*;
pub use event::*;
