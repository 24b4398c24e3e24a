//! Condition tracking session for one entity.
//!
//! Wraps a rule catalog, the entity's condition state, the condition engine,
//! and a dice resolver behind a line-oriented command interface.

pub mod config;
pub mod error;
pub mod session;

pub use config::TrackerConfig;
pub use error::{TrackerError, TrackerResult};
pub use session::TrackerSession;
