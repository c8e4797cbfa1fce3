//! Core types and rules for Rapport, a team feedback tracker.
//!
//! Managers write feedback for the employees on their team; employees read
//! and acknowledge it. This crate holds the domain model, the feedback
//! lifecycle, the sentiment trend aggregator and the dashboard composer. It has
//! no HTTP or database dependencies.

pub mod clock;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod lifecycle;
pub mod person;
pub mod service;
pub mod session;
pub mod store;
pub mod trend;

pub use error::{Error, ErrorKind, Result};
pub use service::FeedbackService;
pub use session::Session;
