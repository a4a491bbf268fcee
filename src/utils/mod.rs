//! # Utility Modules
//!
//! Supporting utilities shared by the session and its handlers.
//!
//! ## Components
//! - **Logging**: subscriber setup from configuration
//! - **Metrics**: thread-safe traffic and outcome counters

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{Metrics, MetricsSnapshot};
