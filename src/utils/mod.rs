//! # Utility Modules
//!
//! Supporting utilities shared by the codec facade.
//!
//! ## Components
//! - **Logging**: `tracing-subscriber` setup driven by [`LoggingConfig`](crate::config::LoggingConfig)
//! - **Metrics**: Thread-safe encode/decode counters

pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, Metrics, MetricsSnapshot, Timer};
