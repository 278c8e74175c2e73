//! # Curvewatch Engine
//!
//! Stateful layer over the pure analytics:
//!
//! - [`AnalyticsService`]: holds the loaded datasets and configuration and
//!   exposes each analytic as a memoized call
//! - [`AnalyticsCache`]: thread-safe TTL cache keyed by operation and input
//!   fingerprint
//!
//! ## Architecture
//!
//! ```text
//! Quote table ───┐
//! Credit rows ───┼─> AnalyticsService ─> AnalyticsCache ─> curvewatch-analytics
//! Price source ──┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod error;
pub mod service;

pub use cache::{AnalyticsCache, CacheStats, Fingerprint};
pub use error::{EngineError, EngineResult};
pub use service::{AnalyticsService, CurveHorizon};
