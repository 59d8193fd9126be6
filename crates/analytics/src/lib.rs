//! # Seaperf Analytics
//!
//! Layer 1, pure logic: the weather-filtered performance aggregation. It
//! acts as the "unbiased judge" of the pipeline — whatever survived the
//! joins and enrichment is filtered against fixed weather and speed
//! thresholds, classified by draught into ballast/laden, and reduced to a
//! `PerformanceProfile`.
//!
//! ## Architectural Principles
//!
//! - **Stateless calculation:** the `PerformanceAggregator` takes enriched
//!   points and a vessel profile and produces a profile record. No I/O,
//!   no stored state, trivially testable.
//! - **Exclusion over defaulting:** a point missing any required
//!   observation is dropped, never padded with zeros into the averages.

pub mod aggregator;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::PerformanceAggregator;
pub use report::PerformanceProfile;
