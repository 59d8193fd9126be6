//! # Seaperf Core Types
//!
//! Layer 0 of the system: the immutable value records that flow between the
//! pipeline stages. This crate has no knowledge of grids, stores or math —
//! it only defines the shapes of the data.
//!
//! ## Architectural Principles
//!
//! - **Value semantics:** every stage consumes records and produces new
//!   records. Nothing in here is mutated in place across a stage boundary.
//! - **Honest optionality:** fields that can be absent on the wire (AIS
//!   reports routinely drop `sog` or `draught`, store rows can hold NULLs)
//!   are `Option`s, so "missing" is visible in the type instead of being
//!   smuggled in as a zero.

pub mod structs;

// Re-export the core types to provide a clean public API.
pub use structs::{
    EnrichedTrackPoint, EnvKey, FlowMotion, FlowRecord, ResampledTrackPoint, TrackPoint,
    VesselProfile, WaveRecord, WindMotion, WindRecord,
};
