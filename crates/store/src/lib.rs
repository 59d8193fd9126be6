//! # Seaperf Store
//!
//! Layer 3 adapter: the three external collaborators behind trait seams.
//!
//! ## Architectural Principles
//!
//! - **Capability-based access:** the pipeline core receives trait object
//!   handles (`&dyn TrackSource`, `&dyn VesselProfileSource`,
//!   `&dyn EnvironmentalStore`) scoped to one run. Connection lifecycle
//!   belongs to the caller, never to the core.
//! - **Swappable backends:** the SQL implementations talk to the real
//!   store; the in-memory implementations back the integration tests.
//!   Both satisfy the same contracts.
//! - **Whole-batch failure:** a failed query surfaces as a `StoreError`
//!   for the whole call. There is no partial per-key success.
//!
//! ## Public API
//!
//! - `connect`: establishes the pooled database connection.
//! - `TrackSource` / `VesselProfileSource` / `EnvironmentalStore`: the
//!   collaborator contracts.
//! - `SqlTrackSource` / `SqlVesselProfileSource` / `SqlEnvironmentalStore`:
//!   the database-backed implementations.
//! - `MemoryTrackSource` / `MemoryVesselProfileSource` /
//!   `MemoryEnvironmentalStore`: deterministic in-memory fakes.
//! - `StoreError`: the specific error types this crate returns.

pub mod error;
pub mod memory;
pub mod sources;
pub mod sql;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use memory::{MemoryEnvironmentalStore, MemoryTrackSource, MemoryVesselProfileSource};
pub use sources::{EnvironmentalStore, TrackSource, VesselProfileSource};
pub use sql::{connect, SqlEnvironmentalStore, SqlTrackSource, SqlVesselProfileSource};
