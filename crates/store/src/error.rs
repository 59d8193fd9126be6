use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("No vessel profile found for mmsi {0}")]
    VesselNotFound(String),
}
