use crate::GridConvention;
use thiserror::Error;

/// Returned only by the strict indexing mode; the default mode computes an
/// index for any input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GridDomainError {
    #[error("latitude {lat} is outside the domain of {convention:?}")]
    Latitude { convention: GridConvention, lat: f64 },

    #[error("longitude {lon} is outside the domain of {convention:?}")]
    Longitude { convention: GridConvention, lon: f64 },
}
