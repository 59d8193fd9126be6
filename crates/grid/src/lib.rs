//! # Seaperf Grid Indexing
//!
//! Layer 1, pure logic: maps a `(lat, lon)` coordinate to the integer cell
//! indices of the gridded environmental datasets. Each dataset family uses
//! its own origin, step, latitude axis direction and longitude wrap rule,
//! and those differences are load-bearing — the store keys were written
//! with exactly these conventions.
//!
//! ## Public API
//!
//! - `GridConvention`: the five known grid conventions.
//! - `GridConvention::index`: total, never-failing index computation.
//! - `GridConvention::index_checked`: the stricter mode that rejects
//!   coordinates outside the convention's domain.
//! - `GridDomainError`: returned only by the checked mode.

pub mod error;

pub use error::GridDomainError;

use serde::{Deserialize, Serialize};

/// The geometry of one grid convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub lat_origin: f64,
    pub lon_origin: f64,
    pub step: f64,
    /// Number of longitude cells; an index equal to this wraps to 0.
    pub lon_cells: i64,
    /// ERA5 grids count latitude downward from +90.
    pub inverted_lat: bool,
    /// ERA5 grids use 0..360 longitude; negative input is folded first.
    pub folds_lon: bool,
    /// Valid latitude domain, used only by the checked mode.
    pub lat_domain: (f64, f64),
}

/// The five grid conventions the environmental datasets are published on.
///
/// `Mfwam` (waves) and `Smoc` (currents) share the same 1/12° geometry but
/// are kept distinct because they name different upstream products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridConvention {
    Mfwam,
    Smoc,
    Ec,
    Era5Wind,
    Era5Wave,
}

impl GridConvention {
    /// The geometry constants for this convention.
    pub fn geometry(&self) -> GridGeometry {
        match self {
            GridConvention::Mfwam | GridConvention::Smoc => GridGeometry {
                lat_origin: -80.0,
                lon_origin: -180.0,
                step: 1.0 / 12.0,
                lon_cells: 4320,
                inverted_lat: false,
                folds_lon: false,
                lat_domain: (-80.0, 90.0),
            },
            GridConvention::Ec => GridGeometry {
                lat_origin: -90.0,
                lon_origin: -180.0,
                step: 0.25,
                lon_cells: 1440,
                inverted_lat: false,
                folds_lon: false,
                lat_domain: (-90.0, 90.0),
            },
            GridConvention::Era5Wind => GridGeometry {
                lat_origin: 90.0,
                lon_origin: 0.0,
                step: 0.25,
                lon_cells: 1440,
                inverted_lat: true,
                folds_lon: true,
                lat_domain: (-90.0, 90.0),
            },
            GridConvention::Era5Wave => GridGeometry {
                lat_origin: 90.0,
                lon_origin: 0.0,
                step: 0.5,
                lon_cells: 720,
                inverted_lat: true,
                folds_lon: true,
                lat_domain: (-90.0, 90.0),
            },
        }
    }

    /// Maps a coordinate to `(lat_index, lon_index)`.
    ///
    /// Total and deterministic: out-of-domain input produces an
    /// out-of-range index, which the caller sees as a failed join, never
    /// as an error. The only fix-up applied is the longitude wrap at the
    /// date line (`lon_index == lon_cells` becomes `0`).
    pub fn index(&self, lat: f64, lon: f64) -> (i64, i64) {
        let geo = self.geometry();
        let lon = if geo.folds_lon && lon < 0.0 { lon + 360.0 } else { lon };

        let lat_index = if geo.inverted_lat {
            ((geo.lat_origin - lat) / geo.step).round_ties_even() as i64
        } else {
            ((lat - geo.lat_origin) / geo.step).round_ties_even() as i64
        };

        let mut lon_index = ((lon - geo.lon_origin) / geo.step).round_ties_even() as i64;
        if lon_index == geo.lon_cells {
            lon_index = 0;
        }

        (lat_index, lon_index)
    }

    /// Like [`index`](Self::index), but rejects coordinates outside the
    /// convention's domain instead of silently producing a non-matching key.
    pub fn index_checked(&self, lat: f64, lon: f64) -> Result<(i64, i64), GridDomainError> {
        let geo = self.geometry();
        let (lat_min, lat_max) = geo.lat_domain;
        if !(lat_min..=lat_max).contains(&lat) {
            return Err(GridDomainError::Latitude {
                convention: *self,
                lat,
            });
        }
        let (lon_min, lon_max) = if geo.folds_lon {
            (-180.0, 360.0)
        } else {
            (-180.0, 180.0)
        };
        if !(lon_min..=lon_max).contains(&lon) {
            return Err(GridDomainError::Longitude {
                convention: *self,
                lon,
            });
        }
        Ok(self.index(lat, lon))
    }

    /// The coordinate at the centre of a cell: the inverse of
    /// [`index`](Self::index) up to one step of rounding.
    ///
    /// For folding conventions the returned longitude lives in [0, 360).
    pub fn cell_center(&self, lat_index: i64, lon_index: i64) -> (f64, f64) {
        let geo = self.geometry();
        let lat = if geo.inverted_lat {
            geo.lat_origin - lat_index as f64 * geo.step
        } else {
            geo.lat_origin + lat_index as f64 * geo.step
        };
        let lon = geo.lon_origin + lon_index as f64 * geo.step;
        (lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONVENTIONS: [GridConvention; 5] = [
        GridConvention::Mfwam,
        GridConvention::Smoc,
        GridConvention::Ec,
        GridConvention::Era5Wind,
        GridConvention::Era5Wave,
    ];

    #[test]
    fn index_round_trips_within_one_step() {
        let coords = [
            (35.7, 139.7),
            (-33.9, 18.4),
            (51.9, 4.1),
            (0.0, 0.0),
            (-45.25, -170.6),
        ];
        for convention in CONVENTIONS {
            let geo = convention.geometry();
            for (lat, lon) in coords {
                let (li, lo) = convention.index(lat, lon);
                let (rlat, rlon) = convention.cell_center(li, lo);
                let folded = if geo.folds_lon && lon < 0.0 { lon + 360.0 } else { lon };
                assert!(
                    (rlat - lat).abs() <= geo.step,
                    "{convention:?} lat {lat} -> {rlat}"
                );
                assert!(
                    (rlon - folded).abs() <= geo.step,
                    "{convention:?} lon {lon} -> {rlon}"
                );
            }
        }
    }

    #[test]
    fn mfwam_indexes_from_south_west_corner() {
        assert_eq!(GridConvention::Mfwam.index(-80.0, -180.0), (0, 0));
        assert_eq!(GridConvention::Mfwam.index(90.0, -180.0), (2040, 0));
        // One step east of the origin.
        assert_eq!(GridConvention::Mfwam.index(-80.0, -180.0 + 1.0 / 12.0), (0, 1));
    }

    #[test]
    fn lon_wrap_at_date_line_yields_index_zero() {
        // The upper boundary longitude must alias the origin, not sit one
        // past the last cell.
        assert_eq!(GridConvention::Mfwam.index(0.0, 180.0).1, 0);
        assert_eq!(GridConvention::Smoc.index(0.0, 180.0).1, 0);
        assert_eq!(GridConvention::Ec.index(0.0, 180.0).1, 0);
        assert_eq!(GridConvention::Era5Wind.index(0.0, 360.0).1, 0);
        assert_eq!(GridConvention::Era5Wave.index(0.0, 360.0).1, 0);
    }

    #[test]
    fn era5_latitude_axis_is_inverted() {
        assert_eq!(GridConvention::Era5Wind.index(90.0, 0.0), (0, 0));
        assert_eq!(GridConvention::Era5Wind.index(-90.0, 0.0), (720, 0));
        assert_eq!(GridConvention::Era5Wave.index(89.5, 0.0), (1, 0));
    }

    #[test]
    fn era5_folds_negative_longitude() {
        // -0.25° folds to 359.75°, the last cell before the wrap.
        assert_eq!(GridConvention::Era5Wind.index(0.0, -0.25).1, 1439);
        assert_eq!(GridConvention::Era5Wave.index(0.0, -0.5).1, 719);
        // Folding and passing the folded value directly agree.
        assert_eq!(
            GridConvention::Era5Wind.index(10.0, -74.0),
            GridConvention::Era5Wind.index(10.0, 286.0)
        );
    }

    #[test]
    fn ec_quarter_degree_grid() {
        assert_eq!(GridConvention::Ec.index(-90.0, -180.0), (0, 0));
        assert_eq!(GridConvention::Ec.index(0.0, 0.0), (360, 720));
        assert_eq!(GridConvention::Ec.index(90.0, 179.75), (720, 1439));
    }

    #[test]
    fn unchecked_index_accepts_out_of_domain_input() {
        // Out-of-domain coordinates still index; they just never match.
        let (lat_index, _) = GridConvention::Mfwam.index(-85.0, 0.0);
        assert!(lat_index < 0);
    }

    #[test]
    fn checked_index_rejects_out_of_domain_input() {
        assert!(matches!(
            GridConvention::Mfwam.index_checked(-85.0, 0.0),
            Err(GridDomainError::Latitude { .. })
        ));
        assert!(matches!(
            GridConvention::Ec.index_checked(0.0, 200.0),
            Err(GridDomainError::Longitude { .. })
        ));
        assert_eq!(
            GridConvention::Era5Wind.index_checked(0.0, 200.0),
            Ok(GridConvention::Era5Wind.index(0.0, 200.0))
        );
    }
}
