//! Grid geometry: coordinates, bounds, bands and cache keys.
//!
//! All positions are integers in hundredths of a degree, so two-decimal
//! coordinates map to stable keys without floating-point drift.

mod band;
mod key;

use std::fmt;
use std::ops::RangeInclusive;

use crate::config::{COORDINATE_PRECISION, MAX_GRID_LONGITUDE};
use crate::error_handling::ConfigError;

pub use band::{partition_bands, Band};
pub use key::encode_key;

/// A grid point, `round(degrees * 100)` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Latitude in grid units
    pub lat: i32,
    /// Longitude in grid units
    pub lon: i32,
}

impl Coordinate {
    pub const fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// Rounds degree values onto the grid.
    ///
    /// Returns `None` for NaN, infinities, or values outside the `i32` grid range.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Option<Self> {
        Some(Self {
            lat: to_grid_units(latitude)?,
            lon: to_grid_units(longitude)?,
        })
    }

    /// Latitude in degrees, as sent to the search backend.
    pub fn lat_degrees(&self) -> f64 {
        f64::from(self.lat) / COORDINATE_PRECISION
    }

    /// Longitude in degrees, as sent to the search backend.
    pub fn lon_degrees(&self) -> f64 {
        f64::from(self.lon) / COORDINATE_PRECISION
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat: {}, lon: {}", self.lat, self.lon)
    }
}

fn to_grid_units(degrees: f64) -> Option<i32> {
    if !degrees.is_finite() {
        return None;
    }
    let scaled = (degrees * COORDINATE_PRECISION).round();
    if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let units = scaled as i32;
    Some(units)
}

/// Rectangular coordinate space of one population run, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    /// First latitude
    pub lat_start: i32,
    /// Last latitude
    pub lat_end: i32,
    /// First longitude
    pub lon_start: i32,
    /// Last longitude
    pub lon_end: i32,
}

impl GridBounds {
    pub const fn new(lat_start: i32, lat_end: i32, lon_start: i32, lon_end: i32) -> Self {
        Self {
            lat_start,
            lat_end,
            lon_start,
            lon_end,
        }
    }

    /// Builds bounds from degree values using the same rounding as `Coordinate`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonFiniteBound` if any value cannot be placed on the grid.
    pub fn from_degrees(
        lat_start: f64,
        lat_end: f64,
        lon_start: f64,
        lon_end: f64,
    ) -> Result<Self, ConfigError> {
        let start = Coordinate::from_degrees(lat_start, lon_start)
            .ok_or(ConfigError::NonFiniteBound)?;
        let end =
            Coordinate::from_degrees(lat_end, lon_end).ok_or(ConfigError::NonFiniteBound)?;
        Ok(Self::new(start.lat, end.lat, start.lon, end.lon))
    }

    /// Checks ordering and the 16-bit longitude bound that keeps keys unique.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lat_start > self.lat_end {
            return Err(ConfigError::InvertedLatitude {
                start: self.lat_start,
                end: self.lat_end,
            });
        }
        if self.lon_start > self.lon_end {
            return Err(ConfigError::InvertedLongitude {
                start: self.lon_start,
                end: self.lon_end,
            });
        }
        for lon in [self.lon_start, self.lon_end] {
            if !(0..=MAX_GRID_LONGITUDE).contains(&lon) {
                return Err(ConfigError::LongitudeOutOfRange(lon));
            }
        }
        Ok(())
    }

    /// Longitudes swept for every latitude row.
    pub fn longitudes(&self) -> RangeInclusive<i32> {
        self.lon_start..=self.lon_end
    }

    /// Total number of coordinates in the grid (0 if inverted).
    pub fn coordinate_count(&self) -> u64 {
        let rows = i64::from(self.lat_end) - i64::from(self.lat_start) + 1;
        let cols = i64::from(self.lon_end) - i64::from(self.lon_start) + 1;
        if rows <= 0 || cols <= 0 {
            return 0;
        }
        (rows as u64) * (cols as u64)
    }
}

impl fmt::Display for GridBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat [{}, {}] x lon [{}, {}]",
            self.lat_start, self.lat_end, self.lon_start, self.lon_end
        )
    }
}
