//! Latitude band partitioning.

use std::fmt;

use super::{Coordinate, GridBounds};

/// A contiguous latitude range swept by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Position of the band in the partition, starting at 0
    pub index: usize,
    /// First latitude (inclusive)
    pub lat_start: i32,
    /// Last latitude (inclusive)
    pub lat_end: i32,
}

impl Band {
    /// Number of latitude rows in the band.
    pub fn rows(&self) -> u64 {
        (i64::from(self.lat_end) - i64::from(self.lat_start) + 1) as u64
    }

    /// Sweep order for the band: latitude ascending, then longitude ascending.
    pub fn coordinates(self, grid: &GridBounds) -> impl Iterator<Item = Coordinate> {
        let longitudes = grid.lon_start..=grid.lon_end;
        (self.lat_start..=self.lat_end).flat_map(move |lat| {
            longitudes
                .clone()
                .map(move |lon| Coordinate::new(lat, lon))
        })
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "band {} [{}, {}]", self.index, self.lat_start, self.lat_end)
    }
}

/// Splits the grid's latitude span into bands of `[start, start + band_width]`.
///
/// Each band starts one row after the previous one ends and the last band is
/// clipped to `grid.lat_end`, so the bands never overlap and together cover
/// the span exactly. An inverted span yields no bands.
pub fn partition_bands(grid: &GridBounds, band_width: u32) -> Vec<Band> {
    let mut bands = Vec::new();
    let end = i64::from(grid.lat_end);
    let mut start = i64::from(grid.lat_start);

    while start <= end {
        let band_end = (start + i64::from(band_width)).min(end);
        // Both bounds lie within [lat_start, lat_end], so they fit in i32.
        bands.push(Band {
            index: bands.len(),
            lat_start: start as i32,
            lat_end: band_end as i32,
        });
        start = band_end + 1;
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lat_start: i32, lat_end: i32) -> GridBounds {
        GridBounds::new(lat_start, lat_end, 6870, 6872)
    }

    fn assert_exact_cover(bands: &[Band], lat_start: i32, lat_end: i32) {
        assert_eq!(bands.first().map(|b| b.lat_start), Some(lat_start));
        assert_eq!(bands.last().map(|b| b.lat_end), Some(lat_end));
        for pair in bands.windows(2) {
            assert_eq!(pair[0].lat_end + 1, pair[1].lat_start, "gap or overlap");
        }
        for band in bands {
            assert!(band.lat_start <= band.lat_end);
        }
        let rows: u64 = bands.iter().map(Band::rows).sum();
        assert_eq!(rows, (lat_end - lat_start + 1) as u64);
    }

    #[test]
    fn test_partition_width_31() {
        let bands = partition_bands(&grid(700, 1010), 31);
        assert_eq!(
            bands[0],
            Band {
                index: 0,
                lat_start: 700,
                lat_end: 731
            }
        );
        assert_eq!(
            bands[1],
            Band {
                index: 1,
                lat_start: 732,
                lat_end: 763
            }
        );
        assert_eq!(bands.last().map(|b| b.lat_end), Some(1010));
        assert_eq!(bands.len(), 10);
        assert_exact_cover(&bands, 700, 1010);
    }

    #[test]
    fn test_partition_width_310_covers_country_span() {
        let bands = partition_bands(&grid(700, 3800), 310);
        assert_eq!(bands.len(), 10);
        assert_exact_cover(&bands, 700, 3800);
    }

    #[test]
    fn test_partition_single_row() {
        let bands = partition_bands(&grid(700, 700), 100);
        assert_eq!(
            bands,
            vec![Band {
                index: 0,
                lat_start: 700,
                lat_end: 700
            }]
        );
    }

    #[test]
    fn test_partition_zero_width_gives_one_row_per_band() {
        let bands = partition_bands(&grid(10, 14), 0);
        assert_eq!(bands.len(), 5);
        assert_exact_cover(&bands, 10, 14);
    }

    #[test]
    fn test_partition_indices_are_sequential() {
        let bands = partition_bands(&grid(-500, 500), 77);
        for (i, band) in bands.iter().enumerate() {
            assert_eq!(band.index, i);
        }
        assert_exact_cover(&bands, -500, 500);
    }

    #[test]
    fn test_partition_inverted_grid_is_empty() {
        assert!(partition_bands(&grid(800, 700), 31).is_empty());
    }

    #[test]
    fn test_band_sweep_order() {
        let g = GridBounds::new(700, 701, 6870, 6871);
        let band = partition_bands(&g, 10)[0];
        let visited: Vec<_> = band.coordinates(&g).collect();
        assert_eq!(
            visited,
            vec![
                Coordinate::new(700, 6870),
                Coordinate::new(700, 6871),
                Coordinate::new(701, 6870),
                Coordinate::new(701, 6871),
            ]
        );
    }
}
