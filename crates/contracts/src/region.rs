//! Region of interest (rectangular lat/lon bounding box).

use serde::{Deserialize, Serialize};

/// Bounding box given as two opposite corners `[lat_a, lon_a, lat_b, lon_b]`.
///
/// Corners may arrive in any order; membership is always tested against the
/// normalized [`RegionBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Region {
    pub lat_a: f64,
    pub lon_a: f64,
    pub lat_b: f64,
    pub lon_b: f64,
}

/// Min/max form of a [`Region`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Region {
    pub fn new(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> Self {
        Self {
            lat_a,
            lon_a,
            lat_b,
            lon_b,
        }
    }

    /// Sort each axis so that `min <= max`
    pub fn bounds(&self) -> RegionBounds {
        RegionBounds {
            lat_min: self.lat_a.min(self.lat_b),
            lat_max: self.lat_a.max(self.lat_b),
            lon_min: self.lon_a.min(self.lon_b),
            lon_max: self.lon_a.max(self.lon_b),
        }
    }

    /// Inclusive on every edge
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.bounds().contains(latitude, longitude)
    }
}

impl RegionBounds {
    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

impl From<[f64; 4]> for Region {
    fn from([lat_a, lon_a, lat_b, lon_b]: [f64; 4]) -> Self {
        Self::new(lat_a, lon_a, lat_b, lon_b)
    }
}

impl From<Region> for [f64; 4] {
    fn from(region: Region) -> Self {
        [region.lat_a, region.lon_a, region.lat_b, region.lon_b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_normalize_reversed_corners() {
        let region = Region::new(9.6, -77.2, 7.2, -82.9);
        let b = region.bounds();
        assert_eq!(b.lat_min, 7.2);
        assert_eq!(b.lat_max, 9.6);
        assert_eq!(b.lon_min, -82.9);
        assert_eq!(b.lon_max, -77.2);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let region = Region::new(7.0, -83.0, 10.0, -77.0);
        assert!(region.contains(7.0, -83.0));
        assert!(region.contains(10.0, -77.0));
        assert!(region.contains(8.5, -80.0));
        assert!(!region.contains(10.000001, -80.0));
        assert!(!region.contains(8.5, -76.9));
    }

    #[test]
    fn test_serde_as_array() {
        let region: Region = serde_json::from_str("[7.2, -82.9, 9.6, -77.2]").unwrap();
        assert_eq!(region, Region::new(7.2, -82.9, 9.6, -77.2));
        assert_eq!(
            serde_json::to_string(&region).unwrap(),
            "[7.2,-82.9,9.6,-77.2]"
        );
        assert!(serde_json::from_str::<Region>("[1.0, 2.0, 3.0]").is_err());
    }
}
