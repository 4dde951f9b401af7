//! Geographic primitives
//!
//! Coordinates are plain WGS84 degrees. Consensus bucketing rounds to four
//! decimal places (~11 m) and stores the result as scaled integers so bucket
//! keys are exact and hashable. Distance uses the flat-Earth approximation
//! (`Δlat×111`, `Δlon×111×cos(lat)` km), which is only used for the
//! read-time radius fallback.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::KM_PER_DEGREE;

/// Scale factor for 4-decimal coordinate buckets
const BUCKET_SCALE: f64 = 10_000.0;

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// The 4-decimal consensus bucket containing this point
    pub fn bucket(&self) -> BucketKey {
        BucketKey::from_degrees(self.latitude, self.longitude)
    }

    /// Flat-Earth distance to another point in kilometers
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let dlat = (self.latitude - other.latitude) * KM_PER_DEGREE;
        let dlon = (self.longitude - other.longitude)
            * KM_PER_DEGREE
            * self.latitude.to_radians().cos();
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// Exact coordinate bucket key at 4-decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    lat_e4: i32,
    lon_e4: i32,
}

impl BucketKey {
    /// Round degrees to the bucket grid
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_e4: (latitude * BUCKET_SCALE).round() as i32,
            lon_e4: (longitude * BUCKET_SCALE).round() as i32,
        }
    }

    /// Bucket center latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.lat_e4 as f64 / BUCKET_SCALE
    }

    /// Bucket center longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.lon_e4 as f64 / BUCKET_SCALE
    }
}

/// A validated geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Check edge ranges and north/south ordering
    pub fn validate(&self) -> Result<(), ValidationError> {
        for lat in [self.north, self.south] {
            if !(-90.0..=90.0).contains(&lat) || !lat.is_finite() {
                return Err(ValidationError::LatitudeOutOfRange(lat));
            }
        }
        for lon in [self.east, self.west] {
            if !(-180.0..=180.0).contains(&lon) || !lon.is_finite() {
                return Err(ValidationError::LongitudeOutOfRange(lon));
            }
        }
        if self.south >= self.north {
            return Err(ValidationError::InvertedBoundingBox {
                north: self.north,
                south: self.south,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_range_checks() {
        assert!(GeoPoint::new(10.5, 120.3).is_ok());
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
        assert!(GeoPoint::new(90.01, 0.0).is_err());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_bucket_rounding() {
        let a = GeoPoint::new(10.50004, 120.29996).unwrap();
        let b = GeoPoint::new(10.5, 120.3).unwrap();
        assert_eq!(a.bucket(), b.bucket());

        // one grid step apart
        let c = GeoPoint::new(10.5001, 120.3).unwrap();
        assert_ne!(b.bucket(), c.bucket());
    }

    #[test]
    fn test_bucket_back_to_degrees() {
        let key = BucketKey::from_degrees(-11.0, -87.0);
        assert!((key.latitude() - -11.0).abs() < 1e-9);
        assert!((key.longitude() - -87.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_earth_distance() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        let one_lat = GeoPoint::new(1.0, 0.0).unwrap();
        assert!((origin.distance_km(&one_lat) - 111.0).abs() < 1e-6);

        // longitude shrinks with latitude
        let at_60 = GeoPoint::new(60.0, 0.0).unwrap();
        let at_60_east = GeoPoint::new(60.0, 1.0).unwrap();
        let d = at_60.distance_km(&at_60_east);
        assert!((d - 111.0 * 60.0_f64.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_box_validation() {
        let bbox = BoundingBox {
            north: -5.0,
            south: -7.0,
            east: 106.0,
            west: 104.0,
        };
        assert!(bbox.validate().is_ok());

        let inverted = BoundingBox {
            north: -7.0,
            south: -5.0,
            east: 106.0,
            west: 104.0,
        };
        assert!(inverted.validate().is_err());

        let bad_edge = BoundingBox {
            north: 95.0,
            south: -7.0,
            east: 106.0,
            west: 104.0,
        };
        assert!(bad_edge.validate().is_err());
    }
}
