use crate::geo::datum::Datum;
use num_traits::{Float, One};
use serde::{Deserialize, Serialize};

/// A point on the surface of a celestial body.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }

    /// Great-circle distance in meters between the points on a sphere with the datum's mean radius.
    fn distance(&self, other: &impl GeoPoint<Num = Self::Num>, datum: &Datum) -> Self::Num {
        let two = Self::Num::one() + Self::Num::one();
        let d_lat = other.lat_rad() - self.lat_rad();
        let d_lon = other.lon_rad() - self.lon_rad();
        let h = (d_lat / two).sin().powi(2)
            + self.lat_rad().cos() * other.lat_rad().cos() * (d_lon / two).sin().powi(2);
        let radius = <Self::Num as num_traits::NumCast>::from(datum.mean_radius())
            .unwrap_or_else(Self::Num::nan);

        two * radius * h.sqrt().min(Self::Num::one()).asin()
    }
}

/// Point type that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point on the surface of a celestial body.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint2d {
    /// Creates a new point from another.
    pub fn from(other: &impl GeoPoint<Num = f64>) -> Self {
        Self {
            lat: other.lat(),
            lon: other.lon(),
        }
    }

    /// Returns true if the latitude is in `[-90, 90]` and the longitude in `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use bikemap_types::geo::GeoPoint;
/// use bikemap_types::latlon;
///
/// let point = latlon!(37.77, -122.42);
/// assert_eq!(point.lat(), 37.77);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;
    use approx::assert_relative_eq;

    #[test]
    fn distance_along_meridian() {
        let a = latlon!(0.0, 0.0);
        let b = latlon!(1.0, 0.0);
        assert_relative_eq!(a.distance(&b, &Datum::WGS84), 111_195.08, max_relative = 1e-4);
        assert_eq!(a.distance(&a, &Datum::WGS84), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = latlon!(37.7749, -122.4194);
        let b = latlon!(37.8044, -122.2712);
        assert_relative_eq!(
            a.distance(&b, &Datum::WGS84),
            b.distance(&a, &Datum::WGS84),
            epsilon = 1e-6
        );
    }

    #[test]
    fn validity() {
        assert!(latlon!(90.0, -180.0).is_valid());
        assert!(!latlon!(90.5, 0.0).is_valid());
        assert!(!latlon!(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn deserializes_from_object() {
        let point: GeoPoint2d = serde_json::from_str(r#"{"lat": 1.5, "lon": 2.5}"#).unwrap();
        assert_eq!(point, latlon!(1.5, 2.5));
    }
}
