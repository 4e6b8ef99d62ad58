use crate::error::BikemapTypesError;
use crate::geo::point::{GeoPoint, GeoPoint2d, NewGeoPoint};
use serde::{Deserialize, Serialize};

/// Rectangular region on the globe, given by its south-west and north-east corners.
///
/// The region may cross the antimeridian, in which case the west longitude is greater than the east
/// longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    south_west: GeoPoint2d,
    north_east: GeoPoint2d,
}

impl GeoBounds {
    /// Creates bounds from the corners.
    pub fn new(south_west: GeoPoint2d, north_east: GeoPoint2d) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Minimal bounds containing every point.
    pub fn from_points<'a>(
        points: impl IntoIterator<Item = &'a GeoPoint2d>,
    ) -> Result<Self, BikemapTypesError> {
        let mut builder = GeoBounds::builder();
        for point in points {
            builder.include(point);
        }

        builder.build()
    }

    /// Creates an empty builder.
    pub fn builder() -> GeoBoundsBuilder {
        GeoBoundsBuilder::default()
    }

    /// South-west corner.
    pub fn south_west(&self) -> GeoPoint2d {
        self.south_west
    }

    /// North-east corner.
    pub fn north_east(&self) -> GeoPoint2d {
        self.north_east
    }

    /// Returns true if the bounds cross the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.south_west.lon() > self.north_east.lon()
    }

    /// Returns true if the point is inside the bounds or on their border.
    pub fn contains(&self, point: &impl GeoPoint<Num = f64>) -> bool {
        let lat_inside = self.south_west.lat() <= point.lat() && point.lat() <= self.north_east.lat();
        let lon = point.lon();
        let lon_inside = if self.crosses_antimeridian() {
            lon >= self.south_west.lon() || lon <= self.north_east.lon()
        } else {
            self.south_west.lon() <= lon && lon <= self.north_east.lon()
        };

        lat_inside && lon_inside
    }
}

/// Incremental builder of [`GeoBounds`].
///
/// Longitudes are extended in whichever direction gives the smaller span, so points on both sides
/// of the antimeridian produce bounds crossing it instead of spanning the whole globe.
#[derive(Debug, Clone, Default)]
pub struct GeoBoundsBuilder {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
    initialized: bool,
}

impl GeoBoundsBuilder {
    /// Extends the bounds to include the point.
    pub fn include(&mut self, point: &impl GeoPoint<Num = f64>) -> &mut Self {
        let (lat, lon) = (point.lat(), point.lon());
        if !self.initialized {
            self.south = lat;
            self.north = lat;
            self.west = lon;
            self.east = lon;
            self.initialized = true;
            return self;
        }

        self.south = self.south.min(lat);
        self.north = self.north.max(lat);

        if !self.lon_inside(lon) {
            if west_extension(self.west, lon) < east_extension(self.east, lon) {
                self.west = lon;
            } else {
                self.east = lon;
            }
        }

        self
    }

    /// Builds the bounds. Fails if no point was included.
    pub fn build(&self) -> Result<GeoBounds, BikemapTypesError> {
        if !self.initialized {
            return Err(BikemapTypesError::Empty("bounds"));
        }

        Ok(GeoBounds::new(
            GeoPoint2d::latlon(self.south, self.west),
            GeoPoint2d::latlon(self.north, self.east),
        ))
    }

    fn lon_inside(&self, lon: f64) -> bool {
        if self.west <= self.east {
            self.west <= lon && lon <= self.east
        } else {
            lon >= self.west || lon <= self.east
        }
    }
}

fn west_extension(west: f64, lon: f64) -> f64 {
    (west - lon).rem_euclid(360.0)
}

fn east_extension(east: f64, lon: f64) -> f64 {
    (lon - east).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;

    #[test]
    fn bounds_contain_all_points() {
        let points = [
            latlon!(37.7749, -122.4194),
            latlon!(37.8044, -122.2712),
            latlon!(37.6879, -122.4702),
            latlon!(37.7599, -122.4148),
        ];
        let bounds = GeoBounds::from_points(&points).unwrap();
        assert!(points.iter().all(|p| bounds.contains(p)));
        assert_eq!(bounds.south_west(), latlon!(37.6879, -122.4702));
        assert_eq!(bounds.north_east(), latlon!(37.8044, -122.2712));
        assert!(!bounds.contains(&latlon!(38.0, -122.3)));
    }

    #[test]
    fn single_point_bounds() {
        let bounds = GeoBounds::from_points(&[latlon!(10.0, 20.0)]).unwrap();
        assert_eq!(bounds.south_west(), bounds.north_east());
        assert!(bounds.contains(&latlon!(10.0, 20.0)));
    }

    #[test]
    fn empty_bounds_fail() {
        let points: [GeoPoint2d; 0] = [];
        assert!(GeoBounds::from_points(&points).is_err());
    }

    #[test]
    fn bounds_across_antimeridian() {
        let points = [latlon!(-17.0, 178.0), latlon!(-18.0, -179.0)];
        let bounds = GeoBounds::from_points(&points).unwrap();
        assert!(bounds.crosses_antimeridian());
        assert!(points.iter().all(|p| bounds.contains(p)));
        assert!(!bounds.contains(&latlon!(-17.5, 0.0)));
        assert_eq!(bounds.south_west(), latlon!(-18.0, 178.0));
        assert_eq!(bounds.north_east(), latlon!(-17.0, -179.0));
    }
}
