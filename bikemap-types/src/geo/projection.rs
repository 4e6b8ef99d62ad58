use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Datum;
use crate::geo::point::NewGeoPoint;
use std::marker::PhantomData;

/// Latitude limit of the Web Mercator plane, in degrees.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Conversion between two coordinate spaces.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Projects the point. Returns `None` if the point cannot be projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Spherical Web Mercator (EPSG:3857). Output coordinates are in meters.
///
/// Latitudes beyond [`MAX_LATITUDE`] are clamped to the edge of the plane.
#[derive(Debug, Copy, Clone)]
pub struct WebMercator<In, Out> {
    datum: Datum,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> WebMercator<In, Out> {
    /// Creates a projection for the datum.
    pub fn new(datum: Datum) -> Self {
        Self {
            datum,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }

    /// Half of the width of the projected world in meters.
    pub fn half_world(&self) -> f64 {
        self.datum.semimajor() * std::f64::consts::PI
    }
}

impl<In, Out> Default for WebMercator<In, Out> {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection for WebMercator<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let lat = input.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor() * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(Self::OutPoint::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lat = 2.0 * (input.y() / self.datum.semimajor()).exp().atan()
            - std::f64::consts::FRAC_PI_2;
        let lon = input.x() / self.datum.semimajor();

        if lat.is_finite() && lon.is_finite() {
            Some(Self::InPoint::latlon(lat.to_degrees(), lon.to_degrees()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2d;
    use crate::geo::{GeoPoint, GeoPoint2d};
    use crate::latlon;
    use approx::assert_abs_diff_eq;

    #[test]
    fn project_known_points() {
        let projection = WebMercator::<GeoPoint2d, Point2d>::default();
        let origin = projection.project(&latlon!(0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(origin, Point2d::new(0.0, 0.0), epsilon = 1e-9);

        let edge = projection.project(&latlon!(0.0, 180.0)).unwrap();
        assert_abs_diff_eq!(edge.x, projection.half_world(), epsilon = 1e-6);

        let top = projection.project(&latlon!(MAX_LATITUDE, 0.0)).unwrap();
        assert_abs_diff_eq!(top.y, projection.half_world(), epsilon = 1e-3);
    }

    #[test]
    fn polar_latitudes_are_clamped() {
        let projection = WebMercator::<GeoPoint2d, Point2d>::default();
        let pole = projection.project(&latlon!(90.0, 0.0)).unwrap();
        let edge = projection.project(&latlon!(MAX_LATITUDE, 0.0)).unwrap();
        assert_abs_diff_eq!(pole.y, edge.y, epsilon = 1e-6);
    }

    #[test]
    fn unproject_restores_point() {
        let projection = WebMercator::<GeoPoint2d, Point2d>::default();
        let point = latlon!(37.7749, -122.4194);
        let restored = projection
            .unproject(&projection.project(&point).unwrap())
            .unwrap();
        assert_abs_diff_eq!(restored.lat(), point.lat(), epsilon = 1e-9);
        assert_abs_diff_eq!(restored.lon(), point.lon(), epsilon = 1e-9);
    }
}
