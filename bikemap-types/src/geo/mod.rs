//! Geometries in geographic coordinates (latitude and longitude) (see [`GeoPoint`]) and conversion
//! into the Web Mercator plane (see [`Projection`]).

mod bounds;
mod datum;
mod point;
mod projection;

pub use bounds::{GeoBounds, GeoBoundsBuilder};
pub use datum::Datum;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use projection::{Projection, WebMercator, MAX_LATITUDE};
