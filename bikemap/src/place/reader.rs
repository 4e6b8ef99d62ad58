use std::path::PathBuf;

use bikemap_types::geo::{GeoPoint2d, NewGeoPoint};
use serde::Deserialize;

use crate::error::BikemapError;
use crate::place::Place;

const BUNDLED_PLACES: &str = include_str!("../../data/places.json");

/// Repository of places.
pub trait PlaceSource {
    /// Loads all places.
    ///
    /// Fails with [`BikemapError::DataFormat`] if the backing resource is malformed.
    fn load(&self) -> Result<Vec<Place>, BikemapError>;
}

/// Reads places from a JSON document in the shape of a Places API nearby search result:
///
/// ```json
/// [
///   {
///     "name": "Valencia Cyclery",
///     "vicinity": "1077 Valencia St, San Francisco",
///     "rating": 4.6,
///     "geometry": { "location": { "lat": 37.7553, "lng": -122.4212 } }
///   }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct PlacesReader {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Json(String),
    File(PathBuf),
}

#[derive(Debug, Deserialize)]
struct PlaceResponse {
    name: String,
    vicinity: String,
    rating: f32,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: GeometryLocation,
}

#[derive(Debug, Deserialize)]
struct GeometryLocation {
    lat: f64,
    lng: f64,
}

impl PlacesReader {
    /// Reader of the place list compiled into the crate.
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_PLACES)
    }

    /// Reader of the given JSON document.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            source: Source::Json(json.into()),
        }
    }

    /// Reader of the JSON file at the path. The file is read on every [`PlaceSource::load`] call.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    fn parse(json: &str) -> Result<Vec<Place>, BikemapError> {
        let responses: Vec<PlaceResponse> = serde_json::from_str(json)?;
        responses
            .into_iter()
            .enumerate()
            .map(|(index, response)| response.into_place(index))
            .collect()
    }
}

impl PlaceSource for PlacesReader {
    fn load(&self) -> Result<Vec<Place>, BikemapError> {
        let places = match &self.source {
            Source::Json(json) => Self::parse(json)?,
            Source::File(path) => Self::parse(&std::fs::read_to_string(path)?)?,
        };

        log::info!("Loaded {} places", places.len());
        Ok(places)
    }
}

impl PlaceResponse {
    fn into_place(self, index: usize) -> Result<Place, BikemapError> {
        let position = GeoPoint2d::latlon(self.geometry.location.lat, self.geometry.location.lng);
        if !position.is_valid() {
            return Err(BikemapError::DataFormat(format!(
                "place #{index} ({}) has invalid coordinates {}, {}",
                self.name, self.geometry.location.lat, self.geometry.location.lng
            )));
        }

        if !self.rating.is_finite() {
            return Err(BikemapError::DataFormat(format!(
                "place #{index} ({}) has invalid rating",
                self.name
            )));
        }

        Ok(Place {
            name: self.name,
            position,
            address: self.vicinity,
            rating: self.rating,
        })
    }
}
