//! Places shown on the map and the repository they are loaded from.

use bikemap_types::geo::GeoPoint2d;
use serde::{Deserialize, Serialize};

mod reader;

pub use reader::{PlaceSource, PlacesReader};

use crate::cluster::ClusterItem;

/// A bike shop: named geographic point with address and rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Name of the shop.
    pub name: String,
    /// Location of the shop.
    pub position: GeoPoint2d,
    /// Street address.
    pub address: String,
    /// Average user rating.
    pub rating: f32,
}

impl ClusterItem for Place {
    fn position(&self) -> GeoPoint2d {
        self.position
    }

    fn title(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn snippet(&self) -> Option<&str> {
        Some(&self.address)
    }
}
