//! Bikemap shows bike shops on an interactive map. It loads the places, frames the camera on them,
//! groups nearby shops into cluster markers, fades the markers while the camera moves and draws a
//! highlight circle around a tapped shop.
//!
//! # Quick start
//!
//! ```no_run
//! use bikemap::bikemap_types::latlon;
//! use bikemap::bikemap_types::cartesian::Size;
//! use bikemap::control::{EventProcessor, MapEvent};
//! use bikemap::coordinator::{CoordinatorConfig, MapCoordinator};
//! use bikemap::{Map, MapView};
//!
//! let view = MapView::new(&latlon!(37.77, -122.42), 12.0)
//!     .unwrap()
//!     .with_size(Size::new(800.0, 600.0));
//! let mut map = Map::new(view);
//!
//! let mut processor = EventProcessor::default();
//! processor.add_handler(MapCoordinator::bundled(CoordinatorConfig::default()));
//! processor.handle(MapEvent::MapReady, &mut map).unwrap();
//! processor.handle(MapEvent::MapLoaded, &mut map).unwrap();
//! processor.pump(&mut map).unwrap();
//! ```
//!
//! # Main components
//!
//! * The [`MapSurface`] trait is everything the library draws with: camera moves, markers,
//!   circles and info windows. [`Map`] is a headless implementation of it that also reports the
//!   camera events a real map widget would.
//! * [`place`] loads the bike shops.
//! * [`cluster`] groups the shops for the current zoom level and keeps their markers on the
//!   surface in sync.
//! * [`info_window`] builds the popup content of a tapped shop.
//! * [`coordinator`] ties it all together and reacts to the map [`control`] events.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod camera;
pub mod cluster;
mod color;
pub mod control;
pub mod coordinator;
pub mod error;
pub mod info_window;
mod map;
mod messenger;
pub mod place;
mod view;

pub use color::Color;
pub use map::{
    CircleId, CircleOptions, Map, MapSurface, Marker, MarkerIcon, MarkerId, MarkerOptions,
    TAP_TOLERANCE,
};
pub use messenger::Messenger;
pub use view::{resolution_at, world_pixel, MapView, MAX_ZOOM, ZOOM_0_RESOLUTION};

// Reexport bikemap_types
pub use bikemap_types;

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use bikemap_types::cartesian::Size;
    use bikemap_types::latlon;

    use crate::place::{Place, PlaceSource, PlacesReader};
    use crate::{Map, MapView};

    pub(crate) fn place(name: &str, lat: f64, lon: f64) -> Arc<Place> {
        Arc::new(Place {
            name: name.into(),
            position: latlon!(lat, lon),
            address: format!("{name} street"),
            rating: 4.0,
        })
    }

    pub(crate) fn places() -> Vec<Arc<Place>> {
        PlacesReader::bundled()
            .load()
            .expect("bundled places are valid")
            .into_iter()
            .map(Arc::new)
            .collect()
    }

    pub(crate) fn sf_map() -> Map<Arc<Place>> {
        Map::new(
            MapView::new(&latlon!(37.7749, -122.4194), 12.0)
                .expect("valid center")
                .with_size(Size::new(800.0, 600.0)),
        )
    }
}
