//! Content of the popup shown when a marker is tapped.

use std::fmt;
use std::sync::Arc;

use crate::map::Marker;
use crate::place::Place;

/// Custom content of an info window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoContents {
    /// First line, the place name.
    pub title: String,
    /// Second line, the street address.
    pub address: String,
    /// Third line, formatted rating.
    pub rating: String,
}

impl fmt::Display for InfoContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.title, self.address, self.rating)
    }
}

/// Info window displayed by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoWindow {
    /// Application provided content inside the default window frame.
    Custom(InfoContents),
    /// Platform default window made of the marker title and snippet.
    Default {
        /// Marker title.
        title: Option<String>,
        /// Marker snippet.
        snippet: Option<String>,
    },
}

impl InfoWindow {
    /// Custom window with the given content, or the default window of the marker if there is none.
    pub fn resolve<T>(contents: Option<InfoContents>, marker: &Marker<T>) -> Self {
        match contents {
            Some(contents) => Self::Custom(contents),
            None => Self::Default {
                title: marker.title().map(str::to_owned),
                snippet: marker.snippet().map(str::to_owned),
            },
        }
    }
}

/// Provides custom info windows for markers with tags of type `T`.
pub trait InfoWindowAdapter<T> {
    /// Content replacing the whole window, frame included. `None` uses the default frame and asks
    /// [`InfoWindowAdapter::info_contents`] for the content.
    fn info_window(&self, _marker: &Marker<T>) -> Option<InfoContents> {
        None
    }

    /// Content of the window. `None` falls back to the platform default content.
    fn info_contents(&self, marker: &Marker<T>) -> Option<InfoContents>;

    /// Window for the marker: the first of [`InfoWindowAdapter::info_window`],
    /// [`InfoWindowAdapter::info_contents`] and the default window.
    fn present(&self, marker: &Marker<T>) -> InfoWindow {
        let contents = self
            .info_window(marker)
            .or_else(|| self.info_contents(marker));
        InfoWindow::resolve(contents, marker)
    }
}

/// Shows name, address and rating of the place attached to the marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerInfoWindowAdapter;

impl MarkerInfoWindowAdapter {
    /// Content for the place.
    pub fn contents(place: &Place) -> InfoContents {
        // Half away from zero, formatting alone rounds half to even.
        let rating = (f64::from(place.rating) * 100.0).round() / 100.0;
        InfoContents {
            title: place.name.clone(),
            address: place.address.clone(),
            rating: format!("Rating: {rating:.2}"),
        }
    }
}

impl InfoWindowAdapter<Arc<Place>> for MarkerInfoWindowAdapter {
    fn info_contents(&self, marker: &Marker<Arc<Place>>) -> Option<InfoContents> {
        let Some(place) = marker.tag() else {
            log::debug!("Marker {:?} has no place attached", marker.id());
            return None;
        };

        Some(Self::contents(place))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MarkerId, MarkerOptions};
    use bikemap_types::latlon;

    fn shop_a() -> Arc<Place> {
        Arc::new(Place {
            name: "Shop A".into(),
            position: latlon!(37.0, -122.0),
            address: "1 Main St".into(),
            rating: 4.5,
        })
    }

    #[test]
    fn contents_of_tagged_marker() {
        let marker = Marker::new(
            MarkerId(1),
            MarkerOptions::new(latlon!(37.0, -122.0)).with_tag(shop_a()),
        );
        let contents = MarkerInfoWindowAdapter.info_contents(&marker).unwrap();
        assert_eq!(contents.title, "Shop A");
        assert_eq!(contents.address, "1 Main St");
        insta::assert_snapshot!(contents.rating, @"Rating: 4.50");
    }

    #[test]
    fn rating_is_rounded_to_two_digits() {
        let place = Place {
            rating: 3.0,
            ..(*shop_a()).clone()
        };
        assert_eq!(MarkerInfoWindowAdapter::contents(&place).rating, "Rating: 3.00");
    }

    #[test]
    fn rating_halves_round_up() {
        for (rating, expected) in [
            (4.125, "Rating: 4.13"),
            (4.625, "Rating: 4.63"),
            (2.375, "Rating: 2.38"),
        ] {
            let place = Place {
                rating,
                ..(*shop_a()).clone()
            };
            assert_eq!(MarkerInfoWindowAdapter::contents(&place).rating, expected);
        }
    }

    #[test]
    fn untagged_marker_falls_back_to_default() {
        let marker = Marker::<Arc<Place>>::new(
            MarkerId(2),
            MarkerOptions::new(latlon!(37.0, -122.0)).with_title("10+"),
        );
        assert_eq!(MarkerInfoWindowAdapter.info_contents(&marker), None);
        assert_eq!(
            MarkerInfoWindowAdapter.present(&marker),
            InfoWindow::Default {
                title: Some("10+".into()),
                snippet: None,
            }
        );
    }

    #[test]
    fn display_lines() {
        assert_eq!(
            MarkerInfoWindowAdapter::contents(&shop_a()).to_string(),
            "Shop A\n1 Main St\nRating: 4.50"
        );
    }
}
