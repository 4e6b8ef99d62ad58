//! Camera updates requested by the application and reasons of camera movement reported by the host.

use bikemap_types::cartesian::Point2d;
use bikemap_types::geo::{GeoBounds, GeoPoint2d};

use crate::view::MapView;

/// Change of the map camera.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraUpdate {
    /// Show the whole region with the given padding in pixels on every side.
    Bounds {
        /// Region to show.
        bounds: GeoBounds,
        /// Free space around the region, in pixels.
        padding: f64,
    },
    /// Center the map at the point with the given zoom level.
    CenterZoom {
        /// New center.
        center: GeoPoint2d,
        /// New zoom level.
        zoom: f64,
    },
    /// Center the map at the point keeping the zoom level.
    Center(GeoPoint2d),
    /// Change zoom by the given number of levels around the center of the map.
    ZoomBy(f64),
    /// Scroll the map by the given number of pixels.
    ScrollBy {
        /// Horizontal scroll, positive to the right.
        dx: f64,
        /// Vertical scroll, positive downwards.
        dy: f64,
    },
}

impl CameraUpdate {
    /// Returns the view after the update is applied to `view`.
    ///
    /// Updates that cannot be applied (e.g. the target cannot be projected) leave the view unchanged.
    pub fn apply(&self, view: &MapView) -> MapView {
        let updated = match self {
            CameraUpdate::Bounds { bounds, padding } => view.fit_bounds(bounds, *padding),
            CameraUpdate::CenterZoom { center, zoom } => {
                view.with_zoom(*zoom).with_center(center)
            }
            CameraUpdate::Center(center) => view.with_center(center),
            CameraUpdate::ZoomBy(delta) => {
                let size = view.size();
                Some(view.zoom_by(
                    *delta,
                    Point2d::new(size.half_width(), size.half_height()),
                ))
            }
            CameraUpdate::ScrollBy { dx, dy } => {
                Some(view.translate_by_pixels(Point2d::new(*dx, *dy), Point2d::origin()))
            }
        };

        updated.unwrap_or_else(|| {
            log::warn!("Camera update {self:?} cannot be applied");
            *view
        })
    }
}

/// Reason the camera started moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMoveReason {
    /// The user moved the map with a gesture.
    Gesture,
    /// The user tapped something that moved the camera (e.g. a marker).
    ApiAnimation,
    /// The application moved the camera.
    DeveloperAnimation,
}
