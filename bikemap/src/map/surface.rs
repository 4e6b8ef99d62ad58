use std::time::Duration;

use crate::camera::CameraUpdate;
use crate::info_window::InfoWindow;
use crate::map::marker::{CircleId, CircleOptions, Marker, MarkerId, MarkerOptions};
use crate::view::MapView;

/// Drawing operations of the host map widget.
///
/// Everything the library shows goes through this trait, so a host (a GUI toolkit, a mobile map
/// SDK binding, a test harness) only needs to implement it to display markers, circles and info
/// windows. `T` is the type of marker tags.
pub trait MapSurface<T> {
    /// Current view of the map.
    fn view(&self) -> &MapView;

    /// Moves the camera immediately.
    fn move_camera(&mut self, update: CameraUpdate);

    /// Moves the camera gradually over the duration.
    fn animate_camera(&mut self, update: CameraUpdate, duration: Duration);

    /// Adds a marker and returns its id.
    fn add_marker(&mut self, options: MarkerOptions<T>) -> MarkerId;

    /// Removes the marker. Returns false if there is no such marker.
    fn remove_marker(&mut self, id: MarkerId) -> bool;

    /// Marker with the id.
    fn marker(&self, id: MarkerId) -> Option<&Marker<T>>;

    /// Sets opacity of the marker. Returns false if there is no such marker.
    fn set_marker_alpha(&mut self, id: MarkerId, alpha: f32) -> bool;

    /// Draws a circle and returns its id.
    fn add_circle(&mut self, options: CircleOptions) -> CircleId;

    /// Removes the circle. Returns false if there is no such circle.
    fn remove_circle(&mut self, id: CircleId) -> bool;

    /// Circle with the id.
    fn circle(&self, id: CircleId) -> Option<&CircleOptions>;

    /// Opens the info window of the marker, closing any other open window.
    fn show_info_window(&mut self, marker: MarkerId, window: InfoWindow);

    /// Closes the open info window, if any.
    fn hide_info_window(&mut self);
}
