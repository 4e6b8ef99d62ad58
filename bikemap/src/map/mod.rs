use std::collections::VecDeque;
use std::time::Duration;

use ahash::AHashMap;
use bikemap_types::cartesian::{CartesianPoint2d, Point2d, Size};
use web_time::SystemTime;

use crate::camera::{CameraMoveReason, CameraUpdate};
use crate::control::{EventSource, MapEvent};
use crate::info_window::InfoWindow;
use crate::messenger::Messenger;
use crate::view::MapView;

mod marker;
mod surface;

pub use marker::{CircleId, CircleOptions, Marker, MarkerIcon, MarkerId, MarkerOptions};
pub use surface::MapSurface;

const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Distance in pixels from a marker anchor within which a tap hits the marker.
pub const TAP_TOLERANCE: f64 = 24.0;

/// Headless map surface.
///
/// Keeps markers, circles, the open info window and the view in memory, and queues the camera
/// events a real map widget would report (see [`EventSource`]). It is used by hosts that render the
/// map themselves and by tests.
pub struct Map<T> {
    view: MapView,
    markers: AHashMap<MarkerId, Marker<T>>,
    circles: AHashMap<CircleId, CircleOptions>,
    info_window: Option<(MarkerId, InfoWindow)>,
    next_id: u64,
    events: VecDeque<MapEvent>,
    camera_moving: bool,
    messenger: Option<Box<dyn Messenger>>,
    animation: Option<AnimationParameters>,
}

struct AnimationParameters {
    start_view: MapView,
    end_view: MapView,
    start_time: SystemTime,
    duration: Duration,
}

impl<T> Map<T> {
    /// Creates a new empty map.
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            markers: AHashMap::new(),
            circles: AHashMap::new(),
            info_window: None,
            next_id: 0,
            events: VecDeque::new(),
            camera_moving: false,
            messenger: None,
            animation: None,
        }
    }

    /// Sets the new redraw messenger for the map.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Request redraw of the map.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw()
        }
    }

    /// Set the size of the map widget.
    pub fn set_size(&mut self, new_size: Size) {
        self.view = self.view.with_size(new_size);
        self.redraw();
    }

    /// All markers on the map, in no particular order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker<T>> + '_ {
        self.markers.values()
    }

    /// All circles on the map, in no particular order.
    pub fn circles(&self) -> impl Iterator<Item = (CircleId, &CircleOptions)> + '_ {
        self.circles.iter().map(|(id, circle)| (*id, circle))
    }

    /// The open info window and the marker it belongs to.
    pub fn info_window(&self) -> Option<(MarkerId, &InfoWindow)> {
        self.info_window.as_ref().map(|(id, window)| (*id, window))
    }

    /// Returns true while the camera is moving by a gesture or an animation.
    pub fn is_camera_moving(&self) -> bool {
        self.camera_moving
    }

    /// Marker closest to the screen point within [`TAP_TOLERANCE`] pixels.
    pub fn marker_at(&self, screen_point: Point2d) -> Option<MarkerId> {
        let tolerance_sq = TAP_TOLERANCE * TAP_TOLERANCE;
        self.markers
            .values()
            .filter_map(|marker| {
                let position = self.view.map_to_screen(&marker.position())?;
                let distance = position.distance_sq(&screen_point);
                (distance <= tolerance_sq).then_some((marker.id(), distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    /// Simulates a tap at the screen point. Queues a [`MapEvent::MarkerTap`] if a marker was hit.
    pub fn tap(&mut self, screen_point: Point2d) -> Option<MarkerId> {
        let hit = self.marker_at(screen_point);
        if let Some(id) = hit {
            self.events.push_back(MapEvent::MarkerTap(id));
        }

        hit
    }

    /// Moves the map with a drag gesture. The first drag of a gesture queues
    /// [`MapEvent::CameraMoveStarted`]; call [`Map::end_gesture`] when the pointer is released.
    pub fn drag(&mut self, from: Point2d, to: Point2d) {
        self.animation = None;
        self.start_camera_move(CameraMoveReason::Gesture);
        self.view = self.view.translate_by_pixels(from, to);
        self.redraw();
    }

    /// Finishes a gesture started with [`Map::drag`], queueing [`MapEvent::CameraIdle`].
    pub fn end_gesture(&mut self) {
        if self.camera_moving && self.animation.is_none() {
            self.finish_camera_move();
        }
    }

    /// Update the view of the map before the rendering in case [`Map::animate_to`] was called.
    pub fn animate(&mut self) {
        let Some(animation) = &self.animation else {
            return;
        };

        let now = SystemTime::now();
        let k = now
            .duration_since(animation.start_time)
            .unwrap_or_default()
            .as_millis() as f64
            / animation.duration.as_millis().max(1) as f64;

        if k >= 1.0 {
            self.view = animation.end_view;
            self.animation = None;
            self.finish_camera_move();
        } else {
            self.view = animation.start_view.interpolate(&animation.end_view, k);
        }

        self.redraw();
    }

    /// Target view of the current animation.
    pub fn target_view(&self) -> &MapView {
        self.animation
            .as_ref()
            .map(|v| &v.end_view)
            .unwrap_or(&self.view)
    }

    /// Request a gradual change of the map view to the specified view.
    pub fn animate_to(&mut self, target: MapView, duration: Duration) {
        self.start_camera_move(CameraMoveReason::DeveloperAnimation);
        self.animation = Some(AnimationParameters {
            start_view: self.view,
            end_view: target,
            start_time: SystemTime::now() - FRAME_DURATION,
            duration,
        });
    }

    fn start_camera_move(&mut self, reason: CameraMoveReason) {
        if !self.camera_moving {
            self.camera_moving = true;
            self.events.push_back(MapEvent::CameraMoveStarted(reason));
        }
    }

    fn finish_camera_move(&mut self) {
        self.camera_moving = false;
        self.events.push_back(MapEvent::CameraIdle);
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl<T> MapSurface<T> for Map<T> {
    fn view(&self) -> &MapView {
        &self.view
    }

    fn move_camera(&mut self, update: CameraUpdate) {
        self.animation = None;
        self.start_camera_move(CameraMoveReason::DeveloperAnimation);
        self.view = update.apply(&self.view);
        self.finish_camera_move();
        self.redraw();
    }

    fn animate_camera(&mut self, update: CameraUpdate, duration: Duration) {
        let target = update.apply(self.target_view());
        self.animate_to(target, duration);
    }

    fn add_marker(&mut self, options: MarkerOptions<T>) -> MarkerId {
        let id = MarkerId(self.next_id());
        self.markers.insert(id, Marker::new(id, options));
        self.redraw();
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        let removed = self.markers.remove(&id).is_some();
        if removed {
            if matches!(self.info_window, Some((window_marker, _)) if window_marker == id) {
                self.info_window = None;
            }
            self.redraw();
        }

        removed
    }

    fn marker(&self, id: MarkerId) -> Option<&Marker<T>> {
        self.markers.get(&id)
    }

    fn set_marker_alpha(&mut self, id: MarkerId, alpha: f32) -> bool {
        let Some(marker) = self.markers.get_mut(&id) else {
            return false;
        };

        marker.set_alpha(alpha);
        self.redraw();
        true
    }

    fn add_circle(&mut self, options: CircleOptions) -> CircleId {
        let id = CircleId(self.next_id());
        self.circles.insert(id, options);
        self.redraw();
        id
    }

    fn remove_circle(&mut self, id: CircleId) -> bool {
        let removed = self.circles.remove(&id).is_some();
        if removed {
            self.redraw();
        }

        removed
    }

    fn circle(&self, id: CircleId) -> Option<&CircleOptions> {
        self.circles.get(&id)
    }

    fn show_info_window(&mut self, marker: MarkerId, window: InfoWindow) {
        if !self.markers.contains_key(&marker) {
            log::debug!("Info window requested for unknown marker {marker:?}");
            return;
        }

        self.info_window = Some((marker, window));
        self.redraw();
    }

    fn hide_info_window(&mut self) {
        if self.info_window.take().is_some() {
            self.redraw();
        }
    }
}

impl<T> EventSource for Map<T> {
    fn poll_event(&mut self) -> Option<MapEvent> {
        self.events.pop_front()
    }
}
