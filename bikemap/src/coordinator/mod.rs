//! Coordinator of the bike shop map: loads the places, frames the camera on them, puts their
//! markers on the map and reacts to camera movement and marker taps.

use std::cell::OnceCell;
use std::sync::Arc;

use bikemap_types::geo::GeoBounds;

use crate::camera::{CameraMoveReason, CameraUpdate};
use crate::cluster::{ClusterManager, ClusterTap, DistanceBasedAlgorithm, PlaceRenderer};
use crate::control::{EventPropagation, MapEvent, MapEventHandler};
use crate::error::BikemapError;
use crate::info_window::{InfoWindowAdapter, MarkerInfoWindowAdapter};
use crate::map::{CircleId, CircleOptions, MapSurface, MarkerIcon, MarkerId, MarkerOptions};
use crate::place::{Place, PlaceSource, PlacesReader};

mod config;
mod signal;

/// Opacity of markers while the camera is idle.
const IDLE_ALPHA: f32 = 1.0;

pub use config::{ClusterConfig, CoordinatorConfig, MarkerMode};
pub use signal::{map_signals, MapSignalSender, MapSignals};

type PlaceClusterManager =
    ClusterManager<Arc<Place>, DistanceBasedAlgorithm<Arc<Place>>, PlaceRenderer>;

/// Lifecycle state of a [`MapCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Waiting for the map to be ready and loaded.
    Loading,
    /// The map is loaded, the places are being framed.
    Ready,
    /// The camera shows all places, markers are being installed.
    Framed,
    /// Markers are on the map and the coordinator reacts to events.
    Interactive,
}

/// Drives a map showing bike shops.
///
/// The coordinator is a [`MapEventHandler`]: add it to an
/// [`EventProcessor`](crate::control::EventProcessor), or call the `on_*` methods directly from the
/// host callbacks. Once the map is loaded it:
/// * moves the camera so that every place is visible;
/// * adds the place markers, plain or clustered depending on [`MarkerMode`];
/// * makes the markers translucent while the camera moves and reclusters them when it stops;
/// * draws a circle around a tapped place, replacing the previous one.
pub struct MapCoordinator<P = PlacesReader> {
    config: CoordinatorConfig,
    source: P,
    adapter: MarkerInfoWindowAdapter,
    state: CoordinatorState,
    map_ready: bool,
    places: OnceCell<Vec<Arc<Place>>>,
    bicycle_icon: OnceCell<MarkerIcon>,
    clusters: Option<PlaceClusterManager>,
    plain_markers: Vec<MarkerId>,
    highlight: Option<CircleId>,
}

impl MapCoordinator {
    /// Coordinator showing the places bundled with the crate.
    pub fn bundled(config: CoordinatorConfig) -> Self {
        Self::new(PlacesReader::bundled(), config)
    }
}

impl<P: PlaceSource> MapCoordinator<P> {
    /// Creates a coordinator loading places from the source.
    pub fn new(source: P, config: CoordinatorConfig) -> Self {
        Self {
            config,
            source,
            adapter: MarkerInfoWindowAdapter,
            state: CoordinatorState::Loading,
            map_ready: false,
            places: OnceCell::new(),
            bicycle_icon: OnceCell::new(),
            clusters: None,
            plain_markers: vec![],
            highlight: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Configuration.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The places. Loaded from the source on the first call; a failed load is retried on the next
    /// call.
    pub fn places(&self) -> Result<&[Arc<Place>], BikemapError> {
        if let Some(places) = self.places.get() {
            return Ok(places);
        }

        let loaded: Vec<Arc<Place>> = self.source.load()?.into_iter().map(Arc::new).collect();
        log::debug!("Caching {} places", loaded.len());
        Ok(self.places.get_or_init(|| loaded))
    }

    /// Icon of the place markers: the bicycle tinted with [`CoordinatorConfig::marker_tint`].
    pub fn bicycle_icon(&self) -> &MarkerIcon {
        self.bicycle_icon
            .get_or_init(|| MarkerIcon::bicycle(self.config.marker_tint()))
    }

    /// The highlight circle, if a place was tapped.
    pub fn highlight(&self) -> Option<CircleId> {
        self.highlight
    }

    /// The cluster manager in clustered modes, once the markers are installed.
    pub fn cluster_manager(&self) -> Option<&PlaceClusterManager> {
        self.clusters.as_ref()
    }

    /// All markers put on the map by this coordinator.
    pub fn markers(&self) -> Vec<MarkerId> {
        let mut markers = self.plain_markers.clone();
        if let Some(clusters) = &self.clusters {
            markers.extend(clusters.markers());
        }

        markers
    }

    /// The map widget is created.
    pub fn on_map_ready(&mut self, _surface: &mut impl MapSurface<Arc<Place>>) {
        if self.map_ready {
            log::debug!("Map ready is reported again, ignoring");
            return;
        }

        self.map_ready = true;
        log::debug!("Map is ready");
    }

    /// The map widget finished loading: frames the places and puts their markers on the map.
    ///
    /// Does nothing if the markers were already installed. Fails if the places cannot be loaded,
    /// in which case the coordinator stays in [`CoordinatorState::Loading`].
    pub fn on_map_loaded(
        &mut self,
        surface: &mut impl MapSurface<Arc<Place>>,
    ) -> Result<(), BikemapError> {
        if self.state != CoordinatorState::Loading {
            log::debug!("Map loaded is reported in {:?} state, ignoring", self.state);
            return Ok(());
        }

        if !self.map_ready {
            log::warn!("Map loaded is reported before map ready");
            self.map_ready = true;
        }

        let places = self.places()?.to_vec();
        self.set_state(CoordinatorState::Ready);

        match GeoBounds::from_points(places.iter().map(|place| &place.position)) {
            Ok(bounds) => {
                surface.move_camera(CameraUpdate::Bounds {
                    bounds,
                    padding: self.config.frame_padding(),
                });
                log::info!(
                    "Framed {} places, zoom {:.2}",
                    places.len(),
                    surface.view().zoom()
                );
            }
            Err(_) => log::warn!("No places to show, camera is not moved"),
        }
        self.set_state(CoordinatorState::Framed);

        if self.config.mode().is_clustered() {
            self.add_clustered_markers(places, surface);
        } else {
            self.add_plain_markers(&places, surface);
        }
        self.set_state(CoordinatorState::Interactive);

        Ok(())
    }

    /// The camera started moving: makes all markers translucent.
    pub fn on_camera_move_started(
        &mut self,
        reason: CameraMoveReason,
        surface: &mut impl MapSurface<Arc<Place>>,
    ) {
        if !self.is_interactive("camera move") {
            return;
        }

        log::trace!("Camera move started by {reason:?}");
        self.set_alpha(self.config.moving_alpha(), surface);
    }

    /// The camera stopped: reclusters the markers and makes them opaque.
    pub fn on_camera_idle(&mut self, surface: &mut impl MapSurface<Arc<Place>>) {
        if !self.is_interactive("camera idle") {
            return;
        }

        if let Some(clusters) = &mut self.clusters {
            clusters.on_camera_idle(surface);
        }
        self.set_alpha(IDLE_ALPHA, surface);
    }

    /// A marker was tapped.
    ///
    /// A place marker in [`MarkerMode::InteractiveClustering`] gets the highlight circle, other
    /// markers of this coordinator open their info window. Taps on markers not owned by the
    /// coordinator are propagated.
    pub fn on_marker_tap(
        &mut self,
        marker: MarkerId,
        surface: &mut impl MapSurface<Arc<Place>>,
    ) -> EventPropagation {
        if !self.is_interactive("marker tap") {
            return EventPropagation::Propagate;
        }

        if self.plain_markers.contains(&marker) {
            self.show_info_window(marker, surface);
            return EventPropagation::Stop;
        }

        let Some(tap) = self
            .clusters
            .as_ref()
            .and_then(|clusters| clusters.on_marker_tap(marker))
        else {
            log::debug!("Tap on unknown marker {marker:?}");
            return EventPropagation::Propagate;
        };

        match tap {
            ClusterTap::Item(place) => {
                log::debug!("Tap on {}", place.name);
                if self.config.mode() == MarkerMode::InteractiveClustering {
                    self.highlight_place(&place, surface);
                    if self.config.info_window_on_item_tap() {
                        self.show_info_window(marker, surface);
                    }
                } else {
                    self.show_info_window(marker, surface);
                }
            }
            ClusterTap::Cluster(cluster) => {
                log::debug!("Tap on cluster of {} places", cluster.size());
                self.show_info_window(marker, surface);
            }
        }

        EventPropagation::Stop
    }

    /// Polylines are not used by this map.
    pub fn on_polyline_tap(&mut self, polyline: u64) -> EventPropagation {
        log::debug!("Tap on polyline {polyline} is not handled");
        EventPropagation::Propagate
    }

    /// Polygons are not used by this map.
    pub fn on_polygon_tap(&mut self, polygon: u64) -> EventPropagation {
        log::debug!("Tap on polygon {polygon} is not handled");
        EventPropagation::Propagate
    }

    /// Waits for the map lifecycle signals and sets the map up.
    ///
    /// Returns the coordinator in [`CoordinatorState::Interactive`] state together with the map
    /// surface received from the host.
    pub async fn launch<S>(mut self, mut signals: MapSignals<S>) -> Result<(Self, S), BikemapError>
    where
        S: MapSurface<Arc<Place>>,
    {
        let mut surface = signals.surface().await?;
        self.on_map_ready(&mut surface);

        signals.loaded().await?;
        self.on_map_loaded(&mut surface)?;

        Ok((self, surface))
    }

    fn set_state(&mut self, state: CoordinatorState) {
        log::debug!("Coordinator state: {:?} -> {state:?}", self.state);
        self.state = state;
    }

    fn is_interactive(&self, event: &str) -> bool {
        let interactive = self.state == CoordinatorState::Interactive;
        if !interactive {
            log::debug!("Ignoring {event} in {:?} state", self.state);
        }

        interactive
    }

    fn add_plain_markers(
        &mut self,
        places: &[Arc<Place>],
        surface: &mut impl MapSurface<Arc<Place>>,
    ) {
        let icon = self.bicycle_icon().clone();
        self.plain_markers = places
            .iter()
            .map(|place| {
                surface.add_marker(
                    MarkerOptions::new(place.position)
                        .with_title(place.name.clone())
                        .with_icon(icon.clone())
                        .with_tag(place.clone()),
                )
            })
            .collect();
    }

    fn add_clustered_markers(
        &mut self,
        places: Vec<Arc<Place>>,
        surface: &mut impl MapSurface<Arc<Place>>,
    ) {
        let cluster_config = self.config.cluster();
        let mut clusters = ClusterManager::new(
            DistanceBasedAlgorithm::new(cluster_config.max_distance()),
            PlaceRenderer::new(
                self.bicycle_icon().clone(),
                cluster_config.min_cluster_size(),
            ),
        );
        clusters.add_items(places);
        clusters.cluster(surface);
        self.clusters = Some(clusters);
    }

    fn set_alpha(&self, alpha: f32, surface: &mut impl MapSurface<Arc<Place>>) {
        for marker in self.markers() {
            surface.set_marker_alpha(marker, alpha);
        }
    }

    fn highlight_place(&mut self, place: &Place, surface: &mut impl MapSurface<Arc<Place>>) {
        if let Some(previous) = self.highlight.take() {
            surface.remove_circle(previous);
        }

        self.highlight = Some(surface.add_circle(CircleOptions {
            center: place.position,
            radius: self.config.highlight_radius(),
            fill_color: self.config.highlight_fill(),
            stroke_color: self.config.highlight_stroke(),
        }));
    }

    fn show_info_window(&self, marker: MarkerId, surface: &mut impl MapSurface<Arc<Place>>) {
        let Some(window) = surface
            .marker(marker)
            .map(|marker| self.adapter.present(marker))
        else {
            return;
        };

        surface.show_info_window(marker, window);
    }
}

impl<P, S> MapEventHandler<S> for MapCoordinator<P>
where
    P: PlaceSource,
    S: MapSurface<Arc<Place>>,
{
    fn handle(
        &mut self,
        event: &MapEvent,
        surface: &mut S,
    ) -> Result<EventPropagation, BikemapError> {
        match event {
            MapEvent::MapReady => self.on_map_ready(surface),
            MapEvent::MapLoaded => self.on_map_loaded(surface)?,
            MapEvent::CameraMoveStarted(reason) => self.on_camera_move_started(*reason, surface),
            MapEvent::CameraIdle => self.on_camera_idle(surface),
            MapEvent::MarkerTap(marker) => return Ok(self.on_marker_tap(*marker, surface)),
            MapEvent::PolylineTap(polyline) => return Ok(self.on_polyline_tap(*polyline)),
            MapEvent::PolygonTap(polygon) => return Ok(self.on_polygon_tap(*polygon)),
        }

        Ok(EventPropagation::Propagate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::EventProcessor;
    use crate::info_window::InfoWindow;
    use crate::map::Map;
    use crate::tests::{place, places, sf_map};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use bikemap_types::cartesian::Point2d;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: Arc<AtomicUsize>,
        places: Option<Vec<Place>>,
    }

    impl PlaceSource for CountingSource {
        fn load(&self) -> Result<Vec<Place>, BikemapError> {
            self.loads.fetch_add(1, Ordering::Relaxed);
            self.places
                .clone()
                .ok_or_else(|| BikemapError::DataFormat("broken".into()))
        }
    }

    fn loaded(config: CoordinatorConfig) -> (MapCoordinator, Map<Arc<Place>>) {
        let mut map = sf_map();
        let mut coordinator = MapCoordinator::bundled(config);
        coordinator.on_map_ready(&mut map);
        coordinator.on_map_loaded(&mut map).unwrap();
        (coordinator, map)
    }

    fn alphas(coordinator: &MapCoordinator, map: &Map<Arc<Place>>) -> Vec<f32> {
        coordinator
            .markers()
            .into_iter()
            .map(|id| map.marker(id).unwrap().alpha())
            .collect()
    }

    /// Clusters at a zoom where every place is shown on its own.
    fn zoomed_in() -> CoordinatorConfig {
        CoordinatorConfig::default().with_cluster(ClusterConfig::default().with_max_distance(1.0))
    }

    fn first_item_marker(coordinator: &MapCoordinator) -> MarkerId {
        coordinator
            .cluster_manager()
            .unwrap()
            .item_markers()
            .min()
            .unwrap()
    }

    #[test]
    fn framing_contains_every_place() {
        let (coordinator, map) = loaded(CoordinatorConfig::default());
        assert_eq!(coordinator.state(), CoordinatorState::Interactive);

        let visible = map.view().visible_bounds().unwrap();
        for place in places() {
            assert!(visible.contains(&place.position), "{} is not visible", place.name);
            let screen = map.view().map_to_screen(&place.position).unwrap();
            assert!(screen.x >= 19.0 && screen.x <= map.view().size().width() - 19.0);
            assert!(screen.y >= 19.0 && screen.y <= map.view().size().height() - 19.0);
        }
    }

    #[test]
    fn every_place_is_on_the_map() {
        let (coordinator, map) = loaded(CoordinatorConfig::default().with_mode(MarkerMode::Plain));
        assert_eq!(coordinator.markers().len(), places().len());
        assert_eq!(map.markers().count(), places().len());
        assert!(map
            .markers()
            .all(|marker| marker.icon() == coordinator.bicycle_icon() && marker.tag().is_some()));
    }

    #[test]
    fn places_are_loaded_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let coordinator = MapCoordinator::new(
            CountingSource {
                loads: loads.clone(),
                places: Some(vec![(*place("Shop A", 37.0, -122.0)).clone()]),
            },
            CoordinatorConfig::default(),
        );

        assert_eq!(coordinator.places().unwrap().len(), 1);
        assert_eq!(coordinator.places().unwrap().len(), 1);
        assert_eq!(loads.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn failed_load_is_reported_and_retried() {
        let loads = Arc::new(AtomicUsize::new(0));
        let mut coordinator = MapCoordinator::new(
            CountingSource {
                loads: loads.clone(),
                places: None,
            },
            CoordinatorConfig::default(),
        );
        let mut map = sf_map();

        assert_matches!(
            coordinator.on_map_loaded(&mut map),
            Err(BikemapError::DataFormat(_))
        );
        assert_eq!(coordinator.state(), CoordinatorState::Loading);
        assert!(coordinator.places().is_err());
        assert_eq!(loads.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn empty_place_list_keeps_camera() {
        let mut coordinator = MapCoordinator::new(
            CountingSource {
                loads: Arc::default(),
                places: Some(vec![]),
            },
            CoordinatorConfig::default(),
        );
        let mut map = sf_map();
        let view_before = *map.view();

        coordinator.on_map_loaded(&mut map).unwrap();
        assert_eq!(coordinator.state(), CoordinatorState::Interactive);
        assert_eq!(map.view(), &view_before);
        assert_eq!(map.markers().count(), 0);
    }

    #[test]
    fn repeated_map_loaded_is_ignored() {
        let (mut coordinator, mut map) = loaded(CoordinatorConfig::default());
        let markers = map.markers().count();
        coordinator.on_map_loaded(&mut map).unwrap();
        assert_eq!(map.markers().count(), markers);
    }

    #[test]
    fn markers_fade_while_camera_moves() {
        let (mut coordinator, mut map) = loaded(CoordinatorConfig::default());

        coordinator.on_camera_move_started(CameraMoveReason::Gesture, &mut map);
        assert!(alphas(&coordinator, &map)
            .iter()
            .all(|&alpha| (alpha - 0.3).abs() < 1e-6));

        coordinator.on_camera_idle(&mut map);
        assert!(alphas(&coordinator, &map).iter().all(|&alpha| alpha == 1.0));
        coordinator.on_camera_idle(&mut map);
        assert!(alphas(&coordinator, &map).iter().all(|&alpha| alpha == 1.0));
    }

    #[test]
    fn idle_markers_are_opaque_whatever_the_config() {
        let config: CoordinatorConfig =
            serde_json::from_str(r#"{"moving_alpha": 0.0, "idle_alpha": 0.5}"#).unwrap();
        let (mut coordinator, mut map) = loaded(config);

        coordinator.on_camera_move_started(CameraMoveReason::DeveloperAnimation, &mut map);
        assert!(alphas(&coordinator, &map).iter().all(|&alpha| alpha == 0.0));

        coordinator.on_camera_idle(&mut map);
        assert!(alphas(&coordinator, &map).iter().all(|&alpha| alpha == 1.0));
    }

    #[test]
    fn events_before_load_are_ignored() {
        let mut map = sf_map();
        let id = map.add_marker(MarkerOptions::new(place("x", 37.0, -122.0).position));
        let mut coordinator = MapCoordinator::bundled(CoordinatorConfig::default());

        coordinator.on_camera_move_started(CameraMoveReason::Gesture, &mut map);
        assert_eq!(map.marker(id).unwrap().alpha(), 1.0);
        assert_eq!(
            coordinator.on_marker_tap(id, &mut map),
            EventPropagation::Propagate
        );
        assert_eq!(coordinator.state(), CoordinatorState::Loading);
    }

    #[test]
    fn single_highlight_circle_at_last_tap() {
        let (mut coordinator, mut map) = loaded(zoomed_in());
        let items: Vec<MarkerId> = coordinator
            .cluster_manager()
            .unwrap()
            .item_markers()
            .take(3)
            .collect();
        assert_eq!(items.len(), 3);

        for &id in &items {
            assert_eq!(coordinator.on_marker_tap(id, &mut map), EventPropagation::Stop);
            assert_eq!(map.circles().count(), 1);
        }

        let last = map.marker(items[2]).unwrap().position();
        let (circle_id, circle) = map.circles().next().unwrap();
        assert_eq!(Some(circle_id), coordinator.highlight());
        assert_eq!(circle.center, last);
        assert_abs_diff_eq!(circle.radius, 1000.0);
        assert!(circle.contains(&last));
        assert!(map.info_window().is_none());
    }

    #[test]
    fn item_tap_can_open_info_window() {
        let (mut coordinator, mut map) = loaded(zoomed_in().with_info_window_on_item_tap(true));
        let id = first_item_marker(&coordinator);

        coordinator.on_marker_tap(id, &mut map);
        assert_eq!(map.circles().count(), 1);
        assert_matches!(map.info_window(), Some((window, InfoWindow::Custom(_))) if window == id);
    }

    #[test]
    fn simple_clustering_shows_info_window() {
        let (mut coordinator, mut map) =
            loaded(zoomed_in().with_mode(MarkerMode::SimpleClustering));
        let id = first_item_marker(&coordinator);
        let place = map.marker(id).unwrap().tag().unwrap().clone();

        assert_eq!(coordinator.on_marker_tap(id, &mut map), EventPropagation::Stop);
        assert_eq!(map.circles().count(), 0);
        let (_, window) = map.info_window().unwrap();
        assert_eq!(
            window,
            &InfoWindow::Custom(MarkerInfoWindowAdapter::contents(&place))
        );
    }

    #[test]
    fn cluster_tap_shows_default_window() {
        let config = CoordinatorConfig::default()
            .with_cluster(ClusterConfig::default().with_max_distance(100_000.0));
        let (mut coordinator, mut map) = loaded(config);
        let clusters = coordinator.cluster_manager().unwrap();
        assert_eq!(clusters.item_markers().count(), 0);
        let id = clusters.cluster_markers().next().unwrap();

        assert_eq!(coordinator.on_marker_tap(id, &mut map), EventPropagation::Stop);
        assert_eq!(map.circles().count(), 0);
        assert_matches!(map.info_window(), Some((_, InfoWindow::Default { .. })));
    }

    #[test]
    fn plain_marker_tap_shows_info_window() {
        let (mut coordinator, mut map) =
            loaded(CoordinatorConfig::default().with_mode(MarkerMode::Plain));
        let id = coordinator.markers()[0];

        assert_eq!(coordinator.on_marker_tap(id, &mut map), EventPropagation::Stop);
        assert_matches!(map.info_window(), Some((window, InfoWindow::Custom(_))) if window == id);
    }

    #[test]
    fn foreign_marker_tap_is_propagated() {
        let (mut coordinator, mut map) = loaded(CoordinatorConfig::default());
        let foreign = map.add_marker(MarkerOptions::new(place("x", 37.0, -122.0).position));

        assert_eq!(
            coordinator.on_marker_tap(foreign, &mut map),
            EventPropagation::Propagate
        );
        assert_eq!(coordinator.on_polyline_tap(1), EventPropagation::Propagate);
        assert_eq!(coordinator.on_polygon_tap(1), EventPropagation::Propagate);
        assert!(coordinator.highlight().is_none());
    }

    #[test]
    fn event_processor_drives_coordinator() {
        let mut map = sf_map();
        let mut processor = EventProcessor::default();
        processor.add_handler(MapCoordinator::bundled(zoomed_in()));

        processor.handle(MapEvent::MapReady, &mut map).unwrap();
        processor.handle(MapEvent::MapLoaded, &mut map).unwrap();
        processor.pump(&mut map).unwrap();
        assert_eq!(map.markers().count(), places().len());

        let marker = map.markers().map(|m| m.id()).min().unwrap();
        let screen = map
            .view()
            .map_to_screen(&map.marker(marker).unwrap().position())
            .unwrap();
        let tapped = map.tap(screen).unwrap();
        processor.pump(&mut map).unwrap();
        assert_eq!(map.circles().count(), 1);
        let (_, circle) = map.circles().next().unwrap();
        assert_eq!(circle.center, map.marker(tapped).unwrap().position());

        map.drag(Point2d::new(100.0, 100.0), Point2d::new(150.0, 100.0));
        processor.pump(&mut map).unwrap();
        assert!(map.markers().all(|m| (m.alpha() - 0.3).abs() < 1e-6));

        map.end_gesture();
        processor.pump(&mut map).unwrap();
        assert!(map.markers().all(|m| m.alpha() == 1.0));
    }

    #[test]
    fn launch_waits_for_signals() {
        let (mut sender, signals) = map_signals();
        sender.map_ready(sf_map()).unwrap();
        sender.map_loaded().unwrap();

        let (coordinator, map) = tokio_test::block_on(
            MapCoordinator::bundled(CoordinatorConfig::default()).launch(signals),
        )
        .unwrap();
        assert_eq!(coordinator.state(), CoordinatorState::Interactive);
        assert!(map.markers().count() > 0);
    }

    #[test]
    fn launch_fails_without_load_signal() {
        let (mut sender, signals) = map_signals();
        sender.map_ready(sf_map()).unwrap();
        drop(sender);

        let result = tokio_test::block_on(
            MapCoordinator::bundled(CoordinatorConfig::default()).launch(signals),
        );
        assert_matches!(result.err(), Some(BikemapError::SignalDropped));
    }

    #[test]
    fn invalid_cluster_distance_keeps_every_place() {
        for json in [
            r#"{"cluster": {"max_distance": -1}}"#,
            r#"{"cluster": {"max_distance": -100.5}}"#,
        ] {
            let config: CoordinatorConfig = serde_json::from_str(json).unwrap();
            let (coordinator, map) = loaded(config);
            let manager = coordinator.cluster_manager().unwrap();
            assert_eq!(manager.item_markers().count(), places().len());
            assert_eq!(map.markers().count(), places().len());
        }
    }
}
