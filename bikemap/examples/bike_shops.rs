//! This example runs the bike shop map without a window: a headless map stands in for the map
//! widget, and the example plays the part of the user panning the map and tapping a shop.
//!
//! ```shell
//! RUST_LOG=debug cargo run --example bike_shops
//! ```

use std::sync::Arc;

use bikemap::bikemap_types::cartesian::{Point2d, Size};
use bikemap::bikemap_types::geo::GeoPoint;
use bikemap::bikemap_types::latlon;
use bikemap::control::{EventProcessor, SharedHandler};
use bikemap::coordinator::{map_signals, CoordinatorConfig, MapCoordinator};
use bikemap::error::BikemapError;
use bikemap::info_window::InfoWindow;
use bikemap::place::Place;
use bikemap::{Map, MapSurface, MapView};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BikemapError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let view = MapView::new(&latlon!(0.0, 0.0), 2.0)
        .expect("valid center")
        .with_size(Size::new(1080.0, 1920.0));
    let map: Map<Arc<Place>> = Map::new(view);

    // The host reports the lifecycle of its widget through the sender.
    let (mut sender, signals) = map_signals();
    sender.map_ready(map)?;
    sender.map_loaded()?;

    let config = CoordinatorConfig::default().with_info_window_on_item_tap(true);
    let (coordinator, mut map) = MapCoordinator::bundled(config).launch(signals).await?;
    log::info!(
        "Map is at zoom {:.2} with {} markers",
        map.view().zoom(),
        map.markers().count()
    );

    let coordinator = SharedHandler::new(coordinator);
    let mut processor = EventProcessor::default();
    processor.add_handler(coordinator.clone());
    processor.pump(&mut map)?;

    // Pan the map a bit.
    map.drag(Point2d::new(540.0, 960.0), Point2d::new(440.0, 900.0));
    processor.pump(&mut map)?;
    map.end_gesture();
    processor.pump(&mut map)?;

    // Tap the first shop shown on its own.
    let shop = map
        .markers()
        .filter(|marker| marker.tag().is_some())
        .map(|marker| marker.position())
        .next();
    if let Some(position) = shop.and_then(|position| map.view().map_to_screen(&position)) {
        map.tap(position);
        processor.pump(&mut map)?;
    }

    if let Some((_, InfoWindow::Custom(contents))) = map.info_window() {
        println!("{contents}");
    }
    if let Some(circle) = coordinator
        .inner()
        .read()
        .highlight()
        .and_then(|id| map.circle(id))
    {
        println!(
            "Highlighted {:.0} m around {:.4}, {:.4}",
            circle.radius,
            circle.center.lat(),
            circle.center.lon()
        );
    }

    Ok(())
}
