//! This module contains the events a map host reports and the handlers that react to them.
//!
//! Event handling is done in several steps:
//! 1. The host converts its own callbacks (map ready, camera idle, marker tap, ...) into a
//!    [`MapEvent`]. Surfaces that queue their own events, like the headless [`Map`](crate::map::Map),
//!    implement [`EventSource`].
//! 2. The event is given to the [`EventProcessor`], which passes it to its [`MapEventHandler`]s in
//!    order, until one of them returns [`EventPropagation::Stop`].
//! 3. Handlers change the state of the application and the map surface based on the events.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::camera::CameraMoveReason;
use crate::error::BikemapError;
use crate::map::MarkerId;

mod event_processor;

pub use event_processor::EventProcessor;

/// Event reported by the host map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The map object is created and can be used.
    MapReady,
    /// The map finished loading and knows its size.
    MapLoaded,
    /// The camera started moving.
    CameraMoveStarted(CameraMoveReason),
    /// The camera stopped moving.
    CameraIdle,
    /// A marker was tapped.
    MarkerTap(MarkerId),
    /// A polyline with the given host id was tapped.
    PolylineTap(u64),
    /// A polygon with the given host id was tapped.
    PolygonTap(u64),
}

/// Value returned by a [`MapEventHandler`] to indicate the status of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
}

/// Map event handler.
pub trait MapEventHandler<S> {
    /// Handle the event.
    fn handle(
        &mut self,
        event: &MapEvent,
        surface: &mut S,
    ) -> Result<EventPropagation, BikemapError>;
}

impl<S, T> MapEventHandler<S> for T
where
    T: for<'a> FnMut(&'a MapEvent, &'a mut S) -> EventPropagation,
{
    fn handle(
        &mut self,
        event: &MapEvent,
        surface: &mut S,
    ) -> Result<EventPropagation, BikemapError> {
        Ok(self(event, surface))
    }
}

/// Handler shared between the [`EventProcessor`] and the application.
///
/// The application keeps a clone to inspect or reconfigure the handler between events.
pub struct SharedHandler<H>(Arc<RwLock<H>>);

impl<H> SharedHandler<H> {
    /// Wraps the handler.
    pub fn new(handler: H) -> Self {
        Self(Arc::new(RwLock::new(handler)))
    }

    /// Shared reference to the inner handler.
    pub fn inner(&self) -> &Arc<RwLock<H>> {
        &self.0
    }
}

impl<H> Clone for SharedHandler<H> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S, H: MapEventHandler<S>> MapEventHandler<S> for SharedHandler<H> {
    fn handle(
        &mut self,
        event: &MapEvent,
        surface: &mut S,
    ) -> Result<EventPropagation, BikemapError> {
        self.0.write().handle(event, surface)
    }
}

/// Surface that queues its own events, e.g. camera movement caused by [`MapSurface`] calls.
///
/// [`MapSurface`]: crate::map::MapSurface
pub trait EventSource {
    /// Takes the oldest queued event.
    fn poll_event(&mut self) -> Option<MapEvent>;
}
