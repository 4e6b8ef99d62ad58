use crate::control::{EventPropagation, EventSource, MapEvent, MapEventHandler};
use crate::error::BikemapError;

/// Dispatches [`MapEvent`]s to a list of handlers.
pub struct EventProcessor<S> {
    handlers: Vec<Box<dyn MapEventHandler<S>>>,
}

impl<S> Default for EventProcessor<S> {
    fn default() -> Self {
        Self { handlers: vec![] }
    }
}

impl<S> EventProcessor<S> {
    /// Adds a handler to the end of the list.
    pub fn add_handler(&mut self, handler: impl MapEventHandler<S> + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Passes the event to the handlers in order until one of them stops it.
    ///
    /// Returns [`EventPropagation::Stop`] if some handler stopped the event.
    pub fn handle(
        &mut self,
        event: MapEvent,
        surface: &mut S,
    ) -> Result<EventPropagation, BikemapError> {
        for handler in self.handlers.iter_mut() {
            if handler.handle(&event, surface)? == EventPropagation::Stop {
                return Ok(EventPropagation::Stop);
            }
        }

        Ok(EventPropagation::Propagate)
    }

    /// Handles every event queued by the surface, including the ones queued while handling.
    ///
    /// Returns the number of handled events.
    pub fn pump(&mut self, surface: &mut S) -> Result<usize, BikemapError>
    where
        S: EventSource,
    {
        let mut count = 0;
        while let Some(event) = surface.poll_event() {
            log::trace!("Handling {event:?}");
            self.handle(event, surface)?;
            count += 1;
        }

        Ok(count)
    }
}
