use tokio::sync::oneshot;

use crate::error::BikemapError;

/// Creates the pair of lifecycle signals of a map widget.
///
/// The host keeps the [`MapSignalSender`] and reports the widget lifecycle through it. The
/// [`MapSignals`] are given to [`MapCoordinator::launch`](super::MapCoordinator::launch).
pub fn map_signals<S>() -> (MapSignalSender<S>, MapSignals<S>) {
    let (ready_tx, ready_rx) = oneshot::channel();
    let (loaded_tx, loaded_rx) = oneshot::channel();
    (
        MapSignalSender {
            ready: Some(ready_tx),
            loaded: Some(loaded_tx),
        },
        MapSignals {
            ready: ready_rx,
            loaded: loaded_rx,
        },
    )
}

/// Host side of the lifecycle signals.
///
/// Dropping it before both signals are sent makes the launch fail with
/// [`BikemapError::SignalDropped`].
#[derive(Debug)]
pub struct MapSignalSender<S> {
    ready: Option<oneshot::Sender<S>>,
    loaded: Option<oneshot::Sender<()>>,
}

impl<S> MapSignalSender<S> {
    /// Reports that the map widget is created, handing over its surface.
    ///
    /// Only the first call has effect.
    pub fn map_ready(&mut self, surface: S) -> Result<(), BikemapError> {
        let Some(sender) = self.ready.take() else {
            log::warn!("Map ready signal is sent more than once, ignoring");
            return Ok(());
        };

        sender.send(surface).map_err(|_| BikemapError::SignalDropped)
    }

    /// Reports that the map widget finished loading and has its final size.
    ///
    /// Only the first call has effect.
    pub fn map_loaded(&mut self) -> Result<(), BikemapError> {
        let Some(sender) = self.loaded.take() else {
            log::warn!("Map loaded signal is sent more than once, ignoring");
            return Ok(());
        };

        sender.send(()).map_err(|_| BikemapError::SignalDropped)
    }
}

/// Receiving side of the lifecycle signals.
#[derive(Debug)]
pub struct MapSignals<S> {
    ready: oneshot::Receiver<S>,
    loaded: oneshot::Receiver<()>,
}

impl<S> MapSignals<S> {
    /// Waits for the map surface.
    pub(crate) async fn surface(&mut self) -> Result<S, BikemapError> {
        (&mut self.ready)
            .await
            .map_err(|_| BikemapError::SignalDropped)
    }

    /// Waits until the map is loaded.
    pub(crate) async fn loaded(&mut self) -> Result<(), BikemapError> {
        (&mut self.loaded)
            .await
            .map_err(|_| BikemapError::SignalDropped)
    }
}
