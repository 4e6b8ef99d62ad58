//! Grouping of nearby markers into aggregate cluster markers.
//!
//! The [`ClusterManager`] owns the items, asks an [`Algorithm`] to group them for the current zoom
//! level and uses a [`ClusterRenderer`] to decide how each group is drawn. Reclustering happens
//! only when the manager is asked to (on camera idle), never while the camera moves.

use std::sync::Arc;

use bikemap_types::geo::GeoPoint2d;

mod algorithm;
mod manager;
mod renderer;

pub use algorithm::{Algorithm, DistanceBasedAlgorithm, DEFAULT_MAX_DISTANCE};
pub use manager::{ClusterManager, ClusterTap};
pub use renderer::{
    ClusterRenderer, DefaultClusterRenderer, PlaceRenderer, DEFAULT_MIN_CLUSTER_SIZE,
};

/// Object that can be shown on the map as a clustered marker.
pub trait ClusterItem {
    /// Position of the item.
    fn position(&self) -> GeoPoint2d;

    /// Title of the item's marker.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Snippet of the item's marker.
    fn snippet(&self) -> Option<&str> {
        None
    }
}

impl<T: ClusterItem + ?Sized> ClusterItem for Arc<T> {
    fn position(&self) -> GeoPoint2d {
        (**self).position()
    }

    fn title(&self) -> Option<&str> {
        (**self).title()
    }

    fn snippet(&self) -> Option<&str> {
        (**self).snippet()
    }
}

/// Group of items shown together at the current zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<T> {
    position: GeoPoint2d,
    items: Vec<T>,
}

impl<T> Cluster<T> {
    /// Creates a cluster at the position.
    pub fn new(position: GeoPoint2d, items: Vec<T>) -> Self {
        Self { position, items }
    }

    /// Position of the cluster marker.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Items of the cluster.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    pub fn size(&self) -> usize {
        self.items.len()
    }
}
