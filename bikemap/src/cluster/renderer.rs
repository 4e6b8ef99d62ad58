use std::sync::Arc;

use crate::cluster::{Cluster, ClusterItem};
use crate::map::{MarkerIcon, MarkerOptions};
use crate::place::Place;

/// Default minimal number of items shown as one aggregate marker.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 4;

const BUCKETS: [usize; 7] = [10, 20, 50, 100, 200, 500, 1000];

/// Decides how clusters and items are drawn.
pub trait ClusterRenderer<T> {
    /// Whether the cluster is drawn as one aggregate marker rather than one marker per item.
    fn should_render_as_cluster(&self, cluster: &Cluster<T>) -> bool;

    /// Marker of an item drawn on its own.
    fn item_marker(&self, item: &T) -> MarkerOptions<T>;

    /// Aggregate marker of the cluster.
    fn cluster_marker(&self, cluster: &Cluster<T>) -> MarkerOptions<T>;
}

/// Renders items with the default pin and clusters with a bucketed count label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultClusterRenderer {
    min_cluster_size: usize,
}

impl Default for DefaultClusterRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CLUSTER_SIZE)
    }
}

impl DefaultClusterRenderer {
    /// Creates a renderer that aggregates clusters of at least `min_cluster_size` items.
    pub fn new(min_cluster_size: usize) -> Self {
        Self { min_cluster_size }
    }

    /// Minimal number of items shown as one aggregate marker.
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Label of a cluster marker: the exact count below 10, otherwise the largest bucket not
    /// exceeding the count followed by `+`.
    pub fn label(size: usize) -> String {
        match BUCKETS.iter().rev().find(|&&bucket| size >= bucket) {
            Some(bucket) => format!("{bucket}+"),
            None => size.to_string(),
        }
    }
}

impl<T: ClusterItem + Clone> ClusterRenderer<T> for DefaultClusterRenderer {
    fn should_render_as_cluster(&self, cluster: &Cluster<T>) -> bool {
        cluster.size() >= self.min_cluster_size
    }

    fn item_marker(&self, item: &T) -> MarkerOptions<T> {
        let mut options = MarkerOptions::new(item.position()).with_tag(item.clone());
        options.title = item.title().map(str::to_string);
        options.snippet = item.snippet().map(str::to_string);
        options
    }

    fn cluster_marker(&self, cluster: &Cluster<T>) -> MarkerOptions<T> {
        MarkerOptions::new(cluster.position()).with_icon(MarkerIcon::Cluster {
            label: Self::label(cluster.size()),
        })
    }
}

/// Renders bike shops with the tinted bicycle icon.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRenderer {
    icon: MarkerIcon,
    inner: DefaultClusterRenderer,
}

impl PlaceRenderer {
    /// Creates a renderer drawing items with the `icon`.
    pub fn new(icon: MarkerIcon, min_cluster_size: usize) -> Self {
        Self {
            icon,
            inner: DefaultClusterRenderer::new(min_cluster_size),
        }
    }
}

impl ClusterRenderer<Arc<Place>> for PlaceRenderer {
    fn should_render_as_cluster(&self, cluster: &Cluster<Arc<Place>>) -> bool {
        self.inner.should_render_as_cluster(cluster)
    }

    fn item_marker(&self, item: &Arc<Place>) -> MarkerOptions<Arc<Place>> {
        MarkerOptions::new(item.position)
            .with_title(item.name.clone())
            .with_snippet(item.address.clone())
            .with_icon(self.icon.clone())
            .with_tag(item.clone())
    }

    fn cluster_marker(&self, cluster: &Cluster<Arc<Place>>) -> MarkerOptions<Arc<Place>> {
        self.inner.cluster_marker(cluster)
    }
}
