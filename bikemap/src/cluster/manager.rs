use std::marker::PhantomData;

use ahash::{AHashMap, AHashSet};

use crate::cluster::{Algorithm, Cluster, ClusterRenderer};
use crate::map::{MapSurface, MarkerId};

/// What a tapped marker managed by a [`ClusterManager`] stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterTap<T> {
    /// Marker of a single item.
    Item(T),
    /// Aggregate marker of a cluster.
    Cluster(Cluster<T>),
}

/// Identity of a marker on the surface: an item index or the sorted indices of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RenderKey {
    Item(usize),
    Cluster(Vec<usize>),
}

#[derive(Debug)]
enum Rendered {
    Item(usize),
    Cluster(Cluster<usize>),
}

/// Keeps the markers on a surface in sync with the clusters of the current zoom level.
///
/// Items are added to the manager, not to the surface. Each call to [`ClusterManager::cluster`]
/// regroups the items and updates the surface: markers of groups that still exist are kept
/// untouched, markers of vanished groups are removed and markers of new groups are added.
pub struct ClusterManager<T, A, R> {
    algorithm: A,
    renderer: R,
    item_markers: AHashMap<usize, MarkerId>,
    cluster_markers: AHashMap<Vec<usize>, MarkerId>,
    rendered: AHashMap<MarkerId, Rendered>,
    items_changed: bool,
    _item: PhantomData<T>,
}

impl<T, A, R> ClusterManager<T, A, R>
where
    T: Clone,
    A: Algorithm<T>,
    R: ClusterRenderer<T>,
{
    /// Creates a manager with no items.
    pub fn new(algorithm: A, renderer: R) -> Self {
        Self {
            algorithm,
            renderer,
            item_markers: AHashMap::new(),
            cluster_markers: AHashMap::new(),
            rendered: AHashMap::new(),
            items_changed: false,
            _item: PhantomData,
        }
    }

    /// Adds the items. They appear on the surface on the next [`ClusterManager::cluster`].
    pub fn add_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.algorithm.add_items(items.into_iter().collect());
        self.items_changed = true;
    }

    /// Removes the item. Returns false if the manager does not have it.
    pub fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let removed = self.algorithm.remove_item(item);
        self.items_changed |= removed;
        removed
    }

    /// Removes all items. Their markers disappear on the next [`ClusterManager::cluster`].
    pub fn clear_items(&mut self) {
        self.algorithm.clear_items();
        self.items_changed = true;
    }

    /// All items.
    pub fn items(&self) -> &[T] {
        self.algorithm.items()
    }

    /// The clustering algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Markers of items drawn on their own.
    pub fn item_markers(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.item_markers.values().copied()
    }

    /// Aggregate cluster markers.
    pub fn cluster_markers(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.cluster_markers.values().copied()
    }

    /// All markers this manager put on the surface.
    pub fn markers(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.item_markers().chain(self.cluster_markers())
    }

    /// Regroups the items for the current zoom of the surface and updates its markers.
    pub fn cluster(&mut self, surface: &mut impl MapSurface<T>) {
        if self.items_changed {
            // Item indices are not stable across item changes.
            self.clear_markers(surface);
            self.items_changed = false;
        }

        let zoom = surface.view().zoom();
        let mut expected = vec![];
        for cluster in self.algorithm.cluster_indices(zoom) {
            let materialized = self.materialize(&cluster);
            if self.renderer.should_render_as_cluster(&materialized) {
                let mut members = cluster.items().to_vec();
                members.sort_unstable();
                expected.push((RenderKey::Cluster(members), Rendered::Cluster(cluster)));
            } else {
                expected.extend(
                    cluster
                        .items()
                        .iter()
                        .map(|&index| (RenderKey::Item(index), Rendered::Item(index))),
                );
            }
        }

        let expected_keys: AHashSet<RenderKey> =
            expected.iter().map(|(key, _)| key.clone()).collect();
        let mut removed = 0;
        self.item_markers.retain(|&index, &mut id| {
            let keep = expected_keys.contains(&RenderKey::Item(index));
            if !keep {
                surface.remove_marker(id);
                self.rendered.remove(&id);
                removed += 1;
            }
            keep
        });
        self.cluster_markers.retain(|members, &mut id| {
            let keep = expected_keys.contains(&RenderKey::Cluster(members.clone()));
            if !keep {
                surface.remove_marker(id);
                self.rendered.remove(&id);
                removed += 1;
            }
            keep
        });

        let mut added = 0;
        for (key, rendered) in expected {
            let exists = match &key {
                RenderKey::Item(index) => self.item_markers.contains_key(index),
                RenderKey::Cluster(members) => self.cluster_markers.contains_key(members),
            };
            if exists {
                continue;
            }

            let options = match &rendered {
                Rendered::Item(index) => self.renderer.item_marker(&self.algorithm.items()[*index]),
                Rendered::Cluster(cluster) => {
                    self.renderer.cluster_marker(&self.materialize(cluster))
                }
            };
            let id = surface.add_marker(options);
            match key {
                RenderKey::Item(index) => self.item_markers.insert(index, id),
                RenderKey::Cluster(members) => self.cluster_markers.insert(members, id),
            };
            self.rendered.insert(id, rendered);
            added += 1;
        }

        log::debug!(
            "Reclustered {} items at zoom {zoom:.2}: {added} markers added, {removed} removed",
            self.algorithm.items().len()
        );
    }

    /// Camera idle handler: always reclusters.
    pub fn on_camera_idle(&mut self, surface: &mut impl MapSurface<T>) {
        self.cluster(surface);
    }

    /// Resolves the marker to the item or cluster it shows. Returns `None` for markers this
    /// manager does not own.
    pub fn on_marker_tap(&self, id: MarkerId) -> Option<ClusterTap<T>> {
        match self.rendered.get(&id)? {
            Rendered::Item(index) => self
                .algorithm
                .items()
                .get(*index)
                .cloned()
                .map(ClusterTap::Item),
            Rendered::Cluster(cluster) => Some(ClusterTap::Cluster(self.materialize(cluster))),
        }
    }

    /// Removes all markers of this manager from the surface.
    pub fn clear_markers(&mut self, surface: &mut impl MapSurface<T>) {
        for id in self.rendered.keys() {
            surface.remove_marker(*id);
        }

        self.item_markers.clear();
        self.cluster_markers.clear();
        self.rendered.clear();
    }

    fn materialize(&self, cluster: &Cluster<usize>) -> Cluster<T> {
        let items = self.algorithm.items();
        Cluster::new(
            cluster.position(),
            cluster
                .items()
                .iter()
                .filter_map(|&index| items.get(index).cloned())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{DefaultClusterRenderer, DistanceBasedAlgorithm};
    use crate::map::{Map, MarkerIcon};
    use crate::place::Place;
    use crate::tests::{places, sf_map};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    type Manager =
        ClusterManager<Arc<Place>, DistanceBasedAlgorithm<Arc<Place>>, DefaultClusterRenderer>;

    fn manager() -> Manager {
        let mut manager = ClusterManager::new(
            DistanceBasedAlgorithm::default(),
            DefaultClusterRenderer::default(),
        );
        manager.add_items(places());
        manager
    }

    /// Every item is either an item marker or a member of exactly one cluster marker.
    fn assert_represented_once(manager: &Manager, map: &Map<Arc<Place>>) {
        let mut seen = vec![0; manager.items().len()];
        for id in manager.markers() {
            assert!(map.marker(id).is_some(), "{id:?} is not on the map");
            match manager.on_marker_tap(id) {
                Some(ClusterTap::Item(place)) => {
                    let index = manager
                        .items()
                        .iter()
                        .position(|p| Arc::ptr_eq(p, &place))
                        .expect("known item");
                    seen[index] += 1;
                }
                Some(ClusterTap::Cluster(cluster)) => {
                    for place in cluster.items() {
                        let index = manager
                            .items()
                            .iter()
                            .position(|p| Arc::ptr_eq(p, place))
                            .expect("known item");
                        seen[index] += 1;
                    }
                }
                None => panic!("manager does not know its own marker {id:?}"),
            }
        }

        assert!(seen.iter().all(|&times| times == 1), "{seen:?}");
        assert_eq!(map.markers().count(), manager.markers().count());
    }

    #[test]
    fn each_place_is_represented_once() {
        let mut map = sf_map();
        let mut manager = manager();

        for zoom in [4.0, 10.0, 12.0, 13.0, 14.5, 16.0, 20.0] {
            map.move_camera(crate::camera::CameraUpdate::CenterZoom {
                center: bikemap_types::latlon!(37.7749, -122.4194),
                zoom,
            });
            manager.on_camera_idle(&mut map);
            assert_represented_once(&manager, &map);
        }
    }

    #[test]
    fn far_zoom_shows_one_cluster() {
        let mut map = sf_map();
        map.move_camera(crate::camera::CameraUpdate::ZoomBy(-10.0));
        let mut manager = manager();
        manager.cluster(&mut map);

        assert_eq!(manager.cluster_markers().count(), 1);
        assert_eq!(manager.item_markers().count(), 0);
        let id = manager.cluster_markers().next().expect("one cluster");
        let marker = map.marker(id).expect("on the map");
        assert_matches!(marker.icon(), MarkerIcon::Cluster { label } if label == "10+");
        assert!(marker.tag().is_none());
        assert_matches!(
            manager.on_marker_tap(id),
            Some(ClusterTap::Cluster(c)) if c.size() == places().len()
        );
    }

    #[test]
    fn unchanged_markers_are_kept() {
        let mut map = sf_map();
        let mut manager = manager();
        manager.cluster(&mut map);
        let before: AHashSet<MarkerId> = manager.markers().collect();

        manager.on_camera_idle(&mut map);
        let after: AHashSet<MarkerId> = manager.markers().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn clearing_items_removes_markers() {
        let mut map = sf_map();
        let mut manager = manager();
        manager.cluster(&mut map);
        assert!(map.markers().count() > 0);

        manager.clear_items();
        manager.cluster(&mut map);
        assert_eq!(map.markers().count(), 0);
        assert_eq!(manager.markers().count(), 0);
    }

    #[test]
    fn removed_item_disappears() {
        let mut map = sf_map();
        let mut manager = manager();
        let first = manager.items()[0].clone();
        assert!(manager.remove_item(&first));
        manager.cluster(&mut map);

        assert_represented_once(&manager, &map);
        assert!(map
            .markers()
            .all(|m| !m.tag().is_some_and(|tag| Arc::ptr_eq(tag, &first))));
    }

    #[test]
    fn foreign_marker_is_not_resolved() {
        let manager = manager();
        assert!(manager.on_marker_tap(MarkerId(1000)).is_none());
    }
}
