use ahash::AHashMap;
use bikemap_types::cartesian::{CartesianPoint2d, Point2d, Rect};

use crate::cluster::{Cluster, ClusterItem};
use crate::view::world_pixel;

/// Default distance in pixels within which items are grouped.
pub const DEFAULT_MAX_DISTANCE: f64 = 100.0;

/// Clustering algorithm: owns the items and groups them for a zoom level.
pub trait Algorithm<T> {
    /// Adds the items.
    fn add_items(&mut self, items: Vec<T>);

    /// Removes the first item equal to `item`. Returns false if there is no such item.
    fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq;

    /// Removes all items.
    fn clear_items(&mut self);

    /// All items, in insertion order.
    fn items(&self) -> &[T];

    /// Groups items for the zoom level. Clusters refer to the items by their index in
    /// [`Algorithm::items`]. Every item must be in exactly one cluster.
    fn cluster_indices(&self, zoom: f64) -> Vec<Cluster<usize>>;

    /// Groups items for the zoom level.
    fn clusters(&self, zoom: f64) -> Vec<Cluster<T>>
    where
        T: Clone,
    {
        let items = self.items();
        self.cluster_indices(zoom)
            .into_iter()
            .map(|cluster| {
                Cluster::new(
                    cluster.position(),
                    cluster.items().iter().map(|&i| items[i].clone()).collect(),
                )
            })
            .collect()
    }
}

/// Non-hierarchical distance based clustering.
///
/// Items are visited in insertion order. Every item not yet visited becomes a cluster center that
/// takes all items within a square of `max_distance` pixels around it at the current (integer) zoom
/// level. An item already taken by another cluster moves to the new one if it is not farther from
/// the new center than from its current one. Nothing is cached between calls, so the clustering
/// is recomputed from scratch for every zoom.
#[derive(Debug, Clone)]
pub struct DistanceBasedAlgorithm<T> {
    items: Vec<T>,
    max_distance: f64,
}

impl<T> Default for DistanceBasedAlgorithm<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE)
    }
}

impl<T> DistanceBasedAlgorithm<T> {
    /// Creates an empty algorithm with the given grouping distance in pixels.
    ///
    /// A negative or NaN distance is replaced by zero, which groups only items at the same pixel.
    pub fn new(max_distance: f64) -> Self {
        let max_distance = if max_distance >= 0.0 {
            max_distance
        } else {
            log::warn!("Invalid clustering distance {max_distance}, using 0");
            0.0
        };

        Self {
            items: vec![],
            max_distance,
        }
    }

    /// Grouping distance in pixels.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }
}

impl<T: ClusterItem> Algorithm<T> for DistanceBasedAlgorithm<T> {
    fn add_items(&mut self, items: Vec<T>) {
        self.items.extend(items);
    }

    fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.items.iter().position(|i| i == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn clear_items(&mut self) {
        self.items.clear();
    }

    fn items(&self) -> &[T] {
        &self.items
    }

    fn cluster_indices(&self, zoom: f64) -> Vec<Cluster<usize>> {
        let zoom = zoom.floor();
        let points: Vec<Option<Point2d>> = self
            .items
            .iter()
            .map(|item| world_pixel(&item.position(), zoom))
            .collect();
        let grid = Grid::new(&points, self.max_distance);
        let half = self.max_distance / 2.0;

        let mut visited = vec![false; self.items.len()];
        let mut distances = vec![f64::INFINITY; self.items.len()];
        let mut owners: Vec<Option<usize>> = vec![None; self.items.len()];
        let mut clusters: Vec<Cluster<usize>> = vec![];

        for candidate in 0..self.items.len() {
            if visited[candidate] {
                continue;
            }

            let position = self.items[candidate].position();
            let Some(center) = points[candidate] else {
                log::debug!("Item at {position:?} cannot be projected, showing it alone");
                visited[candidate] = true;
                clusters.push(Cluster::new(position, vec![candidate]));
                continue;
            };

            let neighbours = grid.search(&points, &Rect::around(&center, half));
            if neighbours.len() <= 1 {
                visited[candidate] = true;
                distances[candidate] = 0.0;
                owners[candidate] = Some(clusters.len());
                clusters.push(Cluster::new(position, vec![candidate]));
                continue;
            }

            let cluster_index = clusters.len();
            clusters.push(Cluster::new(position, vec![]));

            for index in neighbours {
                visited[index] = true;
                let Some(point) = points[index] else {
                    continue;
                };

                let distance = point.distance_sq(&center);
                if let Some(owner) = owners[index] {
                    if distances[index] < distance {
                        continue;
                    }
                    clusters[owner].items.retain(|&i| i != index);
                }

                distances[index] = distance;
                owners[index] = Some(cluster_index);
                clusters[cluster_index].items.push(index);
            }
        }

        clusters.retain(|cluster| cluster.size() > 0);
        clusters
    }
}

/// Buckets of item indices by grid cell, for neighbour search.
struct Grid {
    cell_size: f64,
    cells: AHashMap<(i64, i64), Vec<usize>>,
}

impl Grid {
    fn new(points: &[Option<Point2d>], cell_size: f64) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let mut cells: AHashMap<(i64, i64), Vec<usize>> = AHashMap::new();
        for (index, point) in points.iter().enumerate() {
            if let Some(point) = point {
                cells
                    .entry(cell_of(point.x, point.y, cell_size))
                    .or_default()
                    .push(index);
            }
        }

        Self { cell_size, cells }
    }

    /// Indices of the points inside the rectangle, sorted.
    fn search(&self, points: &[Option<Point2d>], rect: &Rect) -> Vec<usize> {
        let (x_from, y_from) = cell_of(rect.x_min(), rect.y_min(), self.cell_size);
        let (x_to, y_to) = cell_of(rect.x_max(), rect.y_max(), self.cell_size);

        let mut found = vec![];
        for x in x_from..=x_to {
            for y in y_from..=y_to {
                let Some(cell) = self.cells.get(&(x, y)) else {
                    continue;
                };
                found.extend(cell.iter().copied().filter(|&index| {
                    points[index].is_some_and(|point| rect.contains(&point))
                }));
            }
        }

        found.sort_unstable();
        found
    }
}

fn cell_of(x: f64, y: f64, cell_size: f64) -> (i64, i64) {
    ((x / cell_size).floor() as i64, (y / cell_size).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ZOOM_0_RESOLUTION;
    use bikemap_types::geo::GeoPoint2d;
    use bikemap_types::latlon;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(GeoPoint2d);

    impl ClusterItem for Item {
        fn position(&self) -> GeoPoint2d {
            self.0
        }
    }

    /// Longitude offset that corresponds to `pixels` at the zoom level on the equator.
    fn lon_offset(pixels: f64, zoom: f64) -> f64 {
        let meters = pixels * ZOOM_0_RESOLUTION / 2f64.powf(zoom);
        meters / 6_378_137.0 * 180.0 / std::f64::consts::PI
    }

    fn algorithm(points: &[GeoPoint2d]) -> DistanceBasedAlgorithm<Item> {
        let mut algorithm = DistanceBasedAlgorithm::default();
        algorithm.add_items(points.iter().copied().map(Item).collect());
        algorithm
    }

    fn assert_each_item_once(clusters: &[Cluster<usize>], count: usize) {
        let mut seen = vec![0; count];
        for cluster in clusters {
            assert!(cluster.size() > 0);
            for &index in cluster.items() {
                seen[index] += 1;
            }
        }
        assert!(seen.iter().all(|&times| times == 1), "{seen:?}");
    }

    #[test]
    fn close_items_are_grouped() {
        let zoom = 10.0;
        let step = lon_offset(10.0, zoom);
        let algorithm = algorithm(&[
            latlon!(0.0, 0.0),
            latlon!(0.0, step),
            latlon!(0.0, 2.0 * step),
        ]);

        let clusters = algorithm.cluster_indices(zoom);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].items(), &[0, 1, 2]);
        assert_eq!(clusters[0].position(), latlon!(0.0, 0.0));
    }

    #[test]
    fn distant_items_are_alone() {
        let zoom = 10.0;
        let far = lon_offset(500.0, zoom);
        let algorithm = algorithm(&[latlon!(0.0, 0.0), latlon!(0.0, far)]);

        let clusters = algorithm.cluster_indices(zoom);
        assert_eq!(clusters.len(), 2);
        assert_each_item_once(&clusters, 2);
    }

    #[test]
    fn zooming_in_splits_clusters() {
        let step = lon_offset(10.0, 10.0);
        let algorithm = algorithm(&[latlon!(0.0, 0.0), latlon!(0.0, step)]);

        assert_eq!(algorithm.cluster_indices(10.0).len(), 1);
        assert_eq!(algorithm.cluster_indices(14.0).len(), 2);
        assert_eq!(algorithm.cluster_indices(10.7).len(), 1);
    }

    #[test]
    fn item_moves_to_closer_cluster() {
        let zoom = 10.0;
        let px = |p: f64| lon_offset(p, zoom);
        // Item 1 is within reach of both 0 and 2, but closer to 2.
        let algorithm = algorithm(&[
            latlon!(0.0, 0.0),
            latlon!(0.0, px(45.0)),
            latlon!(0.0, px(60.0)),
            latlon!(0.0, px(100.0)),
        ]);

        let clusters = algorithm.cluster_indices(zoom);
        assert_each_item_once(&clusters, 4);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].items(), &[0]);
        assert_eq!(clusters[1].items(), &[1, 2, 3]);
    }

    #[test]
    fn every_item_in_exactly_one_cluster() {
        let mut points = vec![];
        for i in 0..20 {
            for j in 0..20 {
                points.push(latlon!(37.70 + i as f64 * 0.005, -122.50 + j as f64 * 0.005));
            }
        }
        let algorithm = algorithm(&points);

        for zoom in [3.0, 8.0, 11.0, 12.5, 14.0, 16.0, 21.0] {
            assert_each_item_once(&algorithm.cluster_indices(zoom), points.len());
        }
    }

    #[test]
    fn invalid_distance_keeps_every_item() {
        let zoom = 12.0;
        let points = [
            latlon!(37.77, -122.42),
            latlon!(37.77, -122.42 + lon_offset(10.0, zoom)),
        ];

        for max_distance in [-10.0, f64::NAN, f64::NEG_INFINITY] {
            let mut algorithm = DistanceBasedAlgorithm::new(max_distance);
            assert_eq!(algorithm.max_distance(), 0.0);
            algorithm.add_items(points.iter().copied().map(Item).collect());

            let clusters = algorithm.cluster_indices(zoom);
            assert_eq!(clusters.len(), 2);
            assert_each_item_once(&clusters, points.len());
        }
    }

    #[test]
    fn zero_distance_groups_same_position() {
        let mut algorithm = DistanceBasedAlgorithm::new(0.0);
        algorithm.add_items(vec![Item(latlon!(1.0, 1.0)), Item(latlon!(1.0, 1.0))]);

        let clusters = algorithm.cluster_indices(10.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].items(), &[0, 1]);
    }

    #[test]
    fn remove_and_clear_items() {
        let mut algorithm = algorithm(&[latlon!(0.0, 0.0), latlon!(1.0, 1.0)]);
        assert!(algorithm.remove_item(&Item(latlon!(0.0, 0.0))));
        assert!(!algorithm.remove_item(&Item(latlon!(0.0, 0.0))));
        assert_eq!(algorithm.items(), &[Item(latlon!(1.0, 1.0))]);

        algorithm.clear_items();
        assert!(algorithm.cluster_indices(10.0).is_empty());
    }

    #[test]
    fn materialized_clusters_hold_items() {
        let algorithm = algorithm(&[latlon!(0.0, 0.0)]);
        assert_eq!(
            algorithm.clusters(5.0),
            vec![Cluster::new(latlon!(0.0, 0.0), vec![Item(latlon!(0.0, 0.0))])]
        );
    }
}
