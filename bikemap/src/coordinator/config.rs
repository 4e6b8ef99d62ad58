use serde::{Deserialize, Serialize};

use crate::cluster::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_CLUSTER_SIZE};
use crate::color::Color;

/// How places are put on the map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMode {
    /// One marker per place, tapping shows the info window.
    Plain,
    /// Clustered markers, tapping a place shows the info window.
    SimpleClustering,
    /// Clustered markers, tapping a place highlights the area around it.
    #[default]
    InteractiveClustering,
}

impl MarkerMode {
    /// Whether places are grouped into clusters.
    pub fn is_clustered(&self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// Parameters of the clustering algorithm and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    max_distance: f64,
    min_cluster_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

impl ClusterConfig {
    /// Distance in pixels within which places are grouped.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Sets distance in pixels within which places are grouped.
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Minimal number of places drawn as one aggregate marker.
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Sets minimal number of places drawn as one aggregate marker.
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }
}

/// Configuration of a [`MapCoordinator`](super::MapCoordinator).
///
/// Can be loaded from JSON; missing fields take default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    mode: MarkerMode,
    frame_padding: f64,
    moving_alpha: f32,
    highlight_radius: f64,
    highlight_fill: Color,
    highlight_stroke: Color,
    marker_tint: Color,
    info_window_on_item_tap: bool,
    cluster: ClusterConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mode: MarkerMode::default(),
            frame_padding: 20.0,
            moving_alpha: 0.3,
            highlight_radius: 1000.0,
            highlight_fill: Color::TEAL_200,
            highlight_stroke: Color::TEAL_700,
            marker_tint: Color::TEAL_700,
            info_window_on_item_tap: false,
            cluster: ClusterConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    /// How places are put on the map.
    pub fn mode(&self) -> MarkerMode {
        self.mode
    }

    /// Sets how places are put on the map.
    pub fn with_mode(mut self, mode: MarkerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets how places are put on the map. Takes effect on the next map load.
    pub fn set_mode(&mut self, mode: MarkerMode) {
        self.mode = mode;
    }

    /// Padding in pixels between the places and the map edge when the camera frames them.
    pub fn frame_padding(&self) -> f64 {
        self.frame_padding
    }

    /// Sets padding in pixels between the places and the map edge when the camera frames them.
    pub fn with_frame_padding(mut self, padding: f64) -> Self {
        self.frame_padding = padding;
        self
    }

    /// Opacity of markers while the camera moves. They are always opaque once it stops.
    pub fn moving_alpha(&self) -> f32 {
        self.moving_alpha
    }

    /// Sets opacity of markers while the camera moves.
    pub fn with_moving_alpha(mut self, alpha: f32) -> Self {
        self.moving_alpha = alpha;
        self
    }

    /// Radius in meters of the circle drawn around a tapped place.
    pub fn highlight_radius(&self) -> f64 {
        self.highlight_radius
    }

    /// Sets radius in meters of the circle drawn around a tapped place.
    pub fn with_highlight_radius(mut self, radius: f64) -> Self {
        self.highlight_radius = radius;
        self
    }

    /// Fill color of the highlight circle.
    pub fn highlight_fill(&self) -> Color {
        self.highlight_fill
    }

    /// Stroke color of the highlight circle.
    pub fn highlight_stroke(&self) -> Color {
        self.highlight_stroke
    }

    /// Sets fill and stroke colors of the highlight circle.
    pub fn with_highlight_colors(mut self, fill: Color, stroke: Color) -> Self {
        self.highlight_fill = fill;
        self.highlight_stroke = stroke;
        self
    }

    /// Tint of the bicycle icon.
    pub fn marker_tint(&self) -> Color {
        self.marker_tint
    }

    /// Sets tint of the bicycle icon.
    pub fn with_marker_tint(mut self, tint: Color) -> Self {
        self.marker_tint = tint;
        self
    }

    /// Whether tapping a place in interactive clustering mode also opens its info window.
    pub fn info_window_on_item_tap(&self) -> bool {
        self.info_window_on_item_tap
    }

    /// Sets whether tapping a place in interactive clustering mode also opens its info window.
    pub fn with_info_window_on_item_tap(mut self, show: bool) -> Self {
        self.info_window_on_item_tap = show;
        self
    }

    /// Sets whether tapping a place in interactive clustering mode also opens its info window.
    pub fn set_info_window_on_item_tap(&mut self, show: bool) {
        self.info_window_on_item_tap = show;
    }

    /// Clustering parameters.
    pub fn cluster(&self) -> ClusterConfig {
        self.cluster
    }

    /// Sets clustering parameters.
    pub fn with_cluster(mut self, cluster: ClusterConfig) -> Self {
        self.cluster = cluster;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.mode(), MarkerMode::InteractiveClustering);
        assert_eq!(config.frame_padding(), 20.0);
        assert_eq!(config.moving_alpha(), 0.3);
        assert_eq!(config.highlight_radius(), 1000.0);
        assert_eq!(config.highlight_fill(), Color::TEAL_200);
        assert_eq!(config.highlight_stroke(), Color::TEAL_700);
        assert!(!config.info_window_on_item_tap());
        assert_eq!(config.cluster().min_cluster_size(), 4);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config: CoordinatorConfig = serde_json::from_str(
            r##"{"mode": "plain", "highlight_fill": "#FF000080", "cluster": {"max_distance": 60}}"##,
        )
        .unwrap();

        assert_eq!(config.mode(), MarkerMode::Plain);
        assert_eq!(config.highlight_fill(), Color::rgba(255, 0, 0, 128));
        assert_eq!(config.highlight_stroke(), Color::TEAL_700);
        assert_eq!(config.cluster().max_distance(), 60.0);
        assert_eq!(config.cluster().min_cluster_size(), 4);
        assert_eq!(config.moving_alpha(), 0.3);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<CoordinatorConfig>(r#"{"mode": "heatmap"}"#).is_err());
    }
}
