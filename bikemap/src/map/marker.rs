use bikemap_types::geo::{GeoPoint, GeoPoint2d};
use bikemap_types::geo::Datum;

use crate::color::Color;

/// Identifier of a marker on a map surface. Identifiers are never reused by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Identifier of a circle on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircleId(pub u64);

/// Image drawn for a marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MarkerIcon {
    /// Platform default pin.
    #[default]
    Default,
    /// Named vector drawable rendered with the given tint.
    Tinted {
        /// Name of the drawable resource.
        drawable: &'static str,
        /// Tint color.
        color: Color,
    },
    /// Aggregate marker of a cluster showing a count label.
    Cluster {
        /// Text drawn over the cluster icon, e.g. `"10+"`.
        label: String,
    },
}

impl MarkerIcon {
    /// Name of the bicycle drawable used for place markers.
    pub const BICYCLE_DRAWABLE: &'static str = "ic_directions_bike_black_24dp";

    /// Bicycle icon tinted with the color.
    pub fn bicycle(color: Color) -> Self {
        Self::Tinted {
            drawable: Self::BICYCLE_DRAWABLE,
            color,
        }
    }
}

/// Parameters of a new marker.
///
/// `T` is the type of the tag attached to the marker, which lets the application find its own
/// object when the marker is tapped.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions<T> {
    /// Position of the marker anchor.
    pub position: GeoPoint2d,
    /// Title shown in the default info window.
    pub title: Option<String>,
    /// Second line of the default info window.
    pub snippet: Option<String>,
    /// Marker image.
    pub icon: MarkerIcon,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Application object attached to the marker.
    pub tag: Option<T>,
}

impl<T> MarkerOptions<T> {
    /// Opaque marker with the default icon, no title and no tag.
    pub fn new(position: GeoPoint2d) -> Self {
        Self {
            position,
            title: None,
            snippet: None,
            icon: MarkerIcon::Default,
            alpha: 1.0,
            tag: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Sets the icon.
    pub fn with_icon(mut self, icon: MarkerIcon) -> Self {
        self.icon = icon;
        self
    }

    /// Attaches the tag.
    pub fn with_tag(mut self, tag: T) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Marker on a map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<T> {
    id: MarkerId,
    options: MarkerOptions<T>,
}

impl<T> Marker<T> {
    /// Creates a marker. Surfaces call this when a marker is added.
    pub fn new(id: MarkerId, options: MarkerOptions<T>) -> Self {
        Self {
            id,
            options: MarkerOptions {
                alpha: options.alpha.clamp(0.0, 1.0),
                ..options
            },
        }
    }

    /// Id of the marker.
    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Position of the marker.
    pub fn position(&self) -> GeoPoint2d {
        self.options.position
    }

    /// Title of the marker.
    pub fn title(&self) -> Option<&str> {
        self.options.title.as_deref()
    }

    /// Snippet of the marker.
    pub fn snippet(&self) -> Option<&str> {
        self.options.snippet.as_deref()
    }

    /// Marker image.
    pub fn icon(&self) -> &MarkerIcon {
        &self.options.icon
    }

    /// Opacity of the marker.
    pub fn alpha(&self) -> f32 {
        self.options.alpha
    }

    /// Sets opacity of the marker. The value is clamped into `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.options.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Application object attached to the marker, if any.
    pub fn tag(&self) -> Option<&T> {
        self.options.tag.as_ref()
    }
}

/// Parameters of a circle drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleOptions {
    /// Center of the circle.
    pub center: GeoPoint2d,
    /// Radius in meters.
    pub radius: f64,
    /// Fill color.
    pub fill_color: Color,
    /// Outline color.
    pub stroke_color: Color,
}

impl CircleOptions {
    /// Returns true if the point is inside the circle.
    pub fn contains(&self, point: &GeoPoint2d) -> bool {
        self.center.distance(point, &Datum::WGS84) <= self.radius
    }
}
