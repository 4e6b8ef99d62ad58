use bikemap_types::cartesian::{Point2d, Size};
use bikemap_types::geo::{GeoBounds, GeoPoint2d, Projection, WebMercator};

/// Resolution (meters per pixel at the equator) of zoom level 0, where the world is 256 pixels
/// wide. Zoom level `z` shows the world as `256 * 2^z` pixels.
pub const ZOOM_0_RESOLUTION: f64 = 156543.03392800014;
/// Maximum zoom level a view can have.
pub const MAX_ZOOM: f64 = 21.0;

/// Visible area of the map: center position in Web Mercator meters, resolution in meters per pixel
/// and size of the map widget in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    position: Point2d,
    resolution: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            position: Point2d::origin(),
            resolution: ZOOM_0_RESOLUTION,
            size: Size::new(0.0, 0.0),
        }
    }
}

impl MapView {
    /// Creates a view centered at the point with the given zoom level.
    ///
    /// Returns `None` if the point cannot be projected.
    pub fn new(center: &GeoPoint2d, zoom: f64) -> Option<Self> {
        Some(Self {
            position: projection().project(center)?,
            resolution: resolution_at(zoom),
            ..Default::default()
        })
    }

    /// Center of the view in projected coordinates.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// Center of the view.
    pub fn center(&self) -> Option<GeoPoint2d> {
        projection().unproject(&self.position)
    }

    /// Meters per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Zoom level of the view. Fractional zoom levels are allowed.
    pub fn zoom(&self) -> f64 {
        (ZOOM_0_RESOLUTION / self.resolution).log2()
    }

    /// Size of the map widget in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Copy of the view with the given widget size.
    pub fn with_size(&self, new_size: Size) -> Self {
        Self {
            size: new_size,
            ..*self
        }
    }

    /// Copy of the view with the given zoom level.
    pub fn with_zoom(&self, zoom: f64) -> Self {
        Self {
            resolution: resolution_at(zoom),
            ..*self
        }
    }

    /// Copy of the view centered at the point.
    pub fn with_center(&self, center: &GeoPoint2d) -> Option<Self> {
        Some(Self {
            position: projection().project(center)?,
            ..*self
        })
    }

    /// View that shows the whole `bounds` with `padding` pixels of free space on every side, at the
    /// largest zoom level that fits.
    ///
    /// If the widget is smaller than the padding, the padding is ignored. A widget of zero size
    /// keeps the current zoom and only moves the center.
    pub fn fit_bounds(&self, bounds: &GeoBounds, padding: f64) -> Option<Self> {
        let proj = projection();
        let sw: Point2d = proj.project(&bounds.south_west())?;
        let ne: Point2d = proj.project(&bounds.north_east())?;

        let world_width = 2.0 * proj.half_world();
        let mut width = ne.x - sw.x;
        if bounds.crosses_antimeridian() {
            width += world_width;
        }
        let height = ne.y - sw.y;

        let mut center_x = sw.x + width / 2.0;
        if center_x > proj.half_world() {
            center_x -= world_width;
        }
        let position = Point2d::new(center_x, sw.y + height / 2.0);

        if self.size.is_zero() {
            log::warn!("Fitting bounds into a map of zero size, zoom is not changed");
            return Some(Self { position, ..*self });
        }

        let mut available = self.size.inset(padding);
        if available.is_zero() {
            log::warn!("Map is too small for {padding}px padding, ignoring padding");
            available = self.size;
        }

        let resolution = (width / available.width())
            .max(height / available.height())
            .clamp(resolution_at(MAX_ZOOM), ZOOM_0_RESOLUTION);

        Some(Self {
            position,
            resolution,
            ..*self
        })
    }

    /// Projects the point to the screen pixel coordinates, from the top-left corner of the widget.
    pub fn map_to_screen(&self, point: &GeoPoint2d) -> Option<Point2d> {
        let projected: Point2d = projection().project(point)?;
        Some(Point2d::new(
            (projected.x - self.position.x) / self.resolution + self.size.half_width(),
            self.size.half_height() - (projected.y - self.position.y) / self.resolution,
        ))
    }

    /// Projected coordinates of the screen pixel.
    pub fn screen_to_map(&self, px_position: Point2d) -> Point2d {
        Point2d::new(
            self.position.x + (px_position.x - self.size.half_width()) * self.resolution,
            self.position.y + (self.size.half_height() - px_position.y) * self.resolution,
        )
    }

    /// Geographic coordinates of the screen pixel.
    pub fn screen_to_geo(&self, px_position: Point2d) -> Option<GeoPoint2d> {
        projection().unproject(&self.screen_to_map(px_position))
    }

    /// Geographic bounds of the visible area.
    pub fn visible_bounds(&self) -> Option<GeoBounds> {
        let south_west = self.screen_to_geo(Point2d::new(0.0, self.size.height()))?;
        let north_east = self.screen_to_geo(Point2d::new(self.size.width(), 0.0))?;
        Some(GeoBounds::new(south_west, north_east))
    }

    /// Moves the view so that the map point under `from` ends up under `to`.
    pub fn translate_by_pixels(&self, from: Point2d, to: Point2d) -> Self {
        let delta = to - from;
        Self {
            position: Point2d::new(
                self.position.x - delta.x * self.resolution,
                self.position.y + delta.y * self.resolution,
            ),
            ..*self
        }
    }

    /// Changes zoom by `delta` levels keeping the map point under `base_point` in place.
    pub fn zoom_by(&self, delta: f64, base_point: Point2d) -> Self {
        let base = self.screen_to_map(base_point);
        let resolution = resolution_at(self.zoom() + delta);
        let k = resolution / self.resolution;
        Self {
            position: Point2d::new(
                base.x + (self.position.x - base.x) * k,
                base.y + (self.position.y - base.y) * k,
            ),
            resolution,
            ..*self
        }
    }

    pub(crate) fn interpolate(&self, target: &MapView, k: f64) -> Self {
        Self {
            position: self.position + (target.position - self.position) * k,
            resolution: self.resolution + (target.resolution - self.resolution) * k,
            ..*self
        }
    }
}

/// Resolution of the given zoom level, clamped to `[0, MAX_ZOOM]`.
pub fn resolution_at(zoom: f64) -> f64 {
    ZOOM_0_RESOLUTION / 2f64.powf(zoom.clamp(0.0, MAX_ZOOM))
}

/// Position of the point on the whole-world pixel canvas of the given zoom level. The origin is the
/// north-west corner of the world.
pub fn world_pixel(point: &GeoPoint2d, zoom: f64) -> Option<Point2d> {
    let proj = projection();
    let projected: Point2d = proj.project(point)?;
    let resolution = ZOOM_0_RESOLUTION / 2f64.powf(zoom);
    Some(Point2d::new(
        (projected.x + proj.half_world()) / resolution,
        (proj.half_world() - projected.y) / resolution,
    ))
}

fn projection() -> WebMercator<GeoPoint2d, Point2d> {
    WebMercator::default()
}
