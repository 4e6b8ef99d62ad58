use crate::cartesian::CartesianPoint2d;
use num_traits::Num;
use serde::{Deserialize, Serialize};

/// Axis aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    x_min: N,
    y_min: N,
    x_max: N,
    y_max: N,
}

impl<N: Num + Copy + PartialOrd> Rect<N> {
    /// Rectangle of the given half size centered at the point.
    pub fn around(center: &impl CartesianPoint2d<Num = N>, half_size: N) -> Self {
        Self {
            x_min: center.x() - half_size,
            y_min: center.y() - half_size,
            x_max: center.x() + half_size,
            y_max: center.y() + half_size,
        }
    }

    #[allow(missing_docs)]
    pub fn x_min(&self) -> N {
        self.x_min
    }

    #[allow(missing_docs)]
    pub fn x_max(&self) -> N {
        self.x_max
    }

    #[allow(missing_docs)]
    pub fn y_min(&self) -> N {
        self.y_min
    }

    #[allow(missing_docs)]
    pub fn y_max(&self) -> N {
        self.y_max
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }
}
