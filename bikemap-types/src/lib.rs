//! Geometry primitives for `bikemap`: geographic points and bounds, the Web Mercator projection
//! and the cartesian types used for screen and world pixel math.

pub mod cartesian;
mod error;
pub mod geo;

pub use error::BikemapTypesError;
