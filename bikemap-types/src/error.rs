//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum BikemapTypesError {
    /// A geometry cannot be built from an empty point set.
    #[error("cannot build {0} from zero points")]
    Empty(&'static str),
}
