use std::error;
use std::fmt;
use crate::coord::{Dimension2D, Shape2D};

#[derive(Debug, Clone, PartialEq)]

/**
 * Error to represent a violated construction precondition, or a failure of
 * the message-passing layer. None of these are recoverable: callers are
 * expected to report them and terminate the process.
 */
pub enum Error {
    DistributionMismatch { extents: Shape2D, size: usize },
    IndivisibleShape { dimension: Dimension2D, global: usize, distributed: usize },
    Communication(String),
    InvalidConfiguration(String),
    Output(String),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            DistributionMismatch { extents, size } => write!(
                fmt,
                "process grid {}x{} does not match communicator size {}",
                extents.y(),
                extents.x(),
                size),
            IndivisibleShape { dimension, global, distributed } => write!(
                fmt,
                "distribution shape does not divide global shape in dimension {:?}: {} is not a multiple of {}",
                dimension,
                global,
                distributed),
            Communication(msg) => write!(fmt, "communication failure: {}", msg),
            InvalidConfiguration(msg) => write!(fmt, "invalid configuration: {}", msg),
            Output(msg) => write!(fmt, "output failure: {}", msg),
        }
    }
}

impl error::Error for Error {}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Error;
    use crate::coord::{Dimension2D, Shape2D};

    #[test]
    fn diagnostics_name_the_failed_precondition() {
        let e = Error::IndivisibleShape { dimension: Dimension2D::X, global: 10, distributed: 3 };
        assert!(e.to_string().contains("distribution shape does not divide global shape"));

        let e = Error::DistributionMismatch { extents: Shape2D::new(2, 3), size: 4 };
        assert_eq!(e.to_string(), "process grid 2x3 does not match communicator size 4");
    }
}
