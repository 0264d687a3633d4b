use thiserror::Error;

/// Fatal evaluation errors. These indicate authored data inconsistent with
/// the format's own invariants; there is no sensible value to recover to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("path keyframe endpoints have different segment counts ({start} vs {end})")]
    PathSegmentMismatch { start: usize, end: usize },
    #[error("gradient keyframe endpoints have different stop counts ({start} vs {end})")]
    GradientStopMismatch { start: usize, end: usize },
    #[error("keyframe closing at frame {0} has no end value")]
    MissingEndValue(f64),
}
