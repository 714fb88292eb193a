use thiserror::Error;

/// Library error type for flash-advisor operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A distance was zero, negative, or non-finite.
    #[error("invalid distance {0} m: must be positive and finite")]
    InvalidDistance(f64),

    /// An f-number was zero, negative, or non-finite.
    #[error("invalid aperture f/{0}: must be positive and finite")]
    InvalidAperture(f64),

    /// A guide number was zero, negative, or non-finite.
    #[error("invalid guide number {0}: must be positive and finite")]
    InvalidGuideNumber(f64),

    /// ISO must be positive.
    #[error("invalid ISO {0}: must be positive")]
    InvalidIso(u32),

    /// The configuration offers no f-numbers to quantize against.
    #[error("no available apertures configured")]
    NoApertures,

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
