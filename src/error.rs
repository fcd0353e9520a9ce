use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantizeError {
    #[error("pixel sequence is empty")]
    EmptyInput,

    #[error("{channel} component {value} is outside 0..=255")]
    ComponentOutOfRange { channel: &'static str, value: i32 },

    #[error("cluster count must be between 1 and 5, got {0}")]
    InvalidClusterCount(usize),

    #[error("max_iterations must be at least 1")]
    InvalidMaxIterations,

    #[error("cluster {0} has no entry in the color table")]
    UnknownCluster(usize),

    #[error("expected {expected} pixels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("unable to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    #[error("PNG encode error: {0}")]
    ImageEncode(#[source] image::ImageError),
}
