#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} accepts at most {max} entries, got {got}")]
    TooMany {
        field: &'static str,
        max: usize,
        got: usize,
    },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("color #{index} channel value {value} is outside 0..=255")]
    ChannelOutOfRange { index: usize, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("arc {order}: invalid color {value:?}")]
    InvalidColor { order: i64, value: String },
    #[error("arc {order}: coordinates must be finite")]
    NonFiniteCoordinate { order: i64 },
}

impl From<serde_json::Error> for GlobeError {
    fn from(err: serde_json::Error) -> Self {
        GlobeError::Config(ConfigError::Json(err))
    }
}
