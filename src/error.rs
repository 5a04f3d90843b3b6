use thiserror::Error;

/// Integration bugs. Rejected gameplay actions never surface here; the
/// reducer hands back the unchanged state for those instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game setup requires 1-6 players, got {count}")]
    InvalidPlayerCount { count: usize },
    #[error("win target must be positive, got {target}")]
    InvalidWinTarget { target: u32 },
    #[error("roller returned {returned} dice for requested {requested}")]
    RollerContract { requested: usize, returned: usize },
    #[error("die {index} shows {face}, expected a face in 1-6")]
    InvalidFace { index: usize, face: u8 },
    #[error("saved state could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}
