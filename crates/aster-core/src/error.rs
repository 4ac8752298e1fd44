use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Engine-level error taxonomy.
///
/// Setup failures abort startup; per-frame failures abort the loop. Both
/// route through guaranteed cleanup before they reach the caller.
/// Resource-release failures are never surfaced here: teardown logs and
/// keeps going.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("initialization failed: {0}")]
    Init(#[source] BoxError),

    #[error("frame failed: {0}")]
    Frame(#[source] BoxError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("game loop thread failed to start: {0}")]
    Thread(#[from] std::io::Error),
}

impl EngineError {
    pub fn init(err: impl Into<BoxError>) -> Self {
        Self::Init(err.into())
    }

    pub fn frame(err: impl Into<BoxError>) -> Self {
        Self::Frame(err.into())
    }
}
