use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("too many {kind} lights: {count} exceeds the limit of {max}")]
    TooManyLights {
        kind: &'static str,
        count: usize,
        max: usize,
    },
}
