use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("invalid mesh data: {0}")]
    InvalidMesh(String),

    #[error("invalid texture data: {0}")]
    InvalidTexture(String),
}
