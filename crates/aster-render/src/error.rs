use thiserror::Error;

use aster_graph::GraphError;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Pipeline or shader validation failed. Raised at startup, before the
    /// first frame; there is no recovery beyond fixing the shader.
    #[error("shader validation failed: {0}")]
    Shader(String),

    /// Configuration asks for more than the compiled shaders can hold.
    #[error("configuration exceeds renderer capacity: {0}")]
    Config(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
