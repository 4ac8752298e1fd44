pub mod depth;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod slots;

pub use error::RenderError;
pub use pipeline::{PassLayouts, Pipelines};
pub use renderer::{MeshUploader, Renderer};
