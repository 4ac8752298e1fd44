pub mod camera;
pub mod error;
pub mod lights;
pub mod material;
pub mod mesh;
pub mod texture;
pub mod transform;
pub mod uniforms;

pub use camera::Camera;
pub use error::GraphError;
pub use lights::{Attenuation, DirectionalLight, PointLight, SpotLight};
pub use material::{Material, MaterialDesc};
pub use mesh::{GpuMesh, MeshData, Vertex};
pub use texture::GpuTexture;
pub use transform::Transformation;
