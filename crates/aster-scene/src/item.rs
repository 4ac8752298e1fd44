use std::sync::Arc;

use glam::Vec3;

/// A placed instance of a mesh: shared geometry handle plus this instance's
/// position, rotation (degrees) and uniform scale. Generic over the mesh
/// handle so scene logic runs without a GPU.
#[derive(Debug)]
pub struct GameItem<M> {
    mesh: Arc<M>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl<M> GameItem<M> {
    pub fn new(mesh: Arc<M>) -> Self {
        Self {
            mesh,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn mesh(&self) -> &Arc<M> {
        &self.mesh
    }

    /// Swaps the geometry handle in place, keeping the placement. Used when
    /// text meshes are rebuilt.
    pub fn set_mesh(&mut self, mesh: Arc<M>) -> Arc<M> {
        std::mem::replace(&mut self.mesh, mesh)
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

impl<M> Clone for GameItem<M> {
    fn clone(&self) -> Self {
        Self {
            mesh: Arc::clone(&self.mesh),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}
