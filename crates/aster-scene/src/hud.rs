use std::sync::Arc;

use aster_graph::{GpuMesh, GpuTexture};

use crate::item::GameItem;

/// Screen-space overlay contract. The renderer draws whatever items the
/// implementation exposes, in order, with an orthographic projection.
pub trait Hud {
    fn items(&self) -> Vec<&GameItem<GpuMesh>>;

    /// Releases every distinct mesh and texture once, regardless of how
    /// items share them.
    fn release(&self) {
        let mut released_meshes: Vec<*const GpuMesh> = Vec::new();
        let mut released_textures: Vec<*const GpuTexture> = Vec::new();
        for item in self.items() {
            let mesh = item.mesh();
            let key = Arc::as_ptr(mesh);
            if released_meshes.contains(&key) {
                continue;
            }
            released_meshes.push(key);
            mesh.release_buffers();
            if let Some(texture) = mesh.material().texture() {
                let tex_key = Arc::as_ptr(texture);
                if !released_textures.contains(&tex_key) {
                    released_textures.push(tex_key);
                    texture.release();
                }
            }
        }
    }
}
