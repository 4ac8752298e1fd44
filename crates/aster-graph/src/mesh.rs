use std::sync::atomic::{AtomicBool, Ordering};

use bytemuck::{Pod, Zeroable};
use log::error;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device, IndexFormat, RenderPass};

use crate::error::GraphError;
use crate::material::Material;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Decoded geometry arrays as handed over by an asset loader or a
/// procedural generator. Plain CPU data; uploading it produces a [`GpuMesh`].
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub tex_coords: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// A fully empty mesh is valid: it uploads zero-size buffers and draws
    /// nothing. Cleared text rebuilds into one.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.positions.len() % 3 != 0 {
            return Err(GraphError::InvalidMesh(format!(
                "position array length {} is not a multiple of 3",
                self.positions.len()
            )));
        }
        let count = self.vertex_count();
        if self.tex_coords.len() != count * 2 {
            return Err(GraphError::InvalidMesh(format!(
                "expected {} texture coordinates, got {}",
                count * 2,
                self.tex_coords.len()
            )));
        }
        // Normals may be absent (e.g. screen-space text geometry).
        if !self.normals.is_empty() && self.normals.len() != count * 3 {
            return Err(GraphError::InvalidMesh(format!(
                "expected {} normal components, got {}",
                count * 3,
                self.normals.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(GraphError::InvalidMesh(
                "index list does not describe whole triangles".into(),
            ));
        }
        if let Some(&out_of_range) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(GraphError::InvalidMesh(format!(
                "index {out_of_range} out of range for {count} vertices"
            )));
        }
        Ok(())
    }

    /// Interleaves the arrays for upload. Missing normals become zero
    /// vectors.
    pub fn interleave(&self) -> Vec<Vertex> {
        let count = self.vertex_count();
        let mut vertices = Vec::with_capacity(count);
        for i in 0..count {
            let normal = if self.normals.is_empty() {
                [0.0; 3]
            } else {
                [
                    self.normals[i * 3],
                    self.normals[i * 3 + 1],
                    self.normals[i * 3 + 2],
                ]
            };
            vertices.push(Vertex {
                position: [
                    self.positions[i * 3],
                    self.positions[i * 3 + 1],
                    self.positions[i * 3 + 2],
                ],
                tex_coords: [self.tex_coords[i * 2], self.tex_coords[i * 2 + 1]],
                normal,
            });
        }
        vertices
    }
}

/// One drawable geometry buffer set plus its material.
///
/// Buffers are uploaded once at construction and immutable afterwards;
/// dynamic content (text) rebuilds the whole mesh. The constructing entity
/// owns the mesh exclusively and must release it exactly once.
pub struct GpuMesh {
    vbuf: Buffer,
    ibuf: Buffer,
    index_count: u32,
    material: Material,
    released: AtomicBool,
}

impl GpuMesh {
    pub fn new(device: &Device, data: &MeshData, material: Material) -> Result<Self, GraphError> {
        data.validate()?;

        let vertices = data.interleave();
        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            vbuf,
            ibuf,
            index_count: data.indices.len() as u32,
            material,
            released: AtomicBool::new(false),
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vbuf.slice(..));
        pass.set_index_buffer(self.ibuf.slice(..), IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Frees the geometry buffers but keeps the material's texture alive.
    /// Used when rebuilding text meshes that share a font atlas.
    pub fn release_buffers(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            error!("mesh buffers released twice, ignoring");
            return;
        }
        self.vbuf.destroy();
        self.ibuf.destroy();
    }

    /// Full release: geometry buffers and the owned material's texture.
    /// Idempotent by contract; a second call is logged and ignored.
    pub fn release(&self) {
        self.release_buffers();
        if let Some(texture) = self.material.texture() {
            texture.release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}
