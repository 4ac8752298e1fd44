use std::sync::Arc;

use glam::Vec4;
use wgpu::{BindGroup, BindGroupLayout, Device};

use crate::texture::GpuTexture;

pub const DEFAULT_COLOUR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

/// Surface appearance parameters. Plain data, shared by every item drawing
/// with the same look.
#[derive(Debug, Clone, Copy)]
pub struct MaterialDesc {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub reflectance: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            ambient: DEFAULT_COLOUR,
            diffuse: DEFAULT_COLOUR,
            specular: DEFAULT_COLOUR,
            reflectance: 0.0,
        }
    }
}

impl MaterialDesc {
    pub fn coloured(colour: Vec4, reflectance: f32) -> Self {
        Self {
            ambient: colour,
            diffuse: colour,
            specular: colour,
            reflectance,
        }
    }
}

/// A material plus its texture binding. The bind group is resolved once at
/// construction (untextured materials bind a shared white texel) and reused
/// for every draw.
pub struct Material {
    desc: MaterialDesc,
    texture: Option<Arc<GpuTexture>>,
    bind_group: BindGroup,
}

impl Material {
    pub fn new(
        device: &Device,
        texture_layout: &BindGroupLayout,
        desc: MaterialDesc,
        texture: Option<Arc<GpuTexture>>,
        fallback: &GpuTexture,
    ) -> Self {
        let bound = texture.as_deref().unwrap_or(fallback);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_texture_bind_group"),
            layout: texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(bound.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(bound.sampler()),
                },
            ],
        });
        Self {
            desc,
            texture,
            bind_group,
        }
    }

    pub fn desc(&self) -> &MaterialDesc {
        &self.desc
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    pub fn texture(&self) -> Option<&Arc<GpuTexture>> {
        self.texture.as_ref()
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_is_opaque_white() {
        let desc = MaterialDesc::default();
        assert_eq!(desc.ambient, DEFAULT_COLOUR);
        assert_eq!(desc.diffuse, DEFAULT_COLOUR);
        assert_eq!(desc.specular, DEFAULT_COLOUR);
        assert_eq!(desc.reflectance, 0.0);
    }

    #[test]
    fn coloured_material_copies_colour_to_all_channels() {
        let colour = Vec4::new(0.5, 0.5, 0.6, 1.0);
        let desc = MaterialDesc::coloured(colour, 1.0);
        assert_eq!(desc.ambient, colour);
        assert_eq!(desc.specular, colour);
        assert_eq!(desc.reflectance, 1.0);
    }
}
