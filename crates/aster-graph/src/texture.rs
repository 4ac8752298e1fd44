use std::sync::atomic::{AtomicBool, Ordering};

use log::error;
use wgpu::{Device, Queue, Sampler, TextureView};

use crate::error::GraphError;

/// A GPU-resident RGBA8 texture built from already-decoded pixels.
/// File format decoding happens outside the engine.
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: TextureView,
    sampler: Sampler,
    released: AtomicBool,
}

impl GpuTexture {
    pub fn from_pixels(
        device: &Device,
        queue: &Queue,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self, GraphError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(GraphError::InvalidTexture(format!(
                "expected {expected} bytes for {width}x{height} rgba, got {}",
                rgba.len()
            )));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("engine_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("engine_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
            released: AtomicBool::new(false),
        })
    }

    /// Single opaque white texel; bound in place of a real texture for
    /// untextured materials.
    pub fn white_pixel(device: &Device, queue: &Queue) -> Self {
        Self::from_pixels(device, queue, 1, 1, &[0xff, 0xff, 0xff, 0xff])
            .expect("1x1 white pixel is always valid")
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Explicit release of the GPU allocation. Idempotent by contract.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            error!("texture released twice, ignoring");
            return;
        }
        self.texture.destroy();
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}
