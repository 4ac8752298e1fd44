use wgpu::{BindGroupLayout, Device, RenderPipeline, TextureFormat};

use aster_graph::Vertex;

use crate::depth::DEPTH_FORMAT;
use crate::error::RenderError;

const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");
const SKYBOX_SHADER: &str = include_str!("shaders/skybox.wgsl");
const HUD_SHADER: &str = include_str!("shaders/hud.wgsl");

/// The two bind group layouts every pass is assembled from: a single
/// uniform buffer, and a texture/sampler pair.
pub struct PassLayouts {
    pub uniform: BindGroupLayout,
    pub texture: BindGroupLayout,
}

pub fn create_bind_group_layouts(device: &Device) -> PassLayouts {
    let uniform = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("texture_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });
    PassLayouts { uniform, texture }
}

/// One pipeline per pass, all sharing the frame's depth attachment:
/// the scene tests and writes depth, the skybox tests at equal-or-less
/// without writing so it fills only the far background, and the HUD
/// draws on top unconditionally.
pub struct Pipelines {
    pub scene: RenderPipeline,
    pub skybox: RenderPipeline,
    pub hud: RenderPipeline,
}

/// Builds all three pipelines inside a validation error scope so a broken
/// shader surfaces as a startup error instead of a per-frame panic.
pub fn create_pipelines(
    device: &Device,
    format: TextureFormat,
    layouts: &PassLayouts,
    wireframe: bool,
) -> Result<Pipelines, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let scene = build_pipeline(
        device,
        "scene_pipeline",
        SCENE_SHADER,
        format,
        &[
            &layouts.uniform,
            &layouts.uniform,
            &layouts.uniform,
            &layouts.texture,
        ],
        wgpu::CompareFunction::Less,
        true,
        wireframe,
        None,
    );
    let skybox = build_pipeline(
        device,
        "skybox_pipeline",
        SKYBOX_SHADER,
        format,
        &[&layouts.uniform, &layouts.texture],
        wgpu::CompareFunction::LessEqual,
        false,
        false,
        None,
    );
    let hud = build_pipeline(
        device,
        "hud_pipeline",
        HUD_SHADER,
        format,
        &[&layouts.uniform, &layouts.texture],
        wgpu::CompareFunction::Always,
        false,
        false,
        Some(wgpu::BlendState::ALPHA_BLENDING),
    );

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::Shader(error.to_string()));
    }
    Ok(Pipelines { scene, skybox, hud })
}

#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    device: &Device,
    label: &str,
    shader_source: &str,
    format: TextureFormat,
    bind_group_layouts: &[&BindGroupLayout],
    depth_compare: wgpu::CompareFunction,
    depth_write: bool,
    wireframe: bool,
    blend: Option<wgpu::BlendState>,
) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            // Requires Features::POLYGON_MODE_LINE on the device.
            polygon_mode: if wireframe {
                wgpu::PolygonMode::Line
            } else {
                wgpu::PolygonMode::Fill
            },
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
