use std::sync::Arc;

use wgpu::{BindGroup, Buffer, CommandEncoder, Device, Queue, Texture, TextureFormat, TextureView};

use aster_core::config::EngineConfig;
use aster_core::window::EngineWindow;
use aster_graph::uniforms::{
    FrameUniforms, HudUniforms, MaterialUniforms, ModelUniforms, SkyboxUniforms,
};
use aster_graph::{Camera, GpuMesh, GpuTexture, Material, MaterialDesc, Transformation};
use aster_scene::{Hud, Scene};

use crate::depth::create_depth;
use crate::error::RenderError;
use crate::pipeline::{PassLayouts, Pipelines, create_bind_group_layouts, create_pipelines};
use crate::slots::SlotPool;

const SPECULAR_POWER: f32 = 10.0;

/// Draws a scene, its skybox and an optional HUD into one render pass per
/// frame. Owns every GPU object with frame lifetime: depth buffer, uniform
/// buffers and the per-draw slot pools.
pub struct Renderer {
    device: Device,
    queue: Queue,
    layouts: PassLayouts,
    pipelines: Pipelines,
    depth_view: TextureView,
    depth_tex: Texture,
    transformation: Transformation,
    frame_buf: Buffer,
    frame_bg: BindGroup,
    skybox_buf: Buffer,
    skybox_bg: BindGroup,
    model_slots: SlotPool,
    material_slots: SlotPool,
    hud_slots: SlotPool,
    white: Arc<GpuTexture>,
    fov_radians: f32,
    z_near: f32,
    z_far: f32,
}

impl Renderer {
    pub fn new(
        device: Device,
        queue: Queue,
        format: TextureFormat,
        config: &EngineConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        use aster_graph::uniforms::{MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS};
        if config.max_point_lights > MAX_POINT_LIGHTS || config.max_spot_lights > MAX_SPOT_LIGHTS {
            return Err(RenderError::Config(format!(
                "light limits {}+{} exceed shader capacity {MAX_POINT_LIGHTS}+{MAX_SPOT_LIGHTS}",
                config.max_point_lights, config.max_spot_lights
            )));
        }

        let layouts = create_bind_group_layouts(&device);
        let pipelines = create_pipelines(&device, format, &layouts, config.wireframe)?;
        let (depth_view, depth_tex) = create_depth(&device, width, height);

        let (frame_buf, frame_bg) = create_uniform(
            &device,
            &layouts,
            "frame_uniforms",
            std::mem::size_of::<FrameUniforms>() as u64,
        );
        let (skybox_buf, skybox_bg) = create_uniform(
            &device,
            &layouts,
            "skybox_uniforms",
            std::mem::size_of::<SkyboxUniforms>() as u64,
        );

        let white = Arc::new(GpuTexture::white_pixel(&device, &queue));

        Ok(Self {
            layouts,
            pipelines,
            depth_view,
            depth_tex,
            transformation: Transformation::new(),
            frame_buf,
            frame_bg,
            skybox_buf,
            skybox_bg,
            model_slots: SlotPool::new(
                "model_uniforms",
                std::mem::size_of::<ModelUniforms>() as u64,
            ),
            material_slots: SlotPool::new(
                "material_uniforms",
                std::mem::size_of::<MaterialUniforms>() as u64,
            ),
            hud_slots: SlotPool::new("hud_uniforms", std::mem::size_of::<HudUniforms>() as u64),
            white,
            fov_radians: config.fov_radians(),
            z_near: config.z_near,
            z_far: config.z_far,
            device,
            queue,
        })
    }

    /// Uploads decoded RGBA pixels as a texture on this renderer's device.
    pub fn create_texture(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<GpuTexture, RenderError> {
        Ok(GpuTexture::from_pixels(
            &self.device,
            &self.queue,
            width,
            height,
            rgba,
        )?)
    }

    /// Builds a material against this renderer's texture layout. Untextured
    /// materials bind the shared white texel.
    pub fn create_material(&self, desc: MaterialDesc, texture: Option<Arc<GpuTexture>>) -> Material {
        Material::new(&self.device, &self.layouts.texture, desc, texture, &self.white)
    }

    pub fn upload_mesh(
        &self,
        data: &aster_graph::MeshData,
        material: Material,
    ) -> Result<GpuMesh, RenderError> {
        Ok(GpuMesh::new(&self.device, data, material)?)
    }

    /// Owned handles for uploading meshes away from the renderer borrow, for
    /// example inside a text rebuild closure.
    pub fn uploader(&self) -> MeshUploader {
        MeshUploader {
            device: self.device.clone(),
            texture_layout: self.layouts.texture.clone(),
            white: Arc::clone(&self.white),
        }
    }

    /// Records the whole frame into `encoder`: scene items grouped by mesh,
    /// then the skybox behind everything already drawn, then the HUD on top.
    pub fn render<W: EngineWindow>(
        &mut self,
        window: &mut W,
        target: &TextureView,
        encoder: &mut CommandEncoder,
        camera: &Camera,
        scene: &Scene<GpuMesh>,
        hud: Option<&dyn Hud>,
    ) {
        if window.is_resized() {
            log::debug!(
                "surface resized to {}x{}, rebuilding depth buffer",
                window.width(),
                window.height()
            );
            let (view, tex) = create_depth(&self.device, window.width(), window.height());
            self.depth_tex.destroy();
            self.depth_view = view;
            self.depth_tex = tex;
            window.set_resized(false);
        }

        let width = window.width() as f32;
        let height = window.height() as f32;
        let projection = self.transformation.update_projection(
            self.fov_radians,
            width,
            height,
            self.z_near,
            self.z_far,
        );
        let view = self.transformation.update_view(camera);

        // Lights are re-expressed in view space on transient copies; the
        // scene's world-space state is never written.
        let light = scene.light();
        let mut frame = FrameUniforms::new(projection, view);
        frame.ambient = light.ambient.extend(1.0).to_array();
        frame.specular_power = SPECULAR_POWER;
        let point_lights: Vec<_> = light
            .point_lights
            .iter()
            .map(|l| l.to_view_space(view))
            .collect();
        frame.set_point_lights(&point_lights);
        let spot_lights: Vec<_> = light
            .spot_lights
            .iter()
            .map(|l| l.to_view_space(view))
            .collect();
        frame.set_spot_lights(&spot_lights);
        if let Some(sun) = &light.directional {
            frame.directional = (&sun.to_view_space(view)).into();
        }
        self.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&frame));

        self.model_slots.begin_frame();
        self.material_slots.begin_frame();
        self.hud_slots.begin_frame();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("frame_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipelines.scene);
        pass.set_bind_group(0, &self.frame_bg, &[]);
        for group in scene.groups() {
            let mesh = group.mesh();
            let material = mesh.material();
            let slot = self.material_slots.next(&self.device, &self.layouts.uniform);
            self.queue.write_buffer(
                &slot.buffer,
                0,
                bytemuck::bytes_of(&MaterialUniforms::from(material)),
            );
            pass.set_bind_group(2, &slot.bind_group, &[]);
            pass.set_bind_group(3, material.bind_group(), &[]);

            for item in group.items() {
                let model_view =
                    Transformation::model_view(item.position, item.rotation, item.scale, view);
                let slot = self.model_slots.next(&self.device, &self.layouts.uniform);
                self.queue.write_buffer(
                    &slot.buffer,
                    0,
                    bytemuck::bytes_of(&ModelUniforms::new(model_view)),
                );
                pass.set_bind_group(1, &slot.bind_group, &[]);
                mesh.draw(&mut pass);
            }
        }

        if let Some(sky) = scene.skybox() {
            let sky_view = Transformation::skybox_view(view);
            let view_model =
                Transformation::model_view(sky.position, sky.rotation, sky.scale, sky_view);
            let uniforms = SkyboxUniforms::new(
                projection,
                view_model,
                light.skybox_light.extend(1.0).to_array(),
            );
            self.queue
                .write_buffer(&self.skybox_buf, 0, bytemuck::bytes_of(&uniforms));

            pass.set_pipeline(&self.pipelines.skybox);
            pass.set_bind_group(0, &self.skybox_bg, &[]);
            pass.set_bind_group(1, sky.mesh().material().bind_group(), &[]);
            sky.mesh().draw(&mut pass);
        }

        if let Some(hud) = hud {
            let ortho = Transformation::ortho_projection(0.0, width, height, 0.0);
            pass.set_pipeline(&self.pipelines.hud);
            for item in hud.items() {
                let proj_model =
                    Transformation::ortho_proj_model(item.position, item.rotation, item.scale, ortho);
                let material = item.mesh().material();
                let uniforms = HudUniforms::new(
                    proj_model,
                    material.desc().diffuse.to_array(),
                    material.is_textured(),
                );
                let slot = self.hud_slots.next(&self.device, &self.layouts.uniform);
                self.queue
                    .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniforms));
                pass.set_bind_group(0, &slot.bind_group, &[]);
                pass.set_bind_group(1, material.bind_group(), &[]);
                item.mesh().draw(&mut pass);
            }
        }
    }

    /// Frees everything the renderer allocated. Scene and HUD resources are
    /// released by their owners, before this.
    pub fn release(&mut self) {
        log::debug!("releasing renderer-owned GPU resources");
        self.model_slots.destroy();
        self.material_slots.destroy();
        self.hud_slots.destroy();
        self.frame_buf.destroy();
        self.skybox_buf.destroy();
        self.depth_tex.destroy();
        self.white.release();
    }
}

/// Device handles detached from the [`Renderer`], enough to build materials
/// and upload meshes. Cheap to clone around.
#[derive(Clone)]
pub struct MeshUploader {
    device: Device,
    texture_layout: wgpu::BindGroupLayout,
    white: Arc<GpuTexture>,
}

impl MeshUploader {
    pub fn create_material(
        &self,
        desc: MaterialDesc,
        texture: Option<Arc<GpuTexture>>,
    ) -> Material {
        Material::new(&self.device, &self.texture_layout, desc, texture, &self.white)
    }

    pub fn upload_mesh(
        &self,
        data: &aster_graph::MeshData,
        material: Material,
    ) -> Result<GpuMesh, aster_graph::GraphError> {
        GpuMesh::new(&self.device, data, material)
    }
}

fn create_uniform(
    device: &Device,
    layouts: &PassLayouts,
    label: &'static str,
    size: u64,
) -> (Buffer, BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &layouts.uniform,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}
