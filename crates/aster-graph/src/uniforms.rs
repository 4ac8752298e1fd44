//! CPU-side mirrors of the WGSL uniform blocks. Layouts carry explicit
//! padding so each struct matches the shader's uniform address space rules
//! exactly; the size assertions in the tests pin them down.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::lights::{DirectionalLight, PointLight, SpotLight};
use crate::material::Material;

/// Hard shader-side limits. Configured light counts are validated against
/// these before a scene is accepted.
pub const MAX_POINT_LIGHTS: usize = 5;
pub const MAX_SPOT_LIGHTS: usize = 5;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PointLightUniform {
    pub colour: [f32; 3],
    _pad0: f32,
    pub position: [f32; 3],
    pub intensity: f32,
    pub attenuation: [f32; 3],
    _pad1: f32,
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            colour: light.colour.to_array(),
            _pad0: 0.0,
            position: light.position.to_array(),
            intensity: light.intensity,
            attenuation: [
                light.attenuation.constant,
                light.attenuation.linear,
                light.attenuation.exponent,
            ],
            _pad1: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub point: PointLightUniform,
    pub cone_direction: [f32; 3],
    pub cutoff: f32,
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            point: PointLightUniform::from(&light.point_light),
            cone_direction: light.cone_direction.to_array(),
            cutoff: light.cutoff(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    pub colour: [f32; 3],
    _pad0: f32,
    pub direction: [f32; 3],
    pub intensity: f32,
}

impl From<&DirectionalLight> for DirectionalLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            colour: light.colour.to_array(),
            _pad0: 0.0,
            direction: light.direction.to_array(),
            intensity: light.intensity,
        }
    }
}

/// Per-frame state shared by every scene draw: matrices plus the full
/// lighting environment, already transformed to view space.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FrameUniforms {
    pub projection: [f32; 16],
    pub view: [f32; 16],
    pub ambient: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub spot_lights: [SpotLightUniform; MAX_SPOT_LIGHTS],
    pub directional: DirectionalLightUniform,
    pub specular_power: f32,
    pub point_count: u32,
    pub spot_count: u32,
    _pad: u32,
}

impl FrameUniforms {
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array(),
            view: view.to_cols_array(),
            ..Zeroable::zeroed()
        }
    }

    /// Copies at most [`MAX_POINT_LIGHTS`] lights; anything past shader
    /// capacity is ignored. Scene-level validation catches over-limit setups
    /// up front, but the light list is mutable afterwards, so the upload
    /// clamps rather than trusting the caller.
    pub fn set_point_lights(&mut self, lights: &[PointLight]) {
        for (slot, light) in self.point_lights.iter_mut().zip(lights) {
            *slot = light.into();
        }
        self.point_count = lights.len().min(MAX_POINT_LIGHTS) as u32;
    }

    /// Copies at most [`MAX_SPOT_LIGHTS`] lights; extras are ignored, as in
    /// [`Self::set_point_lights`].
    pub fn set_spot_lights(&mut self, lights: &[SpotLight]) {
        for (slot, light) in self.spot_lights.iter_mut().zip(lights) {
            *slot = light.into();
        }
        self.spot_count = lights.len().min(MAX_SPOT_LIGHTS) as u32;
    }
}

/// Per-item state for the scene pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ModelUniforms {
    pub model_view: [f32; 16],
}

impl ModelUniforms {
    pub fn new(model_view: Mat4) -> Self {
        Self {
            model_view: model_view.to_cols_array(),
        }
    }
}

/// Per-material state for the scene pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub reflectance: f32,
    pub has_texture: u32,
    _pad: [u32; 2],
}

impl From<&Material> for MaterialUniforms {
    fn from(material: &Material) -> Self {
        let desc = material.desc();
        Self {
            ambient: desc.ambient.to_array(),
            diffuse: desc.diffuse.to_array(),
            specular: desc.specular.to_array(),
            reflectance: desc.reflectance,
            has_texture: material.is_textured() as u32,
            _pad: [0; 2],
        }
    }
}

/// Per-item state for the orthographic HUD pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct HudUniforms {
    pub proj_model: [f32; 16],
    pub colour: [f32; 4],
    pub has_texture: u32,
    _pad: [u32; 3],
}

impl HudUniforms {
    pub fn new(proj_model: Mat4, colour: [f32; 4], has_texture: bool) -> Self {
        Self {
            proj_model: proj_model.to_cols_array(),
            colour,
            has_texture: has_texture as u32,
            _pad: [0; 3],
        }
    }
}

/// Skybox pass state: combined projection and translation-stripped view,
/// plus the ambient tint applied to the dome texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub proj_view: [f32; 16],
    pub ambient: [f32; 4],
}

impl SkyboxUniforms {
    pub fn new(projection: Mat4, view_model: Mat4, ambient: [f32; 4]) -> Self {
        Self {
            proj_view: (projection * view_model).to_cols_array(),
            ambient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::mem::size_of;

    #[test]
    fn uniform_sizes_match_shader_layouts() {
        assert_eq!(size_of::<PointLightUniform>(), 48);
        assert_eq!(size_of::<SpotLightUniform>(), 64);
        assert_eq!(size_of::<DirectionalLightUniform>(), 32);
        assert_eq!(size_of::<ModelUniforms>(), 64);
        assert_eq!(size_of::<MaterialUniforms>(), 64);
        assert_eq!(size_of::<HudUniforms>(), 96);
        assert_eq!(size_of::<SkyboxUniforms>(), 80);
        assert_eq!(
            size_of::<FrameUniforms>(),
            64 + 64 + 16 + 48 * MAX_POINT_LIGHTS + 64 * MAX_SPOT_LIGHTS + 32 + 16
        );
    }

    #[test]
    fn light_counts_clamp_to_capacity() {
        let mut frame = FrameUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY);
        let lights: Vec<PointLight> = (0..3)
            .map(|i| PointLight::new(Vec3::ONE, Vec3::new(i as f32, 0.0, 0.0), 1.0))
            .collect();
        frame.set_point_lights(&lights);
        assert_eq!(frame.point_count, 3);
        assert_eq!(frame.point_lights[1].position, [1.0, 0.0, 0.0]);
        // Unused slots stay zeroed.
        assert_eq!(frame.point_lights[4].intensity, 0.0);
    }

    #[test]
    fn lights_beyond_capacity_are_ignored() {
        let mut frame = FrameUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY);
        let lights: Vec<PointLight> = (0..MAX_POINT_LIGHTS + 2)
            .map(|i| PointLight::new(Vec3::ONE, Vec3::new(i as f32, 0.0, 0.0), 1.0))
            .collect();
        frame.set_point_lights(&lights);
        assert_eq!(frame.point_count, MAX_POINT_LIGHTS as u32);
        // The last slot holds the last light that fit, not an overflow one.
        assert_eq!(
            frame.point_lights[MAX_POINT_LIGHTS - 1].position,
            [(MAX_POINT_LIGHTS - 1) as f32, 0.0, 0.0]
        );
    }

    #[test]
    fn spot_uniform_carries_precomputed_cutoff() {
        let spot = SpotLight::new(
            PointLight::new(Vec3::ONE, Vec3::ZERO, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            45.0,
        );
        let uniform = SpotLightUniform::from(&spot);
        assert!((uniform.cutoff - 45.0f32.to_radians().cos()).abs() < 1e-6);
    }
}
