use glam::Vec3;

use aster_graph::{DirectionalLight, PointLight, SpotLight};

use crate::error::SceneError;

/// The complete lighting environment of a scene: an ambient term, a tint for
/// the sky dome, bounded lists of point and spot lights and at most one
/// directional (sun) light. All positions and directions are world space;
/// the renderer derives view-space copies per frame.
#[derive(Debug, Clone)]
pub struct SceneLight {
    pub ambient: Vec3,
    pub skybox_light: Vec3,
    pub point_lights: Vec<PointLight>,
    pub spot_lights: Vec<SpotLight>,
    pub directional: Option<DirectionalLight>,
}

impl Default for SceneLight {
    fn default() -> Self {
        Self {
            ambient: Vec3::ONE,
            skybox_light: Vec3::ONE,
            point_lights: Vec::new(),
            spot_lights: Vec::new(),
            directional: None,
        }
    }
}

impl SceneLight {
    /// Checks the light lists against the configured limits. Called once
    /// when the environment is installed, not per frame.
    pub fn validate(&self, max_point: usize, max_spot: usize) -> Result<(), SceneError> {
        if self.point_lights.len() > max_point {
            return Err(SceneError::TooManyLights {
                kind: "point",
                count: self.point_lights.len(),
                max: max_point,
            });
        }
        if self.spot_lights.len() > max_spot {
            return Err(SceneError::TooManyLights {
                kind: "spot",
                count: self.spot_lights.len(),
                max: max_spot,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> PointLight {
        PointLight::new(Vec3::ONE, Vec3::ZERO, 1.0)
    }

    #[test]
    fn within_limits_is_accepted() {
        let mut light = SceneLight::default();
        light.point_lights = vec![point(); 5];
        assert!(light.validate(5, 5).is_ok());
    }

    #[test]
    fn too_many_point_lights_rejected() {
        let mut light = SceneLight::default();
        light.point_lights = vec![point(); 6];
        let err = light.validate(5, 5).unwrap_err();
        assert!(err.to_string().contains("point"));
    }

    #[test]
    fn too_many_spot_lights_rejected() {
        let mut light = SceneLight::default();
        light.spot_lights = vec![
            SpotLight::new(point(), Vec3::new(0.0, 0.0, -1.0), 45.0);
            3
        ];
        assert!(light.validate(5, 2).is_err());
    }
}
