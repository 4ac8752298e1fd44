use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Fixed constants the loop and renderer depend on. Passed explicitly into
/// their constructors; there are no process-wide statics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulation step rate (fixed updates per second).
    pub target_ups: u32,
    /// Frame cap applied when vsync is disabled.
    pub target_fps: u32,
    pub vsync: bool,
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub max_point_lights: usize,
    pub max_spot_lights: usize,
    /// Wireframe toggle (polygon mode).
    pub wireframe: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_ups: 30,
            target_fps: 75,
            vsync: true,
            fov_degrees: 60.0,
            z_near: 0.01,
            z_far: 1000.0,
            max_point_lights: 5,
            max_spot_lights: 5,
            wireframe: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.target_ups == 0 {
            return Err(EngineError::Config("target_ups must be non-zero".into()));
        }
        if self.target_fps == 0 {
            return Err(EngineError::Config("target_fps must be non-zero".into()));
        }
        if self.z_near <= 0.0 || self.z_far <= self.z_near {
            return Err(EngineError::Config(format!(
                "invalid clip planes: z_near {} z_far {}",
                self.z_near, self.z_far
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(EngineError::Config(format!(
                "field of view out of range: {}",
                self.fov_degrees
            )));
        }
        Ok(())
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_ups_rejected() {
        let cfg = EngineConfig {
            target_ups: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_clip_planes_rejected() {
        let cfg = EngineConfig {
            z_near: 10.0,
            z_far: 1.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
