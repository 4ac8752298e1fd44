use glam::Vec3;

/// Free camera. Rotation is pitch/yaw/roll in degrees; there is no scale.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
    }

    /// Walks relative to the current yaw: z offsets move along the facing
    /// direction, x offsets strafe, y is world-vertical.
    pub fn move_position(&mut self, offset_x: f32, offset_y: f32, offset_z: f32) {
        if offset_z != 0.0 {
            let yaw = self.rotation.y.to_radians();
            self.position.x += yaw.sin() * -offset_z;
            self.position.z += yaw.cos() * offset_z;
        }
        if offset_x != 0.0 {
            let yaw = (self.rotation.y - 90.0).to_radians();
            self.position.x += yaw.sin() * -offset_x;
            self.position.z += yaw.cos() * offset_x;
        }
        self.position.y += offset_y;
    }

    pub fn move_rotation(&mut self, offset_x: f32, offset_y: f32, offset_z: f32) {
        self.rotation += Vec3::new(offset_x, offset_y, offset_z);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_motion_follows_yaw() {
        let mut camera = Camera::new();
        // Facing default -z: moving "forward" (negative z offset) decreases z.
        camera.move_position(0.0, 0.0, -1.0);
        assert!((camera.position.z + 1.0).abs() < 1e-6);
        assert!(camera.position.x.abs() < 1e-6);

        let mut turned = Camera::new();
        turned.set_rotation(0.0, 90.0, 0.0);
        turned.move_position(0.0, 0.0, -1.0);
        // Yawed 90 degrees: forward is now along +x.
        assert!((turned.position.x - 1.0).abs() < 1e-5);
        assert!(turned.position.z.abs() < 1e-5);
    }

    #[test]
    fn vertical_offset_ignores_rotation() {
        let mut camera = Camera::new();
        camera.set_rotation(45.0, 120.0, 0.0);
        camera.move_position(0.0, 2.0, 0.0);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 0.0));
    }
}
