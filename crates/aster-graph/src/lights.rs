use glam::{Mat4, Vec3};

/// Per-light falloff terms: intensity decays with
/// `1 / (constant + linear*d + exponent*d^2)`.
#[derive(Debug, Clone, Copy)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub exponent: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            exponent: 0.0,
        }
    }
}

/// Omnidirectional light. Position is world space at rest; the renderer
/// derives a transient view-space copy each frame and never writes back.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub colour: Vec3,
    pub position: Vec3,
    pub intensity: f32,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn new(colour: Vec3, position: Vec3, intensity: f32) -> Self {
        Self {
            colour,
            position,
            intensity,
            attenuation: Attenuation::default(),
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// Position re-expressed in view space: (x, y, z, 1) x view.
    pub fn to_view_space(&self, view: Mat4) -> Self {
        let mut light = self.clone();
        light.position = (view * self.position.extend(1.0)).truncate();
        light
    }
}

/// A point light constrained to a cone. The cutoff is the cosine of the
/// half-angle, precomputed at construction.
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub point_light: PointLight,
    pub cone_direction: Vec3,
    cutoff: f32,
}

impl SpotLight {
    pub fn new(point_light: PointLight, cone_direction: Vec3, cutoff_angle_degrees: f32) -> Self {
        let mut light = Self {
            point_light,
            cone_direction,
            cutoff: 0.0,
        };
        light.set_cutoff_angle(cutoff_angle_degrees);
        light
    }

    pub fn set_cutoff_angle(&mut self, degrees: f32) {
        self.cutoff = degrees.to_radians().cos();
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Cone direction as a direction (w = 0, translation has no effect);
    /// wrapped point light transformed as a position.
    pub fn to_view_space(&self, view: Mat4) -> Self {
        let mut light = self.clone();
        light.point_light = self.point_light.to_view_space(view);
        light.cone_direction = (view * self.cone_direction.extend(0.0)).truncate();
        light
    }
}

/// Sun-style light: direction and intensity, no position.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub colour: Vec3,
    pub direction: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(colour: Vec3, direction: Vec3, intensity: f32) -> Self {
        Self {
            colour,
            direction,
            intensity,
        }
    }

    pub fn to_view_space(&self, view: Mat4) -> Self {
        let mut light = self.clone();
        light.direction = (view * self.direction.extend(0.0)).truncate();
        light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_view_leaves_point_light_position_unchanged() {
        let light = PointLight::new(Vec3::ONE, Vec3::new(0.0, 0.0, 1.0), 1.0);
        let transformed = light.to_view_space(Mat4::IDENTITY);
        assert_eq!(transformed.position, Vec3::new(0.0, 0.0, 1.0));
        // Persisted state untouched.
        assert_eq!(light.position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn view_translation_moves_positions_but_not_directions() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let point = PointLight::new(Vec3::ONE, Vec3::ZERO, 1.0).to_view_space(view);
        assert_eq!(point.position, Vec3::new(0.0, 0.0, -5.0));

        let dir = DirectionalLight::new(Vec3::ONE, Vec3::new(0.0, 1.0, 0.0), 1.0)
            .to_view_space(view);
        assert_eq!(dir.direction, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn spot_cutoff_is_cosine_of_half_angle() {
        let spot = SpotLight::new(
            PointLight::new(Vec3::ONE, Vec3::ZERO, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            60.0,
        );
        assert!((spot.cutoff() - 60.0f32.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn spot_cone_direction_rotates_with_view() {
        let view = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let spot = SpotLight::new(
            PointLight::new(Vec3::ONE, Vec3::ZERO, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            30.0,
        )
        .to_view_space(view);
        let dir = spot.cone_direction;
        assert!((dir.x + 1.0).abs() < 1e-6);
        assert!(dir.z.abs() < 1e-6);
    }
}
