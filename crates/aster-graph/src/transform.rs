use glam::{Mat4, Vec3};

use crate::camera::Camera;

/// Matrix pipeline state. Projection persists across frames (recomputed on
/// resize) and view persists within a frame (recomputed on camera change);
/// everything else is computed per call. All returned matrices are by-value
/// copies and safe to retain.
#[derive(Debug, Clone)]
pub struct Transformation {
    projection: Mat4,
    view: Mat4,
}

impl Transformation {
    pub fn new() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }

    /// Standard perspective projection, aspect = width / height.
    pub fn update_projection(
        &mut self,
        fov_radians: f32,
        width: f32,
        height: f32,
        z_near: f32,
        z_far: f32,
    ) -> Mat4 {
        let aspect = width / height;
        self.projection = Mat4::perspective_rh(fov_radians, aspect, z_near, z_far);
        self.projection
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Rotation is applied before translation so the camera rotates about
    /// its own position.
    pub fn update_view(&mut self, camera: &Camera) -> Mat4 {
        let rotation = camera.rotation;
        self.view = Mat4::from_rotation_x(rotation.x.to_radians())
            * Mat4::from_rotation_y(rotation.y.to_radians())
            * Mat4::from_translation(-camera.position);
        self.view
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Per-item model matrix premultiplied by the given view matrix. Item
    /// rotations are negated to mirror the camera's view-space convention.
    pub fn model_view(position: Vec3, rotation_degrees: Vec3, scale: f32, view: Mat4) -> Mat4 {
        view * Self::model(position, rotation_degrees, scale)
    }

    /// 2D orthographic projection for screen-space rendering, origin at the
    /// top-left corner.
    pub fn ortho_projection(left: f32, right: f32, bottom: f32, top: f32) -> Mat4 {
        Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0)
    }

    /// Per-item model matrix premultiplied by an orthographic projection,
    /// for HUD items positioned in pixel coordinates.
    pub fn ortho_proj_model(
        position: Vec3,
        rotation_degrees: Vec3,
        scale: f32,
        ortho: Mat4,
    ) -> Mat4 {
        ortho * Self::model(position, rotation_degrees, scale)
    }

    /// Copy of the view matrix with the translation column zeroed: the sky
    /// dome rotates with the camera but never translates, so it reads as
    /// infinitely distant.
    pub fn skybox_view(view: Mat4) -> Mat4 {
        let mut sky = view;
        sky.w_axis.x = 0.0;
        sky.w_axis.y = 0.0;
        sky.w_axis.z = 0.0;
        sky
    }

    fn model(position: Vec3, rotation_degrees: Vec3, scale: f32) -> Mat4 {
        Mat4::from_translation(position)
            * Mat4::from_rotation_x(-rotation_degrees.x.to_radians())
            * Mat4::from_rotation_y(-rotation_degrees.y.to_radians())
            * Mat4::from_rotation_z(-rotation_degrees.z.to_radians())
            * Mat4::from_scale(Vec3::splat(scale))
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_camera_gives_identity_view() {
        let mut transformation = Transformation::new();
        let view = transformation.update_view(&Camera::new());
        assert_mat_eq(view, Mat4::IDENTITY);
    }

    #[test]
    fn unrotated_item_with_identity_view_is_pure_translation() {
        let position = Vec3::new(1.5, -2.0, 3.0);
        let mv = Transformation::model_view(position, Vec3::ZERO, 1.0, Mat4::IDENTITY);
        assert_mat_eq(mv, Mat4::from_translation(position));
    }

    #[test]
    fn camera_translation_negates_in_view() {
        let mut transformation = Transformation::new();
        let mut camera = Camera::new();
        camera.set_position(1.0, 2.0, 3.0);
        let view = transformation.update_view(&camera);
        assert_mat_eq(view, Mat4::from_translation(Vec3::new(-1.0, -2.0, -3.0)));
    }

    #[test]
    fn skybox_view_drops_translation_keeps_rotation() {
        let mut transformation = Transformation::new();
        let mut camera = Camera::new();
        camera.set_position(10.0, 20.0, 30.0);
        camera.set_rotation(15.0, 45.0, 0.0);
        let view = transformation.update_view(&camera);

        let sky = Transformation::skybox_view(view);
        assert_eq!(sky.w_axis, Vec4::new(0.0, 0.0, 0.0, view.w_axis.w));
        assert_eq!(sky.x_axis, view.x_axis);
        assert_eq!(sky.y_axis, view.y_axis);
        assert_eq!(sky.z_axis, view.z_axis);

        // Moving the camera must not change the skybox view at all.
        camera.set_position(-5.0, 0.0, 99.0);
        let moved = Transformation::skybox_view(transformation.update_view(&camera));
        assert_mat_eq(sky, moved);
    }

    #[test]
    fn item_rotation_signs_are_negated() {
        let mv = Transformation::model_view(
            Vec3::ZERO,
            Vec3::new(0.0, 90.0, 0.0),
            1.0,
            Mat4::IDENTITY,
        );
        let expected = Mat4::from_rotation_y(-90.0f32.to_radians());
        assert_mat_eq(mv, expected);
    }

    #[test]
    fn uniform_scale_applies_last() {
        let mv = Transformation::model_view(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            2.0,
            Mat4::IDENTITY,
        );
        let point = mv * Vec4::new(1.0, 0.0, 0.0, 1.0);
        // Scale applies to the local point, translation afterwards.
        assert!((point.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn ortho_maps_top_left_origin() {
        let ortho = Transformation::ortho_projection(0.0, 800.0, 600.0, 0.0);
        let top_left = ortho * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);
        let bottom_right = ortho * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }
}
