mod hud;
mod primitives;
mod terrain;

use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use log::warn;

use aster_core::{EngineConfig, EngineError, EngineWindow, GameLogic, Key};
use aster_graph::{Attenuation, Camera, DirectionalLight, MaterialDesc, PointLight, SpotLight};
use aster_graph::GpuMesh;
use aster_render::Renderer;
use aster_scene::{GameItem, Hud, Scene, SceneLight};

use crate::app::DesktopWindow;
use crate::game::hud::DemoHud;

const CAMERA_POS_STEP: f32 = 0.05;
const MOUSE_SENSITIVITY: f32 = 0.2;

/// Sun sweep per simulation step, in degrees.
const SUN_ANGLE_STEP: f32 = 0.5;
/// Past this elevation angle the sun starts fading.
const TWILIGHT_START_DEG: f32 = 80.0;
/// At this angle the sun is gone and night begins.
const NIGHT_START_DEG: f32 = 90.0;

/// Cycles the directional light through day, twilight and night by sweeping
/// its elevation angle one step per update.
struct DayNight {
    angle: f32,
}

impl DayNight {
    fn new() -> Self {
        // Start at dawn.
        Self {
            angle: -TWILIGHT_START_DEG,
        }
    }

    fn advance(&mut self, light: &mut SceneLight) {
        self.angle += SUN_ANGLE_STEP;
        let Some(sun) = light.directional.as_mut() else {
            return;
        };

        if self.angle > NIGHT_START_DEG {
            sun.intensity = 0.0;
            if self.angle >= 360.0 {
                self.angle = -NIGHT_START_DEG;
            }
        } else if self.angle.abs() > TWILIGHT_START_DEG {
            let factor = 1.0
                - (self.angle.abs() - TWILIGHT_START_DEG)
                    / (NIGHT_START_DEG - TWILIGHT_START_DEG);
            sun.intensity = factor;
            sun.colour.y = factor.max(0.9);
            sun.colour.z = factor.max(0.5);
        } else {
            sun.intensity = 1.0;
            sun.colour = Vec3::ONE;
        }

        let radians = self.angle.to_radians();
        sun.direction.x = radians.sin();
        sun.direction.y = radians.cos();

        // The sky never goes fully black.
        light.skybox_light = Vec3::splat(sun.intensity.max(0.3));
    }
}

struct GameState {
    renderer: Renderer,
    scene: Scene<GpuMesh>,
    hud: DemoHud,
    camera: Camera,
    day_night: DayNight,
}

/// The demo: procedural terrain and cubes under a day/night cycle, with a
/// free camera and a HUD.
pub struct DemoGame {
    config: EngineConfig,
    state: Option<GameState>,
    camera_inc: Vec3,
    rotate_active: bool,
    cursor_delta: Vec2,
}

impl DemoGame {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: None,
            camera_inc: Vec3::ZERO,
            rotate_active: false,
            cursor_delta: Vec2::ZERO,
        }
    }
}

impl GameLogic<DesktopWindow> for DemoGame {
    fn init(&mut self, window: &mut DesktopWindow) -> Result<(), EngineError> {
        let state = build_state(&self.config, window).map_err(EngineError::init)?;
        self.state = Some(state);
        Ok(())
    }

    fn input(&mut self, window: &DesktopWindow) {
        let input = window.input();
        let mut inc = Vec3::ZERO;
        if input.is_pressed(Key::W) {
            inc.z -= 1.0;
        }
        if input.is_pressed(Key::S) {
            inc.z += 1.0;
        }
        if input.is_pressed(Key::A) {
            inc.x -= 1.0;
        }
        if input.is_pressed(Key::D) {
            inc.x += 1.0;
        }
        if input.is_pressed(Key::Z) {
            inc.y -= 1.0;
        }
        if input.is_pressed(Key::X) {
            inc.y += 1.0;
        }
        self.camera_inc = inc;
        self.rotate_active = input.right_button();
        self.cursor_delta = input.cursor_delta();
    }

    fn update(&mut self, _interval: f32, _window: &DesktopWindow) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.camera.move_position(
            self.camera_inc.x * CAMERA_POS_STEP,
            self.camera_inc.y * CAMERA_POS_STEP,
            self.camera_inc.z * CAMERA_POS_STEP,
        );
        if self.rotate_active {
            state.camera.move_rotation(
                self.cursor_delta.y * MOUSE_SENSITIVITY,
                self.cursor_delta.x * MOUSE_SENSITIVITY,
                0.0,
            );
            // The polled delta is consumed by the first step of the batch.
            self.cursor_delta = Vec2::ZERO;
        }

        state.day_night.advance(state.scene.light_mut());
        state.hud.set_compass_rotation(state.camera.rotation.y);

        let pos = state.camera.position;
        let status = format!("x {:.0}  y {:.0}  z {:.0}", pos.x, pos.y, pos.z);
        if let Err(err) = state.hud.set_status_text(&status) {
            warn!("HUD text update failed: {err}");
        }
    }

    fn render(&mut self, window: &mut DesktopWindow) -> Result<(), EngineError> {
        let Some(state) = &mut self.state else {
            return Ok(());
        };

        if window.is_resized() {
            state.hud.layout(window.width(), window.height());
        }

        let (frame, view) = match window.graphics().acquire_frame() {
            Ok(pair) => pair,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                window.graphics().reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(err) => return Err(EngineError::frame(err)),
        };

        let mut encoder = window.graphics().create_encoder();
        state.renderer.render(
            window,
            &view,
            &mut encoder,
            &state.camera,
            &state.scene,
            Some(&state.hud),
        );
        window.graphics().submit_frame(encoder, frame);
        Ok(())
    }

    fn cleanup(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.scene.release_gpu();
            state.hud.release();
            state.renderer.release();
        }
    }
}

fn build_state(config: &EngineConfig, window: &DesktopWindow) -> anyhow::Result<GameState> {
    let gfx = window.graphics();
    let renderer = Renderer::new(
        gfx.device().clone(),
        gfx.queue().clone(),
        gfx.format(),
        config,
        window.width(),
        window.height(),
    )?;

    let mut scene = Scene::new(config.max_point_lights, config.max_spot_lights);

    let checker = renderer.create_texture(256, 256, &primitives::checkerboard_pixels(256, 256, 32))?;
    let terrain_material = renderer.create_material(
        MaterialDesc {
            reflectance: 0.1,
            ..MaterialDesc::default()
        },
        Some(Arc::new(checker)),
    );
    let terrain_mesh = Arc::new(renderer.upload_mesh(&terrain::generate(64, 40.0, 1.5), terrain_material)?);
    let mut terrain_item = GameItem::new(terrain_mesh);
    terrain_item.set_position(0.0, -2.0, 0.0);
    scene.add_item(terrain_item);

    let cube_material = renderer.create_material(
        MaterialDesc::coloured(Vec4::new(0.3, 0.55, 0.85, 1.0), 0.6),
        None,
    );
    let cube_mesh = Arc::new(renderer.upload_mesh(&primitives::cube(), cube_material)?);
    for (x, z) in [(-3.0, -4.0), (0.0, -6.0), (2.5, -3.0), (4.0, -8.0)] {
        let mut item = GameItem::new(Arc::clone(&cube_mesh));
        item.set_position(x, 0.0, z);
        item.set_scale(0.5);
        scene.add_item(item);
    }

    scene.set_skybox(Some(build_skybox(&renderer)?));

    let mut light = SceneLight::default();
    light.ambient = Vec3::splat(0.3);
    light.point_lights.push(
        PointLight::new(Vec3::new(1.0, 0.9, 0.7), Vec3::new(0.0, 1.0, -3.0), 1.0)
            .with_attenuation(Attenuation {
                constant: 0.0,
                linear: 0.0,
                exponent: 0.5,
            }),
    );
    light.spot_lights.push(SpotLight::new(
        PointLight::new(Vec3::ONE, Vec3::new(0.0, 4.0, -6.0), 1.0).with_attenuation(
            Attenuation {
                constant: 0.0,
                linear: 0.0,
                exponent: 0.02,
            },
        ),
        Vec3::new(0.0, -1.0, 0.0),
        70.0,
    ));
    light.directional = Some(DirectionalLight::new(Vec3::ONE, Vec3::new(-1.0, 0.0, 0.0), 1.0));
    scene.set_light(light)?;

    let mut hud = DemoHud::new(&renderer)?;
    hud.layout(window.width(), window.height());

    let mut camera = Camera::new();
    camera.set_position(0.0, 2.0, 2.0);

    Ok(GameState {
        renderer,
        scene,
        hud,
        camera,
        day_night: DayNight::new(),
    })
}

/// The skybox is an ordinary item: a gradient-textured dome scaled out to
/// the far plane's neighbourhood.
fn build_skybox(renderer: &Renderer) -> anyhow::Result<GameItem<GpuMesh>> {
    let texture = renderer.create_texture(64, 256, &primitives::sky_gradient_pixels(64, 256))?;
    let material = renderer.create_material(MaterialDesc::default(), Some(Arc::new(texture)));
    let mesh = Arc::new(renderer.upload_mesh(&primitives::sky_dome(1.0, 24, 16), material)?);
    let mut skybox = GameItem::new(mesh);
    skybox.set_scale(100.0);
    Ok(skybox)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_scene_light() -> SceneLight {
        let mut light = SceneLight::default();
        light.directional = Some(DirectionalLight::new(Vec3::ONE, Vec3::new(0.0, 1.0, 0.0), 1.0));
        light
    }

    #[test]
    fn midday_sun_is_full_intensity() {
        let mut cycle = DayNight { angle: 0.0 };
        let mut light = lit_scene_light();
        cycle.advance(&mut light);
        let sun = light.directional.as_ref().unwrap();
        assert_eq!(sun.intensity, 1.0);
        assert_eq!(sun.colour, Vec3::ONE);
    }

    #[test]
    fn sun_fades_through_twilight() {
        let mut cycle = DayNight { angle: 84.5 };
        let mut light = lit_scene_light();
        cycle.advance(&mut light);
        let sun = light.directional.as_ref().unwrap();
        assert!(sun.intensity > 0.0 && sun.intensity < 1.0);
    }

    #[test]
    fn night_switches_the_sun_off_and_wraps() {
        let mut cycle = DayNight { angle: 100.0 };
        let mut light = lit_scene_light();
        cycle.advance(&mut light);
        assert_eq!(light.directional.as_ref().unwrap().intensity, 0.0);
        // Sky keeps a floor level.
        assert_eq!(light.skybox_light, Vec3::splat(0.3));

        cycle.angle = 360.0;
        cycle.advance(&mut light);
        assert_eq!(cycle.angle, -NIGHT_START_DEG);
    }

    #[test]
    fn sun_direction_follows_the_angle() {
        let mut cycle = DayNight { angle: -SUN_ANGLE_STEP };
        let mut light = lit_scene_light();
        cycle.advance(&mut light);
        let sun = light.directional.as_ref().unwrap();
        // Angle 0: straight overhead.
        assert!(sun.direction.x.abs() < 1e-6);
        assert!((sun.direction.y - 1.0).abs() < 1e-6);
    }
}
