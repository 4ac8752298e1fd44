use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, DeviceEvents, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::EventLoopExtPumpEvents,
    window::{Window, WindowId},
};

use wgpu::{
    CommandEncoder, CommandEncoderDescriptor, Device, Features, Instance, Limits, MemoryHints,
    PowerPreference, Queue, RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceTexture,
    TextureFormat, TextureView, TextureViewDescriptor,
};

use aster_core::{EngineConfig, EngineWindow, InputState, Key};

/// Collects window and device events between pumps. Owned by the
/// [`DesktopWindow`] and handed to winit on every poll.
struct WindowHost {
    title: String,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    input: InputState,
    close_requested: bool,
    surface_resized: bool,
}

impl WindowHost {
    fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_owned(),
            initial_size: PhysicalSize::new(width, height),
            window: None,
            input: InputState::new(),
            close_requested: false,
            surface_resized: false,
        }
    }
}

impl ApplicationHandler for WindowHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        // Mouse deltas arrive as device events even while no button is down.
        event_loop.listen_device_events(DeviceEvents::Always);
        let attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(self.initial_size);
        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(err) => {
                error!("window creation failed: {err}");
                self.close_requested = true;
            }
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(_) => self.surface_resized = true,
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape && pressed {
                        self.close_requested = true;
                    }
                    if let Some(key) = map_key(code) {
                        self.input.set_key(key, pressed);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.input.set_left_button(pressed),
                    MouseButton::Right => self.input.set_right_button(pressed),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.add_cursor_delta(delta.0 as f32, delta.1 as f32);
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyZ => Some(Key::Z),
        KeyCode::KeyX => Some(Key::X),
        KeyCode::KeyN => Some(Key::N),
        KeyCode::KeyM => Some(Key::M),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        _ => None,
    }
}

/// Surface, device and queue for one window.
pub struct Graphics {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
}

impl Graphics {
    async fn new(window: Arc<Window>, config: &EngineConfig) -> anyhow::Result<Self> {
        let instance = Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("creating surface")?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .context("no suitable GPU adapter")?;

        let required_features = if config.wireframe {
            Features::POLYGON_MODE_LINE
        } else {
            Features::empty()
        };
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features,
                required_limits: Limits::default().using_resolution(adapter.limits()),
                memory_hints: MemoryHints::Performance,
                trace: Default::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            })
            .await
            .context("requesting device")?;

        let size = window.inner_size();
        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("surface is incompatible with the adapter")?;
        surface_config.present_mode = if config.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &surface_config);
        info!(
            "surface {}x{} {:?}, present mode {:?}",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            surface_config.present_mode
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn format(&self) -> TextureFormat {
        self.surface_config.format
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn acquire_frame(&self) -> Result<(SurfaceTexture, TextureView), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        Ok((frame, view))
    }

    pub fn create_encoder(&self) -> CommandEncoder {
        self.device
            .create_command_encoder(&CommandEncoderDescriptor { label: None })
    }

    pub fn submit_frame(&self, encoder: CommandEncoder, frame: SurfaceTexture) {
        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }
}

/// The real window: winit event pump plus wgpu surface. `!Send` because the
/// underlying window is, which keeps the loop on the thread that created it.
pub struct DesktopWindow {
    event_loop: EventLoop<()>,
    host: WindowHost,
    window: Arc<Window>,
    gfx: Graphics,
    vsync: bool,
    resized: bool,
}

impl DesktopWindow {
    pub fn new(title: &str, width: u32, height: u32, config: &EngineConfig) -> anyhow::Result<Self> {
        let mut event_loop = EventLoop::new().context("creating event loop")?;

        let mut host = WindowHost::new(title, width, height);
        // Pump until the platform delivers `resumed` and the window exists.
        for _ in 0..100 {
            let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut host);
            if host.window.is_some() || host.close_requested {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let window = host
            .window
            .clone()
            .context("window was not created by the event loop")?;

        let gfx = pollster::block_on(Graphics::new(Arc::clone(&window), config))?;

        Ok(Self {
            event_loop,
            host,
            window,
            gfx,
            vsync: config.vsync,
            resized: true,
        })
    }

    pub fn graphics(&self) -> &Graphics {
        &self.gfx
    }
}

impl EngineWindow for DesktopWindow {
    const MAIN_THREAD_ONLY: bool = true;

    fn width(&self) -> u32 {
        self.gfx.surface_config.width
    }

    fn height(&self) -> u32 {
        self.gfx.surface_config.height
    }

    fn is_resized(&self) -> bool {
        self.resized
    }

    fn set_resized(&mut self, resized: bool) {
        self.resized = resized;
    }

    fn vsync_enabled(&self) -> bool {
        self.vsync
    }

    fn close_requested(&self) -> bool {
        self.host.close_requested
    }

    fn poll_events(&mut self) {
        self.host.input.begin_frame();
        let _ = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.host);
        if self.host.surface_resized {
            self.host.surface_resized = false;
            let size = self.window.inner_size();
            if size.width == 0 || size.height == 0 {
                warn!("ignoring resize to zero-sized surface");
            } else {
                self.gfx.resize(size.width, size.height);
                self.resized = true;
            }
        }
    }

    fn input(&self) -> &InputState {
        &self.host.input
    }
}
