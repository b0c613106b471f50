use crane_core::render::Renderer;
use crane_core::{CameraId, DrawList, HudSnapshot, KeyCommand, MeshCache, SimConfig, Simulation};
use glam::Mat4;
use instant::Instant;
use std::time::Duration;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::keyboard::Key;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

const WINDOW_TITLE: &str = "Tower Crane";
const MAX_FRAME_DT: Duration = Duration::from_millis(250);
const WHEEL_LINE_PX: f32 = 16.0;

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let renderer = Renderer::new(&device, format, width, height);
        log::info!("[gpu] {:?} surface {}x{} {:?}", adapter.get_info().backend, width, height, format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            width,
            height,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.renderer.resize(&self.device, self.width, self.height);
    }

    fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    fn render(&mut self, view_proj: Mat4, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.renderer
            .draw(&self.device, &self.queue, &mut encoder, &view, view_proj, list);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Simulation plus the per-window interaction state around it.
struct App {
    sim: Simulation,
    meshes: MeshCache,
    draw_list: DrawList,
    last_frame: Instant,
    title: String,
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
}

impl App {
    fn new(sim: Simulation) -> Self {
        Self {
            sim,
            meshes: MeshCache::new(),
            draw_list: DrawList::default(),
            last_frame: Instant::now(),
            title: String::new(),
            dragging: false,
            cursor: None,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let Key::Character(text) = &event.logical_key else {
            return;
        };
        let key = text.as_str();
        match event.state {
            ElementState::Pressed => {
                let repeat_ok = matches!(KeyCommand::parse(key), Some(KeyCommand::Control(_)));
                if event.repeat && !repeat_ok {
                    return;
                }
                self.sim.on_key_down(key);
            }
            ElementState::Released => {
                self.sim.on_key_up(key);
            }
        }
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        if let (true, Some(prev)) = (self.dragging, self.cursor) {
            let dx = (position.x - prev.x) as f32;
            let dy = (position.y - prev.y) as f32;
            self.sim.orbit_mut().drag(dx, dy);
        }
        self.cursor = Some(position);
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        if self.sim.active_camera() != CameraId::Inspect {
            return;
        }
        // winit reports scrolling up as positive; the orbit controller
        // expects the DOM sign.
        let dom_delta = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PX,
            MouseScrollDelta::PixelDelta(p) => -p.y as f32,
        };
        self.sim.orbit_mut().scroll(dom_delta);
    }

    fn refresh_title(&mut self, window: &winit::window::Window) {
        let title = if self.sim.hud_visible() {
            HudSnapshot::from_sim(&self.sim).summary()
        } else {
            WINDOW_TITLE.to_string()
        };
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn frame(&mut self, gpu: &mut GpuState) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = (now - self.last_frame).min(MAX_FRAME_DT);
        self.last_frame = now;
        self.sim.tick(dt);

        self.refresh_title(gpu.window);

        let view_proj = self.sim.camera(gpu.aspect()).view_proj();
        self.meshes.build(self.sim.scene(), &mut self.draw_list);
        gpu.render(view_proj, &self.draw_list)
    }
}

/// Seed from `CRANE_SEED`, falling back to the default on absence or junk.
fn parse_seed(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

fn sim_config() -> SimConfig {
    let raw = std::env::var("CRANE_SEED").ok();
    let mut config = SimConfig::default();
    match parse_seed(raw.as_deref()) {
        Some(seed) => config.seed = seed,
        None if raw.is_some() => log::warn!("[config] ignoring unparsable CRANE_SEED"),
        None => {}
    }
    config
}

fn run() -> anyhow::Result<()> {
    let sim = Simulation::new(sim_config())?;
    let mut app = App::new(sim);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(1280, 800))
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                app.handle_key(&event);
                app.refresh_title(state.window);
            }
            WindowEvent::Focused(false) => {
                app.sim.release_all_keys();
                app.refresh_title(state.window);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                app.dragging = button_state == ElementState::Pressed
                    && app.sim.active_camera() == CameraId::Inspect;
            }
            WindowEvent::CursorMoved { position, .. } => app.handle_cursor(position),
            WindowEvent::MouseWheel { delta, .. } => app.handle_wheel(delta),
            _ => {}
        },
        Event::AboutToWait => match app.frame(&mut state) {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.resize(state.window.inner_size())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory");
                elwt.exit()
            }
            Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
        },
        _ => {}
    })?;
    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = run() {
        log::error!("crane-native failed: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parses_trimmed_integers_only() {
        assert_eq!(parse_seed(Some("42")), Some(42));
        assert_eq!(parse_seed(Some(" 7\n")), Some(7));
        assert_eq!(parse_seed(Some("-1")), None);
        assert_eq!(parse_seed(Some("abc")), None);
        assert_eq!(parse_seed(None), None);
    }
}
