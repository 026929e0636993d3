//! Moodscape viewer - a windowed scene driven by one settings snapshot
//!
//! Terrain, water, clouds and sky are rebuilt only when their settings change;
//! everything else is per-frame uniforms.

mod cli;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cli::Args;
use moodscape::camera::CameraSystem;
use moodscape::environment::{Environment, FrameInputs};
use moodscape::error::RenderError;
use moodscape::params::{RenderConfig, SceneSnapshot};
use moodscape::rendering::RenderSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Scene
    snapshot: SceneSnapshot,
    environment: Environment,
    camera: CameraSystem,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(snapshot: SceneSnapshot, camera: CameraSystem) -> Self {
        Self {
            window: None,
            render_system: None,
            environment: Environment::new(snapshot.seed),
            snapshot,
            camera,
            render_config: RenderConfig::default(),
            start_time: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Moodscape")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        for err in render_system.layer_errors() {
            log::warn!("{}", err);
        }

        let (width, height) = render_system.size();
        self.render_config.window_width = width;
        self.render_config.window_height = height;

        println!("\nMoodscape is running!");
        println!("Press ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.render_config.window_width = width;
        self.render_config.window_height = height;
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(width, height);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let time_s = self.start_time.elapsed().as_secs_f32();

        let (view_proj, camera_pos) = self
            .camera
            .create_view_proj_matrix(time_s, &self.render_config);

        let inputs = FrameInputs {
            time_s,
            view_proj,
            camera_pos,
        };
        let plan = self.environment.prepare_frame(&self.snapshot, &inputs);

        render_system.sync(&self.environment, &plan);

        match render_system.render(&plan, &[]) {
            Ok(()) => {}
            Err(RenderError::SurfaceAcquire(
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
            )) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(e) => log::error!("Render error: {}", e),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Moodscape - Procedural environment viewer");
    println!("Initializing systems...\n");

    let args = Args::parse();
    let snapshot = match args.build_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Seed {}, terrain {:?}, water {}, {} cloud(s), sky {:?}",
        snapshot.seed,
        snapshot.terrain.terrain_type,
        if snapshot.water.enabled { "on" } else { "off" },
        snapshot.clouds.count,
        snapshot.sky.preset
    );

    let camera = CameraSystem::new(args.parse_camera_preset(snapshot.box_size));
    let mut app = App::new(snapshot, camera);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {}", e);
    }
}
