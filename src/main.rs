use anyhow::Result;
use bat_flight::cli::Cli;
use bat_flight::config::DemoConfig;
use bat_flight::core::{
    ControlPointEditor, SceneState, TextureHandle, TextureSlot, Viewport, WinitPointer,
};
use bat_flight::frame::{FpsCounter, FrameIterator};
use bat_flight::loaders::load_texture;
use bat_flight::renderer::{FrameRenderer, HudInfo};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

// === Application ===

struct App {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    renderer: Option<FrameRenderer>,
    scene: SceneState,
    editor: ControlPointEditor,
    pointer: WinitPointer,
    frames: FrameIterator,
    fps: FpsCounter,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        let viewport = Viewport::new(config.window.width, config.window.height);
        Self {
            scene: SceneState::new(config.control_polygon(), config.animation),
            editor: ControlPointEditor::new(viewport, config.point_size),
            pointer: WinitPointer::new(),
            frames: FrameIterator::new(),
            fps: FpsCounter::default(),
            window: None,
            renderer: None,
            config,
        }
    }

    /// Decode and upload every sprite; a missing image only leaves its slot empty
    fn load_textures(&mut self, renderer: &mut FrameRenderer) {
        let mut uploaded: HashMap<PathBuf, TextureHandle> = HashMap::new();

        for slot in TextureSlot::DRAW_ORDER {
            let path = self.config.assets.path_for(slot);
            if let Some(&handle) = uploaded.get(&path) {
                self.scene.textures.set(slot, handle);
                continue;
            }
            match load_texture(&path) {
                Ok(image) => {
                    let handle = renderer.upload_texture(slot.label(), &image);
                    self.scene.textures.set(slot, handle);
                    uploaded.insert(path, handle);
                }
                Err(e) => log::warn!("No {} texture: {:#}", slot.label(), e),
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        let Some(frame) = self.frames.next() else {
            return;
        };
        if let Some(fps) = self.fps.record(frame.delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        let transforms = self.scene.draw(frame.time, &mut *renderer);

        let polygon = &self.scene.control_polygon;
        let hud = HudInfo {
            fps: self.fps.fps(),
            bezier_t: transforms.bezier_t,
            selection: polygon
                .selection()
                .and_then(|i| polygon.point(i).map(|p| (i, p))),
        };
        let hud = self.config.show_hud.then_some(&hud);

        match renderer.render(window, hud) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::PhysicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = pollster::block_on(FrameRenderer::new(window.clone(), &self.config));
        let mut renderer = match renderer {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        self.load_textures(&mut renderer);
        self.editor.set_viewport(renderer.viewport());

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if self.config.show_hud && renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                    self.editor.set_viewport(renderer.viewport());
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            ref pointer_event => {
                let viewport = self.editor.viewport();
                if let Some(input) = self.pointer.process_event(pointer_event, viewport) {
                    self.editor.handle(input, &mut self.scene.control_polygon);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = DemoConfig::from_cli(&cli)?;
    log::info!(
        "Bat flight - drag the red control points, Escape to quit (assets: {})",
        config.assets.directory.display()
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
