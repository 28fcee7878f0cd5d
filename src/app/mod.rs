//! Application Shell
//!
//! The [`App`] builder configures the window and launches the winit event
//! loop. Once the window exists it owns the whole stack: the [`Viewer`] for
//! scene state and interaction, the [`Renderer`] for drawing, and the
//! [`Input`] collector feeding the camera controls.
//!
//! The loop renders continuously: every `RedrawRequested` immediately
//! requests the next frame, so camera damping keeps gliding without user
//! input.

pub mod input;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use self::input::Input;
use crate::assets::MeshSource;
use crate::errors::Result;
use crate::render::Renderer;
use crate::settings::ViewerSettings;
use crate::utils::{FpsCounter, Timer};
use crate::viewer::Viewer;

pub struct App {
    settings: ViewerSettings,
    /// Model queued for loading as soon as the GPU is up.
    source: Option<MeshSource>,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    viewer: Viewer,

    input: Input,
    timer: Timer,
    fps_counter: FpsCounter,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ViewerSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: ViewerSettings) -> Self {
        let viewer = Viewer::new(&settings);
        Self {
            settings,
            source: None,
            window: None,
            renderer: None,
            viewer,
            input: Input::new(),
            timer: Timer::new(),
            fps_counter: FpsCounter::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    /// Queues `source` to be loaded right after the window opens.
    #[must_use]
    pub fn with_source(mut self, source: MeshSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns an error if event loop creation or execution fails.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        self.timer.tick();
        self.viewer.update(&self.input, self.timer.dt_seconds());
        renderer.render(self.viewer.scene());
        self.input.end_frame();

        if let Some(fps) = self.fps_counter.update()
            && let Some(window) = &self.window
        {
            let status = if self.viewer.is_loading() {
                " [loading]"
            } else {
                ""
            };
            window.set_title(&format!("{}{status} | {fps:.0} FPS", self.settings.title));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(self.settings.width),
                f64::from(self.settings.height),
            ));

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");
        let window = Arc::new(window);
        self.window = Some(window.clone());

        log::info!("Initializing renderer backend...");

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        match pollster::block_on(Renderer::new(
            window.clone(),
            width,
            height,
            self.settings.vsync,
        )) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                log::error!("Fatal renderer error: {e}");
                event_loop.exit();
                return;
            }
        }

        self.input.handle_resize(width, height);
        self.viewer.set_viewport(width, height);

        if let Some(source) = self.source.take() {
            self.viewer.load(source);
        }

        self.timer = Timer::new();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
                self.input.handle_resize(physical_size.width, physical_size.height);
                self.viewer
                    .set_viewport(physical_size.width, physical_size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_move(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_input(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.handle_mouse_wheel(delta);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.renderer.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
