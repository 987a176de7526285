// Window application: wires winit events to input, controller and renderer

use crate::engine::game_loop::SystemClock;
use crate::engine::input::{InputEvent, InputManager, PointerPosition, Surface};
use crate::engine::renderer::{Canvas, Renderer};
use crate::game::{Controller, Session, SessionConfig};
use anyhow::Result;
use glam::{IVec2, Vec2};
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::Arc;
use winit::event::WindowEvent;
use winit::window::Window;

/// Play field canvas size
pub const FIELD_SIZE: (u32, u32) = (640, 480);
/// Sheet preview canvas size
pub const PREVIEW_SIZE: (u32, u32) = (480, 480);

const TITLE: &str = "Sprite Slicer";

/// Size of the composed frame: field on the left, preview on the right
pub fn frame_size() -> (u32, u32) {
    (
        FIELD_SIZE.0 + PREVIEW_SIZE.0,
        FIELD_SIZE.1.max(PREVIEW_SIZE.1),
    )
}

/// Map a window cursor position onto the field and preview canvases
///
/// The frame is stretched over the whole window, so the mapping is the
/// window-to-frame size ratio.
pub fn map_pointer(window: Vec2, position: Vec2) -> PointerPosition {
    let (frame_w, frame_h) = frame_size();
    let frame = Vec2::new(frame_w as f32, frame_h as f32);
    let scale = if window.x > 0.0 && window.y > 0.0 {
        frame / window
    } else {
        Vec2::ONE
    };
    let point = position * scale;

    let field_w = FIELD_SIZE.0 as f32;
    let surface = if point.x < 0.0 || point.y < 0.0 {
        Surface::Outside
    } else if point.x < field_w && point.y < FIELD_SIZE.1 as f32 {
        Surface::Field
    } else if point.x >= field_w && point.x < frame.x && point.y < PREVIEW_SIZE.1 as f32 {
        Surface::Preview
    } else {
        Surface::Outside
    };

    PointerPosition {
        surface,
        field: point,
        preview: point - Vec2::new(field_w, 0.0),
    }
}

pub struct App {
    window: Arc<Window>,
    renderer: Renderer,
    controller: Controller<SystemClock>,
    input: InputManager,
    config_path: Option<PathBuf>,
    frame: Canvas,
    stage: Canvas,
    preview: Canvas,
    title: String,
    /// Last configuration file problem, shown until the next good read
    config_error: Option<String>,
}

impl App {
    pub fn new(window: Arc<Window>, config_path: Option<PathBuf>) -> Result<Self> {
        let renderer = pollster::block_on(Renderer::new(window.clone()))?;

        let session = Session::new(
            Vec2::new(FIELD_SIZE.0 as f32, FIELD_SIZE.1 as f32),
            Vec2::new(PREVIEW_SIZE.0 as f32, PREVIEW_SIZE.1 as f32),
        );
        let (frame_w, frame_h) = frame_size();

        let mut app = Self {
            window,
            renderer,
            controller: Controller::new(session, SystemClock::new()),
            input: InputManager::default(),
            config_path,
            frame: Canvas::new(frame_w, frame_h),
            stage: Canvas::new(FIELD_SIZE.0, FIELD_SIZE.1),
            preview: Canvas::new(PREVIEW_SIZE.0, PREVIEW_SIZE.1),
            title: String::new(),
            config_error: None,
        };
        app.reload();
        Ok(app)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Re-read the configuration file and re-slice
    pub fn reload(&mut self) {
        let Some(path) = self.config_path.clone() else {
            info!("No configuration file given; pass one as the first argument");
            return;
        };

        match SessionConfig::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                self.config_error = None;
                self.input.reset();
                // The controller logs the failure and keeps it for the title
                if let Err(err) = self.controller.load(&config) {
                    debug!("Reload rejected: {}", err);
                }
            }
            Err(err) => {
                error!("{}: {}", path.display(), err);
                self.config_error = Some(err.to_string());
            }
        }
    }

    /// Handle one window event; returns false when the app should exit
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down...");
                return false;
            }
            WindowEvent::Resized(physical_size) => {
                self.renderer.resize(*physical_size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                match self.input.process_keyboard_event(event) {
                    Some(InputEvent::Quit) => return false,
                    Some(InputEvent::Reload) => self.reload(),
                    Some(other) => self.controller.handle_event(other, self.input.state()),
                    None => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = self.renderer.size();
                let pointer = map_pointer(
                    Vec2::new(size.width as f32, size.height as f32),
                    Vec2::new(position.x as f32, position.y as f32),
                );
                if let Some(event) = self.input.process_cursor(pointer) {
                    self.controller.handle_event(event, self.input.state());
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(event) = self.input.process_mouse_button(*button, *state) {
                    self.controller.handle_event(event, self.input.state());
                }
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
                self.controller
                    .handle_event(InputEvent::DragEnded, self.input.state());
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
        true
    }

    /// Advance one tick and present the composed frame
    fn redraw(&mut self) {
        if let Some(Err(err)) = self.controller.poll_load() {
            debug!("Sheet load failed: {}", err);
        }
        self.controller.frame(self.input.state());

        let session = self.controller.session();
        session.draw_stage(&mut self.stage);
        session.draw_preview(&mut self.preview);

        self.frame.clear(image::Rgba([0, 0, 0, 255]));
        self.frame.blit(self.stage.image(), IVec2::ZERO);
        self.frame
            .blit(self.preview.image(), IVec2::new(FIELD_SIZE.0 as i32, 0));

        if let Err(err) = self.renderer.render(&self.frame) {
            match err.downcast_ref::<wgpu::SurfaceError>() {
                Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = self.renderer.size();
                    self.renderer.resize(size);
                }
                _ => error!("Render error: {}", err),
            }
        }

        let title = self.status_title();
        self.set_title(&title);
    }

    fn status_title(&self) -> String {
        if let Some(err) = self.config_error.as_deref().or(self.controller.last_error()) {
            return format!("{TITLE} - {err}");
        }
        if self.controller.is_loading() {
            return format!("{TITLE} - loading...");
        }
        match self.controller.session().sheet() {
            Some(sheet) if !self.controller.scheduler().is_running() => {
                format!("{TITLE} - {} (no clips)", sheet.name())
            }
            Some(sheet) => format!(
                "{TITLE} - {} ({} x {})",
                sheet.name(),
                sheet.width(),
                sheet.height()
            ),
            None => TITLE.to_string(),
        }
    }

    fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.window.set_title(title);
            self.title = title.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_size() {
        assert_eq!(frame_size(), (1120, 480));
    }

    #[test]
    fn test_map_pointer_at_native_size() {
        let window = Vec2::new(1120.0, 480.0);

        let field = map_pointer(window, Vec2::new(100.0, 50.0));
        assert_eq!(field.surface, Surface::Field);
        assert_eq!(field.field, Vec2::new(100.0, 50.0));

        let preview = map_pointer(window, Vec2::new(700.0, 10.0));
        assert_eq!(preview.surface, Surface::Preview);
        assert_eq!(preview.preview, Vec2::new(60.0, 10.0));

        assert_eq!(
            map_pointer(window, Vec2::new(1200.0, 10.0)).surface,
            Surface::Outside
        );
    }

    #[test]
    fn test_map_pointer_scales_with_window() {
        let pointer = map_pointer(Vec2::new(2240.0, 960.0), Vec2::new(200.0, 100.0));
        assert_eq!(pointer.surface, Surface::Field);
        assert_relative_eq!(pointer.field.x, 100.0);
        assert_relative_eq!(pointer.field.y, 50.0);
    }
}
