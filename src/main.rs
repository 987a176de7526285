use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    event::Event,
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod app;
mod core;
mod engine;
mod game;

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Sprite Slicer...");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let (width, height) = app::frame_size();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Sprite Slicer")
            .with_inner_size(winit::dpi::LogicalSize::new(width, height))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut app = app::App::new(window, config_path)?;

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, window_id } if window_id == app.window().id() => {
                if !app.handle_window_event(&event) {
                    elwt.exit();
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                app.window().request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
