// Sprite sheet loading
//
// Decoding runs on a worker thread and comes back as a single-shot result
// tagged with the session generation it was started for.

use super::AssetError;
use image::RgbaImage;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Where a sprite sheet comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// Image file on disk
    File(PathBuf),
    /// Already-read file contents (e.g. an uploaded file)
    Bytes { name: String, bytes: Arc<[u8]> },
    /// Remote URL; fetching is left to an external loader
    Remote(String),
}

impl SheetSource {
    /// Interpret a configured image location
    ///
    /// Returns `None` for an empty location.
    pub fn from_location(location: &str) -> Option<Self> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            return Some(Self::Remote(location.to_string()));
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        Some(Self::File(PathBuf::from(path)))
    }

    /// Human readable name for logs and the window title
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            Self::Bytes { name, .. } => name.clone(),
            Self::Remote(url) => url.clone(),
        }
    }
}

/// A decoded sprite sheet, treated as an opaque blittable surface
#[derive(Debug, Clone)]
pub struct SheetImage {
    name: String,
    pixels: RgbaImage,
}

impl SheetImage {
    /// Decode an encoded image (PNG or JPEG)
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_rgba(name, img.to_rgba8()))
    }

    /// Wrap already decoded pixels
    pub fn from_rgba(name: &str, pixels: RgbaImage) -> Self {
        Self {
            name: name.to_string(),
            pixels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Read and decode a sheet on the calling thread
pub fn decode(source: &SheetSource) -> Result<SheetImage, AssetError> {
    match source {
        SheetSource::File(path) => {
            if !path.exists() {
                return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
            }
            let bytes = std::fs::read(path)?;
            SheetImage::from_bytes(&source.label(), &bytes)
        }
        SheetSource::Bytes { name, bytes } => SheetImage::from_bytes(name, bytes),
        SheetSource::Remote(url) => Err(AssetError::UnsupportedSource(url.clone())),
    }
}

/// An in-flight sheet load
pub struct PendingLoad {
    generation: u64,
    receiver: Receiver<Result<SheetImage, AssetError>>,
}

impl PendingLoad {
    /// Start decoding `source` on a worker thread
    pub fn spawn(generation: u64, source: SheetSource) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let result = decode(&source);
            // The receiver is gone when the load was superseded
            let _ = sender.send(result);
        });

        Self {
            generation,
            receiver,
        }
    }

    /// Generation this load was started for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the result if it is ready
    pub fn try_take(&self) -> Option<Result<SheetImage, AssetError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_gone())),
        }
    }

    /// Block until the result is ready
    pub fn wait(self) -> Result<SheetImage, AssetError> {
        self.receiver.recv().unwrap_or_else(|_| Err(worker_gone()))
    }
}

fn worker_gone() -> AssetError {
    AssetError::LoadError("sheet loader thread exited without a result".to_string())
}

/// Owns the single in-flight load of a session
#[derive(Default)]
pub struct SheetLoader {
    pending: Option<PendingLoad>,
}

impl SheetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a sheet, superseding any load still in flight
    pub fn begin(&mut self, generation: u64, source: SheetSource) {
        if let Some(previous) = self.pending.take() {
            debug!(
                "Dropping in-flight sheet load for generation {}",
                previous.generation()
            );
        }
        info!("Loading sprite sheet {}", source.label());
        self.pending = Some(PendingLoad::spawn(generation, source));
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Non-blocking check for a finished load belonging to `generation`
    pub fn poll(&mut self, generation: u64) -> Option<Result<SheetImage, AssetError>> {
        let result = self.pending.as_ref()?.try_take()?;
        let pending = self.pending.take()?;
        Self::accept(pending.generation(), generation, result)
    }

    /// Block until the in-flight load (if any) finishes
    pub fn wait(&mut self, generation: u64) -> Option<Result<SheetImage, AssetError>> {
        let pending = self.pending.take()?;
        let started_for = pending.generation();
        Self::accept(started_for, generation, pending.wait())
    }

    fn accept(
        started_for: u64,
        generation: u64,
        result: Result<SheetImage, AssetError>,
    ) -> Option<Result<SheetImage, AssetError>> {
        if started_for != generation {
            debug!(
                "Discarding sheet load for stale generation {} (current {})",
                started_for, generation
            );
            return None;
        }
        Some(result)
    }
}
