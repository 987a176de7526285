// Asset system
//
// Turns sprite sheet sources into decoded images and row specifications
// into sliced frame rectangles.

mod loader;
mod slicer;

pub use loader::{decode, PendingLoad, SheetImage, SheetLoader, SheetSource};
pub use slicer::{parse_row, RejectedRow, Segment, Slice, SliceError, SliceSheet, WHITESPACE_TAG};

#[cfg(test)]
pub(crate) use loader::test_support;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Remote sheets are not supported here: {0}")]
    UnsupportedSource(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("hero.png".to_string());
        assert_eq!(err.to_string(), "Asset not found: hero.png");
    }
}
