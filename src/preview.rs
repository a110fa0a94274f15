/// Image preview loading
///
/// Decodes a dataset image and scales it down for display.
/// The result is raw RGBA so the UI can hand it straight to an image widget.
use std::path::Path;

use crate::state::error::AppError;

/// Longest edge of a displayed preview, in pixels
pub const PREVIEW_SIZE: u32 = 350;

/// A decoded preview ready for display
#[derive(Clone, PartialEq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, row-major
    pub pixels: Vec<u8>,
}

/// Decode `path` and fit it into a PREVIEW_SIZE box, keeping aspect ratio.
/// Smaller images are left at their original size.
pub fn load_preview(path: &Path) -> Result<Preview, AppError> {
    let img = image::open(path).map_err(|e| AppError::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let img = if img.width() > PREVIEW_SIZE || img.height() > PREVIEW_SIZE {
        img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    tracing::debug!(
        "Loaded preview {}x{} from {}",
        rgba.width(),
        rgba.height(),
        path.display()
    );

    Ok(Preview {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

// Pixel buffers are too large to print
impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
