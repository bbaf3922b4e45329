//! Clipboard access for paste handling
//!
//! Uses the arboard crate for cross-platform clipboard access. A paste is
//! classified as image or text so the editor can divert images to the
//! image handler and let text through unchanged.

use crate::error::ClipboardError;
use arboard::Clipboard;

/// Raw RGBA8 image taken from the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    /// Row-major RGBA bytes, `width * height * 4` long
    pub bytes: Vec<u8>,
}

impl ClipboardImage {
    pub fn new(width: usize, height: usize, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes,
        }
    }

    /// Whether the buffer length matches the dimensions
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .width
                .checked_mul(self.height)
                .and_then(|n| n.checked_mul(4))
                == Some(self.bytes.len())
    }
}

/// What a paste would insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    Image(ClipboardImage),
    Text(String),
}

/// Clipboard wrapper
///
/// arboard's `Clipboard` is not Send/Sync on all platforms, so a fresh
/// handle is opened per operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClipboardManager;

impl ClipboardManager {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<Clipboard, ClipboardError> {
        Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))
    }

    /// Read the clipboard, preferring image data over text
    pub fn read(&self) -> Result<ClipboardContent, ClipboardError> {
        let mut clipboard = Self::open()?;

        match clipboard.get_image() {
            Ok(image) => {
                let image = ClipboardImage::new(image.width, image.height, image.bytes.into_owned());
                if image.is_valid() {
                    return Ok(ClipboardContent::Image(image));
                }
                log::warn!(
                    "Ignoring malformed clipboard image ({}x{}, {} bytes)",
                    image.width,
                    image.height,
                    image.bytes.len()
                );
            }
            Err(arboard::Error::ContentNotAvailable) => {}
            Err(e) => log::debug!("Clipboard image unavailable: {}", e),
        }

        match clipboard.get_text() {
            Ok(text) => Ok(ClipboardContent::Text(text)),
            Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
            Err(e) => Err(ClipboardError::AccessError(e.to_string())),
        }
    }

    /// Set text to clipboard
    pub fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = Self::open()?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_validity() {
        assert!(ClipboardImage::new(2, 1, vec![0; 8]).is_valid());
        assert!(!ClipboardImage::new(2, 1, vec![0; 7]).is_valid());
        assert!(!ClipboardImage::new(0, 0, Vec::new()).is_valid());
    }

    // Reading the real clipboard needs a display server; the paste flow is
    // covered through `EditorController` with synthetic images instead.
}
