//! Pasted image handling
//!
//! Turns clipboard image data into a PNG file and a markdown image link:
//! - Filenames are `prefix + name + ".png"` in the configured save folder
//! - Existing files are never overwritten; `_1`, `_2`, ... is appended
//!   before the extension until a free name is found
//! - Links are relative to the open document's directory when possible
//!
//! The free-name search checks the filesystem and then writes; it is not
//! atomic against other processes writing into the same folder.

use crate::config::ImageConfig;
use crate::editor::clipboard::ClipboardImage;
use crate::utils::path as path_utils;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during image handling
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("No image save folder is set")]
    NoSaveFolder,

    #[error("Invalid image name: {0:?}")]
    InvalidName(String),

    #[error("Image data does not match its dimensions")]
    InvalidData,

    #[error("Failed to create folder {path}: {source}")]
    FolderError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: PathBuf, message: String },
}

/// Result type for image operations
pub type ImageResult<T> = Result<T, ImageError>;

/// Extension of every pasted image
pub const IMAGE_EXTENSION: &str = "png";

/// Subfolder of the documents directory suggested as the save folder
pub const DEFAULT_FOLDER_NAME: &str = "MarkdownImages";

/// Outcome of a successful image save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Where the PNG was written
    pub path: PathBuf,
    /// Path as written in the link
    pub link: String,
    /// Markdown to insert at the cursor
    pub markdown: String,
}

/// Saves pasted images according to the image configuration
#[derive(Debug, Clone)]
pub struct ImageHandler {
    config: ImageConfig,
}

impl ImageHandler {
    /// Create a handler, creating the configured folder if it is missing
    pub fn new(config: ImageConfig) -> Self {
        if let Some(folder) = &config.save_folder {
            if !folder.exists() {
                if let Err(e) = fs::create_dir_all(folder) {
                    log::warn!("Could not create image folder {}: {}", folder.display(), e);
                }
            }
        }
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn save_folder(&self) -> Option<&Path> {
        self.config.save_folder.as_deref()
    }

    pub fn name_prefix(&self) -> &str {
        &self.config.name_prefix
    }

    /// Folder that exists and can receive images
    pub fn usable_folder(&self) -> Option<&Path> {
        self.save_folder().filter(|f| f.is_dir())
    }

    /// Set and create the save folder
    pub fn set_save_folder(&mut self, folder: impl Into<PathBuf>) -> ImageResult<()> {
        let folder = folder.into();
        fs::create_dir_all(&folder).map_err(|e| ImageError::FolderError {
            path: folder.clone(),
            source: e,
        })?;
        log::info!("Image save folder set to {}", folder.display());
        self.config.save_folder = Some(folder);
        Ok(())
    }

    /// Replace the filename prefix; empty input is ignored
    ///
    /// Returns whether the prefix changed.
    pub fn set_name_prefix(&mut self, prefix: &str) -> bool {
        if prefix.is_empty() || prefix == self.config.name_prefix {
            return false;
        }
        self.config.name_prefix = prefix.to_string();
        true
    }

    /// Suggested name for a freshly pasted image
    pub fn default_base_name() -> String {
        format!("pasted_{}", Utc::now().timestamp())
    }

    /// Suggested folder when none is configured
    pub fn default_folder() -> PathBuf {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_FOLDER_NAME)
    }

    /// `prefix + name + ".png"`
    pub fn file_name_for(&self, name: &str) -> ImageResult<String> {
        validate_name(name)?;
        Ok(format!(
            "{}{}.{}",
            self.config.name_prefix, name, IMAGE_EXTENSION
        ))
    }

    /// First path in `path`, `stem_1.ext`, `stem_2.ext`, ... that does not exist
    pub fn unique_path(path: &Path) -> PathBuf {
        if !path.exists() {
            return path.to_path_buf();
        }

        let parent = path.parent().unwrap_or(Path::new(""));
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut counter: u32 = 1;
        loop {
            let candidate = parent.join(format!("{}_{}{}", stem, counter, extension));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Free path in the save folder for an image called `name`
    pub fn resolve_target(&self, name: &str) -> ImageResult<PathBuf> {
        let file_name = self.file_name_for(name)?;
        let folder = self.usable_folder().ok_or(ImageError::NoSaveFolder)?;
        Ok(Self::unique_path(&folder.join(file_name)))
    }

    /// Encode `image` as PNG under `name` and build the markdown link
    pub fn save_png(
        &self,
        image: &ClipboardImage,
        name: &str,
        document: Option<&Path>,
    ) -> ImageResult<SavedImage> {
        if !image.is_valid() {
            return Err(ImageError::InvalidData);
        }

        let target = self.resolve_target(name)?;
        write_png(image, &target)?;
        log::info!(
            "Saved {}x{} image to {}",
            image.width,
            image.height,
            target.display()
        );

        Ok(Self::link_for(&target, document))
    }

    /// Markdown link for an image file
    ///
    /// The alt text is the file stem. The path is relative to `document`'s
    /// directory when both are on the same root, otherwise absolute.
    pub fn link_for(image: &Path, document: Option<&Path>) -> SavedImage {
        let link_path = document
            .and_then(|doc| doc.parent())
            .and_then(|dir| path_utils::relative_to(image, dir))
            .unwrap_or_else(|| image.to_path_buf());

        let link = path_utils::to_link(&link_path);
        let alt = path_utils::file_stem(image).unwrap_or_default();

        SavedImage {
            path: image.to_path_buf(),
            markdown: format!("![{}]({})\n", alt, link),
            link,
        }
    }
}

fn validate_name(name: &str) -> ImageResult<()> {
    if name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == ".."
    {
        return Err(ImageError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn write_png(image: &ClipboardImage, target: &Path) -> ImageResult<()> {
    let write_error = |message: String| ImageError::WriteError {
        path: target.to_path_buf(),
        message,
    };

    let width = u32::try_from(image.width).map_err(|e| write_error(e.to_string()))?;
    let height = u32::try_from(image.height).map_err(|e| write_error(e.to_string()))?;

    let buffer = ::image::RgbaImage::from_raw(width, height, image.bytes.clone())
        .ok_or(ImageError::InvalidData)?;

    buffer
        .save_with_format(target, ::image::ImageFormat::Png)
        .map_err(|e| write_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler_in(dir: &Path, prefix: &str) -> ImageHandler {
        ImageHandler::new(ImageConfig {
            save_folder: Some(dir.to_path_buf()),
            name_prefix: prefix.to_string(),
        })
    }

    fn red_pixel() -> ClipboardImage {
        ClipboardImage::new(1, 1, vec![255, 0, 0, 255])
    }

    #[test]
    fn test_file_name_for() {
        let handler = handler_in(Path::new("/tmp"), "demo_");
        assert_eq!(handler.file_name_for("shot").unwrap(), "demo_shot.png");
        assert!(matches!(handler.file_name_for(""), Err(ImageError::InvalidName(_))));
        assert!(matches!(handler.file_name_for("a/b"), Err(ImageError::InvalidName(_))));
        assert!(matches!(handler.file_name_for("..\\b"), Err(ImageError::InvalidName(_))));
    }

    #[test]
    fn test_collision_suffixes_are_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler_in(dir.path(), "");

        let first = handler.save_png(&red_pixel(), "x", None).unwrap();
        assert_eq!(first.path, dir.path().join("x.png"));

        let second = handler.save_png(&red_pixel(), "x", None).unwrap();
        assert_eq!(second.path, dir.path().join("x_1.png"));

        let third = handler.save_png(&red_pixel(), "x", None).unwrap();
        assert_eq!(third.path, dir.path().join("x_2.png"));
    }

    #[test]
    fn test_unique_path_skips_taken_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.png"), b"").unwrap();
        std::fs::write(dir.path().join("x_1.png"), b"").unwrap();
        std::fs::write(dir.path().join("x_3.png"), b"").unwrap();
        assert_eq!(
            ImageHandler::unique_path(&dir.path().join("x.png")),
            dir.path().join("x_2.png")
        );
    }

    #[test]
    fn test_saved_png_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler_in(dir.path(), "demo_");
        let saved = handler.save_png(&red_pixel(), "pixel", None).unwrap();

        let decoded = ::image::open(&saved.path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (1, 1));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_link_relative_to_document() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("img");
        let handler = handler_in(&images, "demo_");
        let document = dir.path().join("notes.md");

        let saved = handler.save_png(&red_pixel(), "a", Some(&document)).unwrap();
        assert_eq!(saved.link, "img/demo_a.png");
        assert_eq!(saved.markdown, "![demo_a](img/demo_a.png)\n");
    }

    #[test]
    fn test_link_absolute_without_document() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler_in(dir.path(), "");
        let saved = handler.save_png(&red_pixel(), "a", None).unwrap();
        assert_eq!(PathBuf::from(&saved.link), dir.path().join("a.png"));
    }

    #[test]
    fn test_missing_folder() {
        let handler = ImageHandler::new(ImageConfig::default());
        assert!(matches!(
            handler.resolve_target("a"),
            Err(ImageError::NoSaveFolder)
        ));
    }

    #[test]
    fn test_new_creates_configured_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("later").join("images");
        let handler = handler_in(&folder, "");
        assert!(folder.is_dir());
        assert_eq!(handler.usable_folder(), Some(folder.as_path()));
    }

    #[test]
    fn test_removed_folder_is_not_usable() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("images");
        let handler = handler_in(&folder, "");
        std::fs::remove_dir_all(&folder).unwrap();
        assert!(handler.usable_folder().is_none());
        assert!(matches!(
            handler.save_png(&red_pixel(), "a", None),
            Err(ImageError::NoSaveFolder)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_leaves_no_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let handler = handler_in(dir.path(), "");
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions
        if std::fs::write(dir.path().join("probe"), b"").is_ok() {
            return;
        }
        let result = handler.save_png(&red_pixel(), "a", None);
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(ImageError::WriteError { .. })));
        assert!(!dir.path().join("a.png").exists());
    }

    #[test]
    fn test_set_name_prefix_ignores_empty() {
        let mut handler = handler_in(Path::new("/tmp"), "demo_");
        assert!(!handler.set_name_prefix(""));
        assert_eq!(handler.name_prefix(), "demo_");
        assert!(handler.set_name_prefix("project_"));
        assert_eq!(handler.name_prefix(), "project_");
    }

    #[test]
    fn test_default_base_name() {
        let name = ImageHandler::default_base_name();
        assert!(name.starts_with("pasted_"));
        assert!(name["pasted_".len()..].parse::<i64>().is_ok());
    }
}
