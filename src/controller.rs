//! Window controller
//!
//! [`EditorController`] owns everything behind the main window: the open
//! document, the image handler, the preview pipeline, the theme and the
//! debounce timer. The window drives it with plain method calls and is told
//! about visible changes through [`WindowListener`]s.
//!
//! Errors are returned, never shown. The presentation layer decides whether
//! an error becomes a dialog or a status message.

use crate::config::{Config, UiConfig, APP_TITLE, PREVIEW_DEBOUNCE_MS, STATUS_MESSAGE_MS};
use crate::editor::ClipboardImage;
use crate::error::{AppError, AppResult};
use crate::file_handler::{self, DropItem};
use crate::markdown::export;
use crate::markdown::{Converter, ImageHandler, PreviewHandler, PreviewTarget, SavedImage};
use crate::state::Document;
use crate::theme::{Theme, ThemeManager, ThemeStyles};
use crate::utils::path::file_name;
use crate::utils::{Debouncer, Ticket};
use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Shown when no image folder has been chosen yet
pub const NO_FOLDER_MESSAGE: &str = "No default folder set";

/// Something the window has to reflect
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The window title changed
    TitleChanged(String),
    /// Transient status bar message
    StatusMessage { text: String, timeout_ms: u64 },
    /// Image folder or prefix changed
    StatusLabelsChanged(StatusLabels),
    /// A new page was pushed to the preview target
    PreviewUpdated,
    ThemeChanged(Theme),
    /// The document was loaded or reset; the editor must show its text
    DocumentReplaced,
    /// A persisted setting changed and should be written out
    SettingsChanged,
}

/// Observer of controller events
pub trait WindowListener: Send {
    fn on_event(&mut self, event: &WindowEvent);
}

/// Listener that queues events for the window to drain
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<VecDeque<WindowEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued event, oldest first
    pub fn drain(&self) -> Vec<WindowEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl WindowListener for EventLog {
    fn on_event(&mut self, event: &WindowEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event.clone());
    }
}

/// Permanent status bar labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLabels {
    pub folder: String,
    pub folder_tooltip: String,
    pub prefix: String,
    pub prefix_tooltip: String,
}

impl StatusLabels {
    pub fn new(folder: Option<&Path>, prefix: &str) -> Self {
        let (name, full) = match folder {
            Some(folder) => (file_name(folder), folder.display().to_string()),
            None => (NO_FOLDER_MESSAGE.to_string(), NO_FOLDER_MESSAGE.to_string()),
        };
        Self {
            folder: format!("📁 {}", name),
            folder_tooltip: format!("Image folder: {}", full),
            prefix: format!("🏷️ {}", prefix),
            prefix_tooltip: format!("Image name prefix: {}", prefix),
        }
    }
}

/// A pasted image waiting for the save folder to be chosen
#[derive(Debug, Clone)]
pub struct PendingPaste {
    image: ClipboardImage,
    name: String,
}

impl PendingPaste {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of [`EditorController::confirm_image_name`]
#[derive(Debug, Clone)]
pub enum PasteStep {
    /// Written; splice `markdown` at the cursor
    Saved(SavedImage),
    /// Ask for a folder, then call [`EditorController::finish_image_paste`]
    NeedsFolder(PendingPaste),
}

/// Result of a plain Save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The document has no path yet; ask for one and call `save_as`
    NeedsPath,
}

/// Controller behind the main window
pub struct EditorController<T: PreviewTarget> {
    config: Config,
    document: Document,
    images: ImageHandler,
    preview: PreviewHandler<T>,
    theme: ThemeManager,
    debouncer: Debouncer,
    listeners: Vec<Box<dyn WindowListener>>,
}

impl<T: PreviewTarget> EditorController<T> {
    /// Controller with the default pandoc-then-pulldown-cmark converter
    pub fn new(config: Config, target: T) -> Self {
        Self::with_converter(config, Converter::default(), target)
    }

    pub fn with_converter(config: Config, converter: Converter, target: T) -> Self {
        let images = ImageHandler::new(config.images.clone());
        let theme = ThemeManager::new(config.ui.night_mode);
        log::debug!(
            "Controller created (renderers: {:?}, theme: {:?})",
            converter.renderer_names(),
            theme.theme()
        );

        Self {
            config,
            document: Document::new(),
            images,
            preview: PreviewHandler::new(converter, target),
            theme,
            debouncer: Debouncer::from_millis(PREVIEW_DEBOUNCE_MS),
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: impl WindowListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: WindowEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    // -- accessors --

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn preview(&self) -> &T {
        self.preview.target()
    }

    pub fn render_count(&self) -> u64 {
        self.preview.render_count()
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn styles(&self) -> ThemeStyles {
        self.theme.styles()
    }

    pub fn images(&self) -> &ImageHandler {
        &self.images
    }

    pub fn split_ratio(&self) -> f32 {
        self.config.ui.split_ratio
    }

    pub fn ui_config(&self) -> &UiConfig {
        &self.config.ui
    }

    /// Current settings, ready to be persisted
    pub fn config(&self) -> Config {
        let mut config = self.config.clone();
        config.images = self.images.config().clone();
        config.ui.night_mode = self.theme.is_night_mode();
        config
    }

    // -- preview --

    /// Mirror an edit from the editor widget; restarts the debounce timer
    ///
    /// The widget owns the text and the cursor. Every insertion the
    /// controller hands out reaches the document through here.
    pub fn text_changed(&mut self, text: &str) -> Ticket {
        let was_modified = self.document.is_modified();
        self.document.set_text(text);
        if !was_modified {
            let title = self.window_title();
            self.emit(WindowEvent::TitleChanged(title));
        }
        self.debouncer.schedule()
    }

    /// Future the window awaits before calling [`debounce_elapsed`](Self::debounce_elapsed)
    pub fn debounce_wait(&self, ticket: Ticket) -> impl Future<Output = Ticket> + Send + 'static {
        self.debouncer.wait(ticket)
    }

    /// Render if `ticket` is still the latest; stale tickets are ignored
    pub fn debounce_elapsed(&mut self, ticket: Ticket) -> bool {
        if !self.debouncer.fire(ticket) {
            return false;
        }
        self.render();
        true
    }

    pub fn is_preview_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Render now and drop any pending debounce
    pub fn refresh_preview(&mut self) {
        self.debouncer.cancel();
        self.render();
    }

    fn render(&mut self) {
        let text = self.document.text();
        self.preview.refresh(&text, self.theme.theme());
        self.emit(WindowEvent::PreviewUpdated);
    }

    // -- document lifecycle --

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    /// Title and body of the Save / Discard / Cancel prompt
    pub fn save_prompt(&self) -> (String, String) {
        (
            "Save Changes?".to_string(),
            format!(
                "The document '{}' has been modified.\nSave changes?",
                self.document.display_name()
            ),
        )
    }

    /// Start over with an empty untitled document
    pub fn new_document(&mut self) {
        self.document.reset();
        self.preview.target_mut().set_document_dir(None);
        self.document_replaced();
    }

    /// Load `path`; on error the current document is left untouched
    pub fn open(&mut self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        let text = file_handler::load_text(path).map_err(|e| {
            log::error!("Failed to open {}: {}", path.display(), e);
            AppError::from(e)
        })?;

        self.document.load(path, &text);
        self.preview
            .target_mut()
            .set_document_dir(self.document.directory());
        log::info!("Opened {}", path.display());

        self.document_replaced();
        self.status(format!("Loaded: {}", self.document.display_name()));
        Ok(())
    }

    fn document_replaced(&mut self) {
        self.debouncer.cancel();
        self.emit(WindowEvent::DocumentReplaced);
        let title = self.window_title();
        self.emit(WindowEvent::TitleChanged(title));
        self.render();
    }

    /// Save to the current path
    pub fn save(&mut self) -> AppResult<SaveOutcome> {
        match self.document.path().map(Path::to_path_buf) {
            Some(path) => self.save_as(path).map(SaveOutcome::Saved),
            None => Ok(SaveOutcome::NeedsPath),
        }
    }

    /// Save under a new name; `.md` is appended when missing
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> AppResult<PathBuf> {
        let path = file_handler::with_markdown_extension(path.into());
        file_handler::save_text(&path, &self.document.text()).map_err(|e| {
            log::error!("Failed to save {}: {}", path.display(), e);
            AppError::from(e)
        })?;

        let moved = self.document.path() != Some(path.as_path());
        self.document.mark_saved(&path);
        log::info!("Saved {}", path.display());

        let title = self.window_title();
        self.emit(WindowEvent::TitleChanged(title));
        self.status(format!("Saved: {}", self.document.display_name()));

        if moved {
            self.preview
                .target_mut()
                .set_document_dir(self.document.directory());
            self.render();
        }
        Ok(path)
    }

    /// Export the current text as a themed HTML page
    pub fn export_html(&self, output: &Path) -> AppResult<()> {
        export::export_html(
            self.preview.converter(),
            &self.document.text(),
            self.theme.theme(),
            output,
        )
        .map_err(|e| {
            log::error!("Failed to export {}: {}", output.display(), e);
            AppError::from(e)
        })
    }

    fn status(&mut self, text: String) {
        self.emit(WindowEvent::StatusMessage {
            text,
            timeout_ms: STATUS_MESSAGE_MS,
        });
    }

    // -- drag and drop --

    /// Whether a drop should be accepted at all
    pub fn accept_drop(&self, items: &[DropItem]) -> bool {
        file_handler::accepts(items)
    }

    /// The file a drop opens: the first local markdown file
    pub fn dropped_markdown(&self, items: &[DropItem]) -> Option<PathBuf> {
        let path = file_handler::markdown_paths(items).into_iter().next();
        if path.is_none() {
            log::debug!("Ignoring drop of {} item(s)", items.len());
        }
        path
    }

    // -- theme --

    pub fn toggle_night_mode(&mut self) -> Theme {
        let theme = self.theme.toggle();
        self.config.ui.night_mode = theme.is_dark();
        self.emit(WindowEvent::ThemeChanged(theme));
        self.emit(WindowEvent::SettingsChanged);
        self.render();
        theme
    }

    // -- images --

    /// The folder must be chosen before an image can be saved
    pub fn needs_image_folder(&self) -> bool {
        self.images.usable_folder().is_none()
    }

    pub fn suggested_image_name(&self) -> String {
        ImageHandler::default_base_name()
    }

    /// Second step of a paste, after the name prompt was confirmed
    ///
    /// Nothing is touched when the name is invalid. Without a usable folder
    /// the paste is parked and the window asks for one; cancelling that
    /// prompt just drops the [`PendingPaste`].
    pub fn confirm_image_name(
        &mut self,
        image: ClipboardImage,
        name: &str,
    ) -> AppResult<PasteStep> {
        self.images.file_name_for(name)?;
        if self.needs_image_folder() {
            log::debug!("No image folder yet; asking before saving {:?}", name);
            return Ok(PasteStep::NeedsFolder(PendingPaste {
                image,
                name: name.to_string(),
            }));
        }
        self.paste_image(&image, name).map(PasteStep::Saved)
    }

    /// Store the chosen folder, then save the parked image
    pub fn finish_image_paste(
        &mut self,
        pending: PendingPaste,
        folder: impl Into<PathBuf>,
    ) -> AppResult<SavedImage> {
        self.set_image_folder(folder)?;
        self.paste_image(&pending.image, &pending.name)
    }

    /// Save a pasted image and build its link
    ///
    /// The document is not edited here. The window splices
    /// `saved.markdown` at its cursor and reports the new text through
    /// [`text_changed`](Self::text_changed).
    pub fn paste_image(&mut self, image: &ClipboardImage, name: &str) -> AppResult<SavedImage> {
        self.images
            .save_png(image, name, self.document.path())
            .map_err(|e| {
                log::error!("Failed to save pasted image: {}", e);
                AppError::from(e)
            })
    }

    /// Markdown linking an existing image file, relative to the document
    pub fn insert_image_link(&self, image: &Path) -> String {
        ImageHandler::link_for(image, self.document.path()).markdown
    }

    pub fn set_image_folder(&mut self, folder: impl Into<PathBuf>) -> AppResult<()> {
        self.images.set_save_folder(folder).map_err(|e| {
            log::error!("Failed to set image folder: {}", e);
            AppError::from(e)
        })?;
        self.config.images = self.images.config().clone();
        self.settings_changed();
        Ok(())
    }

    /// Returns whether the prefix changed; empty input is ignored
    pub fn set_name_prefix(&mut self, prefix: &str) -> bool {
        if !self.images.set_name_prefix(prefix) {
            return false;
        }
        log::info!("Image name prefix set to {:?}", prefix);
        self.config.images = self.images.config().clone();
        self.settings_changed();
        true
    }

    fn settings_changed(&mut self) {
        let labels = self.status_labels();
        self.emit(WindowEvent::StatusLabelsChanged(labels));
        self.status("Ready".to_string());
        self.emit(WindowEvent::SettingsChanged);
    }

    // -- layout --

    /// Move the pane split; positive steps grow the editor
    pub fn nudge_split(&mut self, steps: i32) -> f32 {
        self.config.ui.nudge_split(steps);
        self.emit(WindowEvent::SettingsChanged);
        self.config.ui.split_ratio
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.config.ui.window_size = (width, height);
    }

    // -- labels --

    /// `Markdown Editor - name.md •`
    pub fn window_title(&self) -> String {
        let mut title = APP_TITLE.to_string();
        if let Some(path) = self.document.path() {
            title.push_str(" - ");
            title.push_str(&file_name(path));
        }
        if self.document.is_modified() {
            title.push_str(" •");
        }
        title
    }

    pub fn status_labels(&self) -> StatusLabels {
        StatusLabels::new(self.images.save_folder(), self.images.name_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;
    use crate::markdown::convert::{ConvertError, ConvertResult, PageStatus, Renderer};
    use crate::markdown::{HtmlPreview, NativePreview, PreviewElement};
    use crate::markdown::ImageError;
    use std::fs;
    use tempfile::TempDir;

    /// Records every text it is asked to render
    #[derive(Clone, Default)]
    struct Recorder {
        inputs: Arc<Mutex<Vec<String>>>,
    }

    impl Renderer for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn render(&self, markdown: &str) -> ConvertResult<String> {
            self.inputs.lock().unwrap().push(markdown.to_string());
            Ok(format!("<p>{}</p>", markdown))
        }
    }

    fn controller() -> (EditorController<HtmlPreview>, Recorder, EventLog) {
        let recorder = Recorder::default();
        let converter = Converter::new(vec![Box::new(recorder.clone())]);
        let mut controller =
            EditorController::with_converter(Config::default(), converter, HtmlPreview::default());
        let log = EventLog::new();
        controller.add_listener(log.clone());
        (controller, recorder, log)
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_burst_converts_once_with_last_text() {
        let (mut controller, recorder, _log) = controller();

        let mut tickets = Vec::new();
        for text in ["#", "# H", "# He", "# Hello"] {
            tickets.push(controller.text_changed(text));
        }

        let mut rendered = 0;
        for ticket in tickets {
            let ticket = controller.debounce_wait(ticket).await;
            if controller.debounce_elapsed(ticket) {
                rendered += 1;
            }
        }

        assert_eq!(rendered, 1);
        assert_eq!(controller.render_count(), 1);
        assert_eq!(*recorder.inputs.lock().unwrap(), vec!["# Hello".to_string()]);
        assert!(controller.preview().html.contains("<p># Hello</p>"));
    }

    #[test]
    fn test_refresh_cancels_pending_render() {
        let (mut controller, recorder, _log) = controller();
        let ticket = controller.text_changed("text");
        assert!(controller.is_preview_pending());
        controller.refresh_preview();

        assert!(!controller.is_preview_pending());
        assert!(!controller.debounce_elapsed(ticket));
        assert_eq!(recorder.inputs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_open_invalid_utf8_leaves_document_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let (mut controller, _recorder, log) = controller();
        controller.text_changed("keep me");
        log.drain();

        let err = controller.open(&path).unwrap_err();
        assert_eq!(err.dialog_title(), "Encoding Error");
        assert_eq!(controller.document().text(), "keep me");
        assert!(controller.is_modified());
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_open_replaces_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Notes").unwrap();

        let (mut controller, _recorder, log) = controller();
        controller.text_changed("scratch");
        controller.open(&path).unwrap();

        assert_eq!(controller.document().text(), "# Notes");
        assert!(!controller.is_modified());
        assert_eq!(controller.window_title(), "Markdown Editor - notes.md");

        let events = log.drain();
        assert!(events.contains(&WindowEvent::DocumentReplaced));
        assert!(events.contains(&WindowEvent::StatusMessage {
            text: "Loaded: notes.md".to_string(),
            timeout_ms: STATUS_MESSAGE_MS,
        }));
    }

    #[test]
    fn test_save_without_path_asks_for_one() {
        let (mut controller, _recorder, _log) = controller();
        controller.text_changed("draft");
        assert_eq!(controller.save().unwrap(), SaveOutcome::NeedsPath);
        assert!(controller.is_modified());
    }

    #[test]
    fn test_save_as_appends_extension() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _recorder, _log) = controller();
        controller.text_changed("body");

        let saved = controller.save_as(dir.path().join("draft")).unwrap();
        assert_eq!(saved, dir.path().join("draft.md"));
        assert_eq!(fs::read_to_string(&saved).unwrap(), "body");
        assert!(!controller.is_modified());
        assert_eq!(controller.window_title(), "Markdown Editor - draft.md");

        controller.text_changed("body 2");
        assert_eq!(controller.save().unwrap(), SaveOutcome::Saved(saved.clone()));
        assert_eq!(fs::read_to_string(&saved).unwrap(), "body 2");
    }

    #[test]
    fn test_drop_rejects_non_markdown() {
        let (controller, _recorder, _log) = controller();
        let items = vec![
            DropItem::Path(PathBuf::from("/tmp/picture.png")),
            DropItem::Uri("https://example.com/readme.md".to_string()),
        ];
        assert!(!controller.accept_drop(&items));
        assert_eq!(controller.dropped_markdown(&items), None);

        let items = vec![DropItem::Uri("file:///tmp/readme.md".to_string())];
        assert!(controller.accept_drop(&items));
        assert_eq!(
            controller.dropped_markdown(&items),
            Some(PathBuf::from("/tmp/readme.md"))
        );
    }

    #[test]
    fn test_toggle_night_mode_twice_restores_page_and_styles() {
        let (mut controller, _recorder, _log) = controller();
        controller.text_changed("# Title");
        controller.refresh_preview();
        let page = controller.preview().html.clone();
        let styles = controller.styles();

        assert_eq!(controller.toggle_night_mode(), Theme::Dark);
        assert_ne!(controller.preview().html, page);
        assert!(controller.config().ui.night_mode);

        assert_eq!(controller.toggle_night_mode(), Theme::Light);
        assert_eq!(controller.preview().html, page);
        assert_eq!(controller.styles(), styles);
        assert!(!controller.config().ui.night_mode);
    }

    #[test]
    fn test_window_title() {
        let (mut controller, _recorder, log) = controller();
        assert_eq!(controller.window_title(), "Markdown Editor");

        controller.text_changed("x");
        assert_eq!(controller.window_title(), "Markdown Editor •");
        controller.text_changed("xy");
        let titles: Vec<_> = log
            .drain()
            .into_iter()
            .filter(|e| matches!(e, WindowEvent::TitleChanged(_)))
            .collect();
        assert_eq!(
            titles,
            vec![WindowEvent::TitleChanged("Markdown Editor •".to_string())]
        );

        controller.new_document();
        assert_eq!(controller.window_title(), "Markdown Editor");
    }

    #[test]
    fn test_paste_image_returns_relative_link() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("img");
        let (mut controller, _recorder, _log) = controller();
        controller.set_image_folder(&images).unwrap();
        controller.text_changed("before ");
        controller.save_as(dir.path().join("doc.md")).unwrap();

        let image = ClipboardImage::new(1, 1, vec![255, 0, 0, 255]);
        let saved = controller.paste_image(&image, "shot").unwrap();

        assert_eq!(saved.path, images.join("demo_shot.png"));
        assert!(saved.path.exists());
        assert_eq!(saved.markdown, "![demo_shot](img/demo_shot.png)\n");
        assert_eq!(controller.document().text(), "before ");
        assert!(!controller.is_modified());

        controller.text_changed(&format!("before {}", saved.markdown));
        assert_eq!(
            controller.document().text(),
            "before ![demo_shot](img/demo_shot.png)\n"
        );
        assert!(controller.is_modified());
    }

    #[test]
    fn test_paste_image_leaves_text_to_the_editor() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _recorder, _log) = controller();
        controller.set_image_folder(dir.path()).unwrap();
        controller.text_changed("hello world");

        let image = ClipboardImage::new(1, 1, vec![0, 0, 255, 255]);
        controller.paste_image(&image, "x").unwrap();
        assert_eq!(controller.document().text(), "hello world");
    }

    #[test]
    fn test_paste_image_without_folder_writes_nothing() {
        let (mut controller, _recorder, _log) = controller();
        controller.text_changed("text");
        assert!(controller.needs_image_folder());

        let image = ClipboardImage::new(1, 1, vec![0, 0, 0, 255]);
        let err = controller.paste_image(&image, "shot").unwrap_err();
        assert!(matches!(err, AppError::Image(ImageError::NoSaveFolder)));
        assert_eq!(controller.document().text(), "text");
    }

    #[test]
    fn test_name_is_confirmed_before_folder_is_stored() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("shots");
        let (mut controller, _recorder, log) = controller();
        log.drain();

        let image = ClipboardImage::new(1, 1, vec![10, 20, 30, 255]);
        let step = controller.confirm_image_name(image, "diagram").unwrap();
        let PasteStep::NeedsFolder(pending) = step else {
            panic!("expected a folder prompt");
        };
        assert_eq!(pending.name(), "diagram");

        // Nothing persisted or created while the folder prompt is open
        assert!(!folder.exists());
        assert_eq!(controller.config().images.save_folder, None);
        assert!(log.drain().is_empty());

        let saved = controller.finish_image_paste(pending, &folder).unwrap();
        assert_eq!(saved.path, folder.join("demo_diagram.png"));
        assert!(saved.path.exists());
        assert_eq!(controller.config().images.save_folder, Some(folder.clone()));
        assert!(log.drain().contains(&WindowEvent::SettingsChanged));
    }

    #[test]
    fn test_confirm_image_name_with_folder_saves_at_once() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _recorder, _log) = controller();
        controller.set_image_folder(dir.path()).unwrap();

        let image = ClipboardImage::new(1, 1, vec![1, 2, 3, 255]);
        match controller.confirm_image_name(image, "a b ").unwrap() {
            PasteStep::Saved(saved) => {
                assert_eq!(saved.path, dir.path().join("demo_a b .png"));
            }
            PasteStep::NeedsFolder(_) => panic!("folder is already set"),
        }
    }

    #[test]
    fn test_invalid_name_is_rejected_before_folder_prompt() {
        let (mut controller, _recorder, log) = controller();
        log.drain();

        let image = ClipboardImage::new(1, 1, vec![0, 0, 0, 255]);
        let err = controller.confirm_image_name(image, "  ").unwrap_err();
        assert!(matches!(err, AppError::Image(ImageError::InvalidName(_))));
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_insert_image_link_uses_file_stem() {
        let (mut controller, _recorder, _log) = controller();
        controller.text_changed("text");
        let markdown = controller.insert_image_link(Path::new("/pics/cat photo.png"));
        assert_eq!(markdown, "![cat photo](/pics/cat photo.png)\n");
        assert_eq!(controller.document().text(), "text");
    }

    #[test]
    fn test_settings_update_labels_and_config() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _recorder, log) = controller();
        assert_eq!(controller.status_labels().folder, "📁 No default folder set");

        controller.set_image_folder(dir.path().join("shots")).unwrap();
        assert!(!controller.set_name_prefix(""));
        assert!(controller.set_name_prefix("project_"));

        let labels = controller.status_labels();
        assert_eq!(labels.folder, "📁 shots");
        assert_eq!(labels.prefix, "🏷️ project_");
        assert_eq!(labels.prefix_tooltip, "Image name prefix: project_");

        let config = controller.config();
        assert_eq!(
            config.images,
            ImageConfig {
                save_folder: Some(dir.path().join("shots")),
                name_prefix: "project_".to_string(),
            }
        );
        assert!(log.drain().contains(&WindowEvent::SettingsChanged));
    }

    /// Renderer that always fails
    struct Broken;

    impl Renderer for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn render(&self, _markdown: &str) -> ConvertResult<String> {
            Err(ConvertError::Failed {
                renderer: "broken",
                message: "exit status 1".to_string(),
            })
        }
    }

    #[test]
    fn test_conversion_error_reaches_native_pane() {
        let converter = Converter::new(vec![Box::new(Broken), Box::new(Broken)]);
        let mut controller =
            EditorController::with_converter(Config::default(), converter, NativePreview::new());

        controller.text_changed("# Title");
        controller.refresh_preview();

        let message = "Markdown conversion error: broken failed: exit status 1";
        let pane = controller.preview();
        assert_eq!(pane.status(), &PageStatus::Failed(message.to_string()));
        assert_eq!(pane.elements(), &[PreviewElement::Error(message.to_string())]);
        assert!(pane.html().contains(message));
    }

    #[test]
    fn test_nudge_split_is_clamped() {
        let (mut controller, _recorder, _log) = controller();
        for _ in 0..20 {
            controller.nudge_split(1);
        }
        assert!((controller.split_ratio() - 0.8).abs() < f32::EPSILON);
    }
}
