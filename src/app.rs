//! Main application module implementing the Cosmic Application trait
//!
//! The window keeps the editor widget content and the modal dialog. Every
//! other piece of state lives in the [`EditorController`]; its events are
//! drained after each update and applied to the window.

use crate::menu::{self, Action as MenuAction};
use crate::message::{
    ClipboardMessage, DialogMessage, EditorMessage, FileMessage, ImageMessage, Message,
    PendingAction, PreviewMessage, SystemMessage, ViewMessage,
};
use crate::ui::{self, DialogPage};

use cosmic::app::{Core, Task};
use cosmic::iced::window;
use cosmic::widget::menu::KeyBind;
use cosmic::widget::text_editor::{self, Edit, Motion};
use cosmic::{Application, ApplicationExt, Element};
use cosmic_mdedit::config::{Config, APP_ID, STATUS_MESSAGE_MS};
use cosmic_mdedit::controller::{
    EditorController, EventLog, PasteStep, PendingPaste, SaveOutcome, StatusLabels, WindowEvent,
};
use cosmic_mdedit::editor::{ClipboardContent, ClipboardImage, ClipboardManager};
use cosmic_mdedit::error::{AppError, ClipboardError};
use cosmic_mdedit::file_handler;
use cosmic_mdedit::markdown::export::{self, BROWSER_PREVIEW_FILE};
use cosmic_mdedit::markdown::{ImageHandler, NativePreview};
use cosmic_mdedit::theme::Theme;
use cosmic_mdedit::utils::path::file_name;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Markdown editor application
pub struct MdEdit {
    /// libCosmic core reference
    core: Core,

    /// Document, preview, images, theme and settings
    pub controller: EditorController<NativePreview>,

    /// Controller events waiting to be applied
    events: EventLog,

    /// Text editor widget content
    pub editor: text_editor::Content,

    /// Folder and prefix labels
    pub labels: StatusLabels,

    /// Transient status message
    pub status_message: Option<String>,

    /// Identifies the latest status message so stale timeouts are ignored
    status_id: u64,

    /// Open modal dialog
    pub dialog: Option<DialogPage>,

    /// Named image held while the save folder is being chosen
    pending_paste: Option<PendingPaste>,

    clipboard: ClipboardManager,

    /// Keyboard shortcut bindings
    key_binds: HashMap<KeyBind, MenuAction>,
}

/// Application flags passed during initialization
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// File to open on startup
    pub file: Option<PathBuf>,

    /// Settings loaded before the window was created
    pub config: Config,
}

impl Application for MdEdit {
    /// Executor for async tasks
    type Executor = cosmic::executor::Default;

    /// Application flags
    type Flags = Flags;

    /// Application message type
    type Message = Message;

    /// Application ID following reverse-DNS convention
    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// Initialize the application
    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Self::Message>) {
        let events = EventLog::new();
        let mut controller = EditorController::new(flags.config, NativePreview::new());
        controller.add_listener(events.clone());

        let labels = controller.status_labels();
        let theme = controller.theme();

        let mut app = Self {
            core,
            controller,
            events,
            editor: text_editor::Content::new(),
            labels,
            status_message: None,
            status_id: 0,
            dialog: None,
            pending_paste: None,
            clipboard: ClipboardManager::new(),
            key_binds: menu::key_binds(),
        };

        let title = app.controller.window_title();
        app.set_header_title(title);
        app.controller.refresh_preview();

        let mut tasks = vec![cosmic::command::set_theme(cosmic_theme(theme))];
        if let Some(path) = flags.file {
            tasks.push(Task::done(cosmic::Action::App(Message::File(
                FileMessage::OpenPath(path),
            ))));
        }
        tasks.push(app.apply_events());

        (app, Task::batch(tasks))
    }

    /// Handle incoming messages
    fn update(&mut self, message: Self::Message) -> Task<Self::Message> {
        let task = match message {
            Message::File(msg) => self.handle_file_message(msg),
            Message::Editor(msg) => self.handle_editor_message(msg),
            Message::Clipboard(msg) => self.handle_clipboard_message(msg),
            Message::Preview(msg) => self.handle_preview_message(msg),
            Message::Images(msg) => self.handle_image_message(msg),
            Message::View(msg) => self.handle_view_message(msg),
            Message::Dialog(msg) => self.handle_dialog_message(msg),
            Message::System(msg) => self.handle_system_message(msg),
            Message::Surface(_) => Task::none(), // Surface actions are handled by libcosmic
            Message::None => Task::none(),
        };

        Task::batch([task, self.apply_events()])
    }

    /// Render the application view
    fn view(&self) -> Element<'_, Self::Message> {
        ui::view(self)
    }

    /// Modal dialog, if one is open
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        self.dialog.as_ref().map(ui::dialogs::view)
    }

    /// Handle subscription events
    fn subscription(&self) -> cosmic::iced::Subscription<Self::Message> {
        menu::window_events_subscription()
    }

    /// Elements to show at the start of the header bar (menu bar)
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        use cosmic::widget::menu::ItemHeight;
        use cosmic::widget::responsive_menu_bar;

        let menu_bar = responsive_menu_bar()
            .item_height(ItemHeight::Dynamic(40))
            .into_element(
                self.core(),
                &self.key_binds,
                cosmic::widget::Id::new("menu-bar"),
                Message::Surface, // Surface action wrapper
                menu::menu_items(self.controller.theme().is_dark()),
            );

        vec![menu_bar]
    }

    /// Called when the application is about to close
    fn on_close_requested(&self, _id: window::Id) -> Option<Self::Message> {
        Some(Message::System(SystemMessage::CloseRequested))
    }
}

impl MdEdit {
    /// Helper to wrap message in cosmic Action
    fn app_message(msg: Message) -> cosmic::Action<Message> {
        cosmic::Action::App(msg)
    }

    /// Apply queued controller events to the window
    fn apply_events(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();

        for event in self.events.drain() {
            match event {
                WindowEvent::TitleChanged(title) => self.set_header_title(title),
                WindowEvent::StatusMessage { text, timeout_ms } => {
                    tasks.push(self.show_status(text, timeout_ms));
                }
                WindowEvent::StatusLabelsChanged(labels) => self.labels = labels,
                WindowEvent::PreviewUpdated => {}
                WindowEvent::ThemeChanged(theme) => {
                    tasks.push(cosmic::command::set_theme(cosmic_theme(theme)));
                }
                WindowEvent::DocumentReplaced => {
                    self.editor = text_editor::Content::with_text(&self.controller.document().text());
                }
                WindowEvent::SettingsChanged => self.save_config(),
            }
        }

        Task::batch(tasks)
    }

    fn show_status(&mut self, text: String, timeout_ms: u64) -> Task<Message> {
        self.status_id += 1;
        self.status_message = Some(text);
        let id = self.status_id;
        Task::perform(
            tokio::time::sleep(Duration::from_millis(timeout_ms)),
            move |_| Self::app_message(Message::System(SystemMessage::ClearStatus(id))),
        )
    }

    fn show_error(&mut self, error: &AppError) {
        self.dialog = Some(DialogPage::Error {
            title: error.dialog_title().to_string(),
            body: error.user_message(),
        });
    }

    fn save_config(&self) {
        if let Err(e) = self.controller.config().save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    /// Push the widget text to the controller and restart the debounce
    fn editor_changed(&mut self) -> Task<Message> {
        let ticket = self.controller.text_changed(&self.editor.text());
        Task::perform(self.controller.debounce_wait(ticket), |ticket| {
            Self::app_message(Message::Preview(PreviewMessage::DebounceElapsed(ticket)))
        })
    }

    /// Insert `text` at the cursor, replacing the selection
    fn insert_text(&mut self, text: String) -> Task<Message> {
        self.editor
            .perform(text_editor::Action::Edit(Edit::Paste(Arc::new(text))));
        self.editor_changed()
    }

    /// Run `action` now, or ask about unsaved changes first
    fn guard(&mut self, action: PendingAction) -> Task<Message> {
        if self.controller.is_modified() {
            let (title, body) = self.controller.save_prompt();
            self.dialog = Some(DialogPage::SaveChanges {
                pending: action,
                title,
                body,
            });
            return Task::none();
        }
        self.proceed(action)
    }

    fn proceed(&mut self, action: PendingAction) -> Task<Message> {
        match action {
            PendingAction::New => {
                self.controller.new_document();
                Task::none()
            }
            PendingAction::Open => {
                let dir = self.document_dir();
                Task::perform(pick_markdown_file(dir), |path| {
                    Self::app_message(Message::File(FileMessage::OpenPicked(path)))
                })
            }
            PendingAction::OpenPath(path) => {
                self.open_path(&path);
                Task::none()
            }
            PendingAction::Quit => self.quit(),
        }
    }

    fn open_path(&mut self, path: &Path) {
        if let Err(e) = self.controller.open(path) {
            self.show_error(&e);
        }
    }

    /// Save, asking for a path when the document has none
    fn save(&mut self, then: Option<PendingAction>) -> Task<Message> {
        match self.controller.save() {
            Ok(SaveOutcome::Saved(_)) => match then {
                Some(action) => self.proceed(action),
                None => Task::none(),
            },
            Ok(SaveOutcome::NeedsPath) => self.pick_save_path(then),
            Err(e) => {
                self.show_error(&e);
                Task::none()
            }
        }
    }

    fn pick_save_path(&self, then: Option<PendingAction>) -> Task<Message> {
        let dir = self.document_dir();
        let name = self.controller.document().display_name();
        Task::perform(pick_save_file(dir, name), move |path| {
            Self::app_message(Message::File(FileMessage::SaveAsPicked {
                path,
                then: then.clone(),
            }))
        })
    }

    fn document_dir(&self) -> Option<PathBuf> {
        self.controller.document().directory().map(Path::to_path_buf)
    }

    fn quit(&mut self) -> Task<Message> {
        log::info!("Quitting");
        self.save_config();
        std::process::exit(0);
    }

    /// Ask for the image name; nothing is saved until it is confirmed
    fn begin_image_paste(&mut self, image: ClipboardImage) -> Task<Message> {
        self.dialog = Some(DialogPage::ImageName {
            image,
            prefix: self.controller.images().name_prefix().to_string(),
            name: self.controller.suggested_image_name(),
        });
        Task::none()
    }

    fn pick_paste_folder(&mut self, pending: PendingPaste) -> Task<Message> {
        self.pending_paste = Some(pending);
        let start = self
            .controller
            .images()
            .save_folder()
            .map(Path::to_path_buf)
            .unwrap_or_else(ImageHandler::default_folder);
        Task::perform(pick_folder("Select Image Save Location", start), |folder| {
            Self::app_message(Message::Images(ImageMessage::FolderPickedForPaste(folder)))
        })
    }

    /// Handle file-related messages
    fn handle_file_message(&mut self, msg: FileMessage) -> Task<Message> {
        match msg {
            FileMessage::New => self.guard(PendingAction::New),

            FileMessage::Open => self.guard(PendingAction::Open),

            FileMessage::OpenPicked(Some(path)) => {
                self.open_path(&path);
                Task::none()
            }

            FileMessage::OpenPicked(None) => Task::none(),

            FileMessage::OpenPath(path) => self.guard(PendingAction::OpenPath(path)),

            FileMessage::Dropped(items) => {
                if !self.controller.accept_drop(&items) {
                    return Task::none();
                }
                match self.controller.dropped_markdown(&items) {
                    Some(path) => self.guard(PendingAction::OpenPath(path)),
                    None => Task::none(),
                }
            }

            FileMessage::Save => self.save(None),

            FileMessage::SaveAs => self.pick_save_path(None),

            FileMessage::SaveAsPicked {
                path: Some(path),
                then,
            } => match self.controller.save_as(path) {
                Ok(_) => match then {
                    Some(action) => self.proceed(action),
                    None => Task::none(),
                },
                Err(e) => {
                    self.show_error(&e);
                    Task::none()
                }
            },

            FileMessage::SaveAsPicked { path: None, .. } => Task::none(),

            FileMessage::ExportHtml => {
                let suggested = export::suggest_output_path(self.controller.document().path());
                Task::perform(pick_export_file(suggested), |path| {
                    Self::app_message(Message::File(FileMessage::ExportPicked(path)))
                })
            }

            FileMessage::ExportPicked(Some(path)) => {
                let path = export::with_html_extension(path);
                match self.controller.export_html(&path) {
                    Ok(()) => self.show_status(
                        format!("Exported: {}", file_name(&path)),
                        STATUS_MESSAGE_MS,
                    ),
                    Err(e) => {
                        self.show_error(&e);
                        Task::none()
                    }
                }
            }

            FileMessage::ExportPicked(None) => Task::none(),
        }
    }

    /// Handle editor-related messages
    fn handle_editor_message(&mut self, msg: EditorMessage) -> Task<Message> {
        match msg {
            EditorMessage::Action(action) => {
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    return self.editor_changed();
                }
                Task::none()
            }

            EditorMessage::Format(action) => {
                let insertion = action.apply(self.editor.selection().as_deref());
                self.editor.perform(text_editor::Action::Edit(Edit::Paste(Arc::new(
                    insertion.text,
                ))));
                for _ in 0..insertion.cursor_back {
                    self.editor.perform(text_editor::Action::Move(Motion::Left));
                }
                self.editor_changed()
            }

            EditorMessage::InsertImage => {
                let dir = self.document_dir();
                Task::perform(pick_image_file(dir), |path| {
                    Self::app_message(Message::Editor(EditorMessage::ImagePicked(path)))
                })
            }

            EditorMessage::ImagePicked(Some(path)) => {
                let markdown = self.controller.insert_image_link(&path);
                self.insert_text(markdown)
            }

            EditorMessage::ImagePicked(None) => Task::none(),

            EditorMessage::SelectAll => {
                self.editor.perform(text_editor::Action::SelectAll);
                Task::none()
            }
        }
    }

    /// Handle clipboard-related messages
    fn handle_clipboard_message(&mut self, msg: ClipboardMessage) -> Task<Message> {
        match msg {
            ClipboardMessage::Cut | ClipboardMessage::Copy => {
                let Some(selected) = self.editor.selection() else {
                    return Task::none();
                };
                if let Err(e) = self.clipboard.set_text(&selected) {
                    log::error!("Failed to copy to clipboard: {}", e);
                    self.show_error(&AppError::from(e));
                    return Task::none();
                }
                if matches!(msg, ClipboardMessage::Cut) {
                    self.editor
                        .perform(text_editor::Action::Edit(Edit::Delete));
                    return self.editor_changed();
                }
                Task::none()
            }

            ClipboardMessage::Paste => match self.clipboard.read() {
                Ok(ClipboardContent::Image(image)) => self.begin_image_paste(image),
                Ok(ClipboardContent::Text(text)) => self.insert_text(text),
                Err(ClipboardError::Empty) => Task::none(),
                Err(e) => {
                    log::error!("Failed to paste from clipboard: {}", e);
                    self.show_error(&AppError::from(e));
                    Task::none()
                }
            },
        }
    }

    /// Handle preview-related messages
    fn handle_preview_message(&mut self, msg: PreviewMessage) -> Task<Message> {
        match msg {
            PreviewMessage::DebounceElapsed(ticket) => {
                self.controller.debounce_elapsed(ticket);
            }

            PreviewMessage::Refresh => self.controller.refresh_preview(),

            PreviewMessage::OpenInBrowser => {
                self.controller.refresh_preview();
                let result = Config::cache_dir()
                    .map_err(AppError::from)
                    .and_then(|dir| {
                        let path = dir.join(BROWSER_PREVIEW_FILE);
                        export::write_page(self.controller.preview().html(), &path)
                            .map(|()| path)
                            .map_err(AppError::from)
                    });
                match result {
                    Ok(path) => open_external(&path),
                    Err(e) => {
                        log::error!("Failed to write browser preview: {}", e);
                        self.show_error(&e);
                    }
                }
            }
        }
        Task::none()
    }

    /// Handle pasted image settings
    fn handle_image_message(&mut self, msg: ImageMessage) -> Task<Message> {
        match msg {
            ImageMessage::ChooseFolder => {
                let start = self
                    .controller
                    .images()
                    .save_folder()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(ImageHandler::default_folder);
                return Task::perform(
                    pick_folder("Select New Default Image Location", start),
                    |folder| Self::app_message(Message::Images(ImageMessage::FolderPicked(folder))),
                );
            }

            ImageMessage::FolderPicked(Some(folder)) => {
                if let Err(e) = self.controller.set_image_folder(folder) {
                    self.show_error(&e);
                }
            }

            ImageMessage::FolderPickedForPaste(Some(folder)) => {
                if let Some(pending) = self.pending_paste.take() {
                    match self.controller.finish_image_paste(pending, folder) {
                        Ok(saved) => return self.insert_text(saved.markdown),
                        Err(e) => self.show_error(&e),
                    }
                }
            }

            ImageMessage::FolderPicked(None) => {}

            ImageMessage::FolderPickedForPaste(None) => self.pending_paste = None,

            ImageMessage::ChoosePrefix => {
                self.dialog = Some(DialogPage::NamePrefix {
                    value: self.controller.images().name_prefix().to_string(),
                });
            }
        }
        Task::none()
    }

    /// Handle view-related messages
    fn handle_view_message(&mut self, msg: ViewMessage) -> Task<Message> {
        match msg {
            ViewMessage::ToggleNightMode => {
                self.controller.toggle_night_mode();
            }

            ViewMessage::GrowEditor => {
                self.controller.nudge_split(1);
            }

            ViewMessage::GrowPreview => {
                self.controller.nudge_split(-1);
            }
        }
        Task::none()
    }

    /// Handle dialog input
    fn handle_dialog_message(&mut self, msg: DialogMessage) -> Task<Message> {
        match msg {
            DialogMessage::ImageNameInput(value) => {
                if let Some(DialogPage::ImageName { name, .. }) = &mut self.dialog {
                    *name = value;
                }
            }

            DialogMessage::ImageNameConfirm => {
                if let Some(DialogPage::ImageName { image, name, .. }) = self.dialog.take() {
                    match self.controller.confirm_image_name(image, &name) {
                        Ok(PasteStep::Saved(saved)) => return self.insert_text(saved.markdown),
                        Ok(PasteStep::NeedsFolder(pending)) => {
                            return self.pick_paste_folder(pending)
                        }
                        Err(e) => self.show_error(&e),
                    }
                }
            }

            DialogMessage::PrefixInput(input) => {
                if let Some(DialogPage::NamePrefix { value }) = &mut self.dialog {
                    *value = input;
                }
            }

            DialogMessage::PrefixConfirm => {
                if let Some(DialogPage::NamePrefix { value }) = self.dialog.take() {
                    self.controller.set_name_prefix(&value);
                }
            }

            DialogMessage::SaveChangesSave => {
                if let Some(DialogPage::SaveChanges { pending, .. }) = self.dialog.take() {
                    return self.save(Some(pending));
                }
            }

            DialogMessage::SaveChangesDiscard => {
                if let Some(DialogPage::SaveChanges { pending, .. }) = self.dialog.take() {
                    return self.proceed(pending);
                }
            }

            DialogMessage::Cancel => {
                self.dialog = None;
            }
        }
        Task::none()
    }

    /// Handle system-related messages
    fn handle_system_message(&mut self, msg: SystemMessage) -> Task<Message> {
        match msg {
            SystemMessage::CloseRequested => self.guard(PendingAction::Quit),

            SystemMessage::WindowResized { width, height } => {
                self.controller.set_window_size(width, height);
                Task::none()
            }

            SystemMessage::ClearStatus(id) => {
                if id == self.status_id {
                    self.status_message = None;
                }
                Task::none()
            }
        }
    }
}

fn cosmic_theme(theme: Theme) -> cosmic::Theme {
    match theme {
        Theme::Light => cosmic::Theme::light(),
        Theme::Dark => cosmic::Theme::dark(),
    }
}

/// Open `path` with the desktop's default handler
fn open_external(path: &Path) {
    match std::process::Command::new("xdg-open").arg(path).spawn() {
        Ok(_) => log::debug!("Opened {} externally", path.display()),
        Err(e) => log::error!("Failed to open {}: {}", path.display(), e),
    }
}

async fn pick_markdown_file(dir: Option<PathBuf>) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Open Markdown File")
        .add_filter("Markdown Files (*.md *.markdown)", &file_handler::MARKDOWN_EXTENSIONS)
        .add_filter("Text Files (*.txt)", &["txt"])
        .add_filter("All Files", &["*"]);
    if let Some(dir) = dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().await.map(|h| h.path().to_path_buf())
}

async fn pick_save_file(dir: Option<PathBuf>, name: String) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Save Markdown File")
        .add_filter("Markdown Files (*.md)", &["md"])
        .set_file_name(name);
    if let Some(dir) = dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().await.map(|h| h.path().to_path_buf())
}

async fn pick_export_file(suggested: PathBuf) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Export HTML")
        .add_filter("HTML Files (*.html)", &[export::HTML_EXTENSION]);
    if let Some(name) = suggested.file_name() {
        dialog = dialog.set_file_name(name.to_string_lossy());
    }
    if let Some(dir) = suggested.parent().filter(|d| d.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().await.map(|h| h.path().to_path_buf())
}

async fn pick_image_file(dir: Option<PathBuf>) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Select Image")
        .add_filter("Images (*.png *.jpg *.jpeg *.gif *.svg)", &["png", "jpg", "jpeg", "gif", "svg"]);
    if let Some(dir) = dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().await.map(|h| h.path().to_path_buf())
}

async fn pick_folder(title: &'static str, start: PathBuf) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new().set_title(title);
    if start.is_dir() {
        dialog = dialog.set_directory(start);
    } else if let Some(parent) = start.parent().filter(|p| p.is_dir()) {
        dialog = dialog.set_directory(parent);
    }
    dialog.pick_folder().await.map(|h| h.path().to_path_buf())
}
