//! Application message types
//!
//! Defines all messages that can be sent to the application's update function.
//! Messages are organized by category for clear handling and routing.

use cosmic::widget::text_editor;
use cosmic_mdedit::editor::FormatAction;
use cosmic_mdedit::file_handler::DropItem;
use cosmic_mdedit::utils::Ticket;
use std::path::PathBuf;

/// Main application message enum
#[derive(Debug, Clone)]
pub enum Message {
    /// File operations
    File(FileMessage),

    /// Editor operations
    Editor(EditorMessage),

    /// Clipboard operations
    Clipboard(ClipboardMessage),

    /// Preview operations
    Preview(PreviewMessage),

    /// Pasted image settings
    Images(ImageMessage),

    /// View operations
    View(ViewMessage),

    /// Dialog input
    Dialog(DialogMessage),

    /// System/window events
    System(SystemMessage),

    /// Surface actions (for menu bar support)
    Surface(cosmic::surface::Action),

    /// No-op message (for subscriptions that don't need action)
    None,
}

/// What to do once unsaved changes have been dealt with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open,
    OpenPath(PathBuf),
    Quit,
}

/// File-related messages
#[derive(Debug, Clone)]
pub enum FileMessage {
    /// Start a new empty document
    New,

    /// Show the open picker
    Open,

    /// Open picker closed
    OpenPicked(Option<PathBuf>),

    /// Open a specific file path
    OpenPath(PathBuf),

    /// Items dropped onto the window
    Dropped(Vec<DropItem>),

    /// Save the document, asking for a path if it has none
    Save,

    /// Save the document to a new path
    SaveAs,

    /// Save picker closed; `then` runs after a successful save
    SaveAsPicked {
        path: Option<PathBuf>,
        then: Option<PendingAction>,
    },

    /// Show the export picker
    ExportHtml,

    /// Export picker closed
    ExportPicked(Option<PathBuf>),
}

/// Editor-related messages
#[derive(Debug, Clone)]
pub enum EditorMessage {
    /// Action from the text editor widget
    Action(text_editor::Action),

    /// Toolbar formatting
    Format(FormatAction),

    /// Show the picker for an existing image
    InsertImage,

    /// Image picker closed
    ImagePicked(Option<PathBuf>),

    SelectAll,
}

/// Clipboard-related messages
#[derive(Debug, Clone)]
pub enum ClipboardMessage {
    Cut,
    Copy,
    /// Paste text, or start the image save flow for an image
    Paste,
}

/// Preview-related messages
#[derive(Debug, Clone)]
pub enum PreviewMessage {
    /// The debounce delay for `Ticket` has passed
    DebounceElapsed(Ticket),

    /// Render immediately
    Refresh,

    /// Write the current page to the cache and open it externally
    OpenInBrowser,
}

/// Pasted image settings
#[derive(Debug, Clone)]
pub enum ImageMessage {
    /// Show the folder picker
    ChooseFolder,

    /// Folder picker closed
    FolderPicked(Option<PathBuf>),

    /// Folder picker shown because a paste needs a folder first
    FolderPickedForPaste(Option<PathBuf>),

    /// Show the prefix prompt
    ChoosePrefix,
}

/// View-related messages
#[derive(Debug, Clone)]
pub enum ViewMessage {
    ToggleNightMode,
    GrowEditor,
    GrowPreview,
}

/// Dialog input messages
#[derive(Debug, Clone)]
pub enum DialogMessage {
    /// Image name field edited
    ImageNameInput(String),

    /// Save the pending image under the entered name
    ImageNameConfirm,

    /// Prefix field edited
    PrefixInput(String),

    PrefixConfirm,

    /// Save-changes prompt: save first
    SaveChangesSave,

    /// Save-changes prompt: drop the changes
    SaveChangesDiscard,

    /// Close the open dialog without acting
    Cancel,
}

/// System/window related messages
#[derive(Debug, Clone)]
pub enum SystemMessage {
    /// Window close requested
    CloseRequested,

    /// Window resized
    WindowResized { width: u32, height: u32 },

    /// Clear the transient status message if it is still message `id`
    ClearStatus(u64),
}
