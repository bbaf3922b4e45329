//! Menu bar and keyboard shortcut handling
//!
//! Provides the application menu bar, keyboard shortcut definitions and the
//! window event subscription (shortcuts, file drops, resizes).

use cosmic::iced::keyboard::Key;
use cosmic::iced::{event, keyboard, window, Event, Subscription};
use cosmic::iced_futures::event::listen_raw;
use cosmic::widget::menu::action::MenuAction;
use cosmic::widget::menu::key_bind::Modifier;
use cosmic::widget::menu::{Item, KeyBind};
use cosmic_mdedit::editor::FormatAction;
use cosmic_mdedit::file_handler::DropItem;
use std::collections::HashMap;

use crate::message::{
    ClipboardMessage, EditorMessage, FileMessage, ImageMessage, Message, PreviewMessage,
    SystemMessage, ViewMessage,
};

/// Menu actions that can be triggered from the menu bar or keyboard shortcuts
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    // File actions
    NewFile,
    OpenFile,
    Save,
    SaveAs,
    ExportHtml,
    ChangeImageFolder,
    Quit,

    // Edit actions
    Cut,
    Copy,
    Paste,
    SelectAll,
    Bold,
    Italic,

    // View actions
    RefreshPreview,
    ToggleNightMode,
    OpenInBrowser,
    GrowEditor,
    GrowPreview,
}

impl MenuAction for Action {
    type Message = Message;

    fn message(&self) -> Self::Message {
        self.to_message()
    }
}

impl Action {
    /// Convert action to application message
    pub fn to_message(self) -> Message {
        match self {
            // File
            Action::NewFile => Message::File(FileMessage::New),
            Action::OpenFile => Message::File(FileMessage::Open),
            Action::Save => Message::File(FileMessage::Save),
            Action::SaveAs => Message::File(FileMessage::SaveAs),
            Action::ExportHtml => Message::File(FileMessage::ExportHtml),
            Action::ChangeImageFolder => Message::Images(ImageMessage::ChooseFolder),
            Action::Quit => Message::System(SystemMessage::CloseRequested),

            // Edit
            Action::Cut => Message::Clipboard(ClipboardMessage::Cut),
            Action::Copy => Message::Clipboard(ClipboardMessage::Copy),
            Action::Paste => Message::Clipboard(ClipboardMessage::Paste),
            Action::SelectAll => Message::Editor(EditorMessage::SelectAll),
            Action::Bold => Message::Editor(EditorMessage::Format(FormatAction::Bold)),
            Action::Italic => Message::Editor(EditorMessage::Format(FormatAction::Italic)),

            // View
            Action::RefreshPreview => Message::Preview(PreviewMessage::Refresh),
            Action::ToggleNightMode => Message::View(ViewMessage::ToggleNightMode),
            Action::OpenInBrowser => Message::Preview(PreviewMessage::OpenInBrowser),
            Action::GrowEditor => Message::View(ViewMessage::GrowEditor),
            Action::GrowPreview => Message::View(ViewMessage::GrowPreview),
        }
    }

    /// Action bound to a Ctrl (+Shift) character shortcut
    fn for_shortcut(c: &str, shift: bool) -> Option<Action> {
        SHORTCUTS
            .iter()
            .find(|(key, with_shift, _)| *key == c && *with_shift == shift)
            .map(|(_, _, action)| *action)
    }
}

/// Ctrl shortcuts as (key, with Shift, action)
const SHORTCUTS: &[(&str, bool, Action)] = &[
    ("n", false, Action::NewFile),
    ("o", false, Action::OpenFile),
    ("s", false, Action::Save),
    ("s", true, Action::SaveAs),
    ("e", true, Action::ExportHtml),
    ("q", false, Action::Quit),
    ("x", false, Action::Cut),
    ("c", false, Action::Copy),
    ("v", false, Action::Paste),
    ("a", false, Action::SelectAll),
    ("b", false, Action::Bold),
    ("i", false, Action::Italic),
    ("d", true, Action::ToggleNightMode),
    ("]", false, Action::GrowEditor),
    ("[", false, Action::GrowPreview),
];

fn bind(binds: &mut HashMap<KeyBind, Action>, shift: bool, c: &str, action: Action) {
    let mut modifiers = vec![Modifier::Ctrl];
    if shift {
        modifiers.push(Modifier::Shift);
    }
    binds.insert(
        KeyBind {
            modifiers,
            key: Key::Character(c.into()),
        },
        action,
    );
}

/// Create default keyboard shortcuts
pub fn key_binds() -> HashMap<KeyBind, Action> {
    let mut binds = HashMap::new();

    for &(c, shift, action) in SHORTCUTS {
        bind(&mut binds, shift, c, action);
    }

    binds.insert(
        KeyBind {
            modifiers: vec![],
            key: Key::Named(keyboard::key::Named::F5),
        },
        Action::RefreshPreview,
    );

    binds
}

/// Type alias for menu items with our action type
pub type MenuItems = Vec<(&'static str, Vec<Item<Action, &'static str>>)>;

/// Create menu bar items
pub fn menu_items(night_mode: bool) -> MenuItems {
    vec![
        (
            "File",
            vec![
                Item::Button("New", None, Action::NewFile),
                Item::Button("Open...", None, Action::OpenFile),
                Item::Divider,
                Item::Button("Save", None, Action::Save),
                Item::Button("Save As...", None, Action::SaveAs),
                Item::Button("Export HTML...", None, Action::ExportHtml),
                Item::Divider,
                Item::Button("Change Image Save Location...", None, Action::ChangeImageFolder),
                Item::Divider,
                Item::Button("Exit", None, Action::Quit),
            ],
        ),
        (
            "Edit",
            vec![
                Item::Button("Cut", None, Action::Cut),
                Item::Button("Copy", None, Action::Copy),
                Item::Button("Paste", None, Action::Paste),
                Item::Divider,
                Item::Button("Select All", None, Action::SelectAll),
            ],
        ),
        (
            "View",
            vec![
                Item::Button("Refresh Preview", None, Action::RefreshPreview),
                Item::CheckBox("Night Mode", None, night_mode, Action::ToggleNightMode),
                Item::Button("Open Preview in Browser", None, Action::OpenInBrowser),
                Item::Divider,
                Item::Button("Grow Editor Pane", None, Action::GrowEditor),
                Item::Button("Grow Preview Pane", None, Action::GrowPreview),
            ],
        ),
    ]
}

/// Window events: keyboard shortcuts, dropped files and resizes
///
/// Shortcuts only fire for events no widget captured. Paste, bold and
/// italic are also routed through the editor's key bindings so they work
/// while it has focus.
pub fn window_events_subscription() -> Subscription<Message> {
    listen_raw(|event, status, _| match event {
        Event::Window(window::Event::FileDropped(path)) => Some(Message::File(
            FileMessage::Dropped(vec![DropItem::Path(path)]),
        )),

        Event::Window(window::Event::Resized(size)) => {
            Some(Message::System(SystemMessage::WindowResized {
                width: size.width as u32,
                height: size.height as u32,
            }))
        }

        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. })
            if status == event::Status::Ignored =>
        {
            if let Key::Named(keyboard::key::Named::F5) = key {
                return Some(Action::RefreshPreview.to_message());
            }

            if !modifiers.control() || modifiers.alt() {
                return None;
            }
            match key {
                Key::Character(ref c) => {
                    Action::for_shortcut(&c.to_lowercase(), modifiers.shift())
                        .map(Action::to_message)
                }
                _ => None,
            }
        }

        _ => None,
    })
}
