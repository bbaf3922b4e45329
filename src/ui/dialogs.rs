//! Modal dialogs
//!
//! One dialog is open at a time. Each page carries the values its
//! controls edit; confirming takes the page out of the application.

use crate::message::{DialogMessage, Message, PendingAction};
use cosmic::widget::{button, column, dialog, text, text_input};
use cosmic::Element;
use cosmic_mdedit::editor::ClipboardImage;

/// The open dialog and its state
#[derive(Debug, Clone)]
pub enum DialogPage {
    /// Save / Discard / Cancel before `pending` runs
    SaveChanges {
        pending: PendingAction,
        title: String,
        body: String,
    },

    /// Name prompt for a pasted image
    ImageName {
        image: ClipboardImage,
        prefix: String,
        name: String,
    },

    /// Prompt for a new image name prefix
    NamePrefix { value: String },

    /// An operation failed
    Error { title: String, body: String },
}

/// Build the dialog for `page`
pub fn view(page: &DialogPage) -> Element<'_, Message> {
    let cancel = button::standard("Cancel").on_press(Message::Dialog(DialogMessage::Cancel));

    match page {
        DialogPage::SaveChanges { title, body, .. } => dialog()
            .title(title.as_str())
            .body(body.as_str())
            .primary_action(
                button::suggested("Save")
                    .on_press(Message::Dialog(DialogMessage::SaveChangesSave)),
            )
            .secondary_action(cancel)
            .tertiary_action(
                button::destructive("Discard")
                    .on_press(Message::Dialog(DialogMessage::SaveChangesDiscard)),
            )
            .into(),

        DialogPage::ImageName { prefix, name, .. } => dialog()
            .title("Save Image")
            .control(
                column()
                    .spacing(8)
                    .push(text(format!("Prefix: {}", prefix)))
                    .push(text("Name:"))
                    .push(
                        text_input("", name.as_str())
                            .on_input(|value| Message::Dialog(DialogMessage::ImageNameInput(value))),
                    ),
            )
            .primary_action(
                button::suggested("Save")
                    .on_press(Message::Dialog(DialogMessage::ImageNameConfirm)),
            )
            .secondary_action(cancel)
            .into(),

        DialogPage::NamePrefix { value } => dialog()
            .title("Change Name Prefix")
            .body("Enter new prefix (e.g., 'demo_' or 'project_'):")
            .control(
                text_input("", value.as_str())
                    .on_input(|value| Message::Dialog(DialogMessage::PrefixInput(value))),
            )
            .primary_action(
                button::suggested("OK").on_press(Message::Dialog(DialogMessage::PrefixConfirm)),
            )
            .secondary_action(cancel)
            .into(),

        DialogPage::Error { title, body } => dialog()
            .title(title.as_str())
            .body(body.as_str())
            .primary_action(
                button::suggested("OK").on_press(Message::Dialog(DialogMessage::Cancel)),
            )
            .into(),
    }
}
