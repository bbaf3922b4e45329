//! Main window layout and composition
//!
//! Toolbar on top, editor and preview side by side, status bar at the
//! bottom. The split follows the configured ratio.

use super::{color, preview_pane, status_bar, toolbar};
use crate::app::MdEdit;
use crate::message::{ClipboardMessage, EditorMessage, Message};
use cosmic::iced::{keyboard, Background, Border, Length};
use cosmic::widget::{container, text_editor, Column, Row};
use cosmic::Element;
use cosmic_mdedit::editor::FormatAction;
use cosmic_mdedit::theme::WidgetStyle;

/// Shown in the empty editor
const EDITOR_PLACEHOLDER: &str = "Start writing your markdown here...\n\
Drag and drop .md files to open them.\n\
Paste images directly from clipboard!";

/// Build the main window view
pub fn view(app: &MdEdit) -> Element<'_, Message> {
    let styles = app.controller.styles();
    let (editor_portion, preview_portion) = app.controller.ui_config().split_portions();

    let split = Row::new()
        .push(
            container(build_text_editor(&app.editor, styles.editor))
                .width(Length::FillPortion(editor_portion))
                .height(Length::Fill)
                .padding(8),
        )
        .push(
            container(preview_pane::view(app.controller.preview(), &styles))
                .width(Length::FillPortion(preview_portion))
                .height(Length::Fill)
                .padding(8),
        );

    Column::new()
        .push(toolbar::view(app.controller.theme(), &styles))
        .push(split)
        .push(status_bar::view(
            &app.labels,
            app.status_message.as_deref(),
            styles.statusbar,
        ))
        .into()
}

/// Text editor with paste routed through the image-aware clipboard handler
fn build_text_editor<'a>(
    content: &'a text_editor::Content,
    style: WidgetStyle,
) -> Element<'a, Message> {
    text_editor(content)
        .placeholder(EDITOR_PLACEHOLDER)
        .on_action(|action| Message::Editor(EditorMessage::Action(action)))
        .key_binding(|key_press| {
            let text_editor::KeyPress { key, modifiers, .. } = &key_press;
            if modifiers.command() && !modifiers.shift() {
                let custom = match key.as_ref() {
                    keyboard::Key::Character("v") => {
                        Some(Message::Clipboard(ClipboardMessage::Paste))
                    }
                    keyboard::Key::Character("b") => {
                        Some(Message::Editor(EditorMessage::Format(FormatAction::Bold)))
                    }
                    keyboard::Key::Character("i") => {
                        Some(Message::Editor(EditorMessage::Format(FormatAction::Italic)))
                    }
                    _ => None,
                };
                if let Some(message) = custom {
                    return Some(text_editor::Binding::Custom(message));
                }
            }
            text_editor::Binding::from_key_press(key_press)
        })
        .style(move |_theme, _status| text_editor::Style {
            background: Background::Color(color(style.background)),
            border: Border {
                color: style.border.map(color).unwrap_or(cosmic::iced::Color::TRANSPARENT),
                width: 1.0,
                radius: 4.0.into(),
            },
            icon: color(style.foreground),
            placeholder: color(style.foreground).scale_alpha(0.5),
            value: color(style.foreground),
            selection: color(style.accent.unwrap_or(style.foreground)).scale_alpha(0.4),
        })
        .height(Length::Fill)
        .padding(10)
        .into()
}
