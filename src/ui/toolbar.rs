//! Formatting toolbar
//!
//! Formatting and insert buttons on the left, image settings and the night
//! mode toggle on the right.

use super::color;
use crate::message::{EditorMessage, ImageMessage, Message, ViewMessage};
use cosmic::iced::{Background, Length};
use cosmic::widget::{button, container, horizontal_space, text, tooltip, Row};
use cosmic::Element;
use cosmic_mdedit::editor::FormatAction;
use cosmic_mdedit::theme::{Theme, ThemeStyles};

/// Build the toolbar
pub fn view(theme: Theme, styles: &ThemeStyles) -> Element<'static, Message> {
    let mut row = Row::new().spacing(4).align_y(cosmic::iced::Alignment::Center);

    for action in FormatAction::ALL {
        row = row.push(tool_button(
            action.label(),
            action.tooltip(),
            Message::Editor(EditorMessage::Format(action)),
        ));
        // Image sits between Link and the list buttons
        if action == FormatAction::Link {
            row = row.push(tool_button(
                "🖼️ Image",
                "Insert image from file",
                Message::Editor(EditorMessage::InsertImage),
            ));
        }
    }

    row = row
        .push(horizontal_space())
        .push(tool_button(
            "📁 Image Folder",
            "Change image save location",
            Message::Images(ImageMessage::ChooseFolder),
        ))
        .push(tool_button(
            "🏷️ Name Prefix",
            "Change image name prefix",
            Message::Images(ImageMessage::ChoosePrefix),
        ))
        .push(tool_button(
            theme.toggle_icon(),
            "Toggle night mode",
            Message::View(ViewMessage::ToggleNightMode),
        ));

    let style = styles.toolbar;
    container(row)
        .width(Length::Fill)
        .padding([4, 8])
        .class(cosmic::theme::Container::custom(move |_theme| {
            cosmic::iced::widget::container::Style {
                background: Some(Background::Color(color(style.background))),
                text_color: Some(color(style.foreground)),
                ..Default::default()
            }
        }))
        .into()
}

fn tool_button(
    label: &'static str,
    tip: &'static str,
    message: Message,
) -> Element<'static, Message> {
    tooltip(
        button::text(label).on_press(message),
        text(tip).size(12),
        tooltip::Position::Bottom,
    )
    .into()
}
