//! Status bar UI component
//!
//! Shows the transient status message on the left and the image folder and
//! name prefix labels on the right. Tooltips carry the full values.

use super::color;
use crate::message::{ImageMessage, Message};
use cosmic::iced::{Background, Length};
use cosmic::widget::{button, container, horizontal_space, text, tooltip, Row};
use cosmic::Element;
use cosmic_mdedit::controller::StatusLabels;
use cosmic_mdedit::theme::WidgetStyle;

/// Create the status bar view
pub fn view<'a>(
    labels: &'a StatusLabels,
    message: Option<&'a str>,
    style: WidgetStyle,
) -> Element<'a, Message> {
    let status_row: Row<'_, Message> = Row::new()
        .spacing(16)
        .align_y(cosmic::iced::Alignment::Center)
        .push(text(message.unwrap_or("")).size(12))
        .push(horizontal_space())
        .push(label(
            &labels.folder,
            &labels.folder_tooltip,
            Message::Images(ImageMessage::ChooseFolder),
        ))
        .push(label(
            &labels.prefix,
            &labels.prefix_tooltip,
            Message::Images(ImageMessage::ChoosePrefix),
        ));

    container(status_row)
        .width(Length::Fill)
        .padding([2, 12])
        .class(cosmic::theme::Container::custom(move |_theme| {
            cosmic::iced::widget::container::Style {
                background: Some(Background::Color(color(style.background))),
                text_color: Some(color(style.foreground)),
                ..Default::default()
            }
        }))
        .into()
}

/// Label that opens the matching setting when clicked
fn label<'a>(value: &'a str, tip: &'a str, message: Message) -> Element<'a, Message> {
    tooltip(
        button::text(value).on_press(message),
        text(tip).size(12),
        tooltip::Position::Top,
    )
    .into()
}
