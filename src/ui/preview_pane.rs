//! Native preview pane
//!
//! Draws the element tree kept by [`NativePreview`] with cosmic widgets.
//! Colours follow the active theme's palette.

use super::color;
use crate::message::Message;
use cosmic::iced::font::{Style as FontStyle, Weight};
use cosmic::iced::widget::{rich_text, span};
use cosmic::iced::{Background, Color, Font, Length};
use cosmic::widget::{container, horizontal_rule, image, scrollable, text, Column, Row};
use cosmic::Element;
use cosmic_mdedit::markdown::templates::PLACEHOLDER_MESSAGE;
use cosmic_mdedit::markdown::{ImageSource, ListItem, NativePreview, PreviewElement, Span};
use cosmic_mdedit::theme::ThemeStyles;

/// Colours used while drawing one frame
#[derive(Clone, Copy)]
struct Ink {
    text: Color,
    link: Color,
    code_background: Color,
    muted: Color,
    error: Color,
}

impl Ink {
    fn new(styles: &ThemeStyles) -> Self {
        let text = color(styles.editor.foreground);
        Self {
            text,
            link: color(styles.palette.link),
            code_background: color(styles.palette.alternate_base),
            muted: text.scale_alpha(0.6),
            error: color(styles.palette.error),
        }
    }
}

/// Build the preview pane
pub fn view<'a>(preview: &'a NativePreview, styles: &ThemeStyles) -> Element<'a, Message> {
    let ink = Ink::new(styles);

    let body: Element<'a, Message> = if preview.is_placeholder() {
        container(text(PLACEHOLDER_MESSAGE).size(14))
            .padding(20)
            .into()
    } else {
        let mut column = Column::new().spacing(12).padding(20);
        for element in preview.elements() {
            column = column.push(block(element, preview, ink));
        }
        scrollable(column).height(Length::Fill).into()
    };

    let background = color(styles.palette.base);
    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .class(cosmic::theme::Container::custom(move |_theme| {
            cosmic::iced::widget::container::Style {
                background: Some(Background::Color(background)),
                text_color: Some(ink.text),
                ..Default::default()
            }
        }))
        .into()
}

fn block<'a>(element: &'a PreviewElement, preview: &'a NativePreview, ink: Ink) -> Element<'a, Message> {
    match element {
        PreviewElement::Paragraph(spans) => inline(spans, 14.0, ink),

        PreviewElement::Heading { level, content } => {
            let size = match level {
                1 => 28.0,
                2 => 22.0,
                3 => 18.0,
                _ => 16.0,
            };
            inline(content, size, ink)
        }

        PreviewElement::CodeBlock { code, .. } => code_box(code, ink),

        PreviewElement::Html(html) => code_box(html, ink),

        PreviewElement::Blockquote(children) => {
            let mut column = Column::new().spacing(8);
            for child in children {
                column = column.push(block(child, preview, ink));
            }
            Row::new()
                .spacing(12)
                .push(container(text("")).width(Length::Fixed(3.0)).height(Length::Fill).class(
                    cosmic::theme::Container::custom(move |_theme| {
                        cosmic::iced::widget::container::Style {
                            background: Some(Background::Color(ink.muted)),
                            ..Default::default()
                        }
                    }),
                ))
                .push(column)
                .height(Length::Shrink)
                .into()
        }

        PreviewElement::List { start, items } => {
            let mut column = Column::new().spacing(4);
            for (index, item) in items.iter().enumerate() {
                let marker = match (item.task, start) {
                    (Some(true), _) => "☑".to_string(),
                    (Some(false), _) => "☐".to_string(),
                    (None, Some(first)) => format!("{}.", first + index as u64),
                    (None, None) => "•".to_string(),
                };
                column = column.push(list_item(marker, item, preview, ink));
            }
            column.into()
        }

        PreviewElement::Table { header, rows, .. } => {
            let mut column = Column::new().spacing(4);
            column = column.push(table_row(header, true, ink));
            for row in rows {
                column = column.push(table_row(row, false, ink));
            }
            column.into()
        }

        PreviewElement::Rule => horizontal_rule(1).into(),

        PreviewElement::Image { alt, url, .. } => match preview.renderer().resolve_image(url) {
            ImageSource::Local(path) if path.is_file() => image(image::Handle::from_path(path))
                .width(Length::Shrink)
                .into(),
            _ => text(format!("[{}]", if alt.is_empty() { url } else { alt }))
                .size(14)
                .into(),
        },

        PreviewElement::Error(message) => container(
            Row::new()
                .spacing(6)
                .push(text("Error:").size(14).font(bold_font()))
                .push(text(message.as_str()).size(14)),
        )
        .width(Length::Fill)
        .padding(10)
        .class(cosmic::theme::Container::custom(move |_theme| {
            cosmic::iced::widget::container::Style {
                background: Some(Background::Color(ink.error.scale_alpha(0.12))),
                text_color: Some(ink.error),
                ..Default::default()
            }
        }))
        .into(),

        PreviewElement::FootnoteDefinition { label, content } => {
            let mut column = Column::new().spacing(4);
            for child in content {
                column = column.push(block(child, preview, ink));
            }
            Row::new()
                .spacing(6)
                .push(text(format!("[{}]", label)).size(12))
                .push(column)
                .into()
        }
    }
}

fn list_item<'a>(
    marker: String,
    item: &'a ListItem,
    preview: &'a NativePreview,
    ink: Ink,
) -> Element<'a, Message> {
    let mut column = Column::new().spacing(4);
    for child in &item.content {
        column = column.push(block(child, preview, ink));
    }
    Row::new()
        .spacing(8)
        .push(text(marker).size(14))
        .push(column)
        .into()
}

fn table_row<'a>(cells: &'a [Vec<Span>], header: bool, ink: Ink) -> Element<'a, Message> {
    let mut row = Row::new().spacing(16);
    for cell in cells {
        let content: Element<'a, Message> = if header {
            rich_text(cell.iter().map(|s| styled(s, 14.0, ink).font(bold_font())).collect::<Vec<_>>())
                .into()
        } else {
            inline(cell, 14.0, ink)
        };
        row = row.push(container(content).width(Length::FillPortion(1)));
    }
    row.into()
}

fn code_box<'a>(code: &'a str, ink: Ink) -> Element<'a, Message> {
    container(text(code).font(Font::MONOSPACE).size(13))
        .width(Length::Fill)
        .padding(10)
        .class(cosmic::theme::Container::custom(move |_theme| {
            cosmic::iced::widget::container::Style {
                background: Some(Background::Color(ink.code_background)),
                ..Default::default()
            }
        }))
        .into()
}

fn inline<'a>(spans: &'a [Span], size: f32, ink: Ink) -> Element<'a, Message> {
    rich_text(spans.iter().map(|s| styled(s, size, ink)).collect::<Vec<_>>()).into()
}

fn styled<'a>(s: &'a Span, size: f32, ink: Ink) -> cosmic::iced::widget::text::Span<'a, ()> {
    let mut font = if s.code { Font::MONOSPACE } else { Font::DEFAULT };
    if s.bold {
        font.weight = Weight::Bold;
    }
    if s.italic {
        font.style = FontStyle::Italic;
    }

    let mut result = span(s.text.as_str())
        .size(size)
        .font(font)
        .strikethrough(s.strikethrough);
    if s.link.is_some() {
        result = result.color(ink.link).underline(true);
    }
    if s.code {
        result = result.background(ink.code_background);
    }
    result
}

fn bold_font() -> Font {
    Font {
        weight: Weight::Bold,
        ..Font::DEFAULT
    }
}
