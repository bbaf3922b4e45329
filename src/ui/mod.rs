//! UI module for Cosmic MdEdit
//!
//! Contains all user interface components including:
//! - Main window layout (toolbar, split panes, status bar)
//! - Formatting toolbar
//! - Native preview pane
//! - Status bar
//! - Dialogs and modals

pub mod dialogs;
mod main_window;
mod preview_pane;
mod status_bar;
mod toolbar;

use crate::app::MdEdit;
use crate::message::Message;
use cosmic::iced::Color;
use cosmic::Element;
use cosmic_mdedit::theme::Rgb;

pub use dialogs::DialogPage;

/// Build the main application view
pub fn view(app: &MdEdit) -> Element<'_, Message> {
    main_window::view(app)
}

fn color(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.to_f32();
    Color::from_rgb(r, g, b)
}
