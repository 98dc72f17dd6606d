/// User interface building blocks
///
/// Every function here takes application state read-only and returns
/// widgets that report user intent as `Message`s.
/// - The scan gallery with pairs and unpaired scans (gallery.rs)
/// - The "send to logbook" confirmation dialog (dialog.rs)

pub mod dialog;
pub mod gallery;

use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Alignment, Element};

use crate::Message;

/// Top bar with the app title and its two actions
pub fn header<'a>(capturing: bool) -> Element<'a, Message> {
    let add_label = if capturing { "Scanning..." } else { "Add scan" };

    row![
        text("Memory").size(32),
        horizontal_space(),
        button(add_label).on_press_maybe((!capturing).then_some(Message::AddScan)),
        button("Send to logbook").on_press(Message::OpenSendDialog),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

/// Transient notice shown under the gallery
pub fn notice(message: &str) -> Element<'_, Message> {
    container(text(message).size(14))
        .padding(10)
        .style(container::rounded_box)
        .into()
}
