use iced::widget::{button, column, container, horizontal_space, row, text, text_input};
use iced::{Element, Length};

use crate::state::export::LogbookEntry;
use crate::Message;

/// Confirmation dialog for the logbook payload.
///
/// The text starts as the encoded pairing but the user may change it freely;
/// whatever is in the field when OK is pressed gets sent.
pub fn view(draft: &str) -> Element<'_, Message> {
    let mut body = column![
        text("Is this value correct?").size(20),
        text_input("Type something...", draft)
            .on_input(Message::DraftChanged)
            .on_submit(Message::ConfirmSend)
            .padding(8),
    ]
    .spacing(12);

    if LogbookEntry::from_json(draft).is_err() {
        body = body.push(text("Not a valid logbook entry, it will be sent as typed.").size(12));
    }

    body = body.push(
        row![
            horizontal_space(),
            button("Cancel")
                .style(button::secondary)
                .on_press(Message::DismissSendDialog),
            button("OK").on_press(Message::ConfirmSend),
        ]
        .spacing(8),
    );

    container(body)
        .padding(20)
        .width(Length::Fixed(520.0))
        .style(container::rounded_box)
        .into()
}
