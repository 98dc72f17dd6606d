use iced::widget::{
    button, column, container, horizontal_space, image, row, scrollable, text, Column,
};
use iced::{Alignment, Border, ContentFit, Element, Length, Theme};
use chrono::Local;
use iced_aw::Wrap;

use crate::state::{Pair, PairingState, ScanRecord};
use crate::Message;

/// Height of a scan thumbnail
const THUMBNAIL_HEIGHT: f32 = 180.0;

/// Width of a tile in the unpaired grid
const TILE_WIDTH: f32 = 160.0;

/// Share of the gallery height given to the pairs list and the unpaired pool.
/// Both scroll on their own, so neither can push the other off screen.
const PAIRS_PORTION: u16 = 3;
const POOL_PORTION: u16 = 2;

/// Pairs on top, the unpaired pool below.
///
/// The pending selection is drawn first in the pool with a highlighted
/// border and has no press action, so it cannot be selected twice.
pub fn view(scans: &PairingState) -> Element<'_, Message> {
    if scans.is_empty() {
        return text("No scans yet. Use \"Add scan\" to capture a QR code.")
            .size(14)
            .into();
    }

    let pairs: Element<'_, Message> = if scans.paired().is_empty() {
        text("No pairs yet. Select two scans to pair them.")
            .size(14)
            .into()
    } else {
        let cards: Vec<Element<'_, Message>> = scans
            .paired()
            .iter()
            .enumerate()
            .map(|(index, pair)| pair_card(index, pair))
            .collect();

        scrollable(Column::with_children(cards).spacing(16))
            .height(Length::FillPortion(PAIRS_PORTION))
            .into()
    };

    let mut tiles: Vec<Element<'_, Message>> = Vec::new();
    tiles.extend(scans.pending().map(|record| scan_tile(record, true)));
    tiles.extend(scans.unpaired().iter().map(|record| scan_tile(record, false)));

    let pool: Element<'_, Message> = if tiles.is_empty() {
        text("No unpaired scans.").size(14).into()
    } else {
        scrollable(
            Wrap::with_elements(tiles)
                .spacing(16.0)
                .line_spacing(16.0),
        )
        .width(Length::Fill)
        .height(Length::FillPortion(POOL_PORTION))
        .into()
    };

    column![
        text("Pairs:").size(20),
        pairs,
        text("Unpaired scans:").size(20),
        pool,
    ]
    .spacing(8)
    .height(Length::Fill)
    .into()
}

/// Card for one pair: title, delete action and both scans side by side
fn pair_card(index: usize, pair: &Pair) -> Element<'_, Message> {
    let (first, second) = pair.ids();

    let title = row![
        text(format!("Pair {}", index + 1)).size(18),
        horizontal_space(),
        button("Delete")
            .style(button::danger)
            .on_press(Message::DeletePair(first, second)),
    ]
    .align_y(Alignment::Center);

    let members = row![scan_preview(&pair.first), scan_preview(&pair.second)].spacing(16);

    container(column![title, members].spacing(8))
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// Clickable tile in the unpaired pool
fn scan_tile(record: &ScanRecord, selected: bool) -> Element<'_, Message> {
    let tile = container(scan_preview(record))
        .width(Length::Fixed(TILE_WIDTH))
        .padding(4);

    if selected {
        tile.style(selected_border).into()
    } else {
        button(tile)
            .padding(0)
            .style(button::text)
            .on_press(Message::Select(record.id))
            .into()
    }
}

/// Thumbnail with the decoded value underneath
fn scan_preview(record: &ScanRecord) -> Element<'_, Message> {
    column![
        image(image::Handle::from_path(record.photo.clone()))
            .width(Length::Fill)
            .height(Length::Fixed(THUMBNAIL_HEIGHT))
            .content_fit(ContentFit::Contain),
        text(record.value.as_str()).size(12),
        text(
            record
                .captured_at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string()
        )
        .size(10),
    ]
    .spacing(8)
    .width(Length::Fill)
    .align_x(Alignment::Center)
    .into()
}

fn selected_border(theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: theme.palette().primary,
            width: 3.0,
            radius: 12.0.into(),
        },
        ..container::Style::default()
    }
}
