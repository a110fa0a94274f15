/// Saved Data tab: every stored annotation with a delete button per row
use iced::widget::{button, container, row, scrollable, text, Column, Row};
use iced::{Element, Length};

use crate::state::data::AnnotationRecord;
use crate::Message;

const CELL_WIDTH: f32 = 140.0;

fn cell<'a>(value: &'a str, size: f32) -> Element<'a, Message> {
    container(text(value).size(size))
        .width(Length::Fixed(CELL_WIDTH))
        .padding(5)
        .into()
}

pub fn saved_table(rows: &[AnnotationRecord]) -> Element<'_, Message> {
    if rows.is_empty() {
        return container(text("No saved data yet.").size(16))
            .padding(20)
            .into();
    }

    let header = AnnotationRecord::COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once("Delete"))
        .fold(Row::new(), |header, name| header.push(cell(name, 14.0)));

    let mut table = Column::new().spacing(2).push(header);
    for (index, record) in rows.iter().enumerate() {
        let line = record
            .values()
            .into_iter()
            .fold(Row::new(), |line, value| line.push(cell(value, 13.0)));
        table = table.push(
            row![
                line,
                button("Delete")
                    .on_press(Message::DeleteRow(index))
                    .padding(5),
            ]
            .spacing(2),
        );
    }

    scrollable(container(table).padding(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
