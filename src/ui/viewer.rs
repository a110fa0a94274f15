/// Search tab: query bar, annotation form and the drug preview
use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{Alignment, Element, Length};

use crate::preview::PREVIEW_SIZE;
use crate::state::data::{AnnotationFields, Field};
use crate::state::session::Selection;
use crate::Message;

pub fn search_tab<'a>(
    query: &'a str,
    fields: &'a AnnotationFields,
    selection: &'a Selection,
    preview: Option<&'a Handle>,
) -> Element<'a, Message> {
    let search_bar = row![
        text_input("Drug name, e.g. Paracetamol", query)
            .on_input(Message::QueryChanged)
            .on_submit(Message::Search)
            .size(16)
            .padding(8)
            .width(Length::Fixed(320.0)),
        button("Search").on_press(Message::Search).padding(10),
        button("Random Drug")
            .on_press(Message::RandomDrug)
            .padding(10),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let body = row![
        annotation_form(fields),
        drug_panel(selection, preview),
        button("View Saved Data")
            .on_press(Message::ViewSaved)
            .padding(10),
    ]
    .spacing(30);

    column![search_bar, body]
        .spacing(20)
        .padding(20)
        .align_x(Alignment::Center)
        .into()
}

fn annotation_form(fields: &AnnotationFields) -> Element<'_, Message> {
    let mut form = Column::new().spacing(6).width(Length::Fixed(260.0));

    for field in Field::ALL {
        form = form
            .push(text(field.label()).size(14))
            .push(
                text_input(field.placeholder(), fields.get(field))
                    .on_input(move |value| Message::FieldChanged(field, value))
                    .padding(6),
            );
    }

    form.push(
        button("Save Info")
            .on_press(Message::SaveAnnotation)
            .padding(10),
    )
    .into()
}

fn drug_panel<'a>(selection: &'a Selection, preview: Option<&'a Handle>) -> Element<'a, Message> {
    let side = PREVIEW_SIZE as f32;

    let content: Column<'a, Message> = match (selection, preview) {
        (Selection::Selected(drug), Some(handle)) => column![
            Image::new(handle.clone())
                .width(Length::Fixed(side))
                .height(Length::Fixed(side)),
            text(drug.display_name()).size(22),
            text(format!("{} image(s) found", drug.image_count)).size(12),
        ],
        _ => column![text("Search for a drug or pick a random one.").size(14)],
    };

    container(content.spacing(10).align_x(Alignment::Center))
        .width(Length::Fixed(side + 20.0))
        .center_x(Length::Fixed(side + 20.0))
        .into()
}
