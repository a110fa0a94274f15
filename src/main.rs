use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, text};
use iced::{Element, Length, Size, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;

mod config;
mod preview;
mod state;
mod ui;

use state::catalog::Catalog;
use state::data::{AnnotationFields, AnnotationRecord, Field};
use state::error::AppError;
use state::records::RecordStore;
use state::session::{Notice, NoticeLevel, Selection, Session};

/// Tabs of the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Saved,
}

/// Main application state
struct PharmaViewer {
    /// Catalog, record store and current selection
    session: Session,
    /// Text in the search bar
    query: String,
    /// Annotation form contents
    fields: AnnotationFields,
    tab: Tab,
    /// Last snapshot of the record store shown in the Saved Data tab
    saved: Vec<AnnotationRecord>,
    /// Image handle for the current selection
    preview: Option<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    /// Search button or Enter in the search bar
    Search,
    RandomDrug,
    FieldChanged(Field, String),
    SaveAnnotation,
    /// "View Saved Data": reload the table and switch to it
    ViewSaved,
    TabSelected(Tab),
    /// Delete button of a row in the Saved Data tab
    DeleteRow(usize),
}

impl PharmaViewer {
    fn new(session: Session) -> (Self, Task<Message>) {
        let catalog = session.catalog();
        let status = format!(
            "Ready. {} drugs ({} images) in {}.",
            catalog.len(),
            catalog.image_count(),
            catalog.root().display()
        );

        tracing::info!(
            "Annotations are saved to {}",
            session.store().path().display()
        );

        let mut viewer = PharmaViewer {
            session,
            query: String::new(),
            fields: AnnotationFields::default(),
            tab: Tab::Search,
            saved: Vec::new(),
            preview: None,
            status,
        };
        viewer.reload_saved();

        (viewer, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
            }
            Message::Search => {
                let outcome = self.session.search(&self.query);
                self.sync_preview();
                self.report(outcome, false);
            }
            Message::RandomDrug => {
                let outcome = self.session.pick_random_drug();
                self.sync_preview();
                self.report(outcome, false);
            }
            Message::FieldChanged(field, value) => {
                self.fields.set(field, value);
            }
            Message::SaveAnnotation => {
                let outcome = self.session.save_current_annotation(&self.fields);
                self.report(outcome, true);
                self.reload_saved();
            }
            Message::ViewSaved => {
                self.reload_saved();
                self.tab = Tab::Saved;
            }
            Message::TabSelected(tab) => {
                if tab == Tab::Saved {
                    self.reload_saved();
                }
                self.tab = tab;
            }
            Message::DeleteRow(index) => {
                let deletion = self.session.delete_saved_row(index);
                self.apply_rows(deletion.rows);
                self.report(deletion.outcome, true);
            }
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let tab_button = |label: &'static str, tab: Tab| {
            let style = if self.tab == tab {
                button::primary
            } else {
                button::secondary
            };
            button(label)
                .on_press(Message::TabSelected(tab))
                .style(style)
                .padding(8)
        };

        let tabs = row![
            tab_button("Search Drug", Tab::Search),
            tab_button("Saved Data", Tab::Saved),
        ]
        .spacing(5);

        let body = match self.tab {
            Tab::Search => ui::viewer::search_tab(
                &self.query,
                &self.fields,
                self.session.selection(),
                self.preview.as_ref(),
            ),
            Tab::Saved => ui::table::saved_table(&self.saved),
        };

        let content = column![
            tabs,
            container(body).width(Length::Fill).height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(10)
        .padding(10);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Rebuild the image handle after the selection may have changed
    fn sync_preview(&mut self) {
        self.preview = match self.session.selection() {
            Selection::Selected(drug) => Some(Handle::from_rgba(
                drug.preview.width,
                drug.preview.height,
                drug.preview.pixels.clone(),
            )),
            Selection::NoSelection => None,
        };
    }

    /// Re-read the whole record store for the Saved Data tab
    fn reload_saved(&mut self) {
        let rows = self.session.view_saved_table();
        self.apply_rows(rows);
    }

    /// Replace the table snapshot, or report why the store could not be read
    fn apply_rows(&mut self, rows: Result<Vec<AnnotationRecord>, AppError>) {
        match rows {
            Ok(rows) => self.saved = rows,
            Err(e) => {
                tracing::error!("Failed to load saved data: {}", e);
                self.report(Err(e), true);
            }
        }
    }

    /// Show the outcome of a user action. Errors always get a dialog;
    /// successes only when `dialog` is set.
    fn report(&mut self, outcome: Result<Notice, AppError>, dialog: bool) {
        let notice = match outcome {
            Ok(notice) => notice,
            Err(e) => {
                tracing::warn!("{}", e);
                Notice::from(&e)
            }
        };

        self.status = format!("{}: {}", notice.title, notice.message);
        if dialog || notice.level == NoticeLevel::Error {
            show_dialog(&notice);
        }
    }
}

/// Native message box for a notice
fn show_dialog(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => MessageLevel::Info,
        NoticeLevel::Error => MessageLevel::Error,
    };
    MessageDialog::new()
        .set_level(level)
        .set_title(notice.title.as_str())
        .set_description(notice.message.as_str())
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Ask for the dataset folder and remember the choice
fn pick_dataset_folder(settings: &mut config::Settings) -> Result<PathBuf, AppError> {
    let folder = FileDialog::new()
        .set_title("Select the drug image dataset folder")
        .pick_folder()
        .ok_or_else(|| AppError::Settings("no dataset folder selected".to_string()))?;

    settings.dataset_dir = Some(folder.clone());
    if let Err(e) = config::Settings::remember_dataset_dir(&folder) {
        tracing::warn!("Could not remember dataset folder: {}", e);
    }

    Ok(folder)
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt::init();

    let mut settings = config::Settings::load()?;
    // A folder on the command line wins for this run only
    if let Some(arg) = std::env::args_os().nth(1) {
        settings.dataset_dir = Some(PathBuf::from(arg));
    }

    let dataset_dir = match settings.dataset_dir.clone() {
        Some(dir) => dir,
        None => pick_dataset_folder(&mut settings)?,
    };

    // The catalog is required; without it there is nothing to browse
    let catalog = Catalog::build(&dataset_dir).inspect_err(|e| {
        tracing::error!("{}", e);
        show_dialog(&Notice::from(e));
    })?;
    if catalog.is_empty() {
        tracing::warn!("No drug folders with images under {}", dataset_dir.display());
    } else {
        tracing::debug!("Drugs: {}", catalog.keys().join(", "));
    }
    for collision in catalog.collisions() {
        tracing::warn!(
            "'{}' from {} hides images from {}",
            collision.key,
            collision.winner.display(),
            collision.replaced.display()
        );
    }

    let store = RecordStore::new(settings.store_path.clone());
    let session = Session::new(catalog, store);

    iced::application(
        "Pharmaceutical Drug Viewer",
        PharmaViewer::update,
        PharmaViewer::view,
    )
    .theme(PharmaViewer::theme)
    .window_size(Size::new(1000.0, 750.0))
    .centered()
    .run_with(move || PharmaViewer::new(session))?;

    Ok(())
}
