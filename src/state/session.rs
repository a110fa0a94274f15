use rand::Rng;
use std::path::PathBuf;

use super::catalog::{self, Catalog};
use super::data::{AnnotationFields, AnnotationRecord};
use super::error::AppError;
use super::records::RecordStore;
use crate::preview::{self, Preview};

/// A drug currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrug {
    /// The query as the user typed it; saved as the record's Name
    pub name: String,
    /// Catalog key the query resolved to
    pub key: String,
    /// The image chosen for display
    pub image_path: PathBuf,
    /// Size of the drug's bucket
    pub image_count: usize,
    pub preview: Preview,
}

impl ActiveDrug {
    /// Heading text: first letter uppercase, the rest lowercase
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

/// What the search tab is showing.
///
/// Saving does not change the selection: the confirmation is reported as a
/// `Notice` and the same drug stays selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(ActiveDrug),
}

/// Severity of a notice shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible notification produced by a session operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(error: &AppError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: error.title().to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a row delete plus the table as it stands afterwards
#[derive(Debug)]
pub struct RowDeletion {
    pub outcome: Result<Notice, AppError>,
    pub rows: Result<Vec<AnnotationRecord>, AppError>,
}

/// The Session owns the catalog, the record store and the current selection.
///
/// Every user action maps to one method here. All of them run synchronously
/// on the caller's thread.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    store: RecordStore,
    selection: Selection,
}

impl Session {
    pub fn new(catalog: Catalog, store: RecordStore) -> Self {
        Self {
            catalog,
            store,
            selection: Selection::NoSelection,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Look up `text` and show one random image of the matching drug.
    ///
    /// An unknown drug clears the selection. An image that fails to decode
    /// leaves the previous selection in place.
    pub fn search(&mut self, text: &str) -> Result<Notice, AppError> {
        self.search_with(text, &mut rand::rng())
    }

    /// `search` with a caller-supplied random source
    pub fn search_with<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Result<Notice, AppError> {
        let Some(images) = self.catalog.lookup(text) else {
            tracing::info!("No drug matches '{}'", text);
            self.selection = Selection::NoSelection;
            return Err(AppError::NotFound(text.to_string()));
        };

        let image_path = catalog::pick_random(images, rng)
            .ok_or_else(|| AppError::NotFound(text.to_string()))?
            .clone();
        let image_count = images.len();

        let preview = preview::load_preview(&image_path)?;

        let drug = ActiveDrug {
            name: text.to_string(),
            key: catalog::normalize(text),
            image_path,
            image_count,
            preview,
        };
        tracing::info!(
            "Showing '{}' ({})",
            drug.key,
            drug.image_path.display()
        );
        let notice = Notice::info(drug.display_name(), format!("{} image(s) found", image_count));
        self.selection = Selection::Selected(drug);

        Ok(notice)
    }

    /// Pick a random drug and show it as if its key had been searched
    pub fn pick_random_drug(&mut self) -> Result<Notice, AppError> {
        self.pick_random_drug_with(&mut rand::rng())
    }

    /// `pick_random_drug` with a caller-supplied random source
    pub fn pick_random_drug_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Notice, AppError> {
        let key = self.catalog.random_drug(rng)?.0.to_string();
        self.search_with(&key, rng)
    }

    /// Append the active drug plus `fields` to the record store
    pub fn save_current_annotation(&mut self, fields: &AnnotationFields) -> Result<Notice, AppError> {
        let Selection::Selected(drug) = &self.selection else {
            return Err(AppError::NoActiveSelection);
        };

        let record = AnnotationRecord::from_fields(drug.name.clone(), fields);
        self.store.append(&record)?;

        tracing::info!("Saved annotation for '{}' to {}", record.name, self.store.path().display());
        Ok(Notice::info("Saved", format!("Data saved for {}", record.name)))
    }

    /// Current contents of the record store, for the table view
    pub fn view_saved_table(&self) -> Result<Vec<AnnotationRecord>, AppError> {
        self.store.load_all()
    }

    /// Delete a row by its position in the last table the user saw.
    ///
    /// The table is re-read whatever the outcome, so a stale index comes back
    /// together with the rows the store actually holds.
    pub fn delete_saved_row(&mut self, row_index: usize) -> RowDeletion {
        let outcome = self.store.delete_at(row_index).map(|removed| {
            tracing::info!("Deleted row {} ('{}')", row_index, removed.name);
            Notice::info("Deleted", "Entry deleted successfully.")
        });

        RowDeletion {
            outcome,
            rows: self.view_saved_table(),
        }
    }
}
