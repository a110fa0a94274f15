use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the viewer can report to the user.
///
/// Only `CatalogBuild`, `Settings` and `Ui` are fatal; everything else is shown
/// as a notification and the session carries on.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read dataset folder '{}': {source}", .path.display())]
    CatalogBuild {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No images found for '{0}'.")]
    NotFound(String),
    #[error("Failed to load image '{}'.\n{reason}", .path.display())]
    ImageLoad { path: PathBuf, reason: String },
    #[error("Please search and display a drug first.")]
    NoActiveSelection,
    #[error("row {index} does not exist (the table has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("the dataset has no drugs to choose from")]
    EmptyCatalog,
    #[error("record store error: {0}")]
    Store(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("settings error: {0}")]
    Settings(String),
    #[error(transparent)]
    Ui(#[from] iced::Error),
}

impl AppError {
    /// Title for the message dialog that reports this error
    pub fn title(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "Not Found",
            AppError::ImageLoad { .. } => "Image Error",
            AppError::IndexOutOfRange { .. } => "Stale Row",
            AppError::EmptyCatalog => "Empty Dataset",
            AppError::CatalogBuild { .. } | AppError::Settings(_) => "Startup Error",
            _ => "Error",
        }
    }
}
