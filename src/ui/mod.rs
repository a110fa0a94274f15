/// Widgets for the two tabs of the main window
pub mod table;
pub mod viewer;
