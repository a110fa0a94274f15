/// State management module
///
/// This module handles all application state, including:
/// - The dataset catalog built at startup (catalog.rs)
/// - The CSV record store for saved annotations (records.rs)
/// - The selection state machine behind every user action (session.rs)
/// - Shared data structures (data.rs) and the error type (error.rs)

pub mod catalog;
pub mod data;
pub mod error;
pub mod records;
pub mod session;
