//! downsort - sort a downloads folder by file type
//!
//! This library classifies files by extension and moves the immediate files
//! of a directory into one subdirectory per category, resolving name
//! collisions without overwriting anything.

pub mod cli;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use file_category::{CategoryTable, FALLBACK_CATEGORY, classify};
pub use file_organizer::{
    EventSink, FileOrganizer, MoveRecord, OrganizeError, OrganizeEvent, OrganizeOptions,
    OrganizeReport, RunStatus, organize, plan,
};
pub use output::ConsoleSink;
