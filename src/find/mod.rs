//! Directory search: criteria evaluation, tree walking and actions
//!
//! The pieces compose as traversal, then selection, then action:
//!
//! - `Walker`: depth-first descent over an explicit stack of open directories
//! - `evaluate`: decides whether an entry is selected by a `Criteria`
//! - `Dispatcher`: applies the configured `Action` to a selected path

mod action;
mod config;
mod criteria;
mod entry;
mod walker;

pub use action::{Dispatcher, Disposition};
pub use config::{Action, AgeComparison, Criteria, Criterion, FindConfig, ModAge};
pub use criteria::{age_secs, evaluate};
pub use entry::{EntryMetadata, Stat, join_entry};
pub use walker::{WalkSummary, Walker};
