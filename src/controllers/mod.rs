//! Controllers: `impl Session` blocks that orchestrate the stores against
//! the backend.

mod actions;
mod bulk;
mod detail;
mod keyboard;
mod navigation;
mod pagination;
mod query;
mod rules;
mod tags;
mod undo;
mod views;

pub use actions::{ActionOptions, ActionOutcome, next_focus_after_removal};
pub use bulk::{BulkOutcome, ConfirmSite};
pub use views::DeleteViewOutcome;
