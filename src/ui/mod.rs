mod detail;
mod dialog;
mod notifications;
mod pane;
mod sidebar;
mod status;

pub use detail::*;
pub use dialog::*;
pub use notifications::*;
pub use pane::*;
pub use sidebar::*;
pub use status::*;
