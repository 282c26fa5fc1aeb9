mod detail;
mod keyboard;
mod notifications;
mod pagination;
mod query;
mod selection;
mod tags;
mod toast;
mod ui_state;
mod undo;
mod views;

pub use detail::*;
pub use keyboard::*;
pub use notifications::*;
pub use pagination::*;
pub use query::*;
pub use selection::*;
pub use tags::*;
pub use toast::*;
pub use ui_state::{Dialog, Dropdown, LayoutPrefs, UiStateStore};
pub use undo::*;
pub use views::*;
