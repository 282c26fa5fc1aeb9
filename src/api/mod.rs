mod client;
mod error;
mod rules;
mod types;

pub use client::*;
pub use error::*;
pub use rules::*;
pub use types::*;
