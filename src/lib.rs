//! Headless state and controller layer for triaging GitHub notifications.
//!
//! [`session::Session`] owns every store; the `controllers` module adds the
//! operations that drive them against a [`api::Backend`]. The `triagetui`
//! binary is a terminal frontend over this crate.

pub mod api;
pub mod config;
pub mod controllers;
pub mod debounce;
pub mod events;
pub mod logging;
pub mod route;
pub mod session;
pub mod store;
