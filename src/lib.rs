//! CGM Widget library
//!
//! Core of the glucose widget: classification, polling, and reading sources.
//! Presentation shells (terminal, tray, taskbar) stay thin and consume this
//! crate through [`poll::Poller`] and [`classify::classify`].

pub mod classify;
pub mod core;
pub mod poll;
pub mod source;
