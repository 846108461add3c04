//! The components module contains the remote panel UI and the controller behind it.

mod app;
mod controls;
pub mod playback_controller;

pub use app::*;
