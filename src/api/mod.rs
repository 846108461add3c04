//! Client side of the mpv web remote HTTP interface.
pub mod models;
pub mod remote;

pub use models::*;
pub use remote::*;
