//! Pokemon detail screen - tui-dispatch app
//!
//! The library exposes the app's modules so the binary and the
//! integration tests share them.

pub mod action;
pub mod artwork;
pub mod components;
pub mod effect;
pub mod kitty_backend;
pub mod logging;
pub mod names;
pub mod palette;
pub mod reducer;
pub mod repository;
pub mod state;
pub mod tasks;
pub mod theme;
