//! UI layer: app shell, controls panel and preview panel.

pub mod app;
pub mod controls;
pub mod preview;

pub use app::{PlaygroundApp, StartupConfig};
