//! UI layer: the task board window.

pub mod app;

pub use app::TaskDesktopApp;
