//! Backend worker: owns the tokio runtime and the task controller.

pub mod commands;
pub mod runtime;
