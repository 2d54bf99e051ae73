//! Bridge between the egui thread and the tokio runtime that owns the deck controller.

pub mod commands;
pub mod runtime;
