//! Bridge between the egui thread and the tokio worker that owns the live channel.

pub mod commands;
pub mod runtime;
