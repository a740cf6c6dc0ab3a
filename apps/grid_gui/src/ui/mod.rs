//! UI layer: the market window and the grid canvas.

pub mod app;
pub mod canvas;

pub use app::GridApp;
