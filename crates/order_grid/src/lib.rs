//! Order grid: a square price/quantity grid centered on the market price.
//! Pointer positions map to candidate orders, clicks submit them over the
//! live channel.

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod order;
pub mod order_list;
pub mod render;
pub mod surface;

pub use config::{load_settings, GridConfig, GridLayout, GridSettings};
pub use controller::{OrderGridController, SideLocks};
pub use error::GridError;
pub use geometry::{GridGeometry, GridHalf, GridPoint};
pub use order::{PendingOrder, Readout};
pub use order_list::{ConfirmedOrder, ListOutcome, OrderCap, OrderList};
pub use surface::{DisplayList, DrawCommand, GridSurface};
