//! Grid controller: owns the pending order, the side locks and the cached
//! canvas size, and turns pointer events into redraws and submissions.

use serde::Serialize;
use shared::{
    channel::LiveChannel,
    domain::{OrderDetails, OrderSide},
    protocol::ClientRequest,
};
use tracing::{debug, warn};

use crate::{
    config::{GridConfig, GridLayout},
    error::GridError,
    geometry::{tick_price, GridGeometry, GridHalf},
    order::{update_current_order, PendingOrder, Readout},
    render,
    surface::GridSurface,
};

/// Externally imposed locks on each half of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SideLocks {
    pub sell_locked: bool,
    pub buy_locked: bool,
}

impl SideLocks {
    pub const NONE: SideLocks = SideLocks {
        sell_locked: false,
        buy_locked: false,
    };

    pub fn is_locked(&self, side: OrderSide) -> bool {
        match side {
            OrderSide::Sell => self.sell_locked,
            OrderSide::Buy => self.buy_locked,
        }
    }
}

pub struct OrderGridController<S, C> {
    config: GridConfig,
    layout: GridLayout,
    market_price: f64,
    surface: S,
    channel: C,
    /// Canvas size measured from the container; `None` until the next draw
    /// measures it.
    box_size: Option<f32>,
    geometry: Option<GridGeometry>,
    locks: SideLocks,
    enable_left: bool,
    enable_right: bool,
    pending: Option<PendingOrder>,
    readout: Readout,
}

impl<S: GridSurface, C: LiveChannel> OrderGridController<S, C> {
    pub fn new(
        config: GridConfig,
        layout: GridLayout,
        market_price: f64,
        surface: S,
        channel: C,
    ) -> Result<Self, GridError> {
        config.validate()?;
        check_market_price(market_price)?;
        Ok(Self {
            config,
            layout,
            market_price,
            surface,
            channel,
            box_size: None,
            geometry: None,
            locks: SideLocks::NONE,
            enable_left: true,
            enable_right: true,
            pending: None,
            readout: Readout::default(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn pending(&self) -> Option<&PendingOrder> {
        self.pending.as_ref()
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    /// Geometry of the last successful draw.
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    pub fn cached_box_size(&self) -> Option<f32> {
        self.box_size
    }

    pub fn side_locks(&self) -> SideLocks {
        self.locks
    }

    pub fn enable_left(&self) -> bool {
        self.enable_left
    }

    pub fn enable_right(&self) -> bool {
        self.enable_right
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.readout.set_message(message);
    }

    /// Paints the grid with the given halves dimmed and records which halves
    /// accept orders.
    pub fn draw(&mut self, dark_left: bool, dark_right: bool) -> Result<GridGeometry, GridError> {
        self.enable_left = !dark_left;
        self.enable_right = !dark_right;

        let canvas_size = match self.box_size {
            Some(size) => size,
            None => {
                let (width, height) = self.surface.container_size();
                let size = width.min(height);
                if !(size > 0.0) {
                    self.geometry = None;
                    return Err(GridError::EmptyContainer { width, height });
                }
                size
            }
        };

        let geometry = match GridGeometry::compute(
            &self.config,
            &self.layout,
            canvas_size,
            self.market_price,
        ) {
            Ok(geometry) => geometry,
            Err(err) => {
                self.box_size = None;
                self.geometry = None;
                return Err(err);
            }
        };
        self.box_size = Some(canvas_size);

        render::paint_grid(
            &mut self.surface,
            &geometry,
            &self.config,
            self.market_price,
            dark_left,
            dark_right,
        );
        self.geometry = Some(geometry);
        Ok(geometry)
    }

    /// `x` and `y` are relative to the grid container's origin.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.readout.clear_message();

        let geometry = match self.draw(self.locks.sell_locked, self.locks.buy_locked) {
            Ok(geometry) => geometry,
            Err(err) => {
                debug!(%err, "grid not drawable; ignoring pointer move");
                self.clear_pending();
                return;
            }
        };

        if !geometry.contains(x, y) {
            self.reset();
            return;
        }

        let point = geometry.snap(x, y);
        if let Some(half) = geometry.half_of(point) {
            if !self.half_enabled(half) {
                self.reset();
                return;
            }
        }

        render::paint_marker(
            &mut self.surface,
            geometry.marker_position(point),
            self.layout.marker_radius,
        );

        let quantity = geometry.quantity_at(point.column);
        let price = tick_price(&self.config, self.market_price, point.tick_row);
        self.pending = self.update_current_order(price, quantity);
        debug!(
            column = point.column,
            tick_row = point.tick_row,
            quantity,
            price,
            valid = self.pending.is_some(),
            "mapped pointer to grid point"
        );
    }

    pub fn update_current_order(&mut self, price: f64, quantity: i64) -> Option<PendingOrder> {
        update_current_order(&mut self.readout, price, quantity)
    }

    pub fn on_pointer_leave(&mut self) {
        self.reset();
    }

    pub fn on_resize(&mut self) {
        self.box_size = None;
        self.reset();
    }

    /// Submits the pending order, if there is one and its half is enabled.
    /// Returns what was sent so the order list can await its confirmation.
    pub fn on_click(&mut self) -> Option<OrderDetails> {
        let order = self.pending?;
        if !self.side_enabled(order.side) {
            debug!(side = %order.side, "ignoring click on a locked side");
            return None;
        }

        let details = OrderDetails::from(order);
        let sent = self.channel.send(ClientRequest::SubmitOrder {
            data: details.clone(),
        });
        self.reset();

        match sent {
            Ok(()) => {
                debug!(
                    side = %details.side,
                    quantity = details.quantity,
                    price = details.price,
                    "submitted grid order"
                );
                Some(details)
            }
            Err(err) => {
                warn!(%err, "failed to send grid order");
                self.readout.set_message(format!("Order was not sent: {err}"));
                None
            }
        }
    }

    /// Drops the pending order, empties the order cells and repaints the grid.
    pub fn reset(&mut self) {
        self.clear_pending();
        if let Err(err) = self.draw(self.locks.sell_locked, self.locks.buy_locked) {
            debug!(%err, "grid not drawable; skipped redraw");
        }
    }

    pub fn set_side_locks(&mut self, locks: SideLocks) {
        if self.locks != locks {
            debug!(
                sell_locked = locks.sell_locked,
                buy_locked = locks.buy_locked,
                "grid side locks changed"
            );
            self.locks = locks;
            self.reset();
        }
    }

    pub fn set_market_price(&mut self, market_price: f64) -> Result<(), GridError> {
        check_market_price(market_price)?;
        self.market_price = market_price;
        self.reset();
        Ok(())
    }

    fn clear_pending(&mut self) {
        self.pending = None;
        self.readout.clear_cells();
    }

    fn half_enabled(&self, half: GridHalf) -> bool {
        match half {
            GridHalf::Sell => self.enable_left,
            GridHalf::Buy => self.enable_right,
        }
    }

    fn side_enabled(&self, side: OrderSide) -> bool {
        match side {
            OrderSide::Sell => self.enable_left,
            OrderSide::Buy => self.enable_right,
        }
    }
}

fn check_market_price(market_price: f64) -> Result<(), GridError> {
    if market_price.is_finite() && market_price >= 0.0 {
        Ok(())
    } else {
        Err(GridError::MarketPrice(market_price))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
