use serde::Serialize;
use shared::domain::{OrderDetails, OrderSide};

pub const START_MESSAGE: &str = "Submit an order by clicking on the grid.";

/// Order implied by the current pointer position. Always has a side, a
/// non-zero quantity and a positive price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendingOrder {
    pub side: OrderSide,
    pub quantity: u32,
    pub price: f64,
}

impl From<PendingOrder> for OrderDetails {
    fn from(order: PendingOrder) -> Self {
        OrderDetails {
            side: order.side,
            quantity: order.quantity,
            price: order.price,
        }
    }
}

/// The current-order cells shown next to the grid, plus the status line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub side: Option<OrderSide>,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
    pub price_invalid: bool,
    pub quantity_invalid: bool,
    pub message: String,
}

impl Default for Readout {
    fn default() -> Self {
        Self {
            side: None,
            quantity: None,
            price: None,
            price_invalid: false,
            quantity_invalid: false,
            message: START_MESSAGE.to_string(),
        }
    }
}

impl Readout {
    /// Empties the three order cells and their alert flags. The status line is
    /// left alone.
    pub fn clear_cells(&mut self) {
        self.side = None;
        self.quantity = None;
        self.price = None;
        self.price_invalid = false;
        self.quantity_invalid = false;
    }

    pub fn is_clear(&self) -> bool {
        self.side.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && !self.price_invalid
            && !self.quantity_invalid
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
    }

    pub fn side_text(&self) -> &'static str {
        self.side.map(OrderSide::as_str).unwrap_or("")
    }

    pub fn quantity_text(&self) -> String {
        self.quantity.map(|q| q.to_string()).unwrap_or_default()
    }

    pub fn price_text(&self) -> String {
        self.price.map(format_price).unwrap_or_default()
    }
}

/// Fills the readout for a mapped grid point and returns the order it stands
/// for, if any. A non-positive price is flagged before a zero quantity, so
/// only the price cell is flagged when both are wrong.
pub fn update_current_order(
    readout: &mut Readout,
    price: f64,
    quantity: i64,
) -> Option<PendingOrder> {
    readout.price_invalid = false;
    readout.quantity_invalid = false;

    let side = OrderSide::from_quantity(quantity);
    let shares = u32::try_from(quantity.unsigned_abs()).unwrap_or(u32::MAX);

    readout.side = side;
    readout.quantity = Some(shares);
    readout.price = Some(price.max(0.0));

    if !(price > 0.0) {
        readout.price_invalid = true;
        return None;
    }
    let Some(side) = side else {
        readout.quantity_invalid = true;
        return None;
    };

    Some(PendingOrder {
        side,
        quantity: shares,
        price,
    })
}

/// Whole prices print without decimals, others with two.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}
