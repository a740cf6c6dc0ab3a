//! The player's live orders as confirmed by the server, and the side locks
//! that follow from the order cap.

use std::collections::VecDeque;

use serde::Serialize;
use shared::{
    channel::{ChannelError, LiveChannel},
    domain::{OrderDetails, OrderId, OrderSide},
    error::{ErrorCodeTable, OrderField},
    protocol::{ClientRequest, ServerEvent, ServerMessage},
};
use tracing::{debug, info, warn};

use crate::controller::SideLocks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCap {
    /// Total live orders after which the whole grid locks.
    pub max_orders: usize,
    /// Live orders on one side after which that side locks.
    pub max_per_side: Option<usize>,
}

impl Default for OrderCap {
    fn default() -> Self {
        Self {
            max_orders: 6,
            max_per_side: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedOrder {
    pub oid: OrderId,
    pub side: OrderSide,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    Confirmed(OrderId),
    Rejected {
        error_code: u32,
        message: Option<String>,
        fields: Vec<OrderField>,
    },
    Listed(usize),
    Ignored,
}

#[derive(Debug, Default)]
pub struct OrderList {
    orders: Vec<ConfirmedOrder>,
    in_flight: VecDeque<OrderDetails>,
    warnings: Vec<String>,
    cap: OrderCap,
    error_codes: ErrorCodeTable,
}

impl OrderList {
    pub fn new(cap: OrderCap, error_codes: ErrorCodeTable) -> Self {
        Self {
            orders: Vec::new(),
            in_flight: VecDeque::new(),
            warnings: Vec::new(),
            cap,
            error_codes,
        }
    }

    pub fn orders(&self) -> &[ConfirmedOrder] {
        &self.orders
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Asks the server for every live order of this player, e.g. after a reload.
    pub fn request_orders<C: LiveChannel + ?Sized>(&self, channel: &C) -> Result<(), ChannelError> {
        channel.send(ClientRequest::GetOrdersForPlayer)
    }

    pub fn note_submitted(&mut self, details: OrderDetails) {
        self.in_flight.push_back(details);
    }

    /// Forgets a submission that never reached the server. Entries with equal
    /// details are interchangeable, so the newest match is removed.
    pub fn withdraw_submission(&mut self, details: &OrderDetails) -> bool {
        match self.in_flight.iter().rposition(|pending| pending == details) {
            Some(index) => {
                self.in_flight.remove(index);
                debug!(side = %details.side, "withdrew unsent order");
                true
            }
            None => {
                warn!(side = %details.side, "unsent order was not in flight");
                false
            }
        }
    }

    /// Drops every unanswered submission. A new or closed connection will
    /// never answer them.
    pub fn clear_in_flight(&mut self) -> usize {
        let dropped = self.in_flight.len();
        if dropped > 0 {
            warn!(dropped, "discarding unanswered submissions");
            self.in_flight.clear();
        }
        dropped
    }

    pub fn handle(&mut self, message: &ServerMessage) -> ListOutcome {
        self.warnings = message.warnings.clone();

        match &message.event {
            ServerEvent::OrderConfirmed { order_id } => {
                let Some(details) = self.in_flight.pop_front() else {
                    warn!(%order_id, "confirmation without a submitted order");
                    return ListOutcome::Ignored;
                };
                self.upsert(ConfirmedOrder {
                    oid: *order_id,
                    side: details.side,
                    quantity: details.quantity,
                    price: details.price,
                });
                info!(%order_id, "order confirmed");
                ListOutcome::Confirmed(*order_id)
            }
            ServerEvent::OrderRejected { error_code } => {
                if self.in_flight.pop_front().is_none() {
                    warn!(error_code, "rejection without a submitted order");
                }
                let message = self.error_codes.describe(*error_code).map(str::to_string);
                info!(error_code, "order rejected");
                ListOutcome::Rejected {
                    error_code: *error_code,
                    message,
                    fields: self.error_codes.fields(*error_code),
                }
            }
            ServerEvent::OrderList { orders } => {
                for record in orders {
                    self.upsert(ConfirmedOrder {
                        oid: record.oid,
                        side: record.side,
                        quantity: record.quantity,
                        price: record.price,
                    });
                }
                debug!(count = orders.len(), "merged order list");
                ListOutcome::Listed(orders.len())
            }
            ServerEvent::Unknown => ListOutcome::Ignored,
        }
    }

    /// Sends a delete request and drops the order locally; the server does not
    /// acknowledge deletes. The order stays listed if the request cannot be sent.
    pub fn cancel<C: LiveChannel + ?Sized>(
        &mut self,
        oid: OrderId,
        channel: &C,
    ) -> Result<(), ChannelError> {
        channel.send(ClientRequest::DeleteOrder { oid })?;
        self.orders.retain(|order| order.oid != oid);
        debug!(%oid, "cancelled order");
        Ok(())
    }

    pub fn side_locks(&self) -> SideLocks {
        if self.orders.len() >= self.cap.max_orders {
            return SideLocks {
                sell_locked: true,
                buy_locked: true,
            };
        }

        let Some(per_side) = self.cap.max_per_side else {
            return SideLocks::NONE;
        };
        let count = |side: OrderSide| self.orders.iter().filter(|o| o.side == side).count();
        SideLocks {
            sell_locked: count(OrderSide::Sell) >= per_side,
            buy_locked: count(OrderSide::Buy) >= per_side,
        }
    }

    fn upsert(&mut self, order: ConfirmedOrder) {
        match self.orders.iter_mut().find(|existing| existing.oid == order.oid) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
    }
}

#[cfg(test)]
#[path = "tests/order_list_tests.rs"]
mod tests;
