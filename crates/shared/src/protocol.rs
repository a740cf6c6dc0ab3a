use serde::{Deserialize, Serialize};

use crate::{
    domain::{OrderDetails, OrderId, OrderRecord},
    error::ProtocolError,
};

/// Messages sent from the market page to the server over the live channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "func")]
pub enum ClientRequest {
    #[serde(rename = "submit-order")]
    SubmitOrder { data: OrderDetails },
    #[serde(rename = "get_orders_for_player")]
    GetOrdersForPlayer,
    #[serde(rename = "delete_order")]
    DeleteOrder { oid: OrderId },
}

impl ClientRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitOrder { .. } => "submit-order",
            Self::GetOrdersForPlayer => "get_orders_for_player",
            Self::DeleteOrder { .. } => "delete_order",
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "func", rename_all = "snake_case")]
pub enum ServerEvent {
    OrderConfirmed {
        order_id: OrderId,
    },
    OrderRejected {
        error_code: u32,
    },
    OrderList {
        orders: Vec<OrderRecord>,
    },
    #[serde(other)]
    Unknown,
}

/// Inbound live message: the event plus any warnings the server attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(flatten)]
    pub event: ServerEvent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ServerMessage {
    pub fn new(event: ServerEvent) -> Self {
        Self {
            event,
            warnings: Vec::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
