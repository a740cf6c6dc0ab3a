use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::ProtocolError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(OrderId);

/// Side of an order. Buys sit on the right half of the grid, sells on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Side implied by a signed grid quantity; zero has no side.
    pub fn from_quantity(quantity: i64) -> Option<Self> {
        match quantity {
            0 => None,
            q if q < 0 => Some(Self::Sell),
            _ => Some(Self::Buy),
        }
    }

    /// Numeric order type used by the market server: `-1` is a bid, `1` an offer.
    pub fn from_legacy_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Buy),
            1 => Some(Self::Sell),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("buy") || trimmed == "-1" {
            Ok(Self::Buy)
        } else if trimmed.eq_ignore_ascii_case("sell") || trimmed == "1" {
            Ok(Self::Sell)
        } else {
            Err(ProtocolError::UnknownOrderSide(trimmed.to_string()))
        }
    }
}

// Order lists coming back from the server may carry the side as text or as the
// numeric bid/offer code, so accept both.
impl<'de> Deserialize<'de> for OrderSide {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSide {
            Code(i64),
            Text(String),
        }

        match RawSide::deserialize(deserializer)? {
            RawSide::Code(code) => OrderSide::from_legacy_code(code)
                .ok_or_else(|| de::Error::custom(format!("unknown order type code {code}"))),
            RawSide::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Order body carried by a `submit-order` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(rename = "type")]
    pub side: OrderSide,
    pub quantity: u32,
    pub price: f64,
}

/// One entry of an `order_list` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub oid: OrderId,
    #[serde(rename = "type")]
    pub side: OrderSide,
    pub quantity: u32,
    pub price: f64,
}

impl OrderRecord {
    pub fn details(&self) -> OrderDetails {
        OrderDetails {
            side: self.side,
            quantity: self.quantity,
            price: self.price,
        }
    }
}
