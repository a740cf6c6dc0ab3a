use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed live message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unknown order side '{0}'")]
    UnknownOrderSide(String),
    #[error("unknown order form field {0}")]
    UnknownField(u8),
}

/// Order form field a rejection code points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderField {
    Price,
    Quantity,
    Type,
}

impl TryFrom<u8> for OrderField {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Price),
            2 => Ok(Self::Quantity),
            3 => Ok(Self::Type),
            other => Err(ProtocolError::UnknownField(other)),
        }
    }
}

impl From<OrderField> for u8 {
    fn from(value: OrderField) -> Self {
        match value {
            OrderField::Price => 1,
            OrderField::Quantity => 2,
            OrderField::Type => 3,
        }
    }
}

/// Rejection reasons the market server combines into an `error_code` bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderErrorCode {
    PriceNegative,
    PriceNotNum,
    QuantNegative,
    QuantNotNum,
    BadType,
    BidGreaterThanAsk,
    AskLessThanBid,
    BorrowingTooMuch,
    PriceCeil,
    QuantCeil,
    PriceLenRaw,
    QuantLenRaw,
    Shorting,
    Margin,
}

impl OrderErrorCode {
    pub const ALL: [OrderErrorCode; 14] = [
        Self::PriceNegative,
        Self::PriceNotNum,
        Self::QuantNegative,
        Self::QuantNotNum,
        Self::BadType,
        Self::BidGreaterThanAsk,
        Self::AskLessThanBid,
        Self::BorrowingTooMuch,
        Self::PriceCeil,
        Self::QuantCeil,
        Self::PriceLenRaw,
        Self::QuantLenRaw,
        Self::Shorting,
        Self::Margin,
    ];

    pub fn value(self) -> u32 {
        match self {
            Self::PriceNegative => 1,
            Self::PriceNotNum => 2,
            Self::QuantNegative => 4,
            Self::QuantNotNum => 8,
            Self::BadType => 16,
            Self::BidGreaterThanAsk => 32,
            Self::AskLessThanBid => 64,
            Self::BorrowingTooMuch => 128,
            Self::PriceCeil => 256,
            Self::QuantCeil => 512,
            Self::PriceLenRaw => 1024,
            Self::QuantLenRaw => 2048,
            Self::Shorting => 4096,
            Self::Margin => 8192,
        }
    }

    pub fn field(self) -> OrderField {
        match self {
            Self::PriceNegative
            | Self::PriceNotNum
            | Self::BidGreaterThanAsk
            | Self::AskLessThanBid
            | Self::PriceCeil
            | Self::PriceLenRaw
            | Self::Margin => OrderField::Price,
            Self::QuantNegative
            | Self::QuantNotNum
            | Self::BorrowingTooMuch
            | Self::QuantCeil
            | Self::QuantLenRaw
            | Self::Shorting => OrderField::Quantity,
            Self::BadType => OrderField::Type,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::PriceNegative => "Must be greater than zero",
            Self::PriceNotNum => "Must be a number",
            Self::QuantNegative => "Must be greater than zero",
            Self::QuantNotNum => "Must be an integer number",
            Self::BadType => "Select a type",
            Self::BidGreaterThanAsk => "Buy price must be less than all sell orders",
            Self::AskLessThanBid => "Sell price must be greater than all buy orders",
            Self::BorrowingTooMuch => {
                "The cost of this order will increase your debt beyond your limit. \
                 Either lower the price or reduce the number of shares."
            }
            Self::PriceCeil => "The price to less than 10,000.",
            Self::QuantCeil => "The quantity should be less than 100.",
            Self::PriceLenRaw => "This input is too long.  Please provide a shorter input.",
            Self::QuantLenRaw => "This input is too long.  Please provide a shorter input.",
            Self::Shorting => {
                "You are attempting to sell more shares that you have.  Please reduce the quantity."
            }
            Self::Margin => {
                "The total cost of your combined BUYs exceeds your current amount of CASH. \
                 Please reduce either the price or quantity of this order."
            }
        }
    }

    pub fn entry(self) -> ErrorCodeEntry {
        ErrorCodeEntry {
            value: self.value(),
            field: self.field(),
            desc: self.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCodeEntry {
    pub value: u32,
    pub field: OrderField,
    pub desc: String,
}

/// Lookup table from rejection bits to user-facing descriptions.
///
/// Serialized as the `{ "<bit>": { value, field, desc } }` map the market page
/// receives at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCodeTable {
    entries: BTreeMap<u32, ErrorCodeEntry>,
}

impl Default for ErrorCodeTable {
    fn default() -> Self {
        Self {
            entries: OrderErrorCode::ALL
                .iter()
                .map(|code| (code.value(), code.entry()))
                .collect(),
        }
    }
}

impl ErrorCodeTable {
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Entries whose bit is set in `code`, lowest bit first.
    pub fn matching(&self, code: u32) -> impl Iterator<Item = &ErrorCodeEntry> {
        self.entries
            .values()
            .filter(move |entry| entry.value & code != 0)
    }

    /// Description shown in the status line; the highest set bit wins.
    pub fn describe(&self, code: u32) -> Option<&str> {
        self.matching(code).last().map(|entry| entry.desc.as_str())
    }

    pub fn fields(&self, code: u32) -> Vec<OrderField> {
        let mut fields: Vec<OrderField> = Vec::new();
        for entry in self.matching(code) {
            if !fields.contains(&entry.field) {
                fields.push(entry.field);
            }
        }
        fields
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
