// Copyright 2026 Ampere Supply Engineering.

//! Order aggregate: customer snapshot, item snapshots, status machine
//!
//! Item fields (name, image, price) are copied from the live product at
//! creation time and never re-derived afterwards, so an order stays
//! historically accurate when the catalog changes underneath it.

use crate::entity::{AggregateRoot, OrderId, ProductId, UserId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted order note
pub const MAX_NOTES_LEN: usize = 500;

/// The single supported payment method: cash collected at delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,
}

/// Payment state, driven by the status machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting collection
    #[default]
    Pending,
    /// Collected
    Paid,
    /// Collection failed
    Failed,
}

/// Order fulfillment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet confirmed
    #[default]
    Pending,
    /// Confirmed by the back office
    Confirmed,
    /// Being picked and packed
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Delivered to the customer (terminal)
    Delivered,
    /// Cancelled (terminal)
    Cancelled,
}

impl OrderStatus {
    /// State name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a wire-form status name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if a transition to the target state is valid
    ///
    /// The fulfillment chain moves strictly forward; cancellation is
    /// reachable from any non-terminal state. Terminal states reject
    /// everything, which is what makes repeated cancellation (and a
    /// double stock restore) impossible.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        if self.is_terminal() || target == self {
            return false;
        }
        match (self, target) {
            (_, OrderStatus::Cancelled) => true,
            (OrderStatus::Pending, OrderStatus::Confirmed) => true,
            (OrderStatus::Confirmed, OrderStatus::Processing) => true,
            (OrderStatus::Processing, OrderStatus::Shipped) => true,
            (OrderStatus::Shipped, OrderStatus::Delivered) => true,
            _ => false,
        }
    }

    /// All valid target states from this state
    pub fn valid_transitions(&self) -> Vec<Self> {
        [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
        .into_iter()
        .filter(|target| self.can_transition_to(target))
        .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Customer contact details copied at order time, not a live reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomerInfo {
    /// Customer name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

/// Delivery address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShippingAddress {
    /// Recipient name, when different from the customer
    #[serde(default)]
    pub full_name: Option<String>,
    /// Recipient phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Street address
    pub address_line1: String,
    /// Additional address line
    #[serde(default)]
    pub address_line2: Option<String>,
    /// City
    pub city: String,
    /// State or wilaya
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Algeria".to_string()
}

/// Frozen snapshot of one purchased line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OrderItem {
    /// The product this line refers to
    pub product_id: ProductId,
    /// Product name at order time
    pub name: String,
    /// Primary image URL at order time, empty if the product had none
    pub image: String,
    /// Unit price at order time
    pub price: f64,
    /// Purchased quantity, at least 1
    pub quantity: u32,
}

impl OrderItem {
    /// Line total: snapshot price times quantity
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,
    /// Human-readable `AS{YY}{MM}{NNNNN}` number, immutable once set
    pub order_number: String,
    /// Customer snapshot
    pub customer: CustomerInfo,
    /// Registered user, when the checkout was authenticated
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Purchased line snapshots
    pub items: Vec<OrderItem>,
    /// Delivery address
    pub shipping_address: ShippingAddress,
    /// Always cash on delivery
    pub payment_method: PaymentMethod,
    /// Payment state
    pub payment_status: PaymentStatus,
    /// Sum of line totals, computed at creation
    pub items_price: f64,
    /// Shipping charge
    pub shipping_price: f64,
    /// Tax charge; not computed by this system
    pub tax_price: f64,
    /// items_price + shipping_price + tax_price, frozen at creation
    pub total_price: f64,
    /// Fulfillment state
    pub order_status: OrderStatus,
    /// Free-form customer note
    #[serde(default)]
    pub notes: Option<String>,
    /// Carrier tracking number
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Set on the transition to delivered
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    /// Set on the transition to cancelled
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Reason recorded on cancellation
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Version for optimistic concurrency
    #[serde(default)]
    pub version: u64,
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }
}
