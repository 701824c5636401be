// Copyright 2026 Ampere Supply Engineering.

//! Order lifecycle: creation, status transitions, stock bookkeeping
//!
//! This is the one place in the system with multi-step state change.
//! Creation is all-or-nothing: every line is validated against the live
//! catalog first, then all stock decrements commit through a single
//! atomic store operation. A failure on any line leaves every product
//! untouched and writes no order. Cancellation restores the snapshot
//! quantities against the live products; the enforced state machine
//! makes a second cancellation (and a double restore) impossible.

use crate::entity::{OrderId, ProductId, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::orders::number::{format_order_number, SequenceKey};
use crate::orders::order::{
    CustomerInfo, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
    MAX_NOTES_LEN,
};
use crate::store::{OrderStore, Page, PageRequest, ProductStore};
use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// One requested cart line
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CartLine {
    /// Product to purchase
    pub product_id: ProductId,
    /// Requested quantity, at least 1
    pub quantity: u32,
}

/// Everything needed to create an order
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CheckoutRequest {
    /// Customer contact details, snapshotted onto the order
    pub customer: CustomerInfo,
    /// Requested cart lines
    pub items: Vec<CartLine>,
    /// Delivery address
    pub shipping_address: ShippingAddress,
    /// Free-form note
    #[serde(default)]
    pub notes: Option<String>,
    /// Shipping charge; defaults to 0
    #[serde(default)]
    pub shipping_price: Option<f64>,
}

/// Status update requested by the back office
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StatusUpdate {
    /// Target fulfillment state
    pub order_status: OrderStatus,
    /// Carrier tracking number, set whenever provided
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Reason recorded on cancellation
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Creates orders and drives their status transitions
pub struct OrderLifecycle {
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
}

impl OrderLifecycle {
    /// Create the lifecycle over the order and product collections
    pub fn new(orders: Arc<dyn OrderStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { orders, products }
    }

    /// Create an order from a checkout request
    ///
    /// Fails with a validation error on an empty or malformed cart before
    /// touching any product, with `EntityNotFound` when a line's product
    /// does not resolve, and with `InsufficientStock` when a line exceeds
    /// the available units; in every failure case no stock is mutated and
    /// no order is written.
    #[instrument(skip_all, fields(lines = request.items.len()))]
    pub async fn create_order(
        &self,
        request: CheckoutRequest,
        user_id: Option<UserId>,
    ) -> DomainResult<Order> {
        if request.items.is_empty() {
            return Err(DomainError::validation("No order items provided"));
        }
        for line in &request.items {
            if line.quantity == 0 {
                return Err(DomainError::validation("Quantity must be at least 1"));
            }
        }
        if let Some(notes) = &request.notes {
            if notes.len() > MAX_NOTES_LEN {
                return Err(DomainError::validation(format!(
                    "Notes cannot exceed {MAX_NOTES_LEN} characters"
                )));
            }
        }
        let shipping_price = request.shipping_price.unwrap_or(0.0);
        if shipping_price < 0.0 {
            return Err(DomainError::validation("Shipping price cannot be negative"));
        }

        // Pass 1: resolve every product and freeze the line snapshots.
        // Values captured here never change, whatever happens to the
        // product afterwards.
        let mut items = Vec::with_capacity(request.items.len());
        let mut items_price = 0.0;
        for line in &request.items {
            let product = self.products.get(line.product_id).await?;
            if product.stock < line.quantity {
                return Err(DomainError::InsufficientStock {
                    product: product.name,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            items_price += product.price * f64::from(line.quantity);
            let image = product.primary_image_url();
            items.push(OrderItem {
                product_id: product.id,
                name: product.name,
                image,
                price: product.price,
                quantity: line.quantity,
            });
        }

        // Pass 2: commit every decrement atomically. A concurrent
        // checkout can still win the race between the passes; the store
        // then rejects the whole batch and nothing was mutated.
        let lines: Vec<(ProductId, u32)> = items
            .iter()
            .map(|item| (item.product_id, item.quantity))
            .collect();
        self.products.decrement_stock_all(&lines).await?;

        let now = Utc::now();
        let sequence = self
            .orders
            .next_sequence(SequenceKey::for_timestamp(now))
            .await?;
        let order = Order {
            id: OrderId::new(),
            order_number: format_order_number(now, sequence),
            customer: request.customer,
            user_id,
            items,
            shipping_address: request.shipping_address,
            payment_method: PaymentMethod::Cod,
            payment_status: PaymentStatus::Pending,
            items_price,
            shipping_price,
            tax_price: 0.0,
            total_price: items_price + shipping_price,
            order_status: OrderStatus::Pending,
            notes: request.notes,
            tracking_number: None,
            delivered_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        self.orders.insert(&order).await?;
        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = order.total_price,
            "order created"
        );
        Ok(order)
    }

    /// Fetch an order by id
    pub async fn get_order(&self, id: OrderId) -> DomainResult<Order> {
        self.orders.get(id).await
    }

    /// List orders, newest first, optionally filtered by status
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> DomainResult<Page<Order>> {
        self.orders.list(status, page).await
    }

    /// All orders placed by one user, newest first
    pub async fn list_orders_for_user(&self, user_id: UserId) -> DomainResult<Vec<Order>> {
        self.orders.list_by_user(user_id).await
    }

    /// Drive an order to a new status
    ///
    /// Transitions are validated against the state machine. Delivery
    /// forces payment to paid; cancellation records the reason and
    /// restores stock per item. Customer, items and prices stay frozen.
    #[instrument(skip(self, update), fields(order_id = %id, target = %update.order_status))]
    pub async fn update_status(&self, id: OrderId, update: StatusUpdate) -> DomainResult<Order> {
        let mut order = self.orders.get(id).await?;

        let from = order.order_status;
        let to = update.order_status;
        if !from.can_transition_to(&to) {
            return Err(DomainError::InvalidStateTransition {
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
        }

        order.order_status = to;
        if let Some(tracking) = update.tracking_number {
            order.tracking_number = Some(tracking);
        }

        match to {
            OrderStatus::Delivered => {
                order.delivered_at = Some(Utc::now());
                order.payment_status = PaymentStatus::Paid;
            }
            OrderStatus::Cancelled => {
                order.cancelled_at = Some(Utc::now());
                order.cancellation_reason = update.cancellation_reason;
            }
            _ => {}
        }

        order.updated_at = Utc::now();
        // Persist the terminal state before touching stock: a write that
        // fails (version conflict) must leave inventory unchanged, or a
        // retried cancellation would restore twice.
        self.orders.update(&order).await?;
        if to == OrderStatus::Cancelled {
            self.restore_stock(&order).await;
        }
        info!(order_number = %order.order_number, from = %from, to = %to, "order status updated");
        self.orders.get(id).await
    }

    /// Add each item's snapshot quantity back to the live product
    ///
    /// Products deleted since the order was placed are skipped.
    async fn restore_stock(&self, order: &Order) {
        for item in &order.items {
            match self
                .products
                .increment_stock(item.product_id, item.quantity)
                .await
            {
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    warn!(
                        order_number = %order.order_number,
                        product_id = %item.product_id,
                        "skipping stock restore for deleted product"
                    );
                }
                Err(err) => {
                    warn!(
                        order_number = %order.order_number,
                        product_id = %item.product_id,
                        error = %err,
                        "stock restore failed"
                    );
                }
            }
        }
    }
}
