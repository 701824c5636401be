// Copyright 2026 Ampere Supply Engineering.

//! Orders: the aggregate, order numbering, and the lifecycle service

mod lifecycle;
pub mod number;
pub mod order;

pub use lifecycle::{CartLine, CheckoutRequest, OrderLifecycle, StatusUpdate};
pub use number::{format_order_number, SequenceKey, ORDER_NUMBER_PREFIX};
pub use order::{
    CustomerInfo, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
};
