// Copyright 2026 Ampere Supply Engineering.

//! End-to-end order lifecycle scenarios over the in-memory store

use ampere_supply::catalog::{CatalogService, CategoryDraft, ProductDraft};
use ampere_supply::entity::ProductId;
use ampere_supply::errors::DomainError;
use ampere_supply::media::InMemoryMediaService;
use ampere_supply::orders::order::{
    CustomerInfo, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
};
use ampere_supply::orders::{CartLine, CheckoutRequest, OrderLifecycle, StatusUpdate};
use ampere_supply::store::{InMemoryStore, ProductStore};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Shop {
    catalog: CatalogService,
    lifecycle: OrderLifecycle,
    store: Arc<InMemoryStore>,
}

fn shop() -> Shop {
    let store = Arc::new(InMemoryStore::new());
    let media = Arc::new(InMemoryMediaService::new());
    Shop {
        catalog: CatalogService::new(store.clone(), store.clone(), media),
        lifecycle: OrderLifecycle::new(store.clone(), store.clone()),
        store,
    }
}

async fn stock_product(shop: &Shop, name: &str, stock: u32, price: f64) -> ProductId {
    let category = shop
        .catalog
        .create_category(CategoryDraft {
            name: format!("{name} category"),
            description: None,
            parent_id: None,
            image: None,
            is_active: true,
            order: 0,
        })
        .await
        .unwrap();
    shop.catalog
        .create_product(ProductDraft {
            name: name.to_string(),
            description: "integration fixture".to_string(),
            price,
            compare_at_price: None,
            stock,
            sku: None,
            category_id: category.id,
            images: Vec::new(),
            specifications: IndexMap::new(),
            datasheets: Vec::new(),
            tags: Vec::new(),
            featured: false,
            is_active: true,
        })
        .await
        .unwrap()
        .id
}

fn checkout(lines: Vec<CartLine>, shipping: f64) -> CheckoutRequest {
    CheckoutRequest {
        customer: CustomerInfo {
            name: "Yacine".to_string(),
            email: "yacine@example.com".to_string(),
            phone: "0661234567".to_string(),
        },
        items: lines,
        shipping_address: ShippingAddress {
            full_name: None,
            phone: None,
            address_line1: "12 Boulevard Zighout Youcef".to_string(),
            address_line2: None,
            city: "Oran".to_string(),
            state: Some("Oran".to_string()),
            postal_code: Some("31000".to_string()),
            country: "Algeria".to_string(),
        },
        notes: None,
        shipping_price: Some(shipping),
    }
}

async fn stock_of(store: &InMemoryStore, id: ProductId) -> u32 {
    ProductStore::get(store, id).await.unwrap().stock
}

#[tokio::test]
async fn checkout_decrements_stock_and_prices_the_order() {
    let shop = shop();
    let product = stock_product(&shop, "Arduino Uno R4", 5, 2450.0).await;

    let order = shop
        .lifecycle
        .create_order(
            checkout(
                vec![CartLine {
                    product_id: product,
                    quantity: 3,
                }],
                400.0,
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(stock_of(&shop.store, product).await, 2);
    assert_eq!(order.items_price, 7350.0);
    assert_eq!(order.total_price, 7750.0);
    assert_eq!(order.order_status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.payment_method, PaymentMethod::Cod);
    assert!(order.order_number.starts_with("AS"));
}

#[tokio::test]
async fn cancellation_restores_stock_and_records_why() {
    let shop = shop();
    let product = stock_product(&shop, "ESP32 DevKit", 5, 1650.0).await;
    let order = shop
        .lifecycle
        .create_order(
            checkout(
                vec![CartLine {
                    product_id: product,
                    quantity: 3,
                }],
                0.0,
            ),
            None,
        )
        .await
        .unwrap();
    assert_eq!(stock_of(&shop.store, product).await, 2);

    let cancelled = shop
        .lifecycle
        .update_status(
            order.id,
            StatusUpdate {
                order_status: OrderStatus::Cancelled,
                tracking_number: None,
                cancellation_reason: Some("customer unreachable".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(stock_of(&shop.store, product).await, 5);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(
        cancelled.cancellation_reason.as_deref(),
        Some("customer unreachable")
    );
    assert_eq!(cancelled.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn multi_line_checkout_is_all_or_nothing() {
    let shop = shop();
    let a = stock_product(&shop, "Servo SG90", 10, 350.0).await;
    let b = stock_product(&shop, "HC-SR04", 1, 280.0).await;

    let err = shop
        .lifecycle
        .create_order(
            checkout(
                vec![
                    CartLine {
                        product_id: a,
                        quantity: 5,
                    },
                    CartLine {
                        product_id: b,
                        quantity: 3,
                    },
                ],
                0.0,
            ),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InsufficientStock { .. }));
    assert_eq!(stock_of(&shop.store, a).await, 10);
    assert_eq!(stock_of(&shop.store, b).await, 1);
}

#[tokio::test]
async fn full_journey_to_delivery_marks_cod_paid() {
    let shop = shop();
    let product = stock_product(&shop, "Breadboard 830", 20, 450.0).await;
    let order = shop
        .lifecycle
        .create_order(
            checkout(
                vec![CartLine {
                    product_id: product,
                    quantity: 2,
                }],
                300.0,
            ),
            None,
        )
        .await
        .unwrap();

    let mut current = order;
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        current = shop
            .lifecycle
            .update_status(
                current.id,
                StatusUpdate {
                    order_status: status,
                    tracking_number: (status == OrderStatus::Shipped)
                        .then(|| "YAL-4471".to_string()),
                    cancellation_reason: None,
                },
            )
            .await
            .unwrap();
    }

    assert_eq!(current.order_status, OrderStatus::Delivered);
    assert_eq!(current.payment_status, PaymentStatus::Paid);
    assert!(current.delivered_at.is_some());
    assert_eq!(current.tracking_number.as_deref(), Some("YAL-4471"));
    // Delivery does not touch stock
    assert_eq!(stock_of(&shop.store, product).await, 18);

    // Terminal: nothing further is accepted, including cancellation
    let err = shop
        .lifecycle
        .update_status(
            current.id,
            StatusUpdate {
                order_status: OrderStatus::Cancelled,
                tracking_number: None,
                cancellation_reason: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    assert_eq!(stock_of(&shop.store, product).await, 18);
}

#[tokio::test]
async fn order_numbers_are_sequential_and_well_formed() {
    let shop = shop();
    let product = stock_product(&shop, "Jumper Wires", 50, 120.0).await;

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let order = shop
            .lifecycle
            .create_order(
                checkout(
                    vec![CartLine {
                        product_id: product,
                        quantity: 1,
                    }],
                    0.0,
                ),
                None,
            )
            .await
            .unwrap();
        numbers.push(order.order_number);
    }

    for number in &numbers {
        assert_eq!(number.len(), 11);
        assert!(number.starts_with("AS"));
        assert!(number[2..].chars().all(|c| c.is_ascii_digit()));
    }
    let mut sorted = numbers.clone();
    sorted.sort();
    assert_eq!(numbers, sorted);
    assert_eq!(
        numbers.iter().collect::<std::collections::HashSet<_>>().len(),
        3
    );
}

#[tokio::test]
async fn order_snapshot_outlives_product_deletion() {
    let shop = shop();
    let product = stock_product(&shop, "Limited Kit", 3, 5200.0).await;
    let order = shop
        .lifecycle
        .create_order(
            checkout(
                vec![CartLine {
                    product_id: product,
                    quantity: 1,
                }],
                0.0,
            ),
            None,
        )
        .await
        .unwrap();

    shop.catalog.delete_product(product).await.unwrap();

    let reread = shop.lifecycle.get_order(order.id).await.unwrap();
    assert_eq!(reread.items[0].name, "Limited Kit");
    assert_eq!(reread.items[0].price, 5200.0);

    // Cancelling now skips the missing product without failing
    let cancelled = shop
        .lifecycle
        .update_status(
            order.id,
            StatusUpdate {
                order_status: OrderStatus::Cancelled,
                tracking_number: None,
                cancellation_reason: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
}
