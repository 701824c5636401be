// Copyright 2026 Ampere Supply Engineering.

//! Back-office projections: dashboard stats, charts, CSV export
//!
//! Everything here is a read-only fold over the order and product
//! collections. Revenue counts delivered orders only; cancelled orders
//! are excluded from every aggregate that implies money changed hands.

use crate::errors::DomainResult;
use crate::orders::order::{Order, OrderStatus};
use crate::store::{OrderStore, ProductStore, UserStore};
use crate::users::Role;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Stock level at or below which a product counts as low
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Total revenue over delivered orders
    pub total_revenue: f64,
    /// Total order count, any status
    pub total_orders: u64,
    /// Orders awaiting confirmation
    pub pending_orders: u64,
    /// Delivered order count
    pub delivered_orders: u64,
    /// Total product count
    pub total_products: u64,
    /// Products at or below the low-stock threshold
    pub low_stock_products: u64,
    /// Registered customer count
    pub total_customers: u64,
}

/// One day on the sales chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPoint {
    /// Day in `YYYY-MM-DD`
    pub date: String,
    /// Orders created that day
    pub orders: u64,
    /// Total value of those orders
    pub revenue: f64,
}

/// One row of the best-sellers table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    /// Product name; the live name when the product still exists,
    /// otherwise the snapshot name from the most recent order
    pub name: String,
    /// Primary image URL, empty when unavailable
    pub image: String,
    /// Units sold across counted orders
    pub quantity_sold: u64,
    /// Revenue across counted orders
    pub revenue: f64,
}

/// Read-only reporting over orders, products and users
pub struct AdminDashboard {
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
}

/// Statuses that count toward sales aggregates: the order has moved
/// past back-office review and represents real demand
fn counts_as_sale(order: &Order) -> bool {
    matches!(
        order.order_status,
        OrderStatus::Processing | OrderStatus::Shipped | OrderStatus::Delivered
    )
}

impl AdminDashboard {
    /// Create the dashboard over the three collections it reads
    pub fn new(
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            orders,
            products,
            users,
        }
    }

    /// Headline stats for the dashboard landing page
    pub async fn stats(&self) -> DomainResult<DashboardStats> {
        let orders = self.orders.all().await?;
        let total_revenue = orders
            .iter()
            .filter(|o| o.order_status == OrderStatus::Delivered)
            .map(|o| o.total_price)
            .sum();
        let pending_orders = orders
            .iter()
            .filter(|o| o.order_status == OrderStatus::Pending)
            .count() as u64;
        let delivered_orders = orders
            .iter()
            .filter(|o| o.order_status == OrderStatus::Delivered)
            .count() as u64;
        let low_stock_products = self
            .products
            .low_stock(LOW_STOCK_THRESHOLD, usize::MAX)
            .await?
            .len() as u64;

        Ok(DashboardStats {
            total_revenue,
            total_orders: orders.len() as u64,
            pending_orders,
            delivered_orders,
            total_products: self.products.count().await?,
            low_stock_products,
            total_customers: self.users.count_by_role(Role::Customer).await?,
        })
    }

    /// Most recent orders, newest first
    pub async fn recent_orders(&self, limit: usize) -> DomainResult<Vec<Order>> {
        let mut orders = self.orders.all().await?;
        orders.truncate(limit);
        Ok(orders)
    }

    /// Daily order count and value for the last `days` days
    ///
    /// Every day in the window appears, zero-filled when nothing was
    /// sold, so the chart has a stable x-axis.
    pub async fn sales_chart(&self, days: u32) -> DomainResult<Vec<SalesPoint>> {
        let since = Utc::now() - Duration::days(i64::from(days));
        let mut by_day: HashMap<String, (u64, f64)> = HashMap::new();
        for order in self.orders.all().await? {
            if order.created_at < since || !counts_as_sale(&order) {
                continue;
            }
            let day = order.created_at.format("%Y-%m-%d").to_string();
            let entry = by_day.entry(day).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += order.total_price;
        }

        let today = Utc::now().date_naive();
        let mut points = Vec::with_capacity(days as usize);
        for back in (0..i64::from(days)).rev() {
            let day = (today - Duration::days(back)).format("%Y-%m-%d").to_string();
            let (orders, revenue) = by_day.get(&day).copied().unwrap_or((0, 0.0));
            points.push(SalesPoint {
                date: day,
                orders,
                revenue,
            });
        }
        Ok(points)
    }

    /// Products at or below the low-stock threshold, lowest first
    pub async fn low_stock(&self, limit: usize) -> DomainResult<Vec<crate::catalog::Product>> {
        self.products.low_stock(LOW_STOCK_THRESHOLD, limit).await
    }

    /// Best sellers by units sold, joined against the live catalog
    pub async fn top_products(&self, limit: usize) -> DomainResult<Vec<TopProduct>> {
        let mut sold: HashMap<crate::entity::ProductId, TopProduct> = HashMap::new();
        for order in self.orders.all().await? {
            if !counts_as_sale(&order) {
                continue;
            }
            for item in &order.items {
                let entry = sold.entry(item.product_id).or_insert_with(|| TopProduct {
                    name: item.name.clone(),
                    image: item.image.clone(),
                    quantity_sold: 0,
                    revenue: 0.0,
                });
                entry.quantity_sold += u64::from(item.quantity);
                entry.revenue += item.line_total();
            }
        }

        // Prefer the live name and image over stale snapshots
        for (id, row) in sold.iter_mut() {
            if let Ok(product) = self.products.get(*id).await {
                row.name = product.name.clone();
                row.image = product.primary_image_url();
            }
        }

        let mut rows: Vec<TopProduct> = sold.into_values().collect();
        rows.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
        rows.truncate(limit);
        Ok(rows)
    }

    /// Every order as CSV, newest first
    pub async fn export_orders_csv(&self) -> DomainResult<String> {
        let mut csv = String::from("Order Number,Customer Name,Email,Phone,Status,Total,Date\n");
        for order in self.orders.all().await? {
            csv.push_str(&format!(
                "{},{},{},{},{},{:.2},{}\n",
                order.order_number,
                csv_field(&order.customer.name),
                csv_field(&order.customer.email),
                csv_field(&order.customer.phone),
                order.order_status,
                order.total_price,
                order.created_at.format("%Y-%m-%d"),
            ));
        }
        Ok(csv)
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::{Product, ProductDraft};
    use crate::entity::CategoryId;
    use crate::orders::{CartLine, CheckoutRequest, OrderLifecycle, StatusUpdate};
    use crate::orders::order::{CustomerInfo, ShippingAddress};
    use crate::store::InMemoryStore;
    use crate::users::User;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    struct Fixture {
        dashboard: AdminDashboard,
        lifecycle: OrderLifecycle,
        store: Arc<InMemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        Fixture {
            dashboard: AdminDashboard::new(store.clone(), store.clone(), store.clone()),
            lifecycle: OrderLifecycle::new(store.clone(), store.clone()),
            store,
        }
    }

    async fn seeded_product(store: &InMemoryStore, name: &str, stock: u32, price: f64) -> Product {
        let product = Product::from_draft(ProductDraft {
            name: name.to_string(),
            description: "test".to_string(),
            price,
            compare_at_price: None,
            stock,
            sku: None,
            category_id: CategoryId::new(),
            images: Vec::new(),
            specifications: IndexMap::new(),
            datasheets: Vec::new(),
            tags: Vec::new(),
            featured: false,
            is_active: true,
        })
        .unwrap();
        ProductStore::insert(store, &product).await.unwrap();
        product
    }

    fn checkout(lines: Vec<CartLine>) -> CheckoutRequest {
        CheckoutRequest {
            customer: CustomerInfo {
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                phone: "0550123456".to_string(),
            },
            items: lines,
            shipping_address: ShippingAddress {
                full_name: None,
                phone: None,
                address_line1: "1 Rue Didouche".to_string(),
                address_line2: None,
                city: "Algiers".to_string(),
                state: None,
                postal_code: None,
                country: "Algeria".to_string(),
            },
            notes: None,
            shipping_price: None,
        }
    }

    async fn drive_to(lifecycle: &OrderLifecycle, id: crate::entity::OrderId, target: OrderStatus) {
        let chain = [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ];
        for status in chain {
            lifecycle
                .update_status(
                    id,
                    StatusUpdate {
                        order_status: status,
                        tracking_number: None,
                        cancellation_reason: None,
                    },
                )
                .await
                .unwrap();
            if status == target {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_revenue_counts_delivered_only() {
        let f = fixture();
        let product = seeded_product(&f.store, "Uno R4", 20, 10.0).await;

        let delivered = f
            .lifecycle
            .create_order(
                checkout(vec![CartLine {
                    product_id: product.id,
                    quantity: 2,
                }]),
                None,
            )
            .await
            .unwrap();
        drive_to(&f.lifecycle, delivered.id, OrderStatus::Delivered).await;

        // Pending order: counted in totals, not in revenue
        f.lifecycle
            .create_order(
                checkout(vec![CartLine {
                    product_id: product.id,
                    quantity: 3,
                }]),
                None,
            )
            .await
            .unwrap();

        UserStore::insert(
            f.store.as_ref(),
            &User::new("Ali", "ali@example.com", Role::Customer),
        )
        .await
        .unwrap();

        let stats = f.dashboard.stats().await.unwrap();
        assert_eq!(stats.total_revenue, 20.0);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.delivered_orders, 1);
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.total_customers, 1);
    }

    #[tokio::test]
    async fn test_low_stock_flagged_at_threshold() {
        let f = fixture();
        seeded_product(&f.store, "Scarce", 3, 5.0).await;
        seeded_product(&f.store, "At Threshold", LOW_STOCK_THRESHOLD, 5.0).await;
        seeded_product(&f.store, "Plenty", 50, 5.0).await;

        let low = f.dashboard.low_stock(10).await.unwrap();
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Scarce", "At Threshold"]);

        let stats = f.dashboard.stats().await.unwrap();
        assert_eq!(stats.low_stock_products, 2);
    }

    #[tokio::test]
    async fn test_sales_chart_zero_fills_and_excludes_pending() {
        let f = fixture();
        let product = seeded_product(&f.store, "Nano", 20, 4.0).await;

        let counted = f
            .lifecycle
            .create_order(
                checkout(vec![CartLine {
                    product_id: product.id,
                    quantity: 2,
                }]),
                None,
            )
            .await
            .unwrap();
        drive_to(&f.lifecycle, counted.id, OrderStatus::Processing).await;

        // Still pending, not a sale yet
        f.lifecycle
            .create_order(
                checkout(vec![CartLine {
                    product_id: product.id,
                    quantity: 1,
                }]),
                None,
            )
            .await
            .unwrap();

        let points = f.dashboard.sales_chart(7).await.unwrap();
        assert_eq!(points.len(), 7);
        let today = points.last().unwrap();
        assert_eq!(today.date, Utc::now().format("%Y-%m-%d").to_string());
        assert_eq!(today.orders, 1);
        assert_eq!(today.revenue, 8.0);
        // Older days are present and zero
        assert_eq!(points[0].orders, 0);
        assert_eq!(points[0].revenue, 0.0);
    }

    #[tokio::test]
    async fn test_top_products_prefers_live_names() {
        let f = fixture();
        let hot = seeded_product(&f.store, "Hot Item", 30, 2.0).await;
        let slow = seeded_product(&f.store, "Slow Item", 30, 9.0).await;

        for qty in [5u32, 4] {
            let order = f
                .lifecycle
                .create_order(
                    checkout(vec![CartLine {
                        product_id: hot.id,
                        quantity: qty,
                    }]),
                    None,
                )
                .await
                .unwrap();
            drive_to(&f.lifecycle, order.id, OrderStatus::Delivered).await;
        }
        let order = f
            .lifecycle
            .create_order(
                checkout(vec![CartLine {
                    product_id: slow.id,
                    quantity: 1,
                }]),
                None,
            )
            .await
            .unwrap();
        drive_to(&f.lifecycle, order.id, OrderStatus::Shipped).await;

        // Rename after the sale: the report shows the live name
        let mut live = ProductStore::get(f.store.as_ref(), hot.id).await.unwrap();
        live.name = "Hot Item v2".to_string();
        ProductStore::update(f.store.as_ref(), &live).await.unwrap();

        let top = f.dashboard.top_products(5).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Hot Item v2");
        assert_eq!(top[0].quantity_sold, 9);
        assert_eq!(top[0].revenue, 18.0);
        assert_eq!(top[1].name, "Slow Item");
    }

    #[tokio::test]
    async fn test_csv_export_header_and_quoting() {
        let f = fixture();
        let product = seeded_product(&f.store, "Nano", 5, 4.0).await;
        let mut request = checkout(vec![CartLine {
            product_id: product.id,
            quantity: 1,
        }]);
        request.customer.name = "Last, First".to_string();
        f.lifecycle.create_order(request, None).await.unwrap();

        let csv = f.dashboard.export_orders_csv().await.unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Order Number,Customer Name,Email,Phone,Status,Total,Date"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Last, First\""));
        assert!(row.contains(",pending,"));
        assert!(row.contains(",4.00,"));
    }

    #[tokio::test]
    async fn test_recent_orders_limited_and_newest_first() {
        let f = fixture();
        let product = seeded_product(&f.store, "Nano", 20, 4.0).await;
        let mut last = None;
        for _ in 0..3 {
            let order = f
                .lifecycle
                .create_order(
                    checkout(vec![CartLine {
                        product_id: product.id,
                        quantity: 1,
                    }]),
                    None,
                )
                .await
                .unwrap();
            last = Some(order.order_number);
        }

        let recent = f.dashboard.recent_orders(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(Some(recent[0].order_number.clone()), last);
    }
}
