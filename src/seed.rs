// Copyright 2026 Ampere Supply Engineering.

//! Demo catalog seeding for local runs

use crate::catalog::{CatalogService, CategoryDraft, ProductDraft};
use crate::errors::DomainResult;
use crate::videos::{VideoCategory, VideoDraft, VideoService};
use indexmap::IndexMap;
use tracing::info;

fn product(
    name: &str,
    description: &str,
    price: f64,
    stock: u32,
    category_id: crate::entity::CategoryId,
    specs: &[(&str, &str)],
) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: description.to_string(),
        price,
        compare_at_price: None,
        stock,
        sku: None,
        category_id,
        images: Vec::new(),
        specifications: specs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<IndexMap<_, _>>(),
        datasheets: Vec::new(),
        tags: Vec::new(),
        featured: false,
        is_active: true,
    }
}

/// Load a small demo catalog: categories, products and one video
pub async fn seed_demo_data(
    catalog: &CatalogService,
    videos: &VideoService,
) -> DomainResult<()> {
    let boards = catalog
        .create_category(CategoryDraft {
            name: "Development Boards".to_string(),
            description: Some("Microcontroller and single-board computers".to_string()),
            parent_id: None,
            image: None,
            is_active: true,
            order: 0,
        })
        .await?;
    let components = catalog
        .create_category(CategoryDraft {
            name: "Components".to_string(),
            description: Some("Discrete components and modules".to_string()),
            parent_id: None,
            image: None,
            is_active: true,
            order: 1,
        })
        .await?;

    catalog
        .create_product(product(
            "Arduino Uno R4 Minima",
            "Renesas RA4M1 based board, the classic form factor with more headroom.",
            2450.0,
            25,
            boards.id,
            &[("MCU", "RA4M1"), ("Clock", "48 MHz"), ("Flash", "256 KB")],
        ))
        .await?;
    catalog
        .create_product(product(
            "ESP32 DevKit v1",
            "Wi-Fi and Bluetooth development board with 30 pins.",
            1650.0,
            40,
            boards.id,
            &[("MCU", "ESP32-WROOM-32"), ("Wi-Fi", "802.11 b/g/n")],
        ))
        .await?;
    catalog
        .create_product(product(
            "SG90 Micro Servo",
            "9g micro servo, 180 degree range, plastic gears.",
            350.0,
            120,
            components.id,
            &[("Torque", "1.8 kg/cm"), ("Voltage", "4.8-6V")],
        ))
        .await?;
    catalog
        .create_product(product(
            "HC-SR04 Ultrasonic Sensor",
            "Distance sensor, 2cm to 400cm range.",
            280.0,
            8,
            components.id,
            &[("Range", "2-400 cm"), ("Voltage", "5V")],
        ))
        .await?;

    videos
        .create(VideoDraft {
            title: "Getting Started with the ESP32".to_string(),
            description: "Flash your first sketch and join a Wi-Fi network.".to_string(),
            video_url: "https://media.local/demo/esp32-intro.mp4".to_string(),
            public_id: "demo/esp32-intro".to_string(),
            thumbnail: None,
            duration: Some(540),
            category: VideoCategory::Beginner,
            tags: vec!["esp32".to_string(), "wifi".to_string()],
            related_products: Vec::new(),
            featured: true,
            is_active: true,
            order: 0,
        })
        .await?;

    info!("demo catalog seeded");
    Ok(())
}
