// Copyright 2026 Ampere Supply Engineering.

//! Ampere Supply server binary

use ampere_supply::admin::AdminDashboard;
use ampere_supply::api::{build_router, AppState};
use ampere_supply::auth::{Identity, TokenRegistry};
use ampere_supply::catalog::CatalogService;
use ampere_supply::config::AppConfig;
use ampere_supply::media::InMemoryMediaService;
use ampere_supply::orders::OrderLifecycle;
use ampere_supply::seed::seed_demo_data;
use ampere_supply::store::InMemoryStore;
use ampere_supply::users::{Role, User};
use ampere_supply::videos::VideoService;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let store = Arc::new(InMemoryStore::new());
    let media = Arc::new(InMemoryMediaService::new());
    let auth = Arc::new(TokenRegistry::new());

    let catalog = Arc::new(CatalogService::new(
        store.clone(),
        store.clone(),
        media.clone(),
    ));
    let orders = Arc::new(OrderLifecycle::new(store.clone(), store.clone()));
    let videos = Arc::new(VideoService::new(store.clone(), media.clone()));
    let dashboard = Arc::new(AdminDashboard::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));

    // Bootstrap admin: the in-memory token registry starts empty, so a
    // fresh process gets one admin identity with a logged token
    let admin = User::new("Admin", "admin@ampere.supply", Role::Admin);
    let token = auth
        .issue(Identity {
            user_id: admin.id,
            name: admin.name.clone(),
            role: Role::Admin,
        })
        .await;
    info!(%token, "bootstrap admin token issued");

    if config.seed_demo_data {
        seed_demo_data(&catalog, &videos).await?;
    }

    let state = AppState {
        catalog,
        orders,
        videos,
        dashboard,
        auth,
        media,
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
