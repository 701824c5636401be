// Copyright 2026 Ampere Supply Engineering.

//! Environment-driven configuration

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Seed the store with demo catalog data on startup
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".parse().expect("static addr"),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults
    ///
    /// `BIND_ADDR` overrides the full bind address; `PORT` overrides just
    /// the port. `SEED_DEMO_DATA=1` loads the demo catalog.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("invalid BIND_ADDR {addr:?}"))?;
        } else if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("invalid PORT {port:?}"))?;
            config.bind_addr.set_port(port);
        }
        if let Ok(flag) = std::env::var("SEED_DEMO_DATA") {
            config.seed_demo_data = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        Ok(config)
    }
}
