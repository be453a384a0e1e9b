//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `gate::GateError`.

use anyhow::Context;
use axum::Router;
use gate::presentation::middleware::log_requests;
use gate::{GateConfig, JsonBindingStore, JsonTokenStore, Pin, gate_router};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Gate configuration
    let config = if cfg!(debug_assertions) {
        let mut config = GateConfig::development();
        if let Ok(raw) = env::var("GATE_PINS") {
            config.pins = parse_pins(&raw)?;
        } else {
            tracing::warn!("GATE_PINS not set, using random development PINs");
        }
        config
    } else {
        // In production, load PINs from environment
        let raw = env::var("GATE_PINS").context("GATE_PINS must be set in production")?;
        GateConfig {
            pins: parse_pins(&raw)?,
            ..GateConfig::default()
        }
    };

    // Persisted stores
    let data_dir = PathBuf::from(env::var("GATE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let tokens = JsonTokenStore::new(data_dir.join("tokens.json"), config.token_bytes_len);
    let bindings = JsonBindingStore::new(data_dir.join("sessions.json"));

    tracing::info!(data_dir = %data_dir.display(), "Stores ready");

    // Build router
    let app = Router::new()
        .merge(gate_router(tokens, bindings, config))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(log_requests));

    // Start server
    let addr: SocketAddr = env::var("GATE_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:9001".to_string())
        .parse()
        .context("invalid GATE_LISTEN_ADDR")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Parse `GATE_PINS`: exactly four comma-separated PINs, levels 0 through 3
fn parse_pins(raw: &str) -> anyhow::Result<[Pin; 4]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    anyhow::ensure!(
        parts.len() == 4 && parts.iter().all(|p| !p.is_empty()),
        "GATE_PINS must list exactly four comma-separated PINs"
    );
    Ok(std::array::from_fn(|i| Pin::new(parts[i])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pins() {
        let pins = parse_pins("0432, 0234,0123,0124").unwrap();
        assert_eq!(pins[0].as_str(), "0432");
        assert_eq!(pins[1].as_str(), "0234");
        assert_eq!(pins[3].as_str(), "0124");

        assert!(parse_pins("1234,5678").is_err());
        assert!(parse_pins("1234,5678,,0000").is_err());
    }
}
