//! Afisha bot - conversational events search
//!
//! A webhook backend implementing a per-user dialog state machine for
//! finding city events through a closed city/category selection flow.

mod api;
mod catalog;
mod config;
mod dialog;
mod format;
mod search;
mod session;

use catalog::Catalogs;
use config::BotConfig;
use dialog::DialogEngine;
use search::KudagoClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "afisha_bot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env();
    let catalogs = Catalogs::default();
    tracing::info!(
        cities = catalogs.cities.labels().count(),
        categories = catalogs.categories.labels().count(),
        "Catalogs loaded"
    );

    let search = KudagoClient::new(config.kudago_base_url.as_deref(), config.search_timeout)?;
    let engine = Arc::new(DialogEngine::new(search, catalogs, config.page_size));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::create_router(engine)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Afisha bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
