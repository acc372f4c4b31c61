//! Clearpay storefront server
//!
//! Axum-based server exposing region-resolved assets, rendered storefront
//! fragments, and script manifests for the Clearpay integration.

mod handlers;
mod state;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clearpay_core::GatewaySettings;

use crate::handlers::{
    admin_config, admin_scripts, country_assets, dispatch_hook, express_button, express_config,
    health_check, list_hooks, payment_widget, product_logo, store_assets, website_scripts,
};
use crate::state::{AppState, DEFAULT_ASSET_BASE_URL};

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Region assets
        .route("/api/assets", get(store_assets))
        .route("/api/assets/{country}", get(country_assets))
        // Rendered fragments
        .route("/api/express-button", get(express_button))
        .route("/api/logo", get(product_logo))
        .route("/api/widget", get(payment_widget))
        // Script manifests and config
        .route("/api/scripts", get(website_scripts))
        .route("/api/admin/scripts", get(admin_scripts))
        .route("/api/config/express", get(express_config))
        .route("/api/config/admin", get(admin_config))
        // Hooks
        .route("/api/hooks", get(list_hooks))
        .route("/api/hooks/{hook}", get(dispatch_hook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let settings = GatewaySettings::from_env()?;
    if settings.is_enabled() {
        tracing::info!(
            environment = %settings.api_env,
            country = %settings.country_code,
            currency = %settings.currency,
            "Clearpay gateway enabled"
        );
    } else {
        tracing::warn!("Clearpay gateway disabled - set CLEARPAY_ENABLED=yes in .env");
    }
    if settings.mpid.is_empty() {
        tracing::warn!("CLEARPAY_MPID not set - widgets will not load");
    }

    let asset_base_url =
        std::env::var("CLEARPAY_ASSET_BASE_URL").unwrap_or_else(|_| DEFAULT_ASSET_BASE_URL.into());

    let state = AppState::new(settings, asset_base_url);

    let fallback = state.resolver.fallback_region();
    let regions: Vec<&str> = state.resolver.regions().collect();
    tracing::info!("Asset regions: {} (fallback {})", regions.join(", "), fallback);

    tracing::info!("Registered {} hook handlers:", state.hooks.len());
    for hook in state.hooks.registered_hooks() {
        for handler in state.hooks.hooks_for(hook) {
            tracing::info!("  {} @{} -> {}", hook, handler.priority, handler.name);
        }
    }

    let app = router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("clearpay-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET /health                - Health check");
    tracing::info!("  GET /api/assets[/{{cc}}]     - Region assets");
    tracing::info!("  GET /api/express-button    - Cart express button");
    tracing::info!("  GET /api/logo              - Product logo");
    tracing::info!("  GET /api/widget            - Payment schedule widget");
    tracing::info!("  GET /api/scripts           - Storefront asset manifest");
    tracing::info!("  GET /api/admin/scripts     - Admin asset manifest");
    tracing::info!("  GET /api/config/express    - Express checkout config");
    tracing::info!("  GET /api/config/admin      - Admin config");
    tracing::info!("  GET /api/hooks[/{{hook}}]    - List or dispatch hooks");

    axum::serve(listener, app).await?;

    Ok(())
}
