//! Application State

use std::sync::Arc;

use clearpay_assets::{AssetResolver, CartExpressButton, PriceMessaging};
use clearpay_core::{GatewaySettings, Hook, HookRegistry};

/// Default public path for bundled front-end assets
pub const DEFAULT_ASSET_BASE_URL: &str = "/static/clearpay";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Gateway settings snapshot, built once at startup
    pub settings: Arc<GatewaySettings>,

    /// Region asset tables
    pub resolver: Arc<AssetResolver>,

    /// Storefront hook dispatch table
    pub hooks: Arc<HookRegistry>,

    /// Public base URL of the bundled scripts and styles
    pub asset_base_url: String,
}

impl AppState {
    /// Wire the resolver and hook handlers around `settings`.
    pub fn new(settings: GatewaySettings, asset_base_url: impl Into<String>) -> Self {
        let settings = Arc::new(settings);
        let resolver = Arc::new(AssetResolver::clearpay());

        let mut hooks = HookRegistry::new();
        hooks.register(
            Hook::CartTotalsAfterOrderTotal,
            10,
            CartExpressButton::new(settings.clone(), resolver.clone()),
        );

        let placements = hooks.register_placements(
            &settings,
            Arc::new(PriceMessaging::product(settings.clone())),
            Arc::new(PriceMessaging::category(settings.clone())),
        );
        for placement in &placements {
            tracing::debug!(hook = %placement.hook, priority = placement.priority, "placement registered");
        }

        Self {
            settings,
            resolver,
            hooks: Arc::new(hooks),
            asset_base_url: asset_base_url.into(),
        }
    }
}
