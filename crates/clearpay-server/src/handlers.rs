//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use clearpay_assets::{
    AdminConfig, AssetManifest, ExpressConfig, LogoTheme, PageType, Resolution, StorePage,
    render_payment_schedule, render_product_logo, render_template,
    resolver::CART_PAGE_EXPRESS_BUTTON,
    scripts::{admin_manifest, website_manifest},
    theme::escape_attr,
    widget::{check_order_limit, parse_amount},
};
use clearpay_core::{ClearpayError, HandlerInfo, Hook, HookContext};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct ThemeQuery {
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WidgetQuery {
    pub amount: String,
    #[serde(default)]
    pub page_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub screen: String,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HookListing {
    pub hook: Hook,
    pub handlers: Vec<HandlerInfo>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.settings.api_env.as_str(),
        enabled: state.settings.is_enabled(),
    })
}

/// Assets for the store's own country
pub async fn store_assets(State(state): State<AppState>) -> Json<Resolution> {
    Json(resolve_logged(&state, &state.settings.country_code))
}

/// Assets for an arbitrary country code, matched verbatim
pub async fn country_assets(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Json<Resolution> {
    Json(resolve_logged(&state, &country))
}

fn resolve_logged(state: &AppState, country: &str) -> Resolution {
    let resolution = state.resolver.resolve_with_match(country);
    if resolution.is_fallback() {
        tracing::debug!(
            requested = country,
            fallback = %resolution.region,
            "no region assets, using fallback"
        );
    }
    resolution
}

/// Cart express button with the theme substituted. Empty while the
/// gateway is disabled, like the cart hook.
pub async fn express_button(
    State(state): State<AppState>,
    Query(query): Query<ThemeQuery>,
) -> Result<Html<String>, ApiError> {
    if !state.settings.is_enabled() {
        return Ok(Html(String::new()));
    }

    let assets = state.resolver.resolve(&state.settings.country_code);
    let template = assets.get(CART_PAGE_EXPRESS_BUTTON).ok_or_else(|| {
        tracing::error!("express button template missing from resolved assets");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Express button unavailable",
            "TEMPLATE_MISSING",
        )
    })?;

    let theme = query
        .theme
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| state.settings.express_theme.clone());

    Ok(Html(render_template(template, &escape_attr(&theme))))
}

/// Product page logo
pub async fn product_logo(
    State(state): State<AppState>,
    Query(query): Query<ThemeQuery>,
) -> Html<String> {
    let theme = LogoTheme::parse(query.theme.as_deref().unwrap_or_default());
    Html(render_product_logo(&state.settings.static_url, theme))
}

/// Payment schedule widget for an order total
pub async fn payment_widget(
    State(state): State<AppState>,
    Query(query): Query<WidgetQuery>,
) -> Result<Html<String>, ApiError> {
    let settings = &state.settings;

    let amount = parse_amount(&query.amount).map_err(|e| {
        api_error(StatusCode::BAD_REQUEST, e.user_message(), "INVALID_AMOUNT")
    })?;

    check_order_limit(amount, settings.order_limit_max).map_err(|e| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            e.user_message(),
            "ORDER_LIMIT_EXCEEDED",
        )
    })?;

    let page_type = PageType::parse(query.page_type.as_deref().unwrap_or_default());

    Ok(Html(render_payment_schedule(
        settings.api_env,
        &settings.mpid,
        amount,
        &settings.currency,
        page_type,
    )))
}

/// Storefront asset manifest for a page
pub async fn website_scripts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<AssetManifest>, ApiError> {
    let page = StorePage::parse(query.page.as_deref().unwrap_or_default());

    website_manifest(&state.settings, &state.asset_base_url, page)
        .map(Json)
        .map_err(|e| {
            tracing::error!("Manifest error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message(), "MANIFEST_ERROR")
        })
}

/// Admin asset manifest for a screen
pub async fn admin_scripts(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<AssetManifest>, ApiError> {
    admin_manifest(
        &state.settings,
        &state.asset_base_url,
        &query.screen,
        query.section.as_deref(),
    )
    .map(Json)
    .map_err(|e| {
        tracing::error!("Manifest error: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message(), "MANIFEST_ERROR")
    })
}

/// Express checkout script config
pub async fn express_config(State(state): State<AppState>) -> Json<ExpressConfig> {
    Json(ExpressConfig::new(&state.settings))
}

/// Admin settings script config
pub async fn admin_config(State(state): State<AppState>) -> Json<AdminConfig> {
    Json(AdminConfig::new(&state.settings))
}

/// Registered hooks and their handlers in dispatch order
pub async fn list_hooks(State(state): State<AppState>) -> Json<Vec<HookListing>> {
    let listing = state
        .hooks
        .registered_hooks()
        .into_iter()
        .map(|hook| HookListing {
            hook: hook.clone(),
            handlers: state.hooks.hooks_for(hook),
        })
        .collect();
    Json(listing)
}

/// Dispatch a storefront hook; query parameters become handler arguments
pub async fn dispatch_hook(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(args): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let hook = Hook::parse(&name);
    let ctx = args
        .into_iter()
        .fold(HookContext::new(), |ctx, (k, v)| ctx.with_arg(k, v));

    state.hooks.dispatch(&hook, &ctx).await.map(Html).map_err(|e| {
        let status = match e {
            ClearpayError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, e.user_message(), "HOOK_ERROR")
    })
}
