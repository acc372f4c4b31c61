//! Script and style manifests
//!
//! Describes which front-end assets a page needs, with their dependencies
//! and the configuration objects handed to them.

use clearpay_core::{ApiEnvironment, GatewaySettings};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AssetError, Result};
use crate::theme::escape_attr;

/// Cache-busting version for bundled assets
pub const ASSET_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const JS_LIBRARY_HANDLE: &str = "square_marketplace_js";
pub const STYLE_HANDLE: &str = "clearpay_css";
pub const EXPRESS_HANDLE: &str = "clearpay_express";
pub const CHECKOUT_HANDLE: &str = "clearpay_checkout_page";
pub const ADMIN_HANDLE: &str = "clearpay_admin_js";

/// Admin screen hosting the payment gateway settings
pub const SETTINGS_SCREEN: &str = "woocommerce_page_wc-settings";

/// Settings section owned by this gateway
pub const SETTINGS_SECTION: &str = "clearpay";

/// Provider checkout library for the environment
pub fn js_library_url(api_env: ApiEnvironment) -> String {
    let subdomain = match api_env {
        ApiEnvironment::Production => "js",
        ApiEnvironment::Sandbox => "js-sandbox",
    };
    format!("https://{subdomain}.squarecdn.com/square-marketplace.js")
}

/// Storefront page being rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorePage {
    Checkout,
    Cart,
    Product,
    Other,
}

impl StorePage {
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout" => Self::Checkout,
            "cart" => Self::Cart,
            "product" => Self::Product,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScriptAsset {
    pub handle: String,
    pub src: String,
    pub deps: Vec<String>,
    /// `None` leaves the URL unversioned
    pub version: Option<String>,
    pub in_footer: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StyleAsset {
    pub handle: String,
    pub src: String,
    pub deps: Vec<String>,
    pub version: Option<String>,
}

/// A named JSON object exposed to a script
#[derive(Clone, Debug, Serialize)]
pub struct LocalizedData {
    pub handle: String,
    pub object_name: String,
    pub data: serde_json::Value,
}

/// Registered assets plus the handles actually enqueued for output
#[derive(Clone, Debug, Default, Serialize)]
pub struct AssetManifest {
    pub scripts: Vec<ScriptAsset>,
    pub styles: Vec<StyleAsset>,
    pub localized: Vec<LocalizedData>,
    pub enqueued: Vec<String>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script; re-registering a handle replaces it.
    pub fn register_script(&mut self, script: ScriptAsset) {
        self.scripts.retain(|s| s.handle != script.handle);
        self.scripts.push(script);
    }

    pub fn register_style(&mut self, style: StyleAsset) {
        self.styles.retain(|s| s.handle != style.handle);
        self.styles.push(style);
    }

    pub fn is_registered(&self, handle: &str) -> bool {
        self.scripts.iter().any(|s| s.handle == handle)
            || self.styles.iter().any(|s| s.handle == handle)
    }

    /// Mark a registered handle for output. Enqueueing twice is a no-op.
    pub fn enqueue(&mut self, handle: &str) -> Result<()> {
        if !self.is_registered(handle) {
            return Err(AssetError::UnknownHandle(handle.to_string()));
        }
        if !self.is_enqueued(handle) {
            self.enqueued.push(handle.to_string());
        }
        Ok(())
    }

    pub fn is_enqueued(&self, handle: &str) -> bool {
        self.enqueued.iter().any(|h| h == handle)
    }

    /// Attach a config object to a registered script.
    pub fn localize<T: Serialize>(&mut self, handle: &str, object_name: &str, data: &T) -> Result<()> {
        if !self.scripts.iter().any(|s| s.handle == handle) {
            return Err(AssetError::UnknownHandle(handle.to_string()));
        }
        self.localized.push(LocalizedData {
            handle: handle.to_string(),
            object_name: object_name.to_string(),
            data: serde_json::to_value(data)?,
        });
        Ok(())
    }
}

fn script(handle: &str, src: String, deps: &[&str], version: Option<&str>) -> ScriptAsset {
    ScriptAsset {
        handle: handle.to_string(),
        src,
        deps: deps.iter().map(|d| (*d).to_string()).collect(),
        version: version.map(str::to_string),
        in_footer: true,
    }
}

fn ajax_url(site_url: &str) -> String {
    format!("{}/wp-admin/admin-ajax.php", site_url.trim_end_matches('/'))
}

fn new_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_string()
}

/// Config object for the express checkout script
#[derive(Clone, Debug, Serialize)]
pub struct ExpressConfig {
    #[serde(rename = "ajaxurl")]
    pub ajax_url: String,
    pub ec_start_nonce: String,
    pub ec_change_nonce: String,
    pub ec_change_shipping_nonce: String,
    pub ec_complete_nonce: String,
    pub country_code: String,
}

impl ExpressConfig {
    /// Fresh nonces on every call
    pub fn new(settings: &GatewaySettings) -> Self {
        Self {
            ajax_url: ajax_url(&settings.site_url),
            ec_start_nonce: new_nonce(),
            ec_change_nonce: new_nonce(),
            ec_change_shipping_nonce: new_nonce(),
            ec_complete_nonce: new_nonce(),
            country_code: settings.country_code.clone(),
        }
    }
}

/// Config object for the admin settings script
#[derive(Clone, Debug, Serialize)]
pub struct AdminConfig {
    pub mpid: String,
    pub currency: String,
    pub max: Decimal,
    pub multicurrency_is_available: bool,
}

impl AdminConfig {
    pub fn new(settings: &GatewaySettings) -> Self {
        Self {
            mpid: settings.mpid.clone(),
            currency: settings.currency.clone(),
            max: settings.order_limit_max,
            multicurrency_is_available: settings.feature_is_available("multicurrency"),
        }
    }
}

/// Assets registered on every page: the provider library, the stylesheet,
/// and the express checkout script.
pub fn common_manifest(settings: &GatewaySettings, base_url: &str) -> Result<AssetManifest> {
    let base = base_url.trim_end_matches('/');
    let mut manifest = AssetManifest::new();

    manifest.register_script(script(
        JS_LIBRARY_HANDLE,
        js_library_url(settings.api_env),
        &[],
        None,
    ));

    manifest.register_style(StyleAsset {
        handle: STYLE_HANDLE.into(),
        src: format!("{base}/css/clearpay.css"),
        deps: Vec::new(),
        version: Some(ASSET_VERSION.into()),
    });

    manifest.register_script(script(
        EXPRESS_HANDLE,
        format!("{base}/build/clearpay-express/index.js"),
        &["jquery", JS_LIBRARY_HANDLE],
        Some(ASSET_VERSION),
    ));
    manifest.localize(
        EXPRESS_HANDLE,
        "clearpay_express_js_config",
        &ExpressConfig::new(settings),
    )?;

    Ok(manifest)
}

/// Storefront assets. Checkout assets are only enqueued on the checkout
/// page while the gateway is enabled.
pub fn website_manifest(
    settings: &GatewaySettings,
    base_url: &str,
    page: StorePage,
) -> Result<AssetManifest> {
    let mut manifest = common_manifest(settings, base_url)?;

    if page == StorePage::Checkout && settings.is_enabled() {
        manifest.enqueue(STYLE_HANDLE)?;
        manifest.register_script(script(
            CHECKOUT_HANDLE,
            format!(
                "{}/build/clearpay-page-checkout/index.js",
                base_url.trim_end_matches('/')
            ),
            &["jquery", JS_LIBRARY_HANDLE],
            Some(ASSET_VERSION),
        ));
        manifest.enqueue(CHECKOUT_HANDLE)?;
    }

    Ok(manifest)
}

/// Admin assets. The settings script is only enqueued on this gateway's
/// settings section.
pub fn admin_manifest(
    settings: &GatewaySettings,
    base_url: &str,
    screen: &str,
    section: Option<&str>,
) -> Result<AssetManifest> {
    let mut manifest = common_manifest(settings, base_url)?;

    if screen == SETTINGS_SCREEN && section == Some(SETTINGS_SECTION) {
        manifest.register_script(script(
            ADMIN_HANDLE,
            format!(
                "{}/build/clearpay-admin/index.js",
                base_url.trim_end_matches('/')
            ),
            &[JS_LIBRARY_HANDLE],
            Some(ASSET_VERSION),
        ));
        manifest.enqueue(ADMIN_HANDLE)?;
        manifest.localize(
            ADMIN_HANDLE,
            "clearpay_ajax_object",
            &serde_json::json!({ "ajax_url": ajax_url(&settings.site_url) }),
        )?;
        manifest.localize(ADMIN_HANDLE, "clearpay_config", &AdminConfig::new(settings))?;
    }

    Ok(manifest)
}

/// Plugin list links with the gateway "Settings" link first.
pub fn settings_action_links(site_url: &str, links: Vec<String>) -> Vec<String> {
    let href = format!(
        "{}/wp-admin/admin.php?page=wc-settings&tab=checkout&section={SETTINGS_SECTION}",
        site_url.trim_end_matches('/')
    );
    let mut out = vec![format!(r#"<a href="{}">Settings</a>"#, escape_attr(&href))];
    out.extend(links);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(enabled: bool) -> GatewaySettings {
        GatewaySettings {
            enabled,
            mpid: "mpid-123".into(),
            site_url: "https://shop.example".into(),
            multicurrency: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_js_library_url() {
        assert_eq!(
            js_library_url(ApiEnvironment::Production),
            "https://js.squarecdn.com/square-marketplace.js"
        );
        assert_eq!(
            js_library_url(ApiEnvironment::Sandbox),
            "https://js-sandbox.squarecdn.com/square-marketplace.js"
        );
    }

    #[test]
    fn test_common_manifest_registers_without_enqueueing() {
        let manifest = common_manifest(&settings(true), "https://cdn.example/plugin/").unwrap();
        assert!(manifest.is_registered(JS_LIBRARY_HANDLE));
        assert!(manifest.is_registered(STYLE_HANDLE));
        assert!(manifest.is_registered(EXPRESS_HANDLE));
        assert!(manifest.enqueued.is_empty());

        let express = manifest.scripts.iter().find(|s| s.handle == EXPRESS_HANDLE).unwrap();
        assert_eq!(express.src, "https://cdn.example/plugin/build/clearpay-express/index.js");
        assert_eq!(express.deps, ["jquery", JS_LIBRARY_HANDLE]);

        let config = &manifest.localized[0];
        assert_eq!(config.object_name, "clearpay_express_js_config");
        assert_eq!(config.data["ajaxurl"], "https://shop.example/wp-admin/admin-ajax.php");
        assert_eq!(config.data["country_code"], "GB");
    }

    #[test]
    fn test_checkout_assets_only_on_enabled_checkout() {
        let m = website_manifest(&settings(true), "/p", StorePage::Checkout).unwrap();
        assert_eq!(m.enqueued, [STYLE_HANDLE, CHECKOUT_HANDLE]);

        let m = website_manifest(&settings(false), "/p", StorePage::Checkout).unwrap();
        assert!(m.enqueued.is_empty());

        let m = website_manifest(&settings(true), "/p", StorePage::Cart).unwrap();
        assert!(m.enqueued.is_empty());
    }

    #[test]
    fn test_admin_assets_only_on_gateway_section() {
        let m = admin_manifest(&settings(true), "/p", SETTINGS_SCREEN, Some("clearpay")).unwrap();
        assert_eq!(m.enqueued, [ADMIN_HANDLE]);
        let config = m
            .localized
            .iter()
            .find(|l| l.object_name == "clearpay_config")
            .unwrap();
        assert_eq!(config.data["mpid"], "mpid-123");
        assert_eq!(config.data["multicurrency_is_available"], true);

        let m = admin_manifest(&settings(true), "/p", SETTINGS_SCREEN, Some("stripe")).unwrap();
        assert!(m.enqueued.is_empty());
        let m = admin_manifest(&settings(true), "/p", "dashboard", Some("clearpay")).unwrap();
        assert!(m.enqueued.is_empty());
    }

    #[test]
    fn test_enqueue_unknown_handle_fails() {
        let mut manifest = AssetManifest::new();
        assert!(matches!(
            manifest.enqueue("missing"),
            Err(AssetError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_express_nonces_are_distinct() {
        let config = ExpressConfig::new(&settings(true));
        assert_eq!(config.ec_start_nonce.len(), 10);
        assert_ne!(config.ec_start_nonce, config.ec_complete_nonce);
    }

    #[test]
    fn test_settings_action_links_prepends() {
        let links = settings_action_links(
            "https://shop.example/",
            vec![r#"<a href="/deactivate">Deactivate</a>"#.into()],
        );
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0],
            r#"<a href="https://shop.example/wp-admin/admin.php?page=wc-settings&amp;tab=checkout&amp;section=clearpay">Settings</a>"#
        );
        assert!(links[1].contains("Deactivate"));
    }
}
