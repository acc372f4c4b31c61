//! Storefront Hook Handlers
//!
//! Implementations of `clearpay_core::HookHandler` that render Clearpay
//! content into the cart, product, and category hooks.

use async_trait::async_trait;
use std::sync::Arc;

use clearpay_core::{GatewaySettings, HookContext, HookHandler, Result as CoreResult};

use crate::error::AssetError;
use crate::resolver::{AssetResolver, CART_PAGE_EXPRESS_BUTTON};
use crate::theme::{escape_attr, render_template};
use crate::widget::{PageType, check_order_limit, parse_amount, render_payment_schedule};

/// Express checkout button row under the cart order total
pub struct CartExpressButton {
    settings: Arc<GatewaySettings>,
    resolver: Arc<AssetResolver>,
}

impl CartExpressButton {
    pub fn new(settings: Arc<GatewaySettings>, resolver: Arc<AssetResolver>) -> Self {
        Self { settings, resolver }
    }
}

#[async_trait]
impl HookHandler for CartExpressButton {
    fn name(&self) -> &str {
        "cart_express_button"
    }

    async fn handle(&self, _ctx: &HookContext) -> CoreResult<Option<String>> {
        if !self.settings.is_enabled() {
            return Ok(None);
        }

        let assets = self.resolver.resolve(&self.settings.country_code);
        let template = assets
            .get(CART_PAGE_EXPRESS_BUTTON)
            .ok_or_else(|| AssetError::MissingTemplate(CART_PAGE_EXPRESS_BUTTON.into()))?;

        Ok(Some(render_template(
            template,
            &escape_attr(&self.settings.express_theme),
        )))
    }
}

/// Instalment messaging for a priced item (`price` context argument)
pub struct PriceMessaging {
    settings: Arc<GatewaySettings>,
    page_type: PageType,
    name: &'static str,
}

impl PriceMessaging {
    /// Messaging on the product detail page
    pub fn product(settings: Arc<GatewaySettings>) -> Self {
        Self {
            settings,
            page_type: PageType::Product,
            name: "product_detail_messaging",
        }
    }

    /// Messaging under each product in a category listing
    pub fn category(settings: Arc<GatewaySettings>) -> Self {
        Self {
            settings,
            page_type: PageType::Category,
            name: "category_listing_messaging",
        }
    }
}

#[async_trait]
impl HookHandler for PriceMessaging {
    fn name(&self) -> &str {
        self.name
    }

    async fn handle(&self, ctx: &HookContext) -> CoreResult<Option<String>> {
        if !self.settings.is_enabled() {
            return Ok(None);
        }

        let raw = ctx
            .get_str("price")
            .ok_or_else(|| AssetError::InvalidAmount("missing price".into()))?;
        let price = parse_amount(raw)?;

        // Out-of-range items simply get no messaging
        if check_order_limit(price, self.settings.order_limit_max).is_err() {
            tracing::debug!(%price, handler = self.name, "price above order limit");
            return Ok(None);
        }

        Ok(Some(render_payment_schedule(
            self.settings.api_env,
            &self.settings.mpid,
            price,
            &self.settings.currency,
            self.page_type,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearpay_core::{ClearpayError, Hook, HookRegistry};

    fn enabled() -> Arc<GatewaySettings> {
        Arc::new(GatewaySettings {
            enabled: true,
            mpid: "mpid-1".into(),
            express_theme: "black-on-mint".into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_cart_button_substitutes_theme() {
        let handler = CartExpressButton::new(enabled(), Arc::new(AssetResolver::clearpay()));
        let html = handler.handle(&HookContext::new()).await.unwrap().unwrap();
        assert!(html.contains("checkout-with-clearpay/black-on-mint.svg"));
        assert!(!html.contains("[THEME]"));
    }

    #[tokio::test]
    async fn test_cart_button_escapes_theme() {
        let settings = Arc::new(GatewaySettings {
            express_theme: r#""><script>alert(1)</script>"#.into(),
            ..(*enabled()).clone()
        });
        let handler = CartExpressButton::new(settings, Arc::new(AssetResolver::clearpay()));
        let html = handler.handle(&HookContext::new()).await.unwrap().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("checkout-with-clearpay/&quot;&gt;&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_cart_button_for_unlisted_store_country() {
        let settings = Arc::new(GatewaySettings {
            country_code: "FR".into(),
            ..(*enabled()).clone()
        });
        let handler = CartExpressButton::new(settings, Arc::new(AssetResolver::clearpay()));
        assert!(handler.handle(&HookContext::new()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_disabled_gateway_renders_nothing() {
        let settings = Arc::new(GatewaySettings::default());
        let handler = CartExpressButton::new(settings.clone(), Arc::new(AssetResolver::clearpay()));
        assert!(handler.handle(&HookContext::new()).await.unwrap().is_none());

        let ctx = HookContext::new().with_arg("price", "10.00");
        assert!(PriceMessaging::product(settings).handle(&ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_price_messaging() {
        let handler = PriceMessaging::category(enabled());

        let ctx = HookContext::new().with_arg("price", "25.00");
        let html = handler.handle(&ctx).await.unwrap().unwrap();
        assert!(html.contains(r#"data-page-type="category""#));
        assert!(html.contains(r#"data-amount="25""#));

        let over = HookContext::new().with_arg("price", "5000");
        assert!(handler.handle(&over).await.unwrap().is_none());

        let err = handler.handle(&HookContext::new()).await.unwrap_err();
        assert!(matches!(err, ClearpayError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_placements_dispatch_through_registry() {
        let settings = enabled();
        let mut registry = HookRegistry::new();
        registry.register(
            Hook::CartTotalsAfterOrderTotal,
            10,
            CartExpressButton::new(settings.clone(), Arc::new(AssetResolver::clearpay())),
        );
        registry.register_placements(
            &settings,
            Arc::new(PriceMessaging::product(settings.clone())),
            Arc::new(PriceMessaging::category(settings.clone())),
        );

        let ctx = HookContext::new().with_arg("price", "60");
        let html = registry
            .dispatch(&Hook::parse("woocommerce_single_product_summary"), &ctx)
            .await
            .unwrap();
        assert!(html.contains(r#"data-page-type="product""#));
        assert_eq!(registry.len(), 3);
    }
}
