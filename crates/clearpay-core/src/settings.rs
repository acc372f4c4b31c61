//! Gateway Settings
//!
//! One snapshot of the merchant's gateway configuration, built at startup
//! and handed to every component that needs it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ClearpayError, Result};

/// Default priority for the product detail placement
pub const DEFAULT_PRODUCT_PAGES_PRIORITY: i64 = 10;

/// Default priority for the category listing placement
pub const DEFAULT_CATEGORY_PAGES_PRIORITY: i64 = 99;

/// Provider API environment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    Production,
    #[default]
    Sandbox,
}

impl ApiEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
        }
    }

    /// Anything other than `production` is treated as sandbox.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Sandbox
        }
    }
}

impl std::fmt::Display for ApiEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storefront hook plus the priority to attach at
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub hook: String,
    pub priority: i64,
}

/// Merchant gateway configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Whether the gateway is offered at checkout
    pub enabled: bool,

    /// Provider API environment
    pub api_env: ApiEnvironment,

    /// Merchant public ID
    pub mpid: String,

    /// Store country (two-letter, uppercase)
    pub country_code: String,

    /// Store currency (ISO 4217)
    pub currency: String,

    /// Largest order total the provider will finance
    pub order_limit_max: Decimal,

    /// Base URL for provider-hosted images
    pub static_url: String,

    /// Hook name for product detail messaging (empty = disabled)
    pub product_pages_hook: String,

    /// Raw priority setting for product detail messaging
    pub product_pages_priority: String,

    /// Hook name for category listing messaging (empty = disabled)
    pub category_pages_hook: String,

    /// Raw priority setting for category listing messaging
    pub category_pages_priority: String,

    /// Theme slug substituted into the express checkout button
    pub express_theme: String,

    /// Multi-currency support enabled for this merchant
    pub multicurrency: bool,

    /// Public site URL, used to build admin and ajax links
    pub site_url: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_env: ApiEnvironment::Sandbox,
            mpid: String::new(),
            country_code: "GB".into(),
            currency: "GBP".into(),
            order_limit_max: Decimal::new(1000, 0),
            static_url: "https://static.afterpay.com".into(),
            product_pages_hook: "woocommerce_single_product_summary".into(),
            product_pages_priority: String::new(),
            category_pages_hook: "woocommerce_after_shop_loop_item_title".into(),
            category_pages_priority: String::new(),
            express_theme: "black-on-mint".into(),
            multicurrency: false,
            site_url: "http://localhost".into(),
        }
    }
}

impl GatewaySettings {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(v) = lookup("CLEARPAY_ENABLED") {
            settings.enabled = parse_flag(&v);
        }
        if let Some(v) = lookup("CLEARPAY_API_ENV") {
            settings.api_env = ApiEnvironment::parse(&v);
        }
        if let Some(v) = lookup("CLEARPAY_MPID") {
            settings.mpid = v;
        }
        if let Some(v) = lookup("CLEARPAY_COUNTRY") {
            settings.country_code = v.trim().to_uppercase();
        }
        if let Some(v) = lookup("CLEARPAY_CURRENCY") {
            settings.currency = v.trim().to_uppercase();
        }
        if let Some(v) = lookup("CLEARPAY_ORDER_LIMIT_MAX") {
            settings.order_limit_max = v.trim().parse().map_err(|_| {
                ClearpayError::Config(format!("CLEARPAY_ORDER_LIMIT_MAX is not a number: {v}"))
            })?;
        }
        if let Some(v) = lookup("CLEARPAY_STATIC_URL") {
            settings.static_url = v;
        }
        if let Some(v) = lookup("CLEARPAY_PRODUCT_PAGES_HOOK") {
            settings.product_pages_hook = v;
        }
        if let Some(v) = lookup("CLEARPAY_PRODUCT_PAGES_PRIORITY") {
            settings.product_pages_priority = v;
        }
        if let Some(v) = lookup("CLEARPAY_CATEGORY_PAGES_HOOK") {
            settings.category_pages_hook = v;
        }
        if let Some(v) = lookup("CLEARPAY_CATEGORY_PAGES_PRIORITY") {
            settings.category_pages_priority = v;
        }
        if let Some(v) = lookup("CLEARPAY_EXPRESS_THEME") {
            settings.express_theme = v;
        }
        if let Some(v) = lookup("CLEARPAY_MULTICURRENCY") {
            settings.multicurrency = parse_flag(&v);
        }
        if let Some(v) = lookup("CLEARPAY_SITE_URL") {
            settings.site_url = v.trim_end_matches('/').to_string();
        }

        if settings.order_limit_max < Decimal::ZERO {
            return Err(ClearpayError::Config(
                "CLEARPAY_ORDER_LIMIT_MAX must not be negative".into(),
            ));
        }

        Ok(settings)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_production(&self) -> bool {
        self.api_env == ApiEnvironment::Production
    }

    /// Where product detail messaging attaches, if anywhere
    pub fn product_placement(&self) -> Option<Placement> {
        placement(
            &self.product_pages_hook,
            &self.product_pages_priority,
            DEFAULT_PRODUCT_PAGES_PRIORITY,
        )
    }

    /// Where category listing messaging attaches, if anywhere
    pub fn category_placement(&self) -> Option<Placement> {
        placement(
            &self.category_pages_hook,
            &self.category_pages_priority,
            DEFAULT_CATEGORY_PAGES_PRIORITY,
        )
    }

    /// Merchant-level feature flags
    pub fn feature_is_available(&self, feature: &str) -> bool {
        match feature {
            "multicurrency" => self.multicurrency,
            _ => false,
        }
    }
}

fn placement(hook: &str, priority: &str, default_priority: i64) -> Option<Placement> {
    if hook.is_empty() {
        return None;
    }

    // "" and "0" both count as unset
    let priority = if priority.is_empty() || priority == "0" {
        default_priority
    } else {
        leading_int(priority)
    };

    Some(Placement {
        hook: hook.to_string(),
        priority,
    })
}

/// Loose integer cast: leading whitespace, optional sign, then digits.
/// Anything unparseable is 0; out-of-range values saturate.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    rest.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |n, b| {
            let digit = i64::from(b - b'0');
            let n = n.saturating_mul(10);
            if negative {
                n.saturating_sub(digit)
            } else {
                n.saturating_add(digit)
            }
        })
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
