//! Payment schedule widget
//!
//! Renders the container the provider's JavaScript mounts the instalment
//! breakdown into.

use clearpay_core::ApiEnvironment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AssetError, Result};
use crate::theme::escape_attr;

/// Where the widget is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Checkout,
    Cart,
    Product,
    Category,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Cart => "cart",
            Self::Product => "product",
            Self::Category => "category",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cart" => Self::Cart,
            "product" => Self::Product,
            "category" => Self::Category,
            _ => Self::Checkout,
        }
    }
}

/// Parse a caller-supplied order total.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| AssetError::InvalidAmount(raw.to_string()))?;
    if amount < Decimal::ZERO {
        return Err(AssetError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

/// Reject totals above the merchant's limit.
pub fn check_order_limit(total: Decimal, max: Decimal) -> Result<()> {
    if total > max {
        return Err(AssetError::OrderLimitExceeded { total, max });
    }
    Ok(())
}

pub fn render_payment_schedule(
    api_env: ApiEnvironment,
    mpid: &str,
    order_total: Decimal,
    currency: &str,
    page_type: PageType,
) -> String {
    let mut html = String::new();

    if api_env != ApiEnvironment::Production {
        html.push_str(r#"<p class="clearpay-test-mode-warning-text">TEST MODE ENABLED</p>"#);
    }

    html.push_str(&format!(
        r#"<div id="clearpay-widget-container" data-mpid="{}" data-page-type="{}" data-amount="{}" data-currency="{}"></div>"#,
        escape_attr(mpid),
        page_type.as_str(),
        order_total.normalize(),
        escape_attr(currency),
    ));

    html
}
