//! Region-Aware Asset Resolver
//!
//! Merges region-invariant defaults with the overrides for one region.
//! Unknown region codes (including the empty string) silently resolve to
//! the fallback region, so storefront rendering always has a usable set of
//! URLs and templates. Callers that want to notice the fallback can use
//! [`AssetResolver::resolve_with_match`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{AssetError, Result};

/// Express checkout button row for the cart totals table
pub const CART_PAGE_EXPRESS_BUTTON: &str = "cart_page_express_button";

/// Customer help request form
pub const HELP_CENTER_URL: &str = "help_center_url";

/// Merchant-facing marketing page
pub const RETAILER_URL: &str = "retailer_url";

/// Region used when no exact match exists
pub const FALLBACK_REGION: &str = "GB";

/// Key to template mapping for one region (or for all regions)
pub type RegionConfig = BTreeMap<String, String>;

/// Defaults merged with one region's overrides
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig(BTreeMap<String, String>);

impl ResolvedConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// How the requested region code was satisfied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionMatch {
    Exact,
    Fallback,
}

/// A resolved config plus which region table entry produced it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Region code whose overrides were applied
    pub region: String,

    pub matched: RegionMatch,

    pub config: ResolvedConfig,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        self.matched == RegionMatch::Fallback
    }
}

/// Owns the global defaults and the region table for its lifetime.
#[derive(Clone, Debug)]
pub struct AssetResolver {
    global: RegionConfig,
    regions: BTreeMap<String, RegionConfig>,
    fallback: String,
}

impl AssetResolver {
    /// Build a resolver from explicit tables.
    ///
    /// Fails if `fallback` is not a key of `regions`.
    pub fn new(
        global: RegionConfig,
        regions: BTreeMap<String, RegionConfig>,
        fallback: impl Into<String>,
    ) -> Result<Self> {
        let fallback = fallback.into();
        if !regions.contains_key(&fallback) {
            return Err(AssetError::MissingFallback(fallback));
        }
        Ok(Self {
            global,
            regions,
            fallback,
        })
    }

    /// The Clearpay storefront tables.
    pub fn clearpay() -> Self {
        let global = RegionConfig::from([(
            CART_PAGE_EXPRESS_BUTTON.to_string(),
            concat!(
                r#"<tr><td colspan="2" class="btn-clearpay_express_td">"#,
                r#"<button id="clearpay_express_button" class="btn-clearpay_express btn-clearpay_express_cart" type="button" disabled>"#,
                r#"<img src="https://static.afterpay.com/button/checkout-with-clearpay/[THEME].svg" alt="Checkout with Clearpay" />"#,
                r#"</button></td></tr>"#,
            )
            .to_string(),
        )]);

        let gb = RegionConfig::from([
            (
                HELP_CENTER_URL.to_string(),
                "https://help.clearpay.co.uk/hc/en-gb/requests/new".to_string(),
            ),
            (
                RETAILER_URL.to_string(),
                "https://www.clearpay.co.uk/en-GB/for-retailers".to_string(),
            ),
        ]);

        Self {
            global,
            regions: BTreeMap::from([(FALLBACK_REGION.to_string(), gb)]),
            fallback: FALLBACK_REGION.to_string(),
        }
    }

    /// Resolve the merged config for `country_code`.
    ///
    /// The code is matched verbatim; normalize it before calling.
    pub fn resolve(&self, country_code: &str) -> ResolvedConfig {
        self.resolve_with_match(country_code).config
    }

    /// Like [`resolve`](Self::resolve), but also reports whether the code
    /// matched exactly or fell back.
    pub fn resolve_with_match(&self, country_code: &str) -> Resolution {
        let (region, matched) = if self.regions.contains_key(country_code) {
            (country_code, RegionMatch::Exact)
        } else {
            (self.fallback.as_str(), RegionMatch::Fallback)
        };

        let mut merged = self.global.clone();
        if let Some(overrides) = self.regions.get(region) {
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        Resolution {
            region: region.to_string(),
            matched,
            config: ResolvedConfig(merged),
        }
    }

    pub fn fallback_region(&self) -> &str {
        &self.fallback
    }

    /// Region codes with their own table entry
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::clearpay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> RegionConfig {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn custom_resolver() -> AssetResolver {
        AssetResolver::new(
            config(&[("logo", "global-logo"), ("button", "global-button")]),
            BTreeMap::from([
                ("GB".to_string(), config(&[("help", "gb-help")])),
                (
                    "AU".to_string(),
                    config(&[("help", "au-help"), ("logo", "au-logo")]),
                ),
            ]),
            "GB",
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_gb_literal_tables() {
        let resolver = AssetResolver::clearpay();
        let resolved = resolver.resolve("GB");

        assert_eq!(resolved.len(), 3);
        assert_eq!(
            resolved.get(HELP_CENTER_URL),
            Some("https://help.clearpay.co.uk/hc/en-gb/requests/new")
        );
        assert_eq!(
            resolved.get(RETAILER_URL),
            Some("https://www.clearpay.co.uk/en-GB/for-retailers")
        );
        let button = resolved.get(CART_PAGE_EXPRESS_BUTTON).unwrap();
        assert!(button.starts_with("<tr><td colspan=\"2\""));
        assert!(button.contains("checkout-with-clearpay/[THEME].svg"));
    }

    #[test]
    fn test_unknown_and_empty_codes_fall_back() {
        let resolver = AssetResolver::clearpay();
        let gb = resolver.resolve("GB");

        for code in ["FR", "", "gb", "G B", "GBR", "🇬🇧"] {
            assert_eq!(resolver.resolve(code), gb, "code {code:?}");
            assert!(!resolver.resolve(code).is_empty());
        }
    }

    #[test]
    fn test_resolve_with_match_reports_fallback() {
        let resolver = AssetResolver::clearpay();

        let exact = resolver.resolve_with_match("GB");
        assert_eq!(exact.matched, RegionMatch::Exact);
        assert_eq!(exact.region, "GB");

        let fallback = resolver.resolve_with_match("FR");
        assert!(fallback.is_fallback());
        assert_eq!(fallback.region, "GB");
        assert_eq!(fallback.config, exact.config);
    }

    #[test]
    fn test_region_value_overrides_global() {
        let resolver = custom_resolver();
        let au = resolver.resolve("AU");
        assert_eq!(au.get("logo"), Some("au-logo"));
        assert_eq!(au.get("help"), Some("au-help"));
        assert_eq!(au.len(), 3);
    }

    #[test]
    fn test_global_only_keys_pass_through() {
        let resolver = custom_resolver();
        for code in ["AU", "GB", "NZ"] {
            assert_eq!(resolver.resolve(code).get("button"), Some("global-button"));
        }
        assert_eq!(resolver.resolve("GB").get("logo"), Some("global-logo"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = custom_resolver();
        assert_eq!(resolver.resolve("AU"), resolver.resolve("AU"));
        assert_eq!(resolver.resolve("XX"), resolver.resolve("XX"));
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let err = AssetResolver::new(
            RegionConfig::new(),
            BTreeMap::from([("AU".to_string(), RegionConfig::new())]),
            "GB",
        )
        .unwrap_err();
        assert!(matches!(err, AssetError::MissingFallback(code) if code == "GB"));
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let resolution = AssetResolver::clearpay().resolve_with_match("US");
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["matched"], "fallback");
        assert_eq!(json["region"], "GB");
        assert_eq!(
            json["config"]["retailer_url"],
            "https://www.clearpay.co.uk/en-GB/for-retailers"
        );
    }
}
