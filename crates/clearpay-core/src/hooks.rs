//! Hook System
//!
//! Typed extension points for storefront rendering. Handlers are registered
//! at startup against a `Hook` and dispatched in priority order; each may
//! contribute a markup fragment.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::settings::{GatewaySettings, Placement};

/// Storefront extension point
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hook {
    /// Row after the order total in the cart totals table
    CartTotalsAfterOrderTotal,

    /// Admin notice area
    AdminNotices,

    /// An order moved between statuses
    OrderStatusChanged,

    /// Any other named hook, e.g. a merchant-configured placement
    Custom(String),
}

impl Hook {
    /// Map an event name onto a hook. Unknown names become `Custom`.
    pub fn parse(name: &str) -> Self {
        match name {
            "woocommerce_cart_totals_after_order_total" => Self::CartTotalsAfterOrderTotal,
            "admin_notices" => Self::AdminNotices,
            "woocommerce_order_status_changed" => Self::OrderStatusChanged,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::CartTotalsAfterOrderTotal => "woocommerce_cart_totals_after_order_total",
            Self::AdminNotices => "admin_notices",
            Self::OrderStatusChanged => "woocommerce_order_status_changed",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Hook {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Arguments passed to every handler of a dispatch
#[derive(Clone, Debug, Default)]
pub struct HookContext {
    pub args: HashMap<String, serde_json::Value>,
}

impl HookContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}

/// Hook handler trait - implement to render into a storefront hook
#[async_trait]
pub trait HookHandler: Send + Sync {
    /// Handler identifier, used in logs and listings
    fn name(&self) -> &str;

    /// Run the handler. `Some(markup)` is appended to the dispatch output.
    async fn handle(&self, ctx: &HookContext) -> Result<Option<String>>;
}

struct Registration {
    priority: i64,
    handler: Arc<dyn HookHandler>,
}

/// One registered handler, as reported by `HookRegistry::hooks_for`
#[derive(Clone, Debug, Serialize)]
pub struct HandlerInfo {
    pub name: String,
    pub priority: i64,
}

/// Dispatch table from hook to prioritized handlers
pub struct HookRegistry {
    hooks: HashMap<Hook, Vec<Registration>>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Register a handler. Lower priority runs first; equal priorities keep
    /// registration order.
    pub fn register<H: HookHandler + 'static>(&mut self, hook: Hook, priority: i64, handler: H) {
        self.register_arc(hook, priority, Arc::new(handler));
    }

    /// Register a shared handler
    pub fn register_arc(&mut self, hook: Hook, priority: i64, handler: Arc<dyn HookHandler>) {
        tracing::debug!(%hook, priority, handler = handler.name(), "registering hook handler");
        let entries = self.hooks.entry(hook).or_default();
        let at = entries.partition_point(|r| r.priority <= priority);
        entries.insert(at, Registration { priority, handler });
    }

    /// Attach the product and category messaging handlers to the hooks
    /// named in the settings. Returns the placements actually registered.
    pub fn register_placements(
        &mut self,
        settings: &GatewaySettings,
        product_handler: Arc<dyn HookHandler>,
        category_handler: Arc<dyn HookHandler>,
    ) -> Vec<Placement> {
        let mut placed = Vec::new();

        if let Some(placement) = settings.product_placement() {
            self.register_arc(Hook::parse(&placement.hook), placement.priority, product_handler);
            placed.push(placement);
        }

        if let Some(placement) = settings.category_placement() {
            self.register_arc(Hook::parse(&placement.hook), placement.priority, category_handler);
            placed.push(placement);
        }

        placed
    }

    /// Run every handler for `hook` and concatenate their output.
    /// The first handler error aborts the dispatch.
    pub async fn dispatch(&self, hook: &Hook, ctx: &HookContext) -> Result<String> {
        let mut output = String::new();

        let Some(entries) = self.hooks.get(hook) else {
            return Ok(output);
        };

        for entry in entries {
            match entry.handler.handle(ctx).await {
                Ok(Some(fragment)) => output.push_str(&fragment),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(%hook, handler = entry.handler.name(), "hook handler failed: {}", e);
                    return Err(e);
                }
            }
        }

        Ok(output)
    }

    /// Handlers for a hook in dispatch order
    pub fn hooks_for(&self, hook: &Hook) -> Vec<HandlerInfo> {
        self.hooks
            .get(hook)
            .map(|entries| {
                entries
                    .iter()
                    .map(|r| HandlerInfo {
                        name: r.handler.name().to_string(),
                        priority: r.priority,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All hooks with at least one handler, sorted
    pub fn registered_hooks(&self) -> Vec<&Hook> {
        let mut hooks: Vec<&Hook> = self.hooks.keys().collect();
        hooks.sort();
        hooks
    }

    /// Total number of registered handlers
    pub fn len(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
