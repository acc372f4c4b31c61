//! # clearpay-assets
//!
//! Region-aware asset resolution and the storefront fragments built on it.
//!
//! ## Resolution
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────────┐
//! │  GlobalDefaults  │     │  RegionTable          │
//! │  cart button     │     │  GB ─▶ help, retailer │
//! └────────┬─────────┘     └───────────┬───────────┘
//!          │        overlay (region    │  exact match, else
//!          │        value wins)        │  fallback to GB
//!          └──────────────┬────────────┘
//!                         ▼
//!                  ResolvedConfig
//! ```
//!
//! Resolution never fails. Values are opaque templates; substituting the
//! `[THEME]` token is left to the renderer (see [`theme::render_template`]).
//!
//! ## Usage
//!
//! ```rust
//! use clearpay_assets::AssetResolver;
//!
//! let resolver = AssetResolver::clearpay();
//! let assets = resolver.resolve("FR");
//! assert_eq!(assets, resolver.resolve("GB"));
//! ```

pub mod error;
pub mod handlers;
pub mod logo;
pub mod resolver;
pub mod scripts;
pub mod theme;
pub mod widget;

pub use error::{AssetError, Result};
pub use handlers::{CartExpressButton, PriceMessaging};
pub use logo::{SourceSet, generate_source_sets, render_product_logo};
pub use resolver::{AssetResolver, RegionConfig, RegionMatch, Resolution, ResolvedConfig};
pub use scripts::{AdminConfig, AssetManifest, ExpressConfig, StorePage};
pub use theme::{LogoTheme, render_template};
pub use widget::{PageType, render_payment_schedule};
