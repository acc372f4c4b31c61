//! # clearpay-core
//!
//! Gateway settings and a typed extension-point table for storefront integration.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Startup wiring                         │
//! │  ┌─────────────────┐      ┌──────────────────────────────┐  │
//! │  │ GatewaySettings │─────▶│ HookRegistry                 │  │
//! │  │ (from env/json) │      │  Hook ──▶ [(prio, handler)]  │  │
//! │  └─────────────────┘      └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Settings are built once and passed explicitly to whatever needs them.
//! Placement hooks named in the settings become `Hook::Custom` entries in
//! the registry, so the storefront can dispatch them by name.

pub mod error;
pub mod hooks;
pub mod settings;

pub use error::{ClearpayError, Result};
pub use hooks::{HandlerInfo, Hook, HookContext, HookHandler, HookRegistry};
pub use settings::{ApiEnvironment, GatewaySettings, Placement};
