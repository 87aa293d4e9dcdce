//! Image-effect plug-in discovery and per-identifier bookkeeping (§4.E).
//!
//! Registers as the [`ApiHandler`](ofxh_plugin_cache::ApiHandler) for
//! `"OfxImageEffectPluginAPI"` with `ofxh-plugin-cache`'s scanner: every
//! freshly found or changed binary gets its image-effect plug-ins driven
//! through `load` → `describe` → `unload` here, confirmed into per-identifier
//! lookup tables that keep the highest-version plug-in on a duplicate
//! identifier, and exposed as [`ImageEffectPlugin`] handles that describe
//! each supported context lazily on first use.

#![allow(unsafe_code)]

mod error;
mod host;
mod plugin;
mod registry;

pub use error::PluginApiError;
pub use host::HostHandleSource;
pub use plugin::ImageEffectPlugin;
pub use registry::PluginRegistry;
