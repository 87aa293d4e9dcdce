//! The host facade (§4.J): host properties, `fetchSuite`, and message /
//! persistent-message routing tying every other `ofxh-*` crate into one
//! embeddable object.
//!
//! Everything upstream of this crate models one piece of the OFX object
//! graph in isolation; nothing upstream knows how to answer `fetchSuite` or
//! construct an `OfxHost`. [`Host`] is the thing an embedder actually
//! builds: it owns the process-wide [`ofxh_plugin_cache::PluginCache`] and
//! [`ofxh_image_effect_api::PluginRegistry`], publishes host properties
//! through a registered [`ofxh_property::PropertySet`], and answers suite
//! lookups for any plug-in it has loaded.

#![allow(unsafe_code)]

mod embedder;
mod error;
mod handles;
mod host;
pub mod suites;

pub use embedder::{EmbedderHooks, MessageType};
pub use error::HostError;
pub use handles::{resolve_clip, resolve_param};
pub use host::{Host, HostConfig};
