//! Fixed constants and wire types for the OpenFX C ABI: status codes, action
//! and suite names, property names, and the `repr(C)` structs/handles
//! exchanged across the plug-in boundary.
//!
//! Nothing in this crate allocates or owns state; it exists so every other
//! `ofxh-*` crate agrees on the same literal wire vocabulary instead of each
//! crate spelling out `"OfxActionLoad"` itself.

#![allow(unsafe_code)]

pub mod actions;
pub mod properties;
pub mod status;
pub mod suites;
pub mod types;

pub use status::OfxStatus;
pub use types::{
    OfxGetNumberOfPluginsFn, OfxGetPluginFn, OfxHost, OfxImageClipHandle, OfxImageEffectHandle,
    OfxImageMemoryHandle, OfxInteractHandle, OfxParamHandle, OfxParamSetHandle, OfxPlugin,
    OfxPropertySetHandle,
};
