//! Shared-library loading, symbol resolution, and stat-based change
//! detection for OFX plug-in bundle binaries (§4.A).
//!
//! This crate knows nothing about OFX plug-ins themselves; it only opens
//! and closes dynamic libraries and reports (mtime, size) drift so
//! `ofxh-plugin-cache` can decide when a binary needs rediscovery.

#![allow(unsafe_code)]

mod binary;

pub use binary::{Binary, Signature};
