//! Suite vtables and the `fetchSuite` lookup table (§4.F, §4.H).
//!
//! Every suite here is a plain `static` `repr(C)` struct of `extern "C" fn`
//! pointers; `fetch` just matches a wire suite name/version pair to one of
//! them, mirroring `ofxhHost.cpp`'s own `fetchSuite` switch over the fixed
//! set of suites a host implements. Suites the embedder contract can't
//! support (OpenGL render, progress, timeline, multi-thread, interact) are
//! out of scope (§9 Non-goals) and simply aren't matched here, the same way
//! a real host that doesn't support an optional suite returns a null
//! pointer for it.

pub mod image_effect;
pub mod memory;
pub mod message;
pub mod parameter;
pub mod property;

use std::ffi::c_void;

use ofxh_abi::suites::{
    OFX_IMAGE_EFFECT_SUITE, OFX_MEMORY_SUITE, OFX_MESSAGE_SUITE, OFX_PARAMETER_SUITE,
    OFX_PROPERTY_SUITE, SUPPORTED_SUITE_VERSION,
};

/// Answers one `fetchSuite(host, name, version)` call (§4.H).
#[must_use]
pub fn fetch(name: &str, version: i32) -> *const c_void {
    if version != SUPPORTED_SUITE_VERSION {
        return std::ptr::null();
    }
    match name {
        OFX_PROPERTY_SUITE => (&property::SUITE as *const property::OfxPropertySuiteV1).cast(),
        OFX_PARAMETER_SUITE => (&parameter::SUITE as *const parameter::OfxParameterSuiteV1).cast(),
        OFX_IMAGE_EFFECT_SUITE => (&image_effect::SUITE as *const image_effect::OfxImageEffectSuiteV1).cast(),
        OFX_MEMORY_SUITE => (&memory::SUITE as *const memory::OfxMemorySuiteV1).cast(),
        OFX_MESSAGE_SUITE => (&message::SUITE as *const message::OfxMessageSuiteV1).cast(),
        _ => std::ptr::null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_suite_at_the_supported_version_resolves() {
        assert!(!fetch(OFX_PROPERTY_SUITE, SUPPORTED_SUITE_VERSION).is_null());
        assert!(!fetch(OFX_MEMORY_SUITE, SUPPORTED_SUITE_VERSION).is_null());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        assert!(fetch(OFX_PROPERTY_SUITE, 2).is_null());
    }

    #[test]
    fn unknown_suite_name_is_rejected() {
        assert!(fetch("OfxOpenGLRenderSuite", SUPPORTED_SUITE_VERSION).is_null());
    }
}
