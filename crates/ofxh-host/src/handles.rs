//! Param/clip handle minting (§4.F/§4.G suite entry points).
//!
//! `ofxhParam.cpp`'s `paramGetHandle`/`paramGetPropertySet` just
//! `reinterpret_cast` the already-`Arc`-free `Instance*` pointer it was
//! given — every addressable object there is simultaneously its own
//! property set via multiple inheritance. The §9 redesign note replaces
//! that with owned data and capability interfaces, so
//! [`ofxh_param::ParamInstance`]/[`ofxh_clip::ClipInstance`] live as plain
//! values inside their owning
//! [`ofxh_image_effect::ImageEffectInstance`]'s maps rather than each being
//! independently `Arc`-tracked. A param/clip handle here therefore
//! addresses a `(owning effect handle, name)` pair, minted once per pair
//! and reused on every later lookup, rather than the bare value itself.
//!
//! Minted locators are retained for the process lifetime rather than
//! retired when their owning effect instance is destroyed — bounded by one
//! entry per (effect, param-or-clip) pair ever instantiated in one process
//! run, not an unbounded leak, and the original's handles were never
//! explicitly released either (only implicitly invalidated by the
//! `Instance`'s own destruction, which a `reinterpret_cast`-based scheme
//! cannot detect without a destructor hook this crate doesn't have).

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use ofxh_abi::{OfxImageClipHandle, OfxImageEffectHandle, OfxParamHandle};
use ofxh_image_effect::ImageEffectInstance;
use ofxh_property::HandleError;

use crate::error::HostError;

type Locator = (OfxImageEffectHandle, String);

struct LocatorTable {
    by_key: Mutex<HashMap<(usize, String), Arc<Mutex<Locator>>>>,
    by_handle: Mutex<HashMap<usize, Arc<Mutex<Locator>>>>,
}

impl LocatorTable {
    fn new() -> Self {
        Self {
            by_key: Mutex::new(HashMap::new()),
            by_handle: Mutex::new(HashMap::new()),
        }
    }

    fn mint(&self, effect: OfxImageEffectHandle, name: &str) -> *mut c_void {
        let key = (effect.0 as usize, name.to_string());
        let mut by_key = self.by_key.lock().expect("locator table poisoned");
        let arc = by_key
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new((effect, name.to_string()))))
            .clone();
        let handle = Arc::as_ptr(&arc) as *mut c_void;
        self.by_handle
            .lock()
            .expect("locator table poisoned")
            .insert(handle as usize, arc);
        handle
    }

    fn resolve(&self, handle: *mut c_void) -> Result<Locator, HandleError> {
        self.by_handle
            .lock()
            .expect("locator table poisoned")
            .get(&(handle as usize))
            .map(|arc| arc.lock().expect("locator mutex poisoned").clone())
            .ok_or(HandleError::Unknown)
    }
}

static PARAM_LOCATORS: Lazy<LocatorTable> = Lazy::new(LocatorTable::new);
static CLIP_LOCATORS: Lazy<LocatorTable> = Lazy::new(LocatorTable::new);

/// Mints (or returns the already-minted) handle for `name` on `effect`
/// (`paramGetHandle`'s `*param = instance->getHandle()`).
#[must_use]
pub fn register_param_handle(effect: OfxImageEffectHandle, name: &str) -> OfxParamHandle {
    OfxParamHandle(PARAM_LOCATORS.mint(effect, name))
}

pub fn resolve_param_handle(handle: OfxParamHandle) -> Result<(OfxImageEffectHandle, String), HandleError> {
    PARAM_LOCATORS.resolve(handle.0)
}

#[must_use]
pub fn register_clip_handle(effect: OfxImageEffectHandle, name: &str) -> OfxImageClipHandle {
    OfxImageClipHandle(CLIP_LOCATORS.mint(effect, name))
}

pub fn resolve_clip_handle(handle: OfxImageClipHandle) -> Result<(OfxImageEffectHandle, String), HandleError> {
    CLIP_LOCATORS.resolve(handle.0)
}

/// Resolves a param handle all the way back to its owning, still-live
/// effect instance plus the parameter's name, the way every
/// [`crate::suites::parameter`] entry point needs to before touching a
/// [`ofxh_param::ParamInstance`].
pub fn resolve_param(handle: OfxParamHandle) -> Result<(Arc<Mutex<ImageEffectInstance>>, String), HostError> {
    let (effect, name) = resolve_param_handle(handle)?;
    let instance = ofxh_image_effect::resolve_handle(effect)?;
    Ok((instance, name))
}

/// Same as [`resolve_param`] but for clip handles.
pub fn resolve_clip(handle: OfxImageClipHandle) -> Result<(Arc<Mutex<ImageEffectInstance>>, String), HostError> {
    let (effect, name) = resolve_clip_handle(handle)?;
    let instance = ofxh_image_effect::resolve_handle(effect)?;
    Ok((instance, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minting_the_same_pair_twice_returns_the_same_handle() {
        let effect = OfxImageEffectHandle(0x1000 as *mut c_void);
        let a = register_param_handle(effect, "gain");
        let b = register_param_handle(effect, "gain");
        assert_eq!(a, b);
    }

    #[test]
    fn different_names_mint_different_handles() {
        let effect = OfxImageEffectHandle(0x2000 as *mut c_void);
        let a = register_param_handle(effect, "gain");
        let b = register_param_handle(effect, "offset");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_recovers_the_effect_and_name() {
        let effect = OfxImageEffectHandle(0x3000 as *mut c_void);
        let handle = register_clip_handle(effect, "Source");
        let (resolved_effect, name) = resolve_clip_handle(handle).expect("just minted");
        assert_eq!(resolved_effect, effect);
        assert_eq!(name, "Source");
    }

    #[test]
    fn unknown_handle_is_unknown() {
        assert_eq!(
            resolve_param_handle(OfxParamHandle(0x9999 as *mut c_void)),
            Err(HandleError::Unknown)
        );
    }
}
