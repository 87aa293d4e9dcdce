//! `OfxImageEffectSuiteV1` (§4.H "Image-Effect instance").
//!
//! `getParamSet`/`clipGetHandle` are pure handle-resolution glue over
//! [`crate::handles`] and [`crate::suites::parameter::get_param_set`].
//! `clipGetRegionOfDefinition` and `abort` forward straight to
//! [`ofxh_image_effect::ImageEffectInstance`]'s own methods.
//!
//! `getPropertySet`, `clipGetPropertySet` and `clipDefine` have no entry
//! point here, for the same reason `paramGetPropertySet` doesn't
//! ([`crate::suites::parameter`]'s doc comment): a
//! [`ofxh_image_effect::ImageEffectInstance`]'s own [`ofxh_property::PropertySet`]
//! and a [`ofxh_clip::ClipInstance`]'s live as plain fields guarded by their
//! owner's `Mutex` rather than behind an independently registrable `Arc`, so
//! there's no handle to mint for them without duplicating the property set
//! out from under its owner. `clipGetImage`/`clipReleaseImage` and the
//! `imageMemory*` family are out of scope (§9 Non-goals; no pixel buffer
//! model).

use std::ffi::{c_char, c_double, CStr};

use ofxh_abi::{OfxImageClipHandle, OfxImageEffectHandle, OfxParamSetHandle, OfxStatus};

use crate::error::HostError;
use crate::handles;
use crate::suites::parameter;

/// `OfxRectD` (bounds of a region, in canonical coordinates).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfxRectD {
    pub x1: c_double,
    pub y1: c_double,
    pub x2: c_double,
    pub y2: c_double,
}

#[repr(C)]
pub struct OfxImageEffectSuiteV1 {
    pub get_param_set: extern "C" fn(OfxImageEffectHandle, *mut OfxParamSetHandle) -> i32,
    pub clip_get_handle: extern "C" fn(OfxImageEffectHandle, *const c_char, *mut OfxImageClipHandle) -> i32,
    pub clip_get_region_of_definition: extern "C" fn(OfxImageClipHandle, c_double, *mut OfxRectD) -> i32,
    pub abort: extern "C" fn(OfxImageEffectHandle, *mut i32) -> i32,
}

pub static SUITE: OfxImageEffectSuiteV1 = OfxImageEffectSuiteV1 {
    get_param_set,
    clip_get_handle,
    clip_get_region_of_definition,
    abort,
};

fn status_of<T>(result: Result<T, HostError>) -> i32 {
    match result {
        Ok(_) => OfxStatus::Ok.as_raw(),
        Err(e) => OfxStatus::from(&e).as_raw(),
    }
}

unsafe fn name_str<'a>(name: *const c_char) -> &'a str {
    CStr::from_ptr(name).to_str().unwrap_or("")
}

extern "C" fn get_param_set(effect: OfxImageEffectHandle, out: *mut OfxParamSetHandle) -> i32 {
    status_of((|| {
        // `ofxh_image_effect::resolve_handle` doubles as the liveness check
        // `parameter::get_param_set`'s pure bit-pattern reuse can't perform
        // on its own.
        ofxh_image_effect::resolve_handle(effect)?;
        unsafe { *out = parameter::get_param_set(effect) };
        Ok(())
    })())
}

extern "C" fn clip_get_handle(effect: OfxImageEffectHandle, name: *const c_char, out: *mut OfxImageClipHandle) -> i32 {
    status_of((|| {
        let name = unsafe { name_str(name) };
        let instance = ofxh_image_effect::resolve_handle(effect)?;
        instance.lock().expect("effect instance poisoned").get_clip(name)?;
        let handle = handles::register_clip_handle(effect, name);
        unsafe { *out = handle };
        Ok(())
    })())
}

extern "C" fn clip_get_region_of_definition(handle: OfxImageClipHandle, time: c_double, out: *mut OfxRectD) -> i32 {
    status_of((|| {
        let (instance, name) = handles::resolve_clip(handle)?;
        let mut instance = instance.lock().expect("effect instance poisoned");
        // The owning effect, not the clip, actually runs the
        // `getRegionOfDefinition` action; the clip name just selects which
        // of its outputs the caller wants back.
        let _ = instance.get_clip(&name)?;
        let (x1, y1, x2, y2) = instance.get_region_of_definition(time, (1.0, 1.0));
        unsafe { *out = OfxRectD { x1, y1, x2, y2 } };
        Ok(())
    })())
}

extern "C" fn abort(effect: OfxImageEffectHandle, out: *mut i32) -> i32 {
    status_of((|| {
        let instance = ofxh_image_effect::resolve_handle(effect)?;
        let aborted = instance.lock().expect("effect instance poisoned").abort();
        unsafe { *out = i32::from(aborted) };
        Ok(())
    })())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::ffi::{c_void, CString};
    use std::sync::Weak;

    use ofxh_abi::OfxPropertySetHandle;
    use ofxh_image_effect::ImageEffectDescriptor;

    unsafe extern "C" fn dummy_main_entry(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Ok.as_raw()
    }

    fn build_instance() -> OfxImageEffectHandle {
        let mut descriptor = ImageEffectDescriptor::new("bundle");
        let instance = ofxh_image_effect::ImageEffectInstance::new(
            &mut descriptor,
            dummy_main_entry,
            "OfxImageEffectContextFilter",
            false,
            Weak::new(),
            HashMap::new(),
        );
        instance.lock().unwrap().self_handle()
    }

    #[test]
    fn get_param_set_reuses_the_effect_handle_bits() {
        let effect = build_instance();
        let mut out = OfxParamSetHandle::NULL;
        assert_eq!(get_param_set(effect, &mut out), OfxStatus::Ok.as_raw());
        assert_eq!(out.0, effect.0);
    }

    #[test]
    fn get_param_set_on_unknown_effect_is_bad_handle() {
        let mut out = OfxParamSetHandle::NULL;
        let bogus = OfxImageEffectHandle(0x7777 as *mut c_void);
        assert_eq!(get_param_set(bogus, &mut out), OfxStatus::ErrBadHandle.as_raw());
    }

    #[test]
    fn abort_defaults_to_false_with_no_callbacks() {
        let effect = build_instance();
        let mut out = 1;
        assert_eq!(abort(effect, &mut out), OfxStatus::Ok.as_raw());
        assert_eq!(out, 0);
    }

    #[test]
    fn clip_get_handle_unknown_clip_name_fails() {
        let effect = build_instance();
        let name = CString::new("Source").unwrap();
        let mut out = OfxImageClipHandle::NULL;
        let status = clip_get_handle(effect, name.as_ptr(), &mut out);
        assert_ne!(status, OfxStatus::Ok.as_raw());
    }
}
