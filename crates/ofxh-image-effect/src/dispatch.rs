//! The single seam every plug-in call crosses: turn a request into the raw
//! `mainEntry(action, handle, inArgs, outArgs)` call and turn whatever
//! comes back — a status code, or a panic — into an [`OfxStatus`]
//! (`ofxhImageEffect.cpp::Instance::mainEntry`, minus the `_plugin`/
//! `PluginHandle` null-chasing: callers here always hold a resolved entry
//! point already).

use std::ffi::{c_char, c_void, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use ofxh_abi::{OfxPropertySetHandle, OfxStatus};
use ofxh_property::PropertySet;

/// `OfxPlugin::main_entry`'s signature, shared by the real plug-in entry
/// point and by a declared overlay interact entry point (same ABI shape).
pub type MainEntryFn =
    unsafe extern "C" fn(*const c_char, *mut c_void, OfxPropertySetHandle, OfxPropertySetHandle) -> i32;

/// Calls `main_entry` for `action`, registering `in_args`/`out_args` (when
/// given) in the process-wide property-set handle table for the duration
/// of the call and forgetting them again afterwards. A panic inside the
/// plug-in is caught here and reported as `OfxStatus::Failed`; it never
/// unwinds into the caller.
pub fn call_action(
    main_entry: MainEntryFn,
    action: &str,
    handle: *mut c_void,
    in_args: Option<&Arc<Mutex<PropertySet>>>,
    out_args: Option<&Arc<Mutex<PropertySet>>>,
) -> OfxStatus {
    let Ok(action_c) = CString::new(action) else {
        log::error!("action name '{action}' contains an interior NUL");
        return OfxStatus::ErrFatal;
    };

    let in_handle = in_args.map_or(OfxPropertySetHandle::NULL, PropertySet::register_handle);
    let out_handle = out_args.map_or(OfxPropertySetHandle::NULL, PropertySet::register_handle);

    let result =
        catch_unwind(AssertUnwindSafe(|| unsafe { main_entry(action_c.as_ptr(), handle, in_handle, out_handle) }));

    if !in_handle.is_null() {
        PropertySet::forget_handle(in_handle);
    }
    if !out_handle.is_null() {
        PropertySet::forget_handle(out_handle);
    }

    match result {
        Ok(raw) => OfxStatus::from_raw(raw),
        Err(_) => {
            log::error!("plug-in panicked during '{action}'");
            OfxStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn echoes_ok(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Ok.as_raw()
    }

    unsafe extern "C" fn panics(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        panic!("boom");
    }

    #[test]
    fn reports_ok_status() {
        let status = call_action(echoes_ok, "OfxActionLoad", std::ptr::null_mut(), None, None);
        assert_eq!(status, OfxStatus::Ok);
    }

    #[test]
    fn catches_panics_as_failed() {
        let status = call_action(panics, "OfxActionLoad", std::ptr::null_mut(), None, None);
        assert_eq!(status, OfxStatus::Failed);
    }

    #[test]
    fn registers_and_forgets_property_sets() {
        let in_args = Arc::new(Mutex::new(PropertySet::new("in", true)));
        let status =
            call_action(echoes_ok, "OfxActionDescribe", std::ptr::null_mut(), Some(&in_args), None);
        assert_eq!(status, OfxStatus::Ok);
    }
}
