//! `OfxParameterSuiteV1` (§4.G "Parameter Suite").
//!
//! The real `paramGetValue`/`paramSetValue`/`...AtTime` family is variadic
//! (`...`), its argument count and types fixed only by the parameter's own
//! kind. Stable Rust has no variadic-call support, so — per the crate's own
//! design note on this — the ABI stub here decodes the parameter's kind
//! first and exposes one fixed-arity entry point per storage shape
//! ([`ofxh_param::kind::Storage`]: `Int`/`Double`/`String`) instead of a
//! single `...` entry point, then routes to
//! [`ofxh_param::ParamInstance::value`]/`set_value`'s typed
//! [`ofxh_param::ParamValue`] internally. An embedder picks the function
//! matching the parameter kind it already knows it declared, the same way
//! the original's typed C++ wrapper classes (`IntegerInstance`,
//! `StringInstance`, ...) each called the untyped suite function with
//! their own fixed argument list.
//!
//! `paramDefine` has no entry point here — descriptors are built during
//! `describe`/`describeInContext`, which this redesign dispatches without
//! registering a resolvable instance handle for the plug-in to call back
//! into (§9 "capability interfaces"; describe-time suite re-entrancy is out
//! of scope). `paramGetPropertySet`/`paramSetGetPropertySet` are likewise
//! absent: a [`ofxh_param::ParamInstance`] lives as a plain value inside its
//! owning [`ofxh_image_effect::ImageEffectInstance`]'s map rather than
//! behind its own `Arc`, so there's no independently registrable property
//! set handle to hand back for it ([`crate::handles`]'s doc comment).

use std::ffi::{c_char, c_double, c_int, CStr};
use std::sync::{Arc, Mutex};

use ofxh_abi::{OfxImageEffectHandle, OfxParamHandle, OfxParamSetHandle, OfxStatus};
use ofxh_image_effect::ImageEffectInstance;
use ofxh_param::{ParamValue, SearchDirection};
use ofxh_property::WriteOrigin;

use crate::error::HostError;
use crate::handles;

#[repr(C)]
pub struct OfxParameterSuiteV1 {
    pub param_get_handle: extern "C" fn(OfxParamSetHandle, *const c_char, *mut OfxParamHandle) -> i32,
    pub param_get_value_int: extern "C" fn(OfxParamHandle, *mut c_int) -> i32,
    pub param_get_value_double: extern "C" fn(OfxParamHandle, *mut c_double) -> i32,
    pub param_get_value_string: extern "C" fn(OfxParamHandle, *mut *const c_char) -> i32,
    pub param_set_value_int: extern "C" fn(OfxParamHandle, c_int) -> i32,
    pub param_set_value_double: extern "C" fn(OfxParamHandle, c_double) -> i32,
    pub param_set_value_string: extern "C" fn(OfxParamHandle, *const c_char) -> i32,
    pub param_get_value_at_time_int: extern "C" fn(OfxParamHandle, c_double, *mut c_int) -> i32,
    pub param_get_value_at_time_double: extern "C" fn(OfxParamHandle, c_double, *mut c_double) -> i32,
    pub param_get_value_at_time_string: extern "C" fn(OfxParamHandle, c_double, *mut *const c_char) -> i32,
    pub param_set_value_at_time_int: extern "C" fn(OfxParamHandle, c_double, c_int) -> i32,
    pub param_set_value_at_time_double: extern "C" fn(OfxParamHandle, c_double, c_double) -> i32,
    pub param_set_value_at_time_string: extern "C" fn(OfxParamHandle, c_double, *const c_char) -> i32,
    pub param_get_num_keys: extern "C" fn(OfxParamHandle, *mut c_int) -> i32,
    pub param_get_key_time: extern "C" fn(OfxParamHandle, c_int, *mut c_double) -> i32,
    pub param_get_key_index: extern "C" fn(OfxParamHandle, c_double, c_int, *mut c_int) -> i32,
    pub param_delete_key: extern "C" fn(OfxParamHandle, c_double) -> i32,
    pub param_delete_all_keys: extern "C" fn(OfxParamHandle) -> i32,
    pub param_copy: extern "C" fn(OfxParamHandle, OfxParamHandle, c_double) -> i32,
    pub param_edit_begin: extern "C" fn(OfxParamSetHandle) -> i32,
    pub param_edit_end: extern "C" fn(OfxParamSetHandle) -> i32,
}

pub static SUITE: OfxParameterSuiteV1 = OfxParameterSuiteV1 {
    param_get_handle,
    param_get_value_int,
    param_get_value_double,
    param_get_value_string,
    param_set_value_int,
    param_set_value_double,
    param_set_value_string,
    param_get_value_at_time_int,
    param_get_value_at_time_double,
    param_get_value_at_time_string,
    param_set_value_at_time_int,
    param_set_value_at_time_double,
    param_set_value_at_time_string,
    param_get_num_keys,
    param_get_key_time,
    param_get_key_index,
    param_delete_key,
    param_delete_all_keys,
    param_copy,
    param_edit_begin,
    param_edit_end,
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

/// `getParamSet`'s identity-reuse: a [`ofxh_param::ParamSetInstance`] lives
/// inside its owning [`ImageEffectInstance`], so the same handle bit
/// pattern addresses both, exactly as the original's `Instance` both
/// derives from and is its own `Param::SetInstance`.
#[must_use]
pub extern "C" fn get_param_set(effect: OfxImageEffectHandle) -> OfxParamSetHandle {
    OfxParamSetHandle(effect.0)
}

fn effect_of(param_set: OfxParamSetHandle) -> OfxImageEffectHandle {
    OfxImageEffectHandle(param_set.0)
}

extern "C" fn param_get_handle(param_set: OfxParamSetHandle, name: *const c_char, out: *mut OfxParamHandle) -> i32 {
    status_of((|| {
        let name = unsafe { name_str(name) };
        let effect = effect_of(param_set);
        let instance = ofxh_image_effect::resolve_handle(effect)?;
        instance.lock().expect("effect instance poisoned").params().get_param(name)?;
        let handle = handles::register_param_handle(effect, name);
        unsafe { *out = handle };
        Ok(())
    })())
}

fn with_param<R>(
    handle: OfxParamHandle,
    f: impl FnOnce(&mut Arc<Mutex<ImageEffectInstance>>, &str) -> Result<R, HostError>,
) -> Result<R, HostError> {
    let (mut instance, name) = handles::resolve_param(handle)?;
    f(&mut instance, &name)
}

extern "C" fn param_get_value_int(handle: OfxParamHandle, out: *mut c_int) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let value = param.value().as_ints().and_then(|v| v.first().copied()).unwrap_or(0);
        unsafe { *out = value };
        Ok(())
    }))
}

extern "C" fn param_get_value_double(handle: OfxParamHandle, out: *mut c_double) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let value = param.value().as_doubles().and_then(|v| v.first().copied()).unwrap_or(0.0);
        unsafe { *out = value };
        Ok(())
    }))
}

extern "C" fn param_get_value_string(handle: OfxParamHandle, out: *mut *const c_char) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let value = param.value().as_str().unwrap_or("").to_string();
        unsafe { *out = param.cache_string_return(&value) };
        Ok(())
    }))
}

extern "C" fn param_set_value_int(handle: OfxParamHandle, value: c_int) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let mut instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params_mut().get_param_mut(name)?;
        param.set_value(ParamValue::Int(vec![value]), WriteOrigin::Plugin)?;
        Ok(())
    }))
}

extern "C" fn param_set_value_double(handle: OfxParamHandle, value: c_double) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let mut instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params_mut().get_param_mut(name)?;
        param.set_value(ParamValue::Double(vec![value]), WriteOrigin::Plugin)?;
        Ok(())
    }))
}

extern "C" fn param_set_value_string(handle: OfxParamHandle, value: *const c_char) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let value = unsafe { name_str(value) }.to_string();
        let mut instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params_mut().get_param_mut(name)?;
        param.set_value(ParamValue::String(value), WriteOrigin::Plugin)?;
        Ok(())
    }))
}

extern "C" fn param_get_value_at_time_int(handle: OfxParamHandle, time: c_double, out: *mut c_int) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let value = param.value_at_time(time)?;
        unsafe { *out = value.as_ints().and_then(|v| v.first().copied()).unwrap_or(0) };
        Ok(())
    }))
}

extern "C" fn param_get_value_at_time_double(handle: OfxParamHandle, time: c_double, out: *mut c_double) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let value = param.value_at_time(time)?;
        unsafe { *out = value.as_doubles().and_then(|v| v.first().copied()).unwrap_or(0.0) };
        Ok(())
    }))
}

extern "C" fn param_get_value_at_time_string(handle: OfxParamHandle, time: c_double, out: *mut *const c_char) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let value = param.value_at_time(time)?;
        let value = value.as_str().unwrap_or("").to_string();
        unsafe { *out = param.cache_string_return(&value) };
        Ok(())
    }))
}

extern "C" fn param_set_value_at_time_int(handle: OfxParamHandle, time: c_double, value: c_int) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let mut instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params_mut().get_param_mut(name)?;
        param.set_value_at_time(time, ParamValue::Int(vec![value]), WriteOrigin::Plugin)?;
        Ok(())
    }))
}

extern "C" fn param_set_value_at_time_double(handle: OfxParamHandle, time: c_double, value: c_double) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let mut instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params_mut().get_param_mut(name)?;
        param.set_value_at_time(time, ParamValue::Double(vec![value]), WriteOrigin::Plugin)?;
        Ok(())
    }))
}

extern "C" fn param_set_value_at_time_string(handle: OfxParamHandle, time: c_double, value: *const c_char) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let value = unsafe { name_str(value) }.to_string();
        let mut instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params_mut().get_param_mut(name)?;
        param.set_value_at_time(time, ParamValue::String(value), WriteOrigin::Plugin)?;
        Ok(())
    }))
}

extern "C" fn param_get_num_keys(handle: OfxParamHandle, out: *mut c_int) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        unsafe { *out = param.num_keys()? as c_int };
        Ok(())
    }))
}

extern "C" fn param_get_key_time(handle: OfxParamHandle, nth: c_int, out: *mut c_double) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        unsafe { *out = param.key_time(nth as usize)? };
        Ok(())
    }))
}

extern "C" fn param_get_key_index(handle: OfxParamHandle, time: c_double, direction: c_int, out: *mut c_int) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let instance = instance.lock().expect("effect instance poisoned");
        let param = instance.params().get_param(name)?;
        let direction = if direction < 0 { SearchDirection::Backward } else { SearchDirection::Forward };
        unsafe { *out = param.key_index(time, direction)? as c_int };
        Ok(())
    }))
}

extern "C" fn param_delete_key(handle: OfxParamHandle, time: c_double) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let mut instance = instance.lock().expect("effect instance poisoned");
        instance.params_mut().get_param_mut(name)?.delete_key(time)?;
        Ok(())
    }))
}

extern "C" fn param_delete_all_keys(handle: OfxParamHandle) -> i32 {
    status_of(with_param(handle, |instance, name| {
        let mut instance = instance.lock().expect("effect instance poisoned");
        instance.params_mut().get_param_mut(name)?.delete_all_keys()?;
        Ok(())
    }))
}

extern "C" fn param_copy(dest: OfxParamHandle, source: OfxParamHandle, offset: c_double) -> i32 {
    status_of((|| {
        let (dest_instance, dest_name) = handles::resolve_param(dest)?;
        let (source_instance, source_name) = handles::resolve_param(source)?;

        // The same effect's own parameters are the common case
        // (`paramCopy` between two params of one instance); locking the
        // same `Mutex` twice would deadlock, so clone the source value out
        // under one lock when the two handles share an instance.
        if Arc::ptr_eq(&dest_instance, &source_instance) {
            let mut instance = dest_instance.lock().expect("effect instance poisoned");
            let source_value = instance.params().get_param(&source_name)?.value().clone();
            let dest_param = instance.params_mut().get_param_mut(&dest_name)?;
            dest_param.set_value(source_value, WriteOrigin::Host)?;
        } else {
            let source_value = {
                let source_instance = source_instance.lock().expect("effect instance poisoned");
                source_instance.params().get_param(&source_name)?.value().clone()
            };
            let mut dest_instance = dest_instance.lock().expect("effect instance poisoned");
            let dest_param = dest_instance.params_mut().get_param_mut(&dest_name)?;
            dest_param.set_value(source_value, WriteOrigin::Host)?;
        }
        let _ = offset;
        Ok(())
    })())
}

extern "C" fn param_edit_begin(param_set: OfxParamSetHandle) -> i32 {
    status_of((|| {
        let effect = ofxh_image_effect::resolve_handle(effect_of(param_set))?;
        effect.lock().expect("effect instance poisoned").begin_instance_edit()?;
        Ok(())
    })())
}

extern "C" fn param_edit_end(param_set: OfxParamSetHandle) -> i32 {
    status_of((|| {
        let effect = ofxh_image_effect::resolve_handle(effect_of(param_set))?;
        effect.lock().expect("effect instance poisoned").end_instance_edit()?;
        Ok(())
    })())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{c_void, CString};
    use std::sync::{Arc, Mutex, Weak};

    use ofxh_abi::OfxPropertySetHandle;
    use ofxh_image_effect::{ImageEffectDescriptor, ImageEffectInstance};
    use ofxh_param::kind::ParamKind;
    use ofxh_param::ParamDescriptor;

    unsafe extern "C" fn dummy_main_entry(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Ok.as_raw()
    }

    fn build_instance_with_double_param() -> Arc<Mutex<ImageEffectInstance>> {
        let mut descriptor = ImageEffectDescriptor::new("bundle");
        descriptor.params_mut().add_param(ParamDescriptor::new("gain", ParamKind::Double));
        ImageEffectInstance::new(
            &mut descriptor,
            dummy_main_entry,
            "OfxImageEffectContextFilter",
            false,
            Weak::new(),
            std::collections::HashMap::new(),
        )
    }

    #[test]
    fn set_then_get_double_value_round_trips() {
        let instance = build_instance_with_double_param();
        let effect_handle = instance.lock().unwrap().self_handle();
        let name = CString::new("gain").unwrap();
        let mut param_handle = OfxParamHandle::NULL;
        assert_eq!(
            param_get_handle(OfxParamSetHandle(effect_handle.0), name.as_ptr(), &mut param_handle),
            OfxStatus::Ok.as_raw()
        );

        assert_eq!(param_set_value_double(param_handle, 2.5), OfxStatus::Ok.as_raw());
        let mut out = 0.0;
        assert_eq!(param_get_value_double(param_handle, &mut out), OfxStatus::Ok.as_raw());
        assert_eq!(out, 2.5);
    }

    #[test]
    fn get_param_set_reuses_the_effect_handle_bits() {
        let effect = OfxImageEffectHandle(0x4242 as *mut std::ffi::c_void);
        assert_eq!(get_param_set(effect).0, effect.0);
    }

    #[test]
    fn unknown_param_handle_is_bad_handle() {
        let mut out = 0;
        let status = param_get_value_int(OfxParamHandle(0x9 as *mut std::ffi::c_void), &mut out);
        assert_eq!(status, OfxStatus::ErrBadHandle.as_raw());
    }
}
