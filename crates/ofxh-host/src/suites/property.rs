//! `OfxPropertySuiteV1` (§4.F "Property Suite"): the 18 fixed-arity entry
//! points the real ABI already defines (no variadic machinery here; see
//! `ofxhPropertySuite.h`'s own `setPointer`/`setString`/`setDouble`/`setInt`
//! family this struct mirrors one-for-one).
//!
//! Every function resolves its `OfxPropertySetHandle` through
//! [`PropertySet::resolve_handle`], so it only ever reaches a set this
//! crate explicitly registered (the host set, a dispatch call's in/out
//! args, a descriptor's copied api-properties). A handle for a param's or
//! clip's *own* live property set doesn't exist in this redesign (§9
//! "capability interfaces"; [`crate::handles`]'s doc comment) — embedders
//! read/write those through the typed parameter/clip suites instead.

use std::ffi::{c_char, c_double, c_int, c_void, CStr, CString};
use std::sync::{Arc, Mutex};

use ofxh_abi::{OfxPropertySetHandle, OfxStatus};
use ofxh_property::{PropertySet, WriteOrigin};

use crate::error::HostError;

#[repr(C)]
pub struct OfxPropertySuiteV1 {
    pub prop_set_pointer: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_void) -> i32,
    pub prop_set_string: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *const c_char) -> i32,
    pub prop_set_double: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, c_double) -> i32,
    pub prop_set_int: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, c_int) -> i32,
    pub prop_set_pointer_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *const *mut c_void) -> i32,
    pub prop_set_string_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *const *const c_char) -> i32,
    pub prop_set_double_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *const c_double) -> i32,
    pub prop_set_int_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *const c_int) -> i32,
    pub prop_get_pointer: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_void) -> i32,
    pub prop_get_string: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *const c_char) -> i32,
    pub prop_get_double: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_double) -> i32,
    pub prop_get_int: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_int) -> i32,
    pub prop_get_pointer_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_void) -> i32,
    pub prop_get_string_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *const c_char) -> i32,
    pub prop_get_double_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_double) -> i32,
    pub prop_get_int_n: extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_int) -> i32,
    pub prop_reset: extern "C" fn(OfxPropertySetHandle, *const c_char) -> i32,
    pub prop_get_dimension: extern "C" fn(OfxPropertySetHandle, *const c_char, *mut c_int) -> i32,
}

pub static SUITE: OfxPropertySuiteV1 = OfxPropertySuiteV1 {
    prop_set_pointer,
    prop_set_string,
    prop_set_double,
    prop_set_int,
    prop_set_pointer_n,
    prop_set_string_n,
    prop_set_double_n,
    prop_set_int_n,
    prop_get_pointer,
    prop_get_string,
    prop_get_double,
    prop_get_int,
    prop_get_pointer_n,
    prop_get_string_n,
    prop_get_double_n,
    prop_get_int_n,
    prop_reset,
    prop_get_dimension,
};

fn resolve(handle: OfxPropertySetHandle) -> Result<Arc<Mutex<PropertySet>>, HostError> {
    Ok(PropertySet::resolve_handle(handle)?)
}

unsafe fn name_str<'a>(name: *const c_char) -> &'a str {
    CStr::from_ptr(name).to_str().unwrap_or("")
}

fn status_of<T>(result: Result<T, HostError>) -> i32 {
    match result {
        Ok(_) => OfxStatus::Ok.as_raw(),
        Err(e) => OfxStatus::from(&e).as_raw(),
    }
}

extern "C" fn prop_set_pointer(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, value: *mut c_void) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        set.lock().expect("property set poisoned").set_pointer(name, index as usize, value, WriteOrigin::Plugin)?;
        Ok(())
    })())
}

extern "C" fn prop_set_string(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, value: *const c_char) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let value = unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned();
        set.lock().expect("property set poisoned").set_string(name, index as usize, value, WriteOrigin::Plugin)?;
        Ok(())
    })())
}

extern "C" fn prop_set_double(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, value: c_double) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        set.lock().expect("property set poisoned").set_double(name, index as usize, value, WriteOrigin::Plugin)?;
        Ok(())
    })())
}

extern "C" fn prop_set_int(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, value: c_int) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        set.lock().expect("property set poisoned").set_int(name, index as usize, value, WriteOrigin::Plugin)?;
        Ok(())
    })())
}

extern "C" fn prop_set_pointer_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, values: *const *mut c_void) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = unsafe { *values.add(i) };
            set.set_pointer(name, i, v, WriteOrigin::Plugin)?;
        }
        Ok(())
    })())
}

extern "C" fn prop_set_string_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, values: *const *const c_char) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = unsafe { CStr::from_ptr(*values.add(i)) }.to_string_lossy().into_owned();
            set.set_string(name, i, v, WriteOrigin::Plugin)?;
        }
        Ok(())
    })())
}

extern "C" fn prop_set_double_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, values: *const c_double) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = unsafe { *values.add(i) };
            set.set_double(name, i, v, WriteOrigin::Plugin)?;
        }
        Ok(())
    })())
}

extern "C" fn prop_set_int_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, values: *const c_int) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = unsafe { *values.add(i) };
            set.set_int(name, i, v, WriteOrigin::Plugin)?;
        }
        Ok(())
    })())
}

extern "C" fn prop_get_pointer(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, out: *mut *mut c_void) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let value = set.lock().expect("property set poisoned").get_pointer(name, index as usize)?;
        unsafe { *out = value };
        Ok(())
    })())
}

// Leaked once per call: the plug-in owns the returned `const char*` for the
// lifetime OFX gives string-valued properties (until the next call on the
// same property), matching `ofxhPropertySuite.h`'s own string-ownership
// contract rather than handing back a pointer this crate would free under
// the plug-in's feet.
extern "C" fn prop_get_string(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, out: *mut *const c_char) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let value = set.lock().expect("property set poisoned").get_string(name, index as usize)?;
        let c_value = CString::new(value).unwrap_or_default();
        unsafe { *out = c_value.into_raw() };
        Ok(())
    })())
}

extern "C" fn prop_get_double(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, out: *mut c_double) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let value = set.lock().expect("property set poisoned").get_double(name, index as usize)?;
        unsafe { *out = value };
        Ok(())
    })())
}

extern "C" fn prop_get_int(handle: OfxPropertySetHandle, name: *const c_char, index: c_int, out: *mut c_int) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let value = set.lock().expect("property set poisoned").get_int(name, index as usize)?;
        unsafe { *out = value };
        Ok(())
    })())
}

extern "C" fn prop_get_pointer_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, out: *mut *mut c_void) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = set.get_pointer(name, i)?;
            unsafe { *out.add(i) = v };
        }
        Ok(())
    })())
}

extern "C" fn prop_get_string_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, out: *mut *const c_char) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = set.get_string(name, i)?;
            let c_v = CString::new(v).unwrap_or_default();
            unsafe { *out.add(i) = c_v.into_raw() };
        }
        Ok(())
    })())
}

extern "C" fn prop_get_double_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, out: *mut c_double) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = set.get_double(name, i)?;
            unsafe { *out.add(i) = v };
        }
        Ok(())
    })())
}

extern "C" fn prop_get_int_n(handle: OfxPropertySetHandle, name: *const c_char, count: c_int, out: *mut c_int) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let mut set = set.lock().expect("property set poisoned");
        for i in 0..count as usize {
            let v = set.get_int(name, i)?;
            unsafe { *out.add(i) = v };
        }
        Ok(())
    })())
}

extern "C" fn prop_reset(handle: OfxPropertySetHandle, name: *const c_char) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        set.lock().expect("property set poisoned").reset(name)?;
        Ok(())
    })())
}

extern "C" fn prop_get_dimension(handle: OfxPropertySetHandle, name: *const c_char, out: *mut c_int) -> i32 {
    status_of((|| {
        let set = resolve(handle)?;
        let name = unsafe { name_str(name) };
        let dim = set.lock().expect("property set poisoned").dimension(name)?;
        unsafe { *out = dim as c_int };
        Ok(())
    })())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn register(set: PropertySet) -> OfxPropertySetHandle {
        PropertySet::register_handle(&Arc::new(Mutex::new(set)))
    }

    #[test]
    fn round_trips_an_int_through_the_suite() {
        let mut set = PropertySet::new("test", true);
        set.define("OfxPropTest", ofxh_property::PropType::Int, 1);
        let handle = register(set);
        let name = CString::new("OfxPropTest").unwrap();

        let status = prop_set_int(handle, name.as_ptr(), 0, 42);
        assert_eq!(status, OfxStatus::Ok.as_raw());

        let mut out = 0i32;
        let status = prop_get_int(handle, name.as_ptr(), 0, &mut out);
        assert_eq!(status, OfxStatus::Ok.as_raw());
        assert_eq!(out, 42);
    }

    #[test]
    fn unknown_handle_reports_bad_handle() {
        let name = CString::new("OfxPropTest").unwrap();
        let mut out = 0i32;
        let status = prop_get_int(OfxPropertySetHandle::from(0x1 as *mut c_void), name.as_ptr(), 0, &mut out);
        assert_eq!(status, OfxStatus::ErrBadHandle.as_raw());
    }

    #[test]
    fn get_dimension_reports_the_declared_size() {
        let mut set = PropertySet::new("test", true);
        set.define("OfxPropTest", ofxh_property::PropType::Double, 3);
        let handle = register(set);
        let name = CString::new("OfxPropTest").unwrap();
        let mut dim = 0i32;
        let status = prop_get_dimension(handle, name.as_ptr(), &mut dim);
        assert_eq!(status, OfxStatus::Ok.as_raw());
        assert_eq!(dim, 3);
    }
}
