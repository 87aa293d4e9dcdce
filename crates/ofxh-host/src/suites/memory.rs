//! `OfxMemorySuiteV1` (§4.F "Memory Suite"): two functions, already
//! fixed-arity in the real ABI. Backed directly by the process allocator —
//! this crate has no arena/pool of its own to hand out from, matching
//! `ofxhMemory.cpp`'s `memoryAlloc`/`memoryFree` which are themselves thin
//! `malloc`/`free` wrappers plus bookkeeping this redesign doesn't need.

use std::alloc::{alloc, dealloc, Layout};
use std::ffi::c_void;

use ofxh_abi::{OfxImageEffectHandle, OfxStatus};

const ALIGN: usize = 16;

#[repr(C)]
pub struct OfxMemorySuiteV1 {
    pub memory_alloc: extern "C" fn(OfxImageEffectHandle, usize, *mut *mut c_void) -> i32,
    pub memory_free: extern "C" fn(*mut c_void) -> i32,
}

pub static SUITE: OfxMemorySuiteV1 = OfxMemorySuiteV1 {
    memory_alloc,
    memory_free,
};

/// Header stashed immediately before the returned block so `memoryFree` can
/// recover the `Layout` it was allocated with (`dealloc` requires the exact
/// layout back). `size_of::<Header>()` is itself `ALIGN`-sized so the
/// payload's own alignment isn't disturbed.
#[repr(C, align(16))]
struct Header {
    size: usize,
}

extern "C" fn memory_alloc(_instance: OfxImageEffectHandle, bytes: usize, out: *mut *mut c_void) -> i32 {
    if out.is_null() {
        return OfxStatus::ErrBadHandle.as_raw();
    }
    let total = std::mem::size_of::<Header>() + bytes;
    let layout = match Layout::from_size_align(total, ALIGN) {
        Ok(l) => l,
        Err(_) => return OfxStatus::ErrMemory.as_raw(),
    };
    let raw = unsafe { alloc(layout) };
    if raw.is_null() {
        return OfxStatus::ErrMemory.as_raw();
    }
    unsafe { (raw as *mut Header).write(Header { size: total }) };
    let payload = unsafe { raw.add(std::mem::size_of::<Header>()) };
    unsafe { *out = payload.cast::<c_void>() };
    OfxStatus::Ok.as_raw()
}

extern "C" fn memory_free(ptr: *mut c_void) -> i32 {
    if ptr.is_null() {
        return OfxStatus::Ok.as_raw();
    }
    let raw = unsafe { (ptr.cast::<u8>()).sub(std::mem::size_of::<Header>()) };
    let header = unsafe { &*(raw as *const Header) };
    let layout = match Layout::from_size_align(header.size, ALIGN) {
        Ok(l) => l,
        Err(_) => return OfxStatus::ErrMemory.as_raw(),
    };
    unsafe { dealloc(raw, layout) };
    OfxStatus::Ok.as_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_then_free_round_trips() {
        let mut ptr = std::ptr::null_mut();
        let status = memory_alloc(OfxImageEffectHandle::NULL, 64, &mut ptr);
        assert_eq!(status, OfxStatus::Ok.as_raw());
        assert!(!ptr.is_null());
        assert_eq!(memory_free(ptr), OfxStatus::Ok.as_raw());
    }

    #[test]
    fn freeing_null_is_a_success_no_op() {
        assert_eq!(memory_free(std::ptr::null_mut()), OfxStatus::Ok.as_raw());
    }

    #[test]
    fn null_out_pointer_is_rejected() {
        let status = memory_alloc(OfxImageEffectHandle::NULL, 16, std::ptr::null_mut());
        assert_eq!(status, OfxStatus::ErrBadHandle.as_raw());
    }
}
