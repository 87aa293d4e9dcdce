//! `repr(C)` wire types exchanged across the plug-in boundary (§3, §6) and
//! the opaque handle newtypes suites pass back and forth.
//!
//! A handle is a `*mut c_void` as far as the wire is concerned; on our side
//! of the boundary it never gets dereferenced as a pointer. Each handle type
//! here is a thin, `Copy` wrapper that higher crates resolve through a
//! registry keyed by the pointer value (`ofxh-property::HandleManager` and
//! friends), the way `nweston-openfx-runner` resolves `OfxPropertySetHandle`
//! through its own `HandleManager`.

use std::ffi::{c_char, c_void};

use crate::status::OfxStatus;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(pub *mut c_void);

        impl $name {
            /// The null handle, as passed for "no handle" in actions such as
            /// `describe` where the instance handle is not yet meaningful.
            pub const NULL: Self = Self(std::ptr::null_mut());

            #[must_use]
            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl From<*mut c_void> for $name {
            fn from(ptr: *mut c_void) -> Self {
                Self(ptr)
            }
        }

        impl From<$name> for *mut c_void {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }

        // Handles cross thread boundaries only as opaque bit patterns; any
        // aliasing is arbitrated by the registry that resolves them, never
        // by dereferencing the pointer directly.
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

opaque_handle!(
    /// `OfxPropertySetHandle`
    OfxPropertySetHandle
);
opaque_handle!(
    /// `OfxParamSetHandle`
    OfxParamSetHandle
);
opaque_handle!(
    /// `OfxParamHandle`
    OfxParamHandle
);
opaque_handle!(
    /// `OfxImageEffectHandle`
    OfxImageEffectHandle
);
opaque_handle!(
    /// `OfxImageClipHandle`
    OfxImageClipHandle
);
opaque_handle!(
    /// `OfxImageMemoryHandle`
    OfxImageMemoryHandle
);
opaque_handle!(
    /// `OfxInteractHandle`
    OfxInteractHandle
);

/// `OfxPlugin`, as exported by `OfxGetPlugin` (§4.D).
///
/// Laid out exactly as the wire struct; fields are raw pointers/fn pointers
/// because this is the boundary itself, not host-side modeling of it.
#[repr(C)]
pub struct OfxPlugin {
    pub plugin_api: *const c_char,
    pub api_version: i32,
    pub plugin_identifier: *const c_char,
    pub plugin_version_major: u32,
    pub plugin_version_minor: u32,
    pub set_host: extern "C" fn(*const OfxHost),
    pub main_entry: unsafe extern "C" fn(
        action: *const c_char,
        handle: *mut c_void,
        in_args: OfxPropertySetHandle,
        out_args: OfxPropertySetHandle,
    ) -> i32,
}

/// `OfxHost`, handed to a plugin's `setHost` at load time (§6).
#[repr(C)]
pub struct OfxHost {
    pub host: OfxPropertySetHandle,
    pub fetch_suite: extern "C" fn(
        host: OfxPropertySetHandle,
        suite_name: *const c_char,
        suite_version: i32,
    ) -> *const c_void,
}

/// Signature shared by every suite's discovery entry point
/// (`OfxGetNumberOfPlugins`/`OfxGetPlugin`) once resolved out of a bundle
/// binary, kept here so `ofxh-binary` and `ofxh-plugin-cache` agree on it
/// without depending on each other.
pub type OfxGetNumberOfPluginsFn = unsafe extern "C" fn() -> i32;
pub type OfxGetPluginFn = unsafe extern "C" fn(i32) -> *const OfxPlugin;

/// Converts a raw `mainEntry` return code into a typed status without
/// panicking on a misbehaving plugin.
#[must_use]
pub fn status_from_main_entry(raw: i32) -> OfxStatus {
    OfxStatus::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_round_trips() {
        let h = OfxPropertySetHandle::NULL;
        assert!(h.is_null());
        let raw: *mut c_void = h.into();
        assert!(raw.is_null());
    }

    #[test]
    fn handle_from_nonnull_ptr_is_not_null() {
        let mut x = 0u8;
        let ptr = std::ptr::addr_of_mut!(x).cast::<c_void>();
        let h = OfxImageEffectHandle::from(ptr);
        assert!(!h.is_null());
    }
}
