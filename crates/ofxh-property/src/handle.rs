//! Generic opaque-handle registry.
//!
//! Grounded in the `HandleManager`/`Handle` pattern from the
//! `nweston-openfx-runner` reference runner: instead of handing a plug-in a
//! raw pointer into host memory, we hand out a pointer-sized key into a map
//! from key → `Weak<Mutex<T>>`. Resolving a handle upgrades the weak
//! pointer; a pointer the manager never issued is `Unknown`, one whose
//! strong count has dropped to zero is `Dangling`. Neither case ever
//! dereferences the handle's bit pattern as a real pointer.

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::{Arc, Mutex, Weak};

use crate::error::HandleError;

/// Maps opaque handle values to the live objects they stand for, for one
/// object type `T`. Each ABI-facing object kind (property set, param,
/// clip, image effect, interact) owns one of these.
pub struct HandleManager<T> {
    entries: Mutex<HashMap<usize, Weak<Mutex<T>>>>,
}

impl<T> Default for HandleManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleManager<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `obj` and returns the opaque handle value that will
    /// resolve back to it. The key is the object's own heap address, so
    /// the handle is stable for the object's lifetime without requiring a
    /// separate counter.
    pub fn register(&self, obj: &Arc<Mutex<T>>) -> *mut c_void {
        let key = Arc::as_ptr(obj) as usize;
        self.entries
            .lock()
            .expect("handle table poisoned")
            .insert(key, Arc::downgrade(obj));
        key as *mut c_void
    }

    /// Resolves a handle back to its object. `Unknown` means this manager
    /// never issued the handle; `Dangling` means it did, but the object
    /// has since been dropped.
    pub fn resolve(&self, handle: *mut c_void) -> Result<Arc<Mutex<T>>, HandleError> {
        let key = handle as usize;
        let table = self.entries.lock().expect("handle table poisoned");
        match table.get(&key) {
            None => Err(HandleError::Unknown),
            Some(weak) => weak.upgrade().ok_or(HandleError::Dangling),
        }
    }

    /// Drops the registry entry for `handle`. Safe to call even if the
    /// object already vanished; does not affect other handles.
    pub fn forget(&self, handle: *mut c_void) {
        let key = handle as usize;
        self.entries.lock().expect("handle table poisoned").remove(&key);
    }

    /// Number of table entries, including ones whose weak reference has
    /// already expired (used by tests to check `forget` actually prunes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("handle table poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_and_resolves() {
        let manager: HandleManager<i32> = HandleManager::new();
        let obj = Arc::new(Mutex::new(42));
        let handle = manager.register(&obj);
        let resolved = manager.resolve(handle).unwrap();
        assert_eq!(*resolved.lock().unwrap(), 42);
    }

    #[test]
    fn unknown_handle_is_unknown() {
        let manager: HandleManager<i32> = HandleManager::new();
        assert_eq!(manager.resolve(0x1234 as *mut c_void), Err(HandleError::Unknown));
    }

    #[test]
    fn dropped_object_is_dangling() {
        let manager: HandleManager<i32> = HandleManager::new();
        let obj = Arc::new(Mutex::new(7));
        let handle = manager.register(&obj);
        drop(obj);
        assert_eq!(manager.resolve(handle), Err(HandleError::Dangling));
    }

    #[test]
    fn forget_removes_entry() {
        let manager: HandleManager<i32> = HandleManager::new();
        let obj = Arc::new(Mutex::new(1));
        let handle = manager.register(&obj);
        manager.forget(handle);
        assert!(manager.is_empty());
        assert_eq!(manager.resolve(handle), Err(HandleError::Unknown));
    }
}
