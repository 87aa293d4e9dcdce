use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use ofxh_abi::OfxPropertySetHandle;

use crate::error::{HandleError, PropertyError};
use crate::handle::HandleManager;
use crate::hooks::{GetHook, NotifyHook, SetHook, WriteOrigin};
use crate::property::Property;
use crate::value::{PropScalar, PropStorage, PropType};

static PROPERTY_SET_HANDLES: Lazy<HandleManager<PropertySet>> = Lazy::new(HandleManager::new);

/// An ordered mapping from name to property, plus the insertion order
/// needed for stable XML output (§3, §4.C).
///
/// A set is either *strict* (an unknown name is always an error) or
/// *permissive* (a read-style miss silently defines a new property of the
/// inferred type, §4.B). Host-internal, always-strict property bags
/// (parameter/clip descriptors) use the strict mode; the loosely-specified
/// host and argument property sets exchanged at the action-dispatch
/// boundary are typically permissive.
pub struct PropertySet {
    label: &'static str,
    permissive: bool,
    order: Vec<String>,
    properties: HashMap<String, Property>,
}

impl PropertySet {
    #[must_use]
    pub fn new(label: &'static str, permissive: bool) -> Self {
        Self {
            label,
            permissive,
            order: Vec::new(),
            properties: HashMap::new(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    /// Declares a new property with a fixed (`dimension > 0`) or variable
    /// (`dimension == 0`) size. Redeclaring an existing name replaces it.
    pub fn define(&mut self, name: impl Into<String>, prop_type: PropType, dimension: usize) {
        let name = name.into();
        if !self.properties.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.properties
            .insert(name.clone(), Property::new(name, prop_type, dimension));
    }

    pub fn define_with_default(
        &mut self,
        name: impl Into<String>,
        dimension: usize,
        default: PropStorage,
    ) {
        let name = name.into();
        let prop_type = default.prop_type();
        self.define(name.clone(), prop_type, dimension);
        if let Some(p) = self.properties.get_mut(&name) {
            p.set_default(default);
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    #[must_use]
    pub fn names_in_order(&self) -> &[String] {
        &self.order
    }

    pub fn property(&self, name: &str) -> Result<&Property, PropertyError> {
        self.properties
            .get(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    pub fn property_mut(&mut self, name: &str) -> Result<&mut Property, PropertyError> {
        self.properties
            .get_mut(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    /// Ensures `name` exists, inferring `prop_type` for a permissive miss.
    /// Strict sets return `Unknown` unchanged.
    fn ensure_readable(
        &mut self,
        name: &str,
        prop_type: PropType,
    ) -> Result<(), PropertyError> {
        if self.properties.contains_key(name) {
            return Ok(());
        }
        if self.permissive {
            self.define(name.to_string(), prop_type, 0);
            Ok(())
        } else {
            Err(PropertyError::Unknown(name.to_string()))
        }
    }

    pub fn get_int(&mut self, name: &str, index: usize) -> Result<i32, PropertyError> {
        self.ensure_readable(name, PropType::Int)?;
        self.property(name)?.get_int(index)
    }

    pub fn get_double(&mut self, name: &str, index: usize) -> Result<f64, PropertyError> {
        self.ensure_readable(name, PropType::Double)?;
        self.property(name)?.get_double(index)
    }

    pub fn get_string(&mut self, name: &str, index: usize) -> Result<String, PropertyError> {
        self.ensure_readable(name, PropType::String)?;
        self.property(name)?.get_string(index)
    }

    pub fn get_pointer(
        &mut self,
        name: &str,
        index: usize,
    ) -> Result<*mut std::ffi::c_void, PropertyError> {
        self.ensure_readable(name, PropType::Pointer)?;
        self.property(name)?.get_pointer(index)
    }

    pub fn dimension(&self, name: &str) -> Result<usize, PropertyError> {
        self.property(name)?.dimension()
    }

    pub fn set_int(
        &mut self,
        name: &str,
        index: usize,
        value: i32,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.property_mut(name)?
            .set_scalar(index, PropScalar::Int(value), origin)
    }

    pub fn set_double(
        &mut self,
        name: &str,
        index: usize,
        value: f64,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.property_mut(name)?
            .set_scalar(index, PropScalar::Double(value), origin)
    }

    pub fn set_string(
        &mut self,
        name: &str,
        index: usize,
        value: impl Into<String>,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.property_mut(name)?.set_scalar(
            index,
            PropScalar::String(value.into()),
            origin,
        )
    }

    pub fn set_pointer(
        &mut self,
        name: &str,
        index: usize,
        value: *mut std::ffi::c_void,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.property_mut(name)?
            .set_scalar(index, PropScalar::Pointer(value), origin)
    }

    /// Bulk "N at once" write, replacing the whole current vector.
    pub fn set_all(
        &mut self,
        name: &str,
        values: PropStorage,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.property_mut(name)?.set_all(values, origin)
    }

    pub fn get_int_n(&self, name: &str, count: usize) -> Result<Vec<i32>, PropertyError> {
        let p = self.property(name)?;
        (0..count).map(|i| p.get_int(i)).collect()
    }

    pub fn get_double_n(&self, name: &str, count: usize) -> Result<Vec<f64>, PropertyError> {
        let p = self.property(name)?;
        (0..count).map(|i| p.get_double(i)).collect()
    }

    /// Resets a single property to track its default again.
    pub fn reset(&mut self, name: &str) -> Result<(), PropertyError> {
        self.property_mut(name)?.reset()
    }

    /// Resets every property in the set (§4.B "bulk reset").
    pub fn reset_all(&mut self) {
        for name in self.order.clone() {
            if let Some(p) = self.properties.get_mut(&name) {
                let _ = p.reset();
            }
        }
    }

    pub fn remove(&mut self, name: &str) {
        if self.properties.remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
    }

    pub fn set_get_hook(&mut self, name: &str, hook: Arc<dyn GetHook>) -> Result<(), PropertyError> {
        self.property_mut(name)?.set_get_hook(hook);
        Ok(())
    }

    pub fn add_set_hook(&mut self, name: &str, hook: Arc<dyn SetHook>) -> Result<(), PropertyError> {
        self.property_mut(name)?.add_set_hook(hook);
        Ok(())
    }

    pub fn set_notify_hook(
        &mut self,
        name: &str,
        hook: Arc<dyn NotifyHook>,
    ) -> Result<(), PropertyError> {
        self.property_mut(name)?.set_notify_hook(hook);
        Ok(())
    }

    /// A copy of this set with every property's read-only flag cleared and
    /// every hook dropped (§4.B).
    #[must_use]
    pub fn copy_for(&self, label: &'static str, permissive: bool) -> Self {
        let mut copy = Self::new(label, permissive);
        for name in &self.order {
            if let Some(p) = self.properties.get(name) {
                copy.order.push(name.clone());
                copy.properties.insert(name.clone(), p.cloned_for_copy());
            }
        }
        copy
    }

    /// Registers `set` (already behind an `Arc<Mutex<_>>`, as every
    /// ABI-exposed property set must be so it can outlive a single call) in
    /// the process-wide handle table and returns the opaque handle a
    /// plug-in will round-trip back to us (§4.B "exposure").
    #[must_use]
    pub fn register_handle(set: &Arc<Mutex<PropertySet>>) -> OfxPropertySetHandle {
        OfxPropertySetHandle(PROPERTY_SET_HANDLES.register(set))
    }

    pub fn resolve_handle(
        handle: OfxPropertySetHandle,
    ) -> Result<Arc<Mutex<PropertySet>>, HandleError> {
        PROPERTY_SET_HANDLES.resolve(handle.0)
    }

    pub fn forget_handle(handle: OfxPropertySetHandle) {
        PROPERTY_SET_HANDLES.forget(handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_set_rejects_unknown_name() {
        let mut set = PropertySet::new("test", false);
        assert!(matches!(
            set.get_int("missing", 0),
            Err(PropertyError::Unknown(_))
        ));
    }

    #[test]
    fn permissive_set_creates_on_read_miss() {
        let mut set = PropertySet::new("test", true);
        assert!(set.get_int("OfxPropFoo", 0).is_err()); // created but empty
        assert!(set.contains("OfxPropFoo"));
    }

    #[test]
    fn define_then_roundtrip() {
        let mut set = PropertySet::new("test", false);
        set.define("OfxPropName", PropType::String, 1);
        set.set_string("OfxPropName", 0, "identity", WriteOrigin::Host).unwrap();
        assert_eq!(set.get_string("OfxPropName", 0).unwrap(), "identity");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut set = PropertySet::new("test", false);
        set.define("b", PropType::Int, 1);
        set.define("a", PropType::Int, 1);
        assert_eq!(set.names_in_order(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn copy_clears_read_only() {
        let mut set = PropertySet::new("test", false);
        set.define("x", PropType::Int, 1);
        set.property_mut("x").unwrap().set_plugin_read_only(true);
        let copy = set.copy_for("copy", false);
        assert!(!copy.property("x").unwrap().is_plugin_read_only());
    }

    #[test]
    fn handle_round_trips() {
        let set = Arc::new(Mutex::new(PropertySet::new("test", false)));
        let handle = PropertySet::register_handle(&set);
        let resolved = PropertySet::resolve_handle(handle).unwrap();
        assert!(Arc::ptr_eq(&set, &resolved));
        PropertySet::forget_handle(handle);
        assert!(PropertySet::resolve_handle(handle).is_err());
    }
}
