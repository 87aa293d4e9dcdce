use std::cell::Cell;
use std::sync::Arc;

use crate::error::PropertyError;
use crate::hooks::{GetHook, NotifyHook, SetHook, WriteOrigin};
use crate::value::{PropScalar, PropStorage, PropType};

/// One named, typed, multi-valued property (§3).
pub struct Property {
    name: String,
    prop_type: PropType,
    /// `0` means variable dimension; growth happens on write. `>0` is a
    /// fixed dimension enforced on every index read/write.
    fixed_dimension: usize,
    plugin_read_only: bool,
    default: PropStorage,
    current: PropStorage,
    get_hook: Option<Arc<dyn GetHook>>,
    set_hooks: Vec<Arc<dyn SetHook>>,
    notify_hook: Option<Arc<dyn NotifyHook>>,
    /// Reentry guard: true while a write to this property is in the
    /// middle of running its set/notify hooks, so a hook that writes back
    /// into the same property doesn't recurse into itself (§4.B: "set
    /// hooks observe ... cannot mutate the triggering property").
    notifying: Cell<bool>,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, prop_type: PropType, fixed_dimension: usize) -> Self {
        Self {
            name: name.into(),
            prop_type,
            fixed_dimension,
            plugin_read_only: false,
            default: PropStorage::empty(prop_type),
            current: PropStorage::empty(prop_type),
            get_hook: None,
            set_hooks: Vec::new(),
            notify_hook: None,
            notifying: Cell::new(false),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn prop_type(&self) -> PropType {
        self.prop_type
    }

    #[must_use]
    pub fn is_plugin_read_only(&self) -> bool {
        self.plugin_read_only
    }

    pub fn set_plugin_read_only(&mut self, read_only: bool) {
        self.plugin_read_only = read_only;
    }

    /// Per §4.B: "properties created by copying an existing set have
    /// their read-only bits cleared."
    #[must_use]
    pub fn cloned_for_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            prop_type: self.prop_type,
            fixed_dimension: self.fixed_dimension,
            plugin_read_only: false,
            default: self.default.clone(),
            current: self.current.clone(),
            get_hook: None,
            set_hooks: Vec::new(),
            notify_hook: None,
            notifying: Cell::new(false),
        }
    }

    pub fn set_default(&mut self, values: PropStorage) {
        self.default = values;
    }

    pub fn set_get_hook(&mut self, hook: Arc<dyn GetHook>) {
        self.get_hook = Some(hook);
    }

    pub fn add_set_hook(&mut self, hook: Arc<dyn SetHook>) {
        self.set_hooks.push(hook);
    }

    pub fn set_notify_hook(&mut self, hook: Arc<dyn NotifyHook>) {
        self.notify_hook = Some(hook);
    }

    #[must_use]
    pub fn has_get_hook(&self) -> bool {
        self.get_hook.is_some()
    }

    fn check_type(&self, expected: PropType) -> Result<(), PropertyError> {
        if self.prop_type == expected {
            Ok(())
        } else {
            Err(PropertyError::BadType {
                name: self.name.clone(),
                expected,
                actual: self.prop_type,
            })
        }
    }

    /// Dimension as observed from outside: the hook's answer if a get hook
    /// is installed, else fixed dimension if nonzero, else current length.
    pub fn dimension(&self) -> Result<usize, PropertyError> {
        if let Some(hook) = &self.get_hook {
            return hook.dimension(&self.name);
        }
        if self.fixed_dimension > 0 {
            Ok(self.fixed_dimension)
        } else {
            Ok(self.current.len())
        }
    }

    fn check_index(&self, index: usize) -> Result<(), PropertyError> {
        if self.fixed_dimension > 0 && index >= self.fixed_dimension {
            return Err(PropertyError::BadIndex {
                name: self.name.clone(),
                index,
                dimension: self.fixed_dimension,
            });
        }
        Ok(())
    }

    pub fn get_int(&self, index: usize) -> Result<i32, PropertyError> {
        self.check_type(PropType::Int)?;
        self.check_index(index)?;
        if let Some(hook) = &self.get_hook {
            return hook.get_int(&self.name, index);
        }
        match self.current.get_scalar(index) {
            Some(PropScalar::Int(v)) => Ok(v),
            _ => match self.default.get_scalar(index) {
                Some(PropScalar::Int(v)) => Ok(v),
                _ => Err(PropertyError::BadIndex {
                    name: self.name.clone(),
                    index,
                    dimension: self.current.len().max(self.default.len()),
                }),
            },
        }
    }

    pub fn get_double(&self, index: usize) -> Result<f64, PropertyError> {
        self.check_type(PropType::Double)?;
        self.check_index(index)?;
        if let Some(hook) = &self.get_hook {
            return hook.get_double(&self.name, index);
        }
        match self.current.get_scalar(index) {
            Some(PropScalar::Double(v)) => Ok(v),
            _ => match self.default.get_scalar(index) {
                Some(PropScalar::Double(v)) => Ok(v),
                _ => Err(PropertyError::BadIndex {
                    name: self.name.clone(),
                    index,
                    dimension: self.current.len().max(self.default.len()),
                }),
            },
        }
    }

    pub fn get_string(&self, index: usize) -> Result<String, PropertyError> {
        self.check_type(PropType::String)?;
        self.check_index(index)?;
        if let Some(hook) = &self.get_hook {
            return hook.get_string(&self.name, index);
        }
        match self.current.get_scalar(index) {
            Some(PropScalar::String(v)) => Ok(v),
            _ => match self.default.get_scalar(index) {
                Some(PropScalar::String(v)) => Ok(v),
                _ => Err(PropertyError::BadIndex {
                    name: self.name.clone(),
                    index,
                    dimension: self.current.len().max(self.default.len()),
                }),
            },
        }
    }

    pub fn get_pointer(&self, index: usize) -> Result<*mut std::ffi::c_void, PropertyError> {
        self.check_type(PropType::Pointer)?;
        self.check_index(index)?;
        if let Some(hook) = &self.get_hook {
            return hook.get_pointer(&self.name, index);
        }
        match self.current.get_scalar(index) {
            Some(PropScalar::Pointer(v)) => Ok(v),
            _ => match self.default.get_scalar(index) {
                Some(PropScalar::Pointer(v)) => Ok(v),
                _ => Err(PropertyError::BadIndex {
                    name: self.name.clone(),
                    index,
                    dimension: self.current.len().max(self.default.len()),
                }),
            },
        }
    }

    /// Writes a single scalar at `index`. `origin` gates the read-only
    /// check; pass [`WriteOrigin::Host`] for host-internal writes.
    pub fn set_scalar(
        &mut self,
        index: usize,
        value: PropScalar,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.check_type(value.prop_type())?;
        if origin == WriteOrigin::Plugin && self.plugin_read_only {
            return Err(PropertyError::ReadOnly(self.name.clone()));
        }
        self.check_index(index)?;

        match (&mut self.current, &value) {
            (PropStorage::Int(v), PropScalar::Int(x)) => grow_and_set(v, index, *x, 0),
            (PropStorage::Double(v), PropScalar::Double(x)) => grow_and_set(v, index, *x, 0.0),
            (PropStorage::String(v), PropScalar::String(x)) => {
                grow_and_set(v, index, x.clone(), String::new());
            }
            (PropStorage::Pointer(v), PropScalar::Pointer(x)) => {
                grow_and_set(v, index, *x, std::ptr::null_mut());
            }
            _ => unreachable!("type already checked"),
        }

        self.run_hooks_for_write(&value, index);
        Ok(())
    }

    /// Writes all `values` at once, replacing the current vector (§4.F
    /// bulk N-at-once variants). For fixed dimension, `values.len()` must
    /// equal it exactly.
    pub fn set_all(
        &mut self,
        values: PropStorage,
        origin: WriteOrigin,
    ) -> Result<(), PropertyError> {
        self.check_type(values.prop_type())?;
        if origin == WriteOrigin::Plugin && self.plugin_read_only {
            return Err(PropertyError::ReadOnly(self.name.clone()));
        }
        if self.fixed_dimension > 0 && values.len() != self.fixed_dimension {
            return Err(PropertyError::WrongCount {
                name: self.name.clone(),
                expected: self.fixed_dimension,
                actual: values.len(),
            });
        }
        let count = values.len();
        let representative = values.get_scalar(0);
        self.current = values;

        if let Some(value) = representative {
            self.run_hooks_for_write(&value, count);
        } else if let Some(hook) = &self.notify_hook {
            if !self.notifying.get() {
                self.notifying.set(true);
                hook.on_notify(&self.name);
                self.notifying.set(false);
            }
        }
        Ok(())
    }

    fn run_hooks_for_write(&self, value: &PropScalar, index_or_count: usize) {
        if self.notifying.get() {
            return;
        }
        self.notifying.set(true);
        for hook in &self.set_hooks {
            hook.on_set(&self.name, value, index_or_count);
        }
        if let Some(hook) = &self.notify_hook {
            hook.on_notify(&self.name);
        }
        self.notifying.set(false);
    }

    /// Resets `current` to track `default` again. If a get hook is
    /// installed the reset is forwarded to it, since only the hook knows
    /// what its own default is (§4.B).
    pub fn reset(&mut self) -> Result<(), PropertyError> {
        if self.get_hook.is_some() {
            // The hook owns both default and current; nothing to clear on
            // our side beyond acknowledging the request.
            return Ok(());
        }
        self.current = PropStorage::empty(self.prop_type);
        Ok(())
    }
}

fn grow_and_set<T: Clone>(vec: &mut Vec<T>, index: usize, value: T, fill: T) {
    if index >= vec.len() {
        vec.resize(index + 1, fill);
    }
    vec[index] = value;
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("prop_type", &self.prop_type)
            .field("fixed_dimension", &self.fixed_dimension)
            .field("plugin_read_only", &self.plugin_read_only)
            .field("default", &self.default)
            .field("current", &self.current)
            .field("has_get_hook", &self.get_hook.is_some())
            .field("set_hook_count", &self.set_hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_falls_back_to_default_below_current_length() {
        let mut p = Property::new("p", PropType::Int, 0);
        p.set_default(PropStorage::Int(vec![1, 2, 3]));
        assert_eq!(p.get_int(1).unwrap(), 2);
    }

    #[test]
    fn write_extends_variable_dimension() {
        let mut p = Property::new("p", PropType::Int, 0);
        p.set_scalar(3, PropScalar::Int(9), WriteOrigin::Host).unwrap();
        assert_eq!(p.dimension().unwrap(), 4);
        assert_eq!(p.get_int(3).unwrap(), 9);
    }

    #[test]
    fn fixed_dimension_rejects_out_of_range_index() {
        let p = Property::new("p", PropType::Int, 2);
        assert!(matches!(
            p.get_int(2),
            Err(PropertyError::BadIndex { .. })
        ));
    }

    #[test]
    fn plugin_write_to_read_only_property_fails() {
        let mut p = Property::new("p", PropType::Int, 1);
        p.set_plugin_read_only(true);
        assert!(matches!(
            p.set_scalar(0, PropScalar::Int(1), WriteOrigin::Plugin),
            Err(PropertyError::ReadOnly(_))
        ));
        // Host-internal write bypasses the flag.
        assert!(p.set_scalar(0, PropScalar::Int(1), WriteOrigin::Host).is_ok());
    }

    #[test]
    fn copy_clears_read_only_flag() {
        let mut p = Property::new("p", PropType::Int, 1);
        p.set_plugin_read_only(true);
        let copy = p.cloned_for_copy();
        assert!(!copy.is_plugin_read_only());
    }
}
