use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::sync::Weak;

use ofxh_abi::properties::{OFX_PARAM_PROP_ENABLED, OFX_PARAM_PROP_SECRET};
use ofxh_property::{ChangeSink, PropertySet, WriteOrigin};

use crate::descriptor::ParamDescriptor;
use crate::error::ParamError;
use crate::keyframe::{KeyframeTrack, SearchDirection};
use crate::kind::ParamKind;
use crate::value::ParamValue;

/// A plugin-instantiated parameter (`ofxhParam.h`'s `Instance` plus whichever
/// concrete `*Instance`/`KeyframeParam` mixin applies). Rather than the
/// original's per-kind class hierarchy, one instance type carries a
/// [`ParamValue`] whose shape [`ParamKind::storage`] already pins down, and
/// the keyframe track is simply absent for non-animatable kinds.
pub struct ParamInstance {
    name: String,
    kind: ParamKind,
    properties: PropertySet,
    value: ParamValue,
    keyframes: Option<KeyframeTrack>,
    parent_name: Option<String>,
    change_sink: Weak<dyn ChangeSink>,
    /// Backing storage for the last string value handed back across the
    /// ABI (`paramGetValue`/`paramGetValueAtTime` on a string param), the
    /// way `StringInstance::getV` in the original returns a pointer into
    /// its own stored `std::string` rather than allocating a fresh one per
    /// call. Stable until the next string read or value change.
    string_return: RefCell<Option<CString>>,
}

impl ParamInstance {
    #[must_use]
    pub fn new(descriptor: &ParamDescriptor, change_sink: Weak<dyn ChangeSink>) -> Self {
        let kind = descriptor.kind();
        let properties = descriptor.properties().copy_for("paramInstance", false);
        let keyframes = kind.is_animatable().then(KeyframeTrack::default);
        Self {
            name: descriptor.name().to_string(),
            kind,
            properties,
            value: default_value_for(kind),
            keyframes,
            parent_name: None,
            change_sink,
            string_return: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    pub fn set_parent_name(&mut self, parent: Option<String>) {
        self.parent_name = parent;
    }

    #[must_use]
    pub fn is_secret(&mut self) -> bool {
        self.properties
            .get_int(OFX_PARAM_PROP_SECRET, 0)
            .unwrap_or(0)
            != 0
    }

    #[must_use]
    pub fn is_enabled(&mut self) -> bool {
        self.properties
            .get_int(OFX_PARAM_PROP_ENABLED, 0)
            .unwrap_or(1)
            != 0
    }

    #[must_use]
    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    /// Stores `value` as this instance's string return slot and hands back
    /// a pointer into it, for the ABI's `paramGetValue(AtTime)String` entry
    /// points. The pointer stays valid until the next call to this method
    /// on the same instance (mirrors `StringInstance::getV`'s pointer into
    /// its own stored string; see the `string_return` field doc).
    #[must_use]
    pub fn cache_string_return(&self, value: &str) -> *const c_char {
        let c_string = CString::new(value).unwrap_or_default();
        let mut cache = self.string_return.borrow_mut();
        *cache = Some(c_string);
        cache.as_ref().expect("just stored").as_ptr()
    }

    /// Sets the current value, notifying the owning effect instance when the
    /// write came from the plug-in (`instanceChangedAction`, §4.F).
    pub fn set_value(&mut self, value: ParamValue, origin: WriteOrigin) -> Result<(), ParamError> {
        self.value = value;
        if origin == WriteOrigin::Plugin {
            if let Some(sink) = self.change_sink.upgrade() {
                sink.param_changed(&self.name);
            }
        }
        Ok(())
    }

    fn keyframes_mut(&mut self) -> Result<&mut KeyframeTrack, ParamError> {
        self.keyframes
            .as_mut()
            .ok_or_else(|| ParamError::NotAnimatable(self.name.clone()))
    }

    fn keyframes(&self) -> Result<&KeyframeTrack, ParamError> {
        self.keyframes
            .as_ref()
            .ok_or_else(|| ParamError::NotAnimatable(self.name.clone()))
    }

    pub fn value_at_time(&self, time: f64) -> Result<ParamValue, ParamError> {
        let track = self.keyframes()?;
        if track.is_empty() {
            return Ok(self.value.clone());
        }
        Ok(track.value_at(time).cloned().unwrap_or_else(|| self.value.clone()))
    }

    pub fn set_value_at_time(
        &mut self,
        time: f64,
        value: ParamValue,
        origin: WriteOrigin,
    ) -> Result<(), ParamError> {
        self.keyframes_mut()?.set_key(time, value);
        if origin == WriteOrigin::Plugin {
            if let Some(sink) = self.change_sink.upgrade() {
                sink.param_changed(&self.name);
            }
        }
        Ok(())
    }

    pub fn num_keys(&self) -> Result<usize, ParamError> {
        Ok(self.keyframes()?.num_keys())
    }

    pub fn key_time(&self, nth: usize) -> Result<f64, ParamError> {
        self.keyframes()?.key_time(nth).ok_or(ParamError::NoSuchKey)
    }

    pub fn key_index(&self, time: f64, direction: SearchDirection) -> Result<usize, ParamError> {
        self.keyframes()?
            .key_index(time, direction)
            .ok_or(ParamError::NoSuchKey)
    }

    pub fn delete_key(&mut self, time: f64) -> Result<(), ParamError> {
        if self.keyframes_mut()?.delete_key(time) {
            Ok(())
        } else {
            Err(ParamError::NoSuchKey)
        }
    }

    pub fn delete_all_keys(&mut self) -> Result<(), ParamError> {
        self.keyframes_mut()?.delete_all_keys();
        Ok(())
    }

    /// Copies every keyframe from `other` into this instance, shifted by
    /// `offset` (`ofxhParam.h::Instance::copy`).
    pub fn copy_from(&mut self, other: &ParamInstance, offset: f64) -> Result<(), ParamError> {
        if other.kind != self.kind {
            return Err(ParamError::WrongKind {
                name: self.name.clone(),
                expected: self.kind.type_name(),
                actual: other.kind.type_name(),
            });
        }
        let source = other.keyframes()?.clone();
        self.keyframes_mut()?.copy_from(&source, offset);
        self.value = other.value.clone();
        Ok(())
    }
}

fn default_value_for(kind: ParamKind) -> ParamValue {
    use crate::kind::Storage;
    match kind.storage() {
        Storage::Int(dim) => ParamValue::Int(vec![0; dim]),
        Storage::Double(dim) => ParamValue::Double(vec![0.0; dim]),
        Storage::String => ParamValue::String(String::new()),
        Storage::None => ParamValue::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;
    impl ChangeSink for NullSink {
        fn param_changed(&self, _param_name: &str) {}
        fn clip_changed(&self, _clip_name: &str) {}
    }

    #[test]
    fn new_instance_starts_at_kind_default() {
        let descriptor = ParamDescriptor::new("x", ParamKind::Double2D);
        let instance = ParamInstance::new(&descriptor, Weak::<NullSink>::new());
        assert_eq!(instance.value(), &ParamValue::Double(vec![0.0, 0.0]));
    }

    #[test]
    fn group_instance_rejects_keyframe_ops() {
        let descriptor = ParamDescriptor::new("g", ParamKind::Group);
        let instance = ParamInstance::new(&descriptor, Weak::<NullSink>::new());
        assert!(matches!(instance.num_keys(), Err(ParamError::NotAnimatable(_))));
    }

    #[test]
    fn set_value_at_time_then_value_at_time_round_trips() {
        let descriptor = ParamDescriptor::new("d", ParamKind::Double);
        let mut instance = ParamInstance::new(&descriptor, Weak::<NullSink>::new());
        instance
            .set_value_at_time(10.0, ParamValue::Double(vec![5.0]), WriteOrigin::Host)
            .unwrap();
        assert_eq!(
            instance.value_at_time(20.0).unwrap(),
            ParamValue::Double(vec![5.0])
        );
    }

    #[test]
    fn copy_from_rejects_mismatched_kind() {
        let int_descriptor = ParamDescriptor::new("i", ParamKind::Integer);
        let dbl_descriptor = ParamDescriptor::new("d", ParamKind::Double);
        let src = ParamInstance::new(&dbl_descriptor, Weak::<NullSink>::new());
        let mut dst = ParamInstance::new(&int_descriptor, Weak::<NullSink>::new());
        assert!(matches!(
            dst.copy_from(&src, 0.0),
            Err(ParamError::WrongKind { .. })
        ));
    }
}
