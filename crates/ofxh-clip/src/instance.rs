use std::sync::{Arc, Weak};

use ofxh_abi::properties::*;
use ofxh_property::{ChangeSink, PropStorage, PropType, PropertySet, WriteOrigin};

use crate::callbacks::ClipCallbacks;
use crate::descriptor::ClipDescriptor;
use crate::hook::ClipGetHook;

/// A clip attached to one effect instance (`ofxhClip.h::Instance`). Every
/// virtual field is served by `callbacks` through a [`ClipGetHook`]
/// installed on each instance-only property at construction — the host
/// never stores these values itself.
pub struct ClipInstance {
    name: String,
    properties: PropertySet,
    change_sink: Weak<dyn ChangeSink>,
}

const VIRTUAL_STRING_PROPS: &[&str] = &[
    OFX_IMAGE_EFFECT_PROP_PIXEL_DEPTH,
    OFX_IMAGE_EFFECT_PROP_COMPONENTS,
    OFX_IMAGE_CLIP_PROP_UNMAPPED_PIXEL_DEPTH,
    OFX_IMAGE_CLIP_PROP_UNMAPPED_COMPONENTS,
    OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION,
    OFX_IMAGE_CLIP_PROP_FIELD_ORDER,
];

const VIRTUAL_DOUBLE_PROPS: &[(&str, usize)] = &[
    (OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, 1),
    (OFX_IMAGE_EFFECT_PROP_FRAME_RATE, 1),
    (OFX_IMAGE_EFFECT_PROP_FRAME_RANGE, 2),
    (OFX_IMAGE_EFFECT_PROP_UNMAPPED_FRAME_RATE, 1),
    (OFX_IMAGE_EFFECT_PROP_UNMAPPED_FRAME_RANGE, 2),
];

const VIRTUAL_INT_PROPS: &[&str] = &[OFX_IMAGE_CLIP_PROP_CONNECTED, OFX_IMAGE_CLIP_PROP_CONTINUOUS_SAMPLES];

impl ClipInstance {
    #[must_use]
    pub fn new(
        descriptor: &ClipDescriptor,
        name: impl Into<String>,
        callbacks: Weak<dyn ClipCallbacks>,
        change_sink: Weak<dyn ChangeSink>,
    ) -> Self {
        let mut properties = descriptor.properties().copy_for("clipInstance", false);
        let hook: Arc<ClipGetHook> = Arc::new(ClipGetHook::new(callbacks));

        for name in VIRTUAL_STRING_PROPS.iter().copied() {
            properties.define(name, PropType::String, 1);
            let _ = properties.set_get_hook(name, hook.clone());
        }
        for (name, dim) in VIRTUAL_DOUBLE_PROPS.iter().copied() {
            properties.define(name, PropType::Double, dim);
            let _ = properties.set_get_hook(name, hook.clone());
        }
        for name in VIRTUAL_INT_PROPS.iter().copied() {
            properties.define(name, PropType::Int, 1);
            let _ = properties.set_get_hook(name, hook.clone());
        }

        Self {
            name: name.into(),
            properties,
            change_sink,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label(&mut self) -> String {
        let short = self.properties.get_string(OFX_PROP_SHORT_LABEL, 0).unwrap_or_default();
        if !short.is_empty() {
            return short;
        }
        self.properties.get_string(OFX_PROP_NAME, 0).unwrap_or_default()
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    pub fn pixel_depth(&mut self) -> String {
        self.properties.get_string(OFX_IMAGE_EFFECT_PROP_PIXEL_DEPTH, 0).unwrap_or_default()
    }

    pub fn components(&mut self) -> String {
        self.properties.get_string(OFX_IMAGE_EFFECT_PROP_COMPONENTS, 0).unwrap_or_default()
    }

    pub fn premult(&mut self) -> String {
        self.properties.get_string(OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION, 0).unwrap_or_default()
    }

    pub fn aspect_ratio(&mut self) -> f64 {
        self.properties.get_double(OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, 0).unwrap_or(1.0)
    }

    pub fn frame_range(&mut self) -> (f64, f64) {
        let start = self.properties.get_double(OFX_IMAGE_EFFECT_PROP_FRAME_RANGE, 0).unwrap_or(0.0);
        let end = self.properties.get_double(OFX_IMAGE_EFFECT_PROP_FRAME_RANGE, 1).unwrap_or(0.0);
        (start, end)
    }

    pub fn connected(&mut self) -> bool {
        self.properties.get_int(OFX_IMAGE_CLIP_PROP_CONNECTED, 0).unwrap_or(0) != 0
    }

    /// Notifies the owning effect that this clip's connection or
    /// preferences changed (`ofxhClip.h::Instance::instanceChangedAction`,
    /// with `clipName` instead of `paramName`).
    pub fn notify_changed(&self) {
        if let Some(sink) = self.change_sink.upgrade() {
            sink.clip_changed(&self.name);
        }
    }

    pub fn set_optional_flag(&mut self, value: bool) -> Result<(), ofxh_property::PropertyError> {
        self.properties.set_int(
            OFX_IMAGE_CLIP_PROP_OPTIONAL,
            0,
            i32::from(value),
            WriteOrigin::Host,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCallbacks;
    impl ClipCallbacks for FixedCallbacks {
        fn pixel_depth(&self) -> String {
            "OfxBitDepthFloat".to_string()
        }
        fn components(&self) -> String {
            "OfxImageComponentRGBA".to_string()
        }
        fn unmapped_bit_depth(&self) -> String {
            "OfxBitDepthFloat".to_string()
        }
        fn unmapped_components(&self) -> String {
            "OfxImageComponentRGBA".to_string()
        }
        fn premult(&self) -> String {
            "OfxImagePreMultiplied".to_string()
        }
        fn aspect_ratio(&self) -> f64 {
            1.0
        }
        fn frame_rate(&self) -> f64 {
            24.0
        }
        fn frame_range(&self) -> (f64, f64) {
            (1.0, 100.0)
        }
        fn field_order(&self) -> String {
            "OfxImageFieldNone".to_string()
        }
        fn connected(&self) -> bool {
            true
        }
        fn unmapped_frame_rate(&self) -> f64 {
            24.0
        }
        fn unmapped_frame_range(&self) -> (f64, f64) {
            (1.0, 100.0)
        }
        fn continuous_samples(&self) -> bool {
            false
        }
        fn region_of_definition(&self, _time: f64) -> (f64, f64, f64, f64) {
            (0.0, 0.0, 1920.0, 1080.0)
        }
    }

    struct NullSink;
    impl ChangeSink for NullSink {
        fn param_changed(&self, _param_name: &str) {}
        fn clip_changed(&self, _clip_name: &str) {}
    }

    #[test]
    fn virtual_fields_route_through_callbacks() {
        let descriptor = ClipDescriptor::new("Source");
        let callbacks: Arc<dyn ClipCallbacks> = Arc::new(FixedCallbacks);
        let mut instance = ClipInstance::new(
            &descriptor,
            "Source",
            Arc::downgrade(&callbacks),
            Weak::<NullSink>::new(),
        );
        assert_eq!(instance.pixel_depth(), "OfxBitDepthFloat");
        assert_eq!(instance.frame_range(), (1.0, 100.0));
        assert!(instance.connected());
    }

    #[test]
    fn dropped_callbacks_surface_as_unknown_property_error() {
        let descriptor = ClipDescriptor::new("Source");
        let callbacks: Arc<dyn ClipCallbacks> = Arc::new(FixedCallbacks);
        let weak = Arc::downgrade(&callbacks);
        drop(callbacks);
        let mut instance = ClipInstance::new(&descriptor, "Source", weak, Weak::<NullSink>::new());
        assert_eq!(instance.pixel_depth(), String::new());
    }
}
