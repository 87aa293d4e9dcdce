use std::collections::HashMap;

use ofxh_abi::properties::*;
use ofxh_clip::ClipDescriptor;
use ofxh_param::ParamSetDescriptor;
use ofxh_property::{PropStorage, PropType, PropertySet, WriteOrigin};

const IMAGE_EFFECT_TYPE: &str = "OfxTypeImageEffect";
const DEFAULT_RENDER_THREAD_SAFETY: &str = "OfxImageEffectRenderInstanceSafe";

/// An effect as a plug-in described it (`ofxhImageEffect.h::Descriptor`).
/// Holds the universal describe-time property set, every clip the plug-in
/// defined (in declaration order), and the parameter descriptor set.
pub struct ImageEffectDescriptor {
    properties: PropertySet,
    clip_order: Vec<String>,
    clips: HashMap<String, ClipDescriptor>,
    params: ParamSetDescriptor,
}

impl ImageEffectDescriptor {
    /// `bundle_path` becomes the read-only `kOfxPluginPropFilePath`
    /// property, so a plug-in can find sibling resources at describe time.
    #[must_use]
    pub fn new(bundle_path: impl Into<String>) -> Self {
        let mut properties = PropertySet::new("imageEffectDescriptor", false);

        properties.define_with_default(
            OFX_PROP_TYPE,
            1,
            PropStorage::String(vec![IMAGE_EFFECT_TYPE.to_string()]),
        );
        properties.define(OFX_PROP_LABEL, PropType::String, 1);
        properties.define(OFX_PROP_SHORT_LABEL, PropType::String, 1);
        properties.define(OFX_PROP_LONG_LABEL, PropType::String, 1);
        properties.define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, PropType::String, 0);
        properties.define(OFX_IMAGE_EFFECT_PLUGIN_PROP_GROUPING, PropType::String, 1);
        properties.define(OFX_IMAGE_EFFECT_PLUGIN_PROP_SINGLE_INSTANCE, PropType::Int, 1);
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PLUGIN_RENDER_THREAD_SAFETY,
            1,
            PropStorage::String(vec![DEFAULT_RENDER_THREAD_SAFETY.to_string()]),
        );
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PLUGIN_PROP_HOST_FRAME_THREADING,
            1,
            PropStorage::Int(vec![1]),
        );
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PLUGIN_PROP_OVERLAY_INTERACT_V1,
            1,
            PropStorage::Pointer(vec![std::ptr::null_mut()]),
        );
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTI_RESOLUTION,
            1,
            PropStorage::Int(vec![1]),
        );
        properties.define_with_default(OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES, 1, PropStorage::Int(vec![1]));
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PROP_TEMPORAL_CLIP_ACCESS,
            1,
            PropStorage::Int(vec![0]),
        );
        properties.define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_PIXEL_DEPTHS, PropType::String, 0);
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PLUGIN_PROP_FIELD_RENDER_TWICE_ALWAYS,
            1,
            PropStorage::Int(vec![1]),
        );
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_DEPTHS,
            1,
            PropStorage::Int(vec![0]),
        );
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_PARS,
            1,
            PropStorage::Int(vec![0]),
        );
        properties.define(OFX_IMAGE_EFFECT_PROP_CLIP_PREFERENCES_SLAVE_PARAM, PropType::String, 0);

        properties.define(OFX_PLUGIN_PROP_FILE_PATH, PropType::String, 1);
        let _ = properties.set_string(OFX_PLUGIN_PROP_FILE_PATH, 0, bundle_path.into(), WriteOrigin::Host);

        Self {
            properties,
            clip_order: Vec::new(),
            clips: HashMap::new(),
            params: ParamSetDescriptor::new(),
        }
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Declares a new clip (`Descriptor::defineClip`).
    pub fn define_clip(&mut self, name: impl Into<String>) -> &mut ClipDescriptor {
        let name = name.into();
        self.clip_order.push(name.clone());
        self.clips.entry(name.clone()).or_insert_with(|| ClipDescriptor::new(name.clone()));
        self.clips.get_mut(&name).expect("just inserted")
    }

    #[must_use]
    pub fn clips(&self) -> &HashMap<String, ClipDescriptor> {
        &self.clips
    }

    /// Clips in declaration order (`Descriptor::getClipsByOrder`).
    #[must_use]
    pub fn clips_by_order(&self) -> &[String] {
        &self.clip_order
    }

    #[must_use]
    pub fn params(&self) -> &ParamSetDescriptor {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSetDescriptor {
        &mut self.params
    }

    /// `Base::isContextSupported` (`findStringPropValueIndex` over
    /// `supported-contexts`).
    #[must_use]
    pub fn is_context_supported(&mut self, context: &str) -> bool {
        contains_string_value(&mut self.properties, OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, context)
    }

    #[must_use]
    pub fn is_clip_preferences_slave_param(&mut self, name: &str) -> bool {
        contains_string_value(&mut self.properties, OFX_IMAGE_EFFECT_PROP_CLIP_PREFERENCES_SLAVE_PARAM, name)
    }

    /// The plug-in's overlay entry point, if it declared one
    /// (`Base::getOverlayInteractMainEntry`), still as a raw pointer — the
    /// instance is the one that casts and calls it.
    pub fn overlay_interact_entry(&mut self) -> Option<*mut std::ffi::c_void> {
        self.properties
            .get_pointer(OFX_IMAGE_EFFECT_PLUGIN_PROP_OVERLAY_INTERACT_V1, 0)
            .ok()
            .filter(|ptr| !ptr.is_null())
    }
}

fn contains_string_value(properties: &mut PropertySet, name: &str, value: &str) -> bool {
    let dim = properties.dimension(name).unwrap_or(0);
    (0..dim).any(|i| properties.get_string(name, i).as_deref() == Ok(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_effect_descriptor_stuffs() {
        let mut d = ImageEffectDescriptor::new("/plugins/blur.ofx.bundle");
        assert_eq!(
            d.properties_mut().get_string(OFX_IMAGE_EFFECT_PLUGIN_RENDER_THREAD_SAFETY, 0).unwrap(),
            DEFAULT_RENDER_THREAD_SAFETY
        );
        assert_eq!(d.properties_mut().get_int(OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES, 0).unwrap(), 1);
        assert_eq!(
            d.properties_mut().get_string(OFX_PLUGIN_PROP_FILE_PATH, 0).unwrap(),
            "/plugins/blur.ofx.bundle"
        );
    }

    #[test]
    fn defines_clips_in_declaration_order() {
        let mut d = ImageEffectDescriptor::new("/plugins/blur.ofx.bundle");
        d.define_clip("Source");
        d.define_clip("Output");
        assert_eq!(d.clips_by_order(), ["Source", "Output"]);
        assert_eq!(d.clips().len(), 2);
    }

    #[test]
    fn context_support_checked_against_declared_list() {
        let mut d = ImageEffectDescriptor::new("/plugins/blur.ofx.bundle");
        d.properties_mut().define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, PropType::String, 1);
        d.properties_mut()
            .set_string(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, 0, OFX_IMAGE_EFFECT_CONTEXT_FILTER, WriteOrigin::Host)
            .unwrap();
        assert!(d.is_context_supported(OFX_IMAGE_EFFECT_CONTEXT_FILTER));
        assert!(!d.is_context_supported(OFX_IMAGE_EFFECT_CONTEXT_GENERATOR));
    }
}
