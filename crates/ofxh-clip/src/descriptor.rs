use ofxh_abi::properties::*;
use ofxh_property::{PropStorage, PropType, PropertySet, WriteOrigin};

/// A plugin-declared clip, built from `clipDescriptorStuffs`
/// (`ofxhClip.cpp`).
pub struct ClipDescriptor {
    properties: PropertySet,
}

const CLIP_TYPE: &str = "OfxTypeClip";

impl ClipDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut properties = PropertySet::new("clipDescriptor", false);

        properties.define_with_default(
            OFX_PROP_TYPE,
            1,
            PropStorage::String(vec![CLIP_TYPE.to_string()]),
        );
        properties.define(OFX_PROP_NAME, PropType::String, 1);
        let _ = properties.set_string(OFX_PROP_NAME, 0, name, WriteOrigin::Host);
        properties.define_with_default(
            OFX_PROP_LABEL,
            1,
            PropStorage::String(vec!["clip".to_string()]),
        );
        properties.define_with_default(
            OFX_PROP_SHORT_LABEL,
            1,
            PropStorage::String(vec!["clip".to_string()]),
        );
        properties.define_with_default(
            OFX_PROP_LONG_LABEL,
            1,
            PropStorage::String(vec!["clip".to_string()]),
        );
        properties.define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_COMPONENTS, PropType::String, 0);
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PROP_TEMPORAL_CLIP_ACCESS,
            1,
            PropStorage::Int(vec![0]),
        );
        properties.define_with_default(OFX_IMAGE_CLIP_PROP_OPTIONAL, 1, PropStorage::Int(vec![0]));
        properties.define_with_default(OFX_IMAGE_CLIP_PROP_IS_MASK, 1, PropStorage::Int(vec![0]));
        properties.define_with_default(
            OFX_IMAGE_CLIP_PROP_FIELD_EXTRACTION,
            1,
            PropStorage::String(vec!["OfxImageFieldDoubled".to_string()]),
        );
        properties.define_with_default(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES_CLIP,
            1,
            PropStorage::Int(vec![1]),
        );

        Self { properties }
    }

    #[must_use]
    pub fn name(&mut self) -> String {
        self.properties
            .get_string(OFX_PROP_NAME, 0)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_carries_its_own_name() {
        let mut d = ClipDescriptor::new("Source");
        assert_eq!(d.name(), "Source");
    }

    #[test]
    fn defaults_match_the_original_clip_descriptor_stuffs() {
        let mut d = ClipDescriptor::new("Source");
        assert_eq!(
            d.properties_mut().get_int(OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES_CLIP, 0).unwrap(),
            1
        );
        assert_eq!(
            d.properties_mut().get_int(OFX_IMAGE_CLIP_PROP_IS_MASK, 0).unwrap(),
            0
        );
    }
}
