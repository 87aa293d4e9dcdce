use std::cell::Cell;

use ofxh_abi::properties::*;
use ofxh_property::{PropStorage, PropType, PropertySet, WriteOrigin};

use crate::instance::ClipInstance;

/// A rendered image handed across the render suite (`ofxhClip.h::Image`).
/// Seeded at construction from its clip's *current* preferences (pixel
/// depth, components, premultiplication, pixel aspect ratio), then filled
/// in with the caller's explicit bounds/RoD/row-bytes/field/identifier/data.
pub struct Image {
    properties: PropertySet,
    reference_count: Cell<i32>,
}

const IMAGE_TYPE: &str = "OfxTypeImage";

impl Image {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        clip: &mut ClipInstance,
        render_scale_x: f64,
        render_scale_y: f64,
        data: *mut std::ffi::c_void,
        bounds: (i32, i32, i32, i32),
        region_of_definition: (i32, i32, i32, i32),
        row_bytes: i32,
        field: impl Into<String>,
        unique_identifier: impl Into<String>,
    ) -> Self {
        let mut properties = PropertySet::new("image", false);

        properties.define_with_default(
            OFX_PROP_TYPE,
            1,
            PropStorage::String(vec![IMAGE_TYPE.to_string()]),
        );
        properties.define(OFX_IMAGE_EFFECT_PROP_PIXEL_DEPTH, PropType::String, 1);
        properties.define(OFX_IMAGE_EFFECT_PROP_COMPONENTS, PropType::String, 1);
        properties.define(OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION, PropType::String, 1);
        properties.define(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, PropType::Double, 2);
        properties.define(OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, PropType::Double, 1);
        properties.define(OFX_IMAGE_PROP_DATA, PropType::Pointer, 1);
        properties.define(OFX_IMAGE_PROP_BOUNDS, PropType::Int, 4);
        properties.define(OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION, PropType::Int, 4);
        properties.define(OFX_IMAGE_PROP_ROW_BYTES, PropType::Int, 1);
        properties.define(OFX_IMAGE_PROP_FIELD, PropType::String, 1);
        properties.define(OFX_IMAGE_PROP_UNIQUE_IDENTIFIER, PropType::String, 1);

        seed_from_clip(&mut properties, clip);

        let _ = properties.set_double(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, 0, render_scale_x, WriteOrigin::Host);
        let _ = properties.set_double(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, 1, render_scale_y, WriteOrigin::Host);
        let _ = properties.set_pointer(OFX_IMAGE_PROP_DATA, 0, data, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_PROP_BOUNDS, 0, bounds.0, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_PROP_BOUNDS, 1, bounds.1, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_PROP_BOUNDS, 2, bounds.2, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_PROP_BOUNDS, 3, bounds.3, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION, 0, region_of_definition.0, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION, 1, region_of_definition.1, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION, 2, region_of_definition.2, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION, 3, region_of_definition.3, WriteOrigin::Host);
        let _ = properties.set_int(OFX_IMAGE_PROP_ROW_BYTES, 0, row_bytes, WriteOrigin::Host);
        let _ = properties.set_string(OFX_IMAGE_PROP_FIELD, 0, field, WriteOrigin::Host);
        let _ = properties.set_string(OFX_IMAGE_PROP_UNIQUE_IDENTIFIER, 0, unique_identifier, WriteOrigin::Host);

        Self {
            properties,
            reference_count: Cell::new(1),
        }
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    pub fn add_reference(&self) {
        self.reference_count.set(self.reference_count.get() + 1);
    }

    /// Balances `add_reference`; returns `true` once the count has reached
    /// zero, signalling the caller (the owning registry) to drop this
    /// image (`Image::releaseReference`'s `delete this`).
    pub fn release_reference(&self) -> bool {
        let remaining = self.reference_count.get() - 1;
        self.reference_count.set(remaining);
        remaining <= 0
    }

    #[must_use]
    pub fn reference_count(&self) -> i32 {
        self.reference_count.get()
    }
}

fn seed_from_clip(properties: &mut PropertySet, clip: &mut ClipInstance) {
    let depth = clip.pixel_depth();
    let _ = properties.set_string(OFX_IMAGE_EFFECT_PROP_PIXEL_DEPTH, 0, depth, WriteOrigin::Host);
    let comps = clip.components();
    let _ = properties.set_string(OFX_IMAGE_EFFECT_PROP_COMPONENTS, 0, comps, WriteOrigin::Host);
    let premult = clip.premult();
    let _ = properties.set_string(OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION, 0, premult, WriteOrigin::Host);
    let par = clip.aspect_ratio();
    let _ = properties.set_double(OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, 0, par, WriteOrigin::Host);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ClipCallbacks;
    use crate::descriptor::ClipDescriptor;
    use ofxh_property::ChangeSink;
    use std::sync::{Arc, Weak};

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
            2.0
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
    fn image_inherits_pixel_aspect_ratio_from_clip() {
        let descriptor = ClipDescriptor::new("Source");
        let callbacks: Arc<dyn ClipCallbacks> = Arc::new(FixedCallbacks);
        let mut clip = ClipInstance::new(
            &descriptor,
            "Source",
            Arc::downgrade(&callbacks),
            Weak::<NullSink>::new(),
        );
        let mut image = Image::new(
            &mut clip,
            1.0,
            1.0,
            std::ptr::null_mut(),
            (0, 0, 1920, 1080),
            (0, 0, 1920, 1080),
            1920 * 4,
            "OfxImageFieldNone",
            "frame-1",
        );
        assert_eq!(image.properties_mut().get_double(OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, 0).unwrap(), 2.0);
    }

    #[test]
    fn release_reference_reaches_zero_after_matching_adds() {
        let descriptor = ClipDescriptor::new("Source");
        let callbacks: Arc<dyn ClipCallbacks> = Arc::new(FixedCallbacks);
        let mut clip = ClipInstance::new(
            &descriptor,
            "Source",
            Arc::downgrade(&callbacks),
            Weak::<NullSink>::new(),
        );
        let image = Image::new(
            &mut clip,
            1.0,
            1.0,
            std::ptr::null_mut(),
            (0, 0, 1, 1),
            (0, 0, 1, 1),
            4,
            "OfxImageFieldNone",
            "frame-1",
        );
        image.add_reference();
        assert!(!image.release_reference());
        assert!(image.release_reference());
    }
}
