use std::sync::Weak;

use ofxh_abi::properties::*;
use ofxh_property::{GetHook, PropertyError};

use crate::callbacks::ClipCallbacks;

/// Installed as the get hook on every instance-only clip property
/// (`clipInstanceStuffs`), routing each read to the matching
/// [`ClipCallbacks`] method (`ofxhClip.cpp::Instance::getDoubleProperty` and
/// siblings). A dropped callbacks object answers every read with
/// `ErrBadHandle`, mirroring an unconnected/torn-down clip.
pub struct ClipGetHook {
    callbacks: Weak<dyn ClipCallbacks>,
}

impl ClipGetHook {
    #[must_use]
    pub fn new(callbacks: Weak<dyn ClipCallbacks>) -> Self {
        Self { callbacks }
    }

    fn callbacks(&self) -> Result<std::sync::Arc<dyn ClipCallbacks>, PropertyError> {
        self.callbacks
            .upgrade()
            .ok_or_else(|| PropertyError::Unknown("<clip callbacks dropped>".to_string()))
    }
}

impl GetHook for ClipGetHook {
    fn dimension(&self, name: &str) -> Result<usize, PropertyError> {
        match name {
            OFX_IMAGE_EFFECT_PROP_FRAME_RANGE | OFX_IMAGE_EFFECT_PROP_UNMAPPED_FRAME_RANGE => Ok(2),
            _ => Ok(1),
        }
    }

    fn get_int(&self, name: &str, index: usize) -> Result<i32, PropertyError> {
        if index != 0 {
            return Err(PropertyError::BadIndex { name: name.to_string(), index, dimension: 1 });
        }
        let cb = self.callbacks()?;
        match name {
            OFX_IMAGE_CLIP_PROP_CONNECTED => Ok(i32::from(cb.connected())),
            OFX_IMAGE_CLIP_PROP_CONTINUOUS_SAMPLES => Ok(i32::from(cb.continuous_samples())),
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    fn get_double(&self, name: &str, index: usize) -> Result<f64, PropertyError> {
        let cb = self.callbacks()?;
        match name {
            OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO if index == 0 => Ok(cb.aspect_ratio()),
            OFX_IMAGE_EFFECT_PROP_FRAME_RATE if index == 0 => Ok(cb.frame_rate()),
            OFX_IMAGE_EFFECT_PROP_FRAME_RANGE if index < 2 => {
                let (start, end) = cb.frame_range();
                Ok(if index == 0 { start } else { end })
            }
            OFX_IMAGE_EFFECT_PROP_UNMAPPED_FRAME_RATE if index == 0 => Ok(cb.unmapped_frame_rate()),
            OFX_IMAGE_EFFECT_PROP_UNMAPPED_FRAME_RANGE if index < 2 => {
                let (start, end) = cb.unmapped_frame_range();
                Ok(if index == 0 { start } else { end })
            }
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    fn get_string(&self, name: &str, index: usize) -> Result<String, PropertyError> {
        if index != 0 {
            return Err(PropertyError::BadIndex { name: name.to_string(), index, dimension: 1 });
        }
        let cb = self.callbacks()?;
        match name {
            OFX_IMAGE_EFFECT_PROP_PIXEL_DEPTH => Ok(cb.pixel_depth()),
            OFX_IMAGE_EFFECT_PROP_COMPONENTS => Ok(cb.components()),
            OFX_IMAGE_CLIP_PROP_UNMAPPED_PIXEL_DEPTH => Ok(cb.unmapped_bit_depth()),
            OFX_IMAGE_CLIP_PROP_UNMAPPED_COMPONENTS => Ok(cb.unmapped_components()),
            OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION => Ok(cb.premult()),
            OFX_IMAGE_CLIP_PROP_FIELD_ORDER => Ok(cb.field_order()),
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    fn get_pointer(&self, name: &str, _index: usize) -> Result<*mut std::ffi::c_void, PropertyError> {
        Err(PropertyError::Unknown(name.to_string()))
    }
}
