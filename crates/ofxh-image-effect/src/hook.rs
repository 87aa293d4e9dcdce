use std::sync::Weak;

use ofxh_abi::properties::{
    OFX_IMAGE_EFFECT_INSTANCE_PROP_EFFECT_DURATION, OFX_IMAGE_EFFECT_PROP_FRAME_RATE,
    OFX_IMAGE_EFFECT_PROP_PROJECT_EXTENT, OFX_IMAGE_EFFECT_PROP_PROJECT_OFFSET,
    OFX_IMAGE_EFFECT_PROP_PROJECT_PIXEL_ASPECT_RATIO, OFX_IMAGE_EFFECT_PROP_PROJECT_SIZE,
};
use ofxh_property::{GetHook, PropertyError};

use crate::callbacks::EffectCallbacks;

/// Installed on the six virtual double properties of `effectInstanceStuff`
/// (`ofxhImageEffect.cpp::Instance::getDoubleProperty`/`getDoublePropertyN`).
/// Everything else on the instance is plain host-writable state, copied from
/// the descriptor or set once at construction.
pub struct EffectGetHook {
    callbacks: Weak<dyn EffectCallbacks>,
}

impl EffectGetHook {
    #[must_use]
    pub fn new(callbacks: Weak<dyn EffectCallbacks>) -> Self {
        Self { callbacks }
    }

    fn callbacks(&self) -> Result<std::sync::Arc<dyn EffectCallbacks>, PropertyError> {
        self.callbacks
            .upgrade()
            .ok_or_else(|| PropertyError::Unknown("<effect callbacks dropped>".to_string()))
    }
}

impl GetHook for EffectGetHook {
    fn dimension(&self, name: &str) -> Result<usize, PropertyError> {
        match name {
            OFX_IMAGE_EFFECT_PROP_PROJECT_SIZE | OFX_IMAGE_EFFECT_PROP_PROJECT_OFFSET | OFX_IMAGE_EFFECT_PROP_PROJECT_EXTENT => Ok(2),
            OFX_IMAGE_EFFECT_PROP_PROJECT_PIXEL_ASPECT_RATIO
            | OFX_IMAGE_EFFECT_INSTANCE_PROP_EFFECT_DURATION
            | OFX_IMAGE_EFFECT_PROP_FRAME_RATE => Ok(1),
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    fn get_int(&self, name: &str, _index: usize) -> Result<i32, PropertyError> {
        Err(PropertyError::Unknown(name.to_string()))
    }

    fn get_double(&self, name: &str, index: usize) -> Result<f64, PropertyError> {
        let cb = self.callbacks()?;
        match name {
            OFX_IMAGE_EFFECT_PROP_PROJECT_SIZE if index < 2 => {
                let (w, h) = cb.project_size();
                Ok(if index == 0 { w } else { h })
            }
            OFX_IMAGE_EFFECT_PROP_PROJECT_OFFSET if index < 2 => {
                let (x, y) = cb.project_offset();
                Ok(if index == 0 { x } else { y })
            }
            OFX_IMAGE_EFFECT_PROP_PROJECT_EXTENT if index < 2 => {
                let (w, h) = cb.project_extent();
                Ok(if index == 0 { w } else { h })
            }
            OFX_IMAGE_EFFECT_PROP_PROJECT_PIXEL_ASPECT_RATIO if index < 1 => Ok(cb.project_pixel_aspect_ratio()),
            OFX_IMAGE_EFFECT_INSTANCE_PROP_EFFECT_DURATION if index < 1 => Ok(cb.effect_duration()),
            OFX_IMAGE_EFFECT_PROP_FRAME_RATE if index < 1 => Ok(cb.frame_rate()),
            OFX_IMAGE_EFFECT_PROP_PROJECT_SIZE
            | OFX_IMAGE_EFFECT_PROP_PROJECT_OFFSET
            | OFX_IMAGE_EFFECT_PROP_PROJECT_EXTENT
            | OFX_IMAGE_EFFECT_PROP_PROJECT_PIXEL_ASPECT_RATIO
            | OFX_IMAGE_EFFECT_INSTANCE_PROP_EFFECT_DURATION
            | OFX_IMAGE_EFFECT_PROP_FRAME_RATE => {
                Err(PropertyError::BadIndex { name: name.to_string(), index, dimension: self.dimension(name)? })
            }
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    fn get_string(&self, name: &str, _index: usize) -> Result<String, PropertyError> {
        Err(PropertyError::Unknown(name.to_string()))
    }

    fn get_pointer(&self, name: &str, _index: usize) -> Result<*mut std::ffi::c_void, PropertyError> {
        Err(PropertyError::Unknown(name.to_string()))
    }
}
