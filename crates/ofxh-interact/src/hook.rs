use std::sync::Weak;

use ofxh_abi::properties::{OFX_INTERACT_PROP_BACKGROUND_COLOUR, OFX_INTERACT_PROP_PIXEL_SCALE, OFX_INTERACT_PROP_VIEWPORT_SIZE};
use ofxh_property::{GetHook, PropertyError};

use crate::callbacks::InteractCallbacks;

/// Installed as the get hook on the three live interact properties
/// (`ofxhInteract.cpp::Instance::getDoubleProperty`). These are the only
/// properties the original marks with a get hook; everything else on the
/// instance is plain host-writable state.
pub struct InteractGetHook {
    callbacks: Weak<dyn InteractCallbacks>,
}

impl InteractGetHook {
    #[must_use]
    pub fn new(callbacks: Weak<dyn InteractCallbacks>) -> Self {
        Self { callbacks }
    }

    fn callbacks(&self) -> Result<std::sync::Arc<dyn InteractCallbacks>, PropertyError> {
        self.callbacks
            .upgrade()
            .ok_or_else(|| PropertyError::Unknown("<interact callbacks dropped>".to_string()))
    }
}

impl GetHook for InteractGetHook {
    fn dimension(&self, name: &str) -> Result<usize, PropertyError> {
        match name {
            OFX_INTERACT_PROP_BACKGROUND_COLOUR => Ok(3),
            OFX_INTERACT_PROP_PIXEL_SCALE | OFX_INTERACT_PROP_VIEWPORT_SIZE => Ok(2),
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    fn get_int(&self, name: &str, _index: usize) -> Result<i32, PropertyError> {
        Err(PropertyError::Unknown(name.to_string()))
    }

    fn get_double(&self, name: &str, index: usize) -> Result<f64, PropertyError> {
        let cb = self.callbacks()?;
        match name {
            OFX_INTERACT_PROP_PIXEL_SCALE if index < 2 => {
                let (x, y) = cb.pixel_scale();
                Ok(if index == 0 { x } else { y })
            }
            OFX_INTERACT_PROP_BACKGROUND_COLOUR if index < 3 => {
                let (r, g, b) = cb.background_colour();
                Ok(match index {
                    0 => r,
                    1 => g,
                    _ => b,
                })
            }
            OFX_INTERACT_PROP_VIEWPORT_SIZE if index < 2 => {
                let (w, h) = cb.viewport_size();
                Ok(if index == 0 { w } else { h })
            }
            OFX_INTERACT_PROP_PIXEL_SCALE | OFX_INTERACT_PROP_BACKGROUND_COLOUR | OFX_INTERACT_PROP_VIEWPORT_SIZE => {
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
