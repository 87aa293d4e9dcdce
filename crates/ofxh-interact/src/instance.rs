use std::sync::{Arc, Weak};

use ofxh_abi::actions::{
    OFX_INTERACT_ACTION_DRAW, OFX_INTERACT_ACTION_GAIN_FOCUS, OFX_INTERACT_ACTION_KEY_DOWN, OFX_INTERACT_ACTION_KEY_REPEAT,
    OFX_INTERACT_ACTION_KEY_UP, OFX_INTERACT_ACTION_LOSE_FOCUS, OFX_INTERACT_ACTION_PEN_DOWN, OFX_INTERACT_ACTION_PEN_MOTION,
    OFX_INTERACT_ACTION_PEN_UP,
};
use ofxh_abi::properties::{
    OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, OFX_INTERACT_PROP_BACKGROUND_COLOUR, OFX_INTERACT_PROP_PEN_POSITION,
    OFX_INTERACT_PROP_PEN_PRESSURE, OFX_INTERACT_PROP_PIXEL_SCALE, OFX_INTERACT_PROP_SLAVE_TO_PARAM, OFX_INTERACT_PROP_VIEWPORT_SIZE,
    OFX_PROP_KEY_STRING, OFX_PROP_KEY_SYM, OFX_PROP_TIME,
};
use ofxh_abi::OfxStatus;
use ofxh_property::{PropType, PropertySet, WriteOrigin};

use crate::callbacks::InteractCallbacks;
use crate::descriptor::InteractDescriptor;
use crate::dispatch::OverlayDispatch;
use crate::error::InteractError;
use crate::hook::InteractGetHook;

/// An overlay attached to one effect instance (`ofxhInteract.h::Instance`).
/// `pixel_scale`/`background_colour`/`viewport_size` are served live by
/// `callbacks` through an [`InteractGetHook`]; everything else
/// (`slave_to_param`, `time`, render scale) is plain host-writable state.
/// Every action method rebuilds the argument set and hands it to
/// `dispatch`, mirroring `initArgProp` + `_effect.overlayEntry`.
pub struct InteractInstance {
    properties: PropertySet,
    arg_properties: PropertySet,
    callbacks: Weak<dyn InteractCallbacks>,
    dispatch: Weak<dyn OverlayDispatch>,
}

impl InteractInstance {
    #[must_use]
    pub fn new(descriptor: &InteractDescriptor, callbacks: Weak<dyn InteractCallbacks>, dispatch: Weak<dyn OverlayDispatch>) -> Self {
        let mut properties = descriptor.properties().copy_for("interactInstance", false);
        let hook: Arc<InteractGetHook> = Arc::new(InteractGetHook::new(callbacks.clone()));

        properties.define(OFX_INTERACT_PROP_PIXEL_SCALE, PropType::Double, 2);
        let _ = properties.set_get_hook(OFX_INTERACT_PROP_PIXEL_SCALE, hook.clone());
        properties.define(OFX_INTERACT_PROP_BACKGROUND_COLOUR, PropType::Double, 3);
        let _ = properties.set_get_hook(OFX_INTERACT_PROP_BACKGROUND_COLOUR, hook.clone());
        properties.define(OFX_INTERACT_PROP_VIEWPORT_SIZE, PropType::Double, 2);
        let _ = properties.set_get_hook(OFX_INTERACT_PROP_VIEWPORT_SIZE, hook);

        properties.define(OFX_INTERACT_PROP_SLAVE_TO_PARAM, PropType::String, 0);
        properties.define(OFX_PROP_TIME, PropType::Double, 1);
        properties.define(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, PropType::Double, 2);

        let mut arg_properties = PropertySet::new("interactArgs", false);
        arg_properties.define(OFX_PROP_TIME, PropType::Double, 1);
        arg_properties.define(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, PropType::Double, 2);
        arg_properties.define(OFX_INTERACT_PROP_PEN_POSITION, PropType::Double, 2);
        arg_properties.define(OFX_INTERACT_PROP_PEN_PRESSURE, PropType::Double, 1);
        arg_properties.define(OFX_PROP_KEY_STRING, PropType::String, 1);
        arg_properties.define(OFX_PROP_KEY_SYM, PropType::Int, 1);

        Self { properties, arg_properties, callbacks, dispatch }
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Parameters this overlay reads and should be redrawn for when their
    /// value changes (`getSlaveToParam`, driven from the plain
    /// `kOfxInteractPropSlaveToParam` property rather than a get hook).
    pub fn slave_to_param(&mut self) -> Vec<String> {
        let dim = self.properties.dimension(OFX_INTERACT_PROP_SLAVE_TO_PARAM).unwrap_or(0);
        (0..dim).filter_map(|i| self.properties.get_string(OFX_INTERACT_PROP_SLAVE_TO_PARAM, i).ok()).collect()
    }

    /// Dimension of one of the three live double properties; every other
    /// name is unwritable (`Instance::getDimension`'s real branching, as
    /// implemented, not its header default).
    pub fn dimension(&self, name: &str) -> Result<usize, InteractError> {
        match name {
            OFX_INTERACT_PROP_PIXEL_SCALE | OFX_INTERACT_PROP_VIEWPORT_SIZE => Ok(2),
            OFX_INTERACT_PROP_BACKGROUND_COLOUR => Ok(3),
            _ => Err(InteractError::Unknown(name.to_string())),
        }
    }

    /// No interact property accepts a plug-in-side write
    /// (`Instance::setProperty`/`setPropertyN`/`reset`, all `ErrMissingHostFeature`).
    pub fn set_property(&mut self, _name: &str, _value: f64, _index: usize) -> Result<(), InteractError> {
        Err(InteractError::Unsupported)
    }

    pub fn reset(&mut self, _name: &str) -> Result<(), InteractError> {
        Err(InteractError::Unsupported)
    }

    fn init_arg_props(&mut self, time: f64, render_scale_x: f64, render_scale_y: f64) {
        let _ = self.arg_properties.set_double(OFX_PROP_TIME, 0, time, WriteOrigin::Host);
        let _ = self.arg_properties.set_double(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, 0, render_scale_x, WriteOrigin::Host);
        let _ = self.arg_properties.set_double(OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, 1, render_scale_y, WriteOrigin::Host);
    }

    fn set_pen_arg_props(&mut self, pen_x: f64, pen_y: f64, pressure: f64) {
        let _ = self.arg_properties.set_double(OFX_INTERACT_PROP_PEN_POSITION, 0, pen_x, WriteOrigin::Host);
        let _ = self.arg_properties.set_double(OFX_INTERACT_PROP_PEN_POSITION, 1, pen_y, WriteOrigin::Host);
        let _ = self.arg_properties.set_double(OFX_INTERACT_PROP_PEN_PRESSURE, 0, pressure, WriteOrigin::Host);
    }

    fn set_key_arg_props(&mut self, key: i32, key_string: &str) {
        let _ = self.arg_properties.set_int(OFX_PROP_KEY_SYM, 0, key, WriteOrigin::Host);
        let _ = self.arg_properties.set_string(OFX_PROP_KEY_STRING, 0, key_string.to_string(), WriteOrigin::Host);
    }

    fn dispatch(&self, action: &str) -> OfxStatus {
        match self.dispatch.upgrade() {
            Some(dispatch) => dispatch.overlay_entry(action, &self.arg_properties),
            None => OfxStatus::Failed,
        }
    }

    pub fn draw_action(&mut self, time: f64, render_scale_x: f64, render_scale_y: f64) -> OfxStatus {
        self.init_arg_props(time, render_scale_x, render_scale_y);
        self.dispatch(OFX_INTERACT_ACTION_DRAW)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pen_motion_action(&mut self, time: f64, rsx: f64, rsy: f64, pen_x: f64, pen_y: f64, pressure: f64) -> OfxStatus {
        self.init_arg_props(time, rsx, rsy);
        self.set_pen_arg_props(pen_x, pen_y, pressure);
        self.dispatch(OFX_INTERACT_ACTION_PEN_MOTION)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pen_down_action(&mut self, time: f64, rsx: f64, rsy: f64, pen_x: f64, pen_y: f64, pressure: f64) -> OfxStatus {
        self.init_arg_props(time, rsx, rsy);
        self.set_pen_arg_props(pen_x, pen_y, pressure);
        self.dispatch(OFX_INTERACT_ACTION_PEN_DOWN)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pen_up_action(&mut self, time: f64, rsx: f64, rsy: f64, pen_x: f64, pen_y: f64, pressure: f64) -> OfxStatus {
        self.init_arg_props(time, rsx, rsy);
        self.set_pen_arg_props(pen_x, pen_y, pressure);
        self.dispatch(OFX_INTERACT_ACTION_PEN_UP)
    }

    pub fn key_down_action(&mut self, time: f64, rsx: f64, rsy: f64, key: i32, key_string: &str) -> OfxStatus {
        self.init_arg_props(time, rsx, rsy);
        self.set_key_arg_props(key, key_string);
        self.dispatch(OFX_INTERACT_ACTION_KEY_DOWN)
    }

    pub fn key_up_action(&mut self, time: f64, rsx: f64, rsy: f64, key: i32, key_string: &str) -> OfxStatus {
        self.init_arg_props(time, rsx, rsy);
        self.set_key_arg_props(key, key_string);
        self.dispatch(OFX_INTERACT_ACTION_KEY_UP)
    }

    pub fn key_repeat_action(&mut self, time: f64, rsx: f64, rsy: f64, key: i32, key_string: &str) -> OfxStatus {
        self.init_arg_props(time, rsx, rsy);
        self.set_key_arg_props(key, key_string);
        self.dispatch(OFX_INTERACT_ACTION_KEY_REPEAT)
    }

    pub fn gain_focus_action(&mut self, time: f64, render_scale_x: f64, render_scale_y: f64) -> OfxStatus {
        self.init_arg_props(time, render_scale_x, render_scale_y);
        self.dispatch(OFX_INTERACT_ACTION_GAIN_FOCUS)
    }

    pub fn lose_focus_action(&mut self, time: f64, render_scale_x: f64, render_scale_y: f64) -> OfxStatus {
        self.init_arg_props(time, render_scale_x, render_scale_y);
        self.dispatch(OFX_INTERACT_ACTION_LOSE_FOCUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Mutex;

    struct FixedCallbacks;
    impl InteractCallbacks for FixedCallbacks {
        fn viewport_size(&self) -> (f64, f64) {
            (1920.0, 1080.0)
        }
        fn pixel_scale(&self) -> (f64, f64) {
            (1.0, 1.0)
        }
        fn background_colour(&self) -> (f64, f64, f64) {
            (0.2, 0.2, 0.2)
        }
        fn swap_buffers(&self) -> OfxStatus {
            OfxStatus::Ok
        }
        fn redraw(&self) -> OfxStatus {
            OfxStatus::Ok
        }
    }

    struct RecordingDispatch {
        calls: Mutex<RefCell<Vec<String>>>,
    }
    impl RecordingDispatch {
        fn new() -> Self {
            Self { calls: Mutex::new(RefCell::new(Vec::new())) }
        }
    }
    impl OverlayDispatch for RecordingDispatch {
        fn overlay_entry(&self, action: &str, _in_args: &PropertySet) -> OfxStatus {
            self.calls.lock().unwrap().borrow_mut().push(action.to_string());
            OfxStatus::Ok
        }
    }

    #[test]
    fn viewport_size_routes_through_callbacks() {
        let descriptor = InteractDescriptor::new();
        let callbacks: Arc<dyn InteractCallbacks> = Arc::new(FixedCallbacks);
        let dispatch: Arc<dyn OverlayDispatch> = Arc::new(RecordingDispatch::new());
        let mut instance = InteractInstance::new(&descriptor, Arc::downgrade(&callbacks), Arc::downgrade(&dispatch));
        assert_eq!(instance.properties_mut().get_double(OFX_INTERACT_PROP_VIEWPORT_SIZE, 0).unwrap(), 1920.0);
        assert_eq!(instance.properties_mut().get_double(OFX_INTERACT_PROP_VIEWPORT_SIZE, 1).unwrap(), 1080.0);
    }

    #[test]
    fn draw_action_dispatches_to_the_owning_effect() {
        let descriptor = InteractDescriptor::new();
        let callbacks: Arc<dyn InteractCallbacks> = Arc::new(FixedCallbacks);
        let dispatch = Arc::new(RecordingDispatch::new());
        let dyn_dispatch: Arc<dyn OverlayDispatch> = dispatch.clone();
        let mut instance = InteractInstance::new(&descriptor, Arc::downgrade(&callbacks), Arc::downgrade(&dyn_dispatch));
        let status = instance.draw_action(1.0, 1.0, 1.0);
        assert_eq!(status, OfxStatus::Ok);
        assert_eq!(dispatch.calls.lock().unwrap().borrow().as_slice(), [OFX_INTERACT_ACTION_DRAW.to_string()]);
    }

    #[test]
    fn set_property_is_unsupported() {
        let descriptor = InteractDescriptor::new();
        let callbacks: Arc<dyn InteractCallbacks> = Arc::new(FixedCallbacks);
        let dispatch: Arc<dyn OverlayDispatch> = Arc::new(RecordingDispatch::new());
        let mut instance = InteractInstance::new(&descriptor, Arc::downgrade(&callbacks), Arc::downgrade(&dispatch));
        assert!(matches!(instance.set_property(OFX_INTERACT_PROP_PIXEL_SCALE, 1.0, 0), Err(InteractError::Unsupported)));
    }

    #[test]
    fn dimension_rejects_unknown_names() {
        let descriptor = InteractDescriptor::new();
        let callbacks: Arc<dyn InteractCallbacks> = Arc::new(FixedCallbacks);
        let dispatch: Arc<dyn OverlayDispatch> = Arc::new(RecordingDispatch::new());
        let instance = InteractInstance::new(&descriptor, Arc::downgrade(&callbacks), Arc::downgrade(&dispatch));
        assert!(matches!(instance.dimension("bogus"), Err(InteractError::Unknown(_))));
        assert_eq!(instance.dimension(OFX_INTERACT_PROP_BACKGROUND_COLOUR).unwrap(), 3);
    }
}
