use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use once_cell::sync::Lazy;

use ofxh_abi::actions::*;
use ofxh_abi::properties::*;
use ofxh_abi::{OfxImageEffectHandle, OfxStatus};
use ofxh_clip::{ClipCallbacks, ClipInstance};
use ofxh_interact::OverlayDispatch;
use ofxh_param::ParamSetInstance;
use ofxh_property::handle::HandleManager;
use ofxh_property::{ChangeSink, HandleError, PropType, PropertySet, WriteOrigin};

use crate::callbacks::EffectCallbacks;
use crate::descriptor::ImageEffectDescriptor;
use crate::dispatch::{self, MainEntryFn};
use crate::error::EffectError;
use crate::hook::EffectGetHook;

static IMAGE_EFFECT_HANDLES: Lazy<HandleManager<ImageEffectInstance>> = Lazy::new(HandleManager::new);

const TYPE_PARAMETER: &str = "OfxTypeParameter";
const TYPE_CLIP: &str = "OfxTypeClip";
const CHANGE_REASON_PLUGIN_EDITED: &str = "OfxChangePluginEdited";
const CLIP_PROP_ROI_PREFIX: &str = "OfxImageClipPropRoI_";
const CLIP_PROP_FRAME_RANGE_PREFIX: &str = "OfxImageClipPropFrameRange_";
const CLIP_PROP_COMPONENTS_PREFIX: &str = "OfxImageClipPropComponents_";
const CLIP_PROP_DEPTH_PREFIX: &str = "OfxImageClipPropDepth_";
const CLIP_PROP_PAR_PREFIX: &str = "OfxImageClipPropPAR_";

/// What a plug-in reported from `kOfxImageEffectActionGetClipPreferences`,
/// per clip plus the handful of effect-wide fields in the same action.
#[derive(Debug, Clone, Default)]
pub struct ClipPreferences {
    pub components: HashMap<String, String>,
    pub depth: HashMap<String, String>,
    pub pixel_aspect_ratio: HashMap<String, f64>,
    pub frame_rate: f64,
    pub output_pixel_aspect_ratio: f64,
    pub pre_multiplication: String,
    pub continuous_samples: bool,
    pub frame_varying: bool,
}

/// An effect the host has instantiated (`ofxhImageEffect.h::Instance`).
/// Owns its clips and parameters, holds a resolved `mainEntry` to call back
/// into the plug-in, and funnels every action through [`dispatch::call_action`].
pub struct ImageEffectInstance {
    self_handle: OfxImageEffectHandle,
    main_entry: MainEntryFn,
    overlay_entry: Option<MainEntryFn>,
    context: String,
    properties: PropertySet,
    clip_order: Vec<String>,
    clips: HashMap<String, ClipInstance>,
    params: ParamSetInstance,
    callbacks: Weak<dyn EffectCallbacks>,
    self_ref: Arc<EffectHandle>,
    created: bool,
    destroyed: bool,
    rendering: bool,
}

/// Bridges the `&self`-only [`ChangeSink`]/[`OverlayDispatch`] capability
/// traits to the instance they act on, without the instance owning a
/// strong reference to itself (`EffectHandle` holds only a `Weak`).
struct EffectHandle(Weak<Mutex<ImageEffectInstance>>);

impl ChangeSink for EffectHandle {
    fn param_changed(&self, param_name: &str) {
        if let Some(arc) = self.0.upgrade() {
            let guard = arc.lock().expect("effect instance mutex poisoned");
            guard.param_instance_changed(param_name);
        }
    }

    fn clip_changed(&self, clip_name: &str) {
        if let Some(arc) = self.0.upgrade() {
            let guard = arc.lock().expect("effect instance mutex poisoned");
            guard.clip_instance_changed(clip_name);
        }
    }
}

impl OverlayDispatch for EffectHandle {
    fn overlay_entry(&self, action: &str, in_args: &PropertySet) -> OfxStatus {
        let Some(arc) = self.0.upgrade() else {
            return OfxStatus::Failed;
        };
        let guard = arc.lock().expect("effect instance mutex poisoned");
        guard.overlay_entry_raw(action, in_args)
    }
}

fn define_double1(props: &mut PropertySet, name: &str, value: f64) {
    props.define(name, PropType::Double, 1);
    let _ = props.set_double(name, 0, value, WriteOrigin::Host);
}

fn define_double2(props: &mut PropertySet, name: &str, value: (f64, f64)) {
    props.define(name, PropType::Double, 2);
    let _ = props.set_double(name, 0, value.0, WriteOrigin::Host);
    let _ = props.set_double(name, 1, value.1, WriteOrigin::Host);
}

fn define_double4(props: &mut PropertySet, name: &str, value: (f64, f64, f64, f64)) {
    props.define(name, PropType::Double, 4);
    let _ = props.set_double(name, 0, value.0, WriteOrigin::Host);
    let _ = props.set_double(name, 1, value.1, WriteOrigin::Host);
    let _ = props.set_double(name, 2, value.2, WriteOrigin::Host);
    let _ = props.set_double(name, 3, value.3, WriteOrigin::Host);
}

fn define_int1(props: &mut PropertySet, name: &str, value: i32) {
    props.define(name, PropType::Int, 1);
    let _ = props.set_int(name, 0, value, WriteOrigin::Host);
}

fn define_int4(props: &mut PropertySet, name: &str, value: (i32, i32, i32, i32)) {
    props.define(name, PropType::Int, 4);
    let _ = props.set_int(name, 0, value.0, WriteOrigin::Host);
    let _ = props.set_int(name, 1, value.1, WriteOrigin::Host);
    let _ = props.set_int(name, 2, value.2, WriteOrigin::Host);
    let _ = props.set_int(name, 3, value.3, WriteOrigin::Host);
}

fn define_string1(props: &mut PropertySet, name: &str, value: impl Into<String>) {
    props.define(name, PropType::String, 1);
    let _ = props.set_string(name, 0, value, WriteOrigin::Host);
}

fn read_double2(props: &mut PropertySet, name: &str) -> (f64, f64) {
    (props.get_double(name, 0).unwrap_or(0.0), props.get_double(name, 1).unwrap_or(0.0))
}

fn read_double4(props: &mut PropertySet, name: &str) -> (f64, f64, f64, f64) {
    (
        props.get_double(name, 0).unwrap_or(0.0),
        props.get_double(name, 1).unwrap_or(0.0),
        props.get_double(name, 2).unwrap_or(0.0),
        props.get_double(name, 3).unwrap_or(0.0),
    )
}

impl ImageEffectInstance {
    /// Builds and self-registers an instance for `context`
    /// (`ImageEffectPlugin::createInstance`). `clip_callbacks` must carry
    /// one entry per clip `descriptor` declared; a clip missing its
    /// callbacks is skipped with a warning rather than constructed half-built.
    #[must_use]
    pub fn new(
        descriptor: &mut ImageEffectDescriptor,
        main_entry: MainEntryFn,
        context: impl Into<String>,
        is_interactive: bool,
        callbacks: Weak<dyn EffectCallbacks>,
        clip_callbacks: HashMap<String, Weak<dyn ClipCallbacks>>,
    ) -> Arc<Mutex<Self>> {
        let context = context.into();
        let overlay_entry = descriptor
            .overlay_interact_entry()
            .map(|ptr| unsafe { std::mem::transmute::<*mut std::ffi::c_void, MainEntryFn>(ptr) });

        let mut properties = descriptor.properties().copy_for("imageEffectInstance", false);
        define_string1(&mut properties, OFX_PROP_TYPE, "OfxTypeImageEffectInstance");
        define_string1(&mut properties, OFX_IMAGE_EFFECT_PROP_CONTEXT, context.clone());
        properties.define(OFX_PROP_INSTANCE_DATA, PropType::Pointer, 1);
        define_int1(&mut properties, OFX_PROP_IS_INTERACTIVE, i32::from(is_interactive));
        define_int1(&mut properties, OFX_IMAGE_EFFECT_INSTANCE_PROP_SEQUENTIAL_RENDER, 0);

        let hook: Arc<EffectGetHook> = Arc::new(EffectGetHook::new(callbacks.clone()));
        for name in [
            OFX_IMAGE_EFFECT_PROP_PROJECT_SIZE,
            OFX_IMAGE_EFFECT_PROP_PROJECT_OFFSET,
            OFX_IMAGE_EFFECT_PROP_PROJECT_EXTENT,
        ] {
            properties.define(name, PropType::Double, 2);
            let _ = properties.set_get_hook(name, hook.clone());
        }
        for name in [
            OFX_IMAGE_EFFECT_PROP_PROJECT_PIXEL_ASPECT_RATIO,
            OFX_IMAGE_EFFECT_INSTANCE_PROP_EFFECT_DURATION,
            OFX_IMAGE_EFFECT_PROP_FRAME_RATE,
        ] {
            properties.define(name, PropType::Double, 1);
            let _ = properties.set_get_hook(name, hook.clone());
        }

        let instance = Self {
            self_handle: OfxImageEffectHandle::NULL,
            main_entry,
            overlay_entry,
            context,
            properties,
            clip_order: descriptor.clips_by_order().to_vec(),
            clips: HashMap::new(),
            params: ParamSetInstance::new(),
            callbacks,
            self_ref: Arc::new(EffectHandle(Weak::new())),
            created: false,
            destroyed: false,
            rendering: false,
        };

        let arc = Arc::new(Mutex::new(instance));
        let raw_handle = IMAGE_EFFECT_HANDLES.register(&arc);
        let self_ref = Arc::new(EffectHandle(Arc::downgrade(&arc)));
        let change_sink: Weak<dyn ChangeSink> = Arc::downgrade(&(self_ref.clone() as Arc<dyn ChangeSink>));

        {
            let mut guard = arc.lock().expect("effect instance mutex poisoned");
            guard.self_handle = OfxImageEffectHandle(raw_handle);
            guard.self_ref = self_ref;

            let clip_order = guard.clip_order.clone();
            for name in clip_order {
                let Some(clip_descriptor) = descriptor.clips().get(&name) else { continue };
                let Some(cb) = clip_callbacks.get(&name).cloned() else {
                    log::warn!("no clip callbacks supplied for clip '{name}', skipping");
                    continue;
                };
                let clip_instance = ClipInstance::new(clip_descriptor, name.clone(), cb, change_sink.clone());
                guard.clips.insert(name, clip_instance);
            }

            for name in descriptor.params().param_list().to_vec() {
                if let Some(param_descriptor) = descriptor.params().get_param(&name) {
                    let _ = guard.params.add_param(param_descriptor, change_sink.clone());
                }
            }
            guard.params.resolve_parents();
        }

        arc
    }

    #[must_use]
    pub fn self_handle(&self) -> OfxImageEffectHandle {
        self.self_handle
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    pub fn get_clip(&self, name: &str) -> Result<&ClipInstance, EffectError> {
        self.clips.get(name).ok_or_else(|| EffectError::UnknownClip(name.to_string()))
    }

    pub fn get_clip_mut(&mut self, name: &str) -> Result<&mut ClipInstance, EffectError> {
        self.clips.get_mut(name).ok_or_else(|| EffectError::UnknownClip(name.to_string()))
    }

    #[must_use]
    pub fn clip_names(&self) -> &[String] {
        &self.clip_order
    }

    #[must_use]
    pub fn params(&self) -> &ParamSetInstance {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSetInstance {
        &mut self.params
    }

    /// `Instance::abort`, defaulting to `false` if the embedder has gone away.
    #[must_use]
    pub fn abort(&self) -> bool {
        self.callbacks.upgrade().map(|cb| cb.abort()).unwrap_or(false)
    }

    /// A `Weak<dyn ChangeSink>` an embedder can keep handing to anything
    /// else that needs to report back to this instance.
    #[must_use]
    pub fn change_sink(&self) -> Weak<dyn ChangeSink> {
        Arc::downgrade(&(self.self_ref.clone() as Arc<dyn ChangeSink>))
    }

    /// A `Weak<dyn OverlayDispatch>` to hand to an [`ofxh_interact::InteractInstance`]
    /// built for this effect's custom overlay.
    #[must_use]
    pub fn overlay_dispatch(&self) -> Weak<dyn OverlayDispatch> {
        Arc::downgrade(&(self.self_ref.clone() as Arc<dyn OverlayDispatch>))
    }

    pub fn create_instance(&mut self) -> Result<(), EffectError> {
        if self.created {
            return Ok(());
        }
        let status =
            dispatch::call_action(self.main_entry, OFX_ACTION_CREATE_INSTANCE, self.self_handle.0, None, None);
        if status.is_success() {
            self.created = true;
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    pub fn destroy_instance(&mut self) -> Result<(), EffectError> {
        if !self.created || self.destroyed {
            return Ok(());
        }
        let status =
            dispatch::call_action(self.main_entry, OFX_ACTION_DESTROY_INSTANCE, self.self_handle.0, None, None);
        self.destroyed = true;
        if status.is_success() {
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    pub fn begin_sequence_render(
        &mut self,
        frame_range: (f64, f64),
        frame_step: f64,
        interactive: bool,
        render_scale: (f64, f64),
    ) -> Result<(), EffectError> {
        let in_args = Arc::new(Mutex::new(PropertySet::new("beginSequenceRenderIn", true)));
        {
            let mut guard = in_args.lock().expect("beginSequenceRenderIn mutex poisoned");
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_RANGE, frame_range);
            define_double1(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_STEP, frame_step);
            define_int1(&mut guard, OFX_PROP_IS_INTERACTIVE, i32::from(interactive));
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, render_scale);
        }
        let status = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_BEGIN_SEQUENCE_RENDER,
            self.self_handle.0,
            Some(&in_args),
            None,
        );
        if status.is_success() {
            self.rendering = true;
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    pub fn end_sequence_render(
        &mut self,
        frame_range: (f64, f64),
        frame_step: f64,
        interactive: bool,
        render_scale: (f64, f64),
    ) -> Result<(), EffectError> {
        if !self.rendering {
            return Err(EffectError::OutOfOrder {
                action: OFX_IMAGE_EFFECT_ACTION_END_SEQUENCE_RENDER,
                reason: "no matching beginSequenceRender",
            });
        }
        let in_args = Arc::new(Mutex::new(PropertySet::new("endSequenceRenderIn", true)));
        {
            let mut guard = in_args.lock().expect("endSequenceRenderIn mutex poisoned");
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_RANGE, frame_range);
            define_double1(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_STEP, frame_step);
            define_int1(&mut guard, OFX_PROP_IS_INTERACTIVE, i32::from(interactive));
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, render_scale);
        }
        let status = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_END_SEQUENCE_RENDER,
            self.self_handle.0,
            Some(&in_args),
            None,
        );
        self.rendering = false;
        if status.is_success() {
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    pub fn render(
        &mut self,
        time: f64,
        field: &str,
        render_window: (i32, i32, i32, i32),
        render_scale: (f64, f64),
    ) -> Result<(), EffectError> {
        if !self.rendering {
            return Err(EffectError::OutOfOrder {
                action: OFX_IMAGE_EFFECT_ACTION_RENDER,
                reason: "render dispatched outside a beginSequenceRender/endSequenceRender pair",
            });
        }
        let in_args = Arc::new(Mutex::new(PropertySet::new("renderIn", true)));
        {
            let mut guard = in_args.lock().expect("renderIn mutex poisoned");
            define_double1(&mut guard, OFX_PROP_TIME, time);
            define_string1(&mut guard, OFX_IMAGE_EFFECT_PROP_FIELD_TO_RENDER, field);
            define_int4(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_WINDOW, render_window);
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, render_scale);
        }
        let status = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_RENDER,
            self.self_handle.0,
            Some(&in_args),
            None,
        );
        if status.is_success() {
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    /// Always returns whatever ends up in `outArgs`, even on a failing
    /// status — matches `Instance::getRegionOfDefinitionAction`, which
    /// never checks the plug-in's return code before reading it back.
    pub fn get_region_of_definition(&mut self, time: f64, render_scale: (f64, f64)) -> (f64, f64, f64, f64) {
        let in_args = Arc::new(Mutex::new(PropertySet::new("getRegionOfDefinitionIn", true)));
        {
            let mut guard = in_args.lock().expect("getRegionOfDefinitionIn mutex poisoned");
            define_double1(&mut guard, OFX_PROP_TIME, time);
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, render_scale);
        }
        let out_args = Arc::new(Mutex::new(PropertySet::new("getRegionOfDefinitionOut", true)));
        {
            let mut guard = out_args.lock().expect("getRegionOfDefinitionOut mutex poisoned");
            define_double4(&mut guard, OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION, (0.0, 0.0, 0.0, 0.0));
        }
        let _ = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_GET_REGION_OF_DEFINITION,
            self.self_handle.0,
            Some(&in_args),
            Some(&out_args),
        );
        let mut guard = out_args.lock().expect("getRegionOfDefinitionOut mutex poisoned");
        read_double4(&mut guard, OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION)
    }

    pub fn get_regions_of_interest(
        &mut self,
        time: f64,
        render_scale: (f64, f64),
        region_of_interest: (f64, f64, f64, f64),
    ) -> HashMap<String, (f64, f64, f64, f64)> {
        let in_args = Arc::new(Mutex::new(PropertySet::new("getRegionsOfInterestIn", true)));
        {
            let mut guard = in_args.lock().expect("getRegionsOfInterestIn mutex poisoned");
            define_double1(&mut guard, OFX_PROP_TIME, time);
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, render_scale);
            define_double4(&mut guard, OFX_IMAGE_EFFECT_PROP_REGION_OF_INTEREST, region_of_interest);
        }
        let out_args = Arc::new(Mutex::new(PropertySet::new("getRegionsOfInterestOut", true)));
        {
            let mut guard = out_args.lock().expect("getRegionsOfInterestOut mutex poisoned");
            for name in &self.clip_order {
                define_double4(&mut guard, &format!("{CLIP_PROP_ROI_PREFIX}{name}"), region_of_interest);
            }
        }
        let _ = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_GET_REGIONS_OF_INTEREST,
            self.self_handle.0,
            Some(&in_args),
            Some(&out_args),
        );
        let mut guard = out_args.lock().expect("getRegionsOfInterestOut mutex poisoned");
        self.clip_order
            .iter()
            .map(|name| (name.clone(), read_double4(&mut guard, &format!("{CLIP_PROP_ROI_PREFIX}{name}"))))
            .collect()
    }

    /// `None` when the plug-in never declared temporal clip access — the
    /// original skips dispatch entirely in that case instead of asking.
    pub fn get_frames_needed(&mut self, time: f64) -> Option<HashMap<String, Vec<(f64, f64)>>> {
        if self.properties.get_int(OFX_IMAGE_EFFECT_PROP_TEMPORAL_CLIP_ACCESS, 0).unwrap_or(0) == 0 {
            return None;
        }
        let in_args = Arc::new(Mutex::new(PropertySet::new("getFramesNeededIn", true)));
        {
            let mut guard = in_args.lock().expect("getFramesNeededIn mutex poisoned");
            define_double1(&mut guard, OFX_PROP_TIME, time);
        }
        let out_args = Arc::new(Mutex::new(PropertySet::new("getFramesNeededOut", true)));
        {
            let mut guard = out_args.lock().expect("getFramesNeededOut mutex poisoned");
            for name in &self.clip_order {
                guard.define(format!("{CLIP_PROP_FRAME_RANGE_PREFIX}{name}"), PropType::Double, 0);
            }
        }
        let _ = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_GET_FRAMES_NEEDED,
            self.self_handle.0,
            Some(&in_args),
            Some(&out_args),
        );
        let mut guard = out_args.lock().expect("getFramesNeededOut mutex poisoned");
        let mut result = HashMap::new();
        for name in &self.clip_order {
            let prop = format!("{CLIP_PROP_FRAME_RANGE_PREFIX}{name}");
            let dim = guard.dimension(&prop).unwrap_or(0);
            let pairs = (0..dim / 2)
                .map(|i| {
                    (
                        guard.get_double(&prop, i * 2).unwrap_or(0.0),
                        guard.get_double(&prop, i * 2 + 1).unwrap_or(0.0),
                    )
                })
                .collect();
            result.insert(name.clone(), pairs);
        }
        Some(result)
    }

    /// `Some((time, clip_name))` when the effect is the identity of `time`;
    /// `None` for any non-`kOfxStatOK` status, matching the original's
    /// strict check.
    pub fn is_identity(
        &mut self,
        time: f64,
        field: &str,
        render_window: (i32, i32, i32, i32),
        render_scale: (f64, f64),
    ) -> Option<(f64, String)> {
        let in_args = Arc::new(Mutex::new(PropertySet::new("isIdentityIn", true)));
        {
            let mut guard = in_args.lock().expect("isIdentityIn mutex poisoned");
            define_double1(&mut guard, OFX_PROP_TIME, time);
            define_string1(&mut guard, OFX_IMAGE_EFFECT_PROP_FIELD_TO_RENDER, field);
            define_int4(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_WINDOW, render_window);
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, render_scale);
        }
        let out_args = Arc::new(Mutex::new(PropertySet::new("isIdentityOut", true)));
        {
            let mut guard = out_args.lock().expect("isIdentityOut mutex poisoned");
            define_double1(&mut guard, OFX_PROP_IS_IDENTITY_TIME, 0.0);
            define_string1(&mut guard, OFX_PROP_IS_IDENTITY_CLIP, "");
        }
        let status = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_IS_IDENTITY,
            self.self_handle.0,
            Some(&in_args),
            Some(&out_args),
        );
        if status != OfxStatus::Ok {
            return None;
        }
        let mut guard = out_args.lock().expect("isIdentityOut mutex poisoned");
        let identity_time = guard.get_double(OFX_PROP_IS_IDENTITY_TIME, 0).unwrap_or(time);
        let identity_clip = guard.get_string(OFX_PROP_IS_IDENTITY_CLIP, 0).unwrap_or_default();
        Some((identity_time, identity_clip))
    }

    pub fn get_clip_preferences(&mut self) -> Result<ClipPreferences, EffectError> {
        let out_args = Arc::new(Mutex::new(PropertySet::new("getClipPreferencesOut", true)));
        {
            let mut guard = out_args.lock().expect("getClipPreferencesOut mutex poisoned");
            for name in &self.clip_order {
                guard.define(format!("{CLIP_PROP_COMPONENTS_PREFIX}{name}"), PropType::String, 0);
                guard.define(format!("{CLIP_PROP_DEPTH_PREFIX}{name}"), PropType::String, 0);
                guard.define(format!("{CLIP_PROP_PAR_PREFIX}{name}"), PropType::Double, 0);
            }
            define_double1(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_RATE, 0.0);
            define_double1(&mut guard, OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, 1.0);
            define_string1(&mut guard, OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION, "");
            define_int1(&mut guard, OFX_IMAGE_CLIP_PROP_CONTINUOUS_SAMPLES, 0);
            define_int1(&mut guard, OFX_IMAGE_EFFECT_FRAME_VARYING, 0);
        }
        let status = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_GET_CLIP_PREFERENCES,
            self.self_handle.0,
            None,
            Some(&out_args),
        );
        if !status.is_success() {
            return Err(EffectError::PluginFailed(status));
        }
        let mut guard = out_args.lock().expect("getClipPreferencesOut mutex poisoned");
        let mut components = HashMap::new();
        let mut depth = HashMap::new();
        let mut pixel_aspect_ratio = HashMap::new();
        for name in &self.clip_order {
            components.insert(
                name.clone(),
                guard.get_string(&format!("{CLIP_PROP_COMPONENTS_PREFIX}{name}"), 0).unwrap_or_default(),
            );
            depth.insert(
                name.clone(),
                guard.get_string(&format!("{CLIP_PROP_DEPTH_PREFIX}{name}"), 0).unwrap_or_default(),
            );
            pixel_aspect_ratio.insert(
                name.clone(),
                guard.get_double(&format!("{CLIP_PROP_PAR_PREFIX}{name}"), 0).unwrap_or(1.0),
            );
        }
        Ok(ClipPreferences {
            components,
            depth,
            pixel_aspect_ratio,
            frame_rate: guard.get_double(OFX_IMAGE_EFFECT_PROP_FRAME_RATE, 0).unwrap_or(0.0),
            output_pixel_aspect_ratio: guard.get_double(OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO, 0).unwrap_or(1.0),
            pre_multiplication: guard.get_string(OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION, 0).unwrap_or_default(),
            continuous_samples: guard.get_int(OFX_IMAGE_CLIP_PROP_CONTINUOUS_SAMPLES, 0).unwrap_or(0) != 0,
            frame_varying: guard.get_int(OFX_IMAGE_EFFECT_FRAME_VARYING, 0).unwrap_or(0) != 0,
        })
    }

    /// Reads back `kOfxImageEffectPropFrameRange` — the property the
    /// action actually declares, not the action-name constant the original
    /// `getTimeDomainAction` reads back by apparent copy-paste mistake.
    pub fn get_time_domain(&mut self) -> Result<(f64, f64), EffectError> {
        let out_args = Arc::new(Mutex::new(PropertySet::new("getTimeDomainOut", true)));
        {
            let mut guard = out_args.lock().expect("getTimeDomainOut mutex poisoned");
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_RANGE, (0.0, 0.0));
        }
        let status = dispatch::call_action(
            self.main_entry,
            OFX_IMAGE_EFFECT_ACTION_GET_TIME_DOMAIN,
            self.self_handle.0,
            None,
            Some(&out_args),
        );
        if !status.is_success() {
            return Err(EffectError::PluginFailed(status));
        }
        let mut guard = out_args.lock().expect("getTimeDomainOut mutex poisoned");
        Ok(read_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_FRAME_RANGE))
    }

    pub fn begin_instance_changed(&mut self, reason: &str) -> Result<(), EffectError> {
        self.instance_edit_boundary_action(OFX_ACTION_BEGIN_INSTANCE_CHANGED, reason)
    }

    pub fn end_instance_changed(&mut self, reason: &str) -> Result<(), EffectError> {
        self.instance_edit_boundary_action(OFX_ACTION_END_INSTANCE_CHANGED, reason)
    }

    fn instance_edit_boundary_action(&mut self, action: &'static str, reason: &str) -> Result<(), EffectError> {
        let in_args = Arc::new(Mutex::new(PropertySet::new("instanceEditBoundaryIn", true)));
        {
            let mut guard = in_args.lock().expect("instanceEditBoundaryIn mutex poisoned");
            define_string1(&mut guard, OFX_PROP_CHANGE_REASON, reason);
        }
        let status = dispatch::call_action(self.main_entry, action, self.self_handle.0, Some(&in_args), None);
        if status.is_success() {
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    pub fn purge_caches(&mut self) -> Result<(), EffectError> {
        self.no_arg_action(OFX_ACTION_PURGE_CACHES)
    }

    pub fn sync_private_data(&mut self) -> Result<(), EffectError> {
        self.no_arg_action(OFX_ACTION_SYNC_PRIVATE_DATA)
    }

    pub fn begin_instance_edit(&mut self) -> Result<(), EffectError> {
        self.no_arg_action(OFX_ACTION_BEGIN_INSTANCE_EDIT)
    }

    pub fn end_instance_edit(&mut self) -> Result<(), EffectError> {
        self.no_arg_action(OFX_ACTION_END_INSTANCE_EDIT)
    }

    fn no_arg_action(&mut self, action: &'static str) -> Result<(), EffectError> {
        let status = dispatch::call_action(self.main_entry, action, self.self_handle.0, None, None);
        if status.is_success() {
            Ok(())
        } else {
            Err(EffectError::PluginFailed(status))
        }
    }

    /// `instanceChanged` with `OfxTypeParameter`/`paramName` set. The
    /// simplified `ChangeSink` surface carries no time/render-scale
    /// context from the triggering write, so both are reported as
    /// defaults — an acknowledged narrowing versus the original's
    /// caller-supplied values.
    fn param_instance_changed(&self, param_name: &str) {
        let _ = self.instance_changed_action(TYPE_PARAMETER, param_name);
    }

    fn clip_instance_changed(&self, clip_name: &str) {
        let _ = self.instance_changed_action(TYPE_CLIP, clip_name);
    }

    fn instance_changed_action(&self, kind: &str, name: &str) -> OfxStatus {
        let in_args = Arc::new(Mutex::new(PropertySet::new("instanceChangedIn", true)));
        {
            let mut guard = in_args.lock().expect("instanceChangedIn mutex poisoned");
            define_string1(&mut guard, OFX_PROP_TYPE, kind);
            define_string1(&mut guard, OFX_PROP_NAME, name);
            define_string1(&mut guard, OFX_PROP_CHANGE_REASON, CHANGE_REASON_PLUGIN_EDITED);
            define_double1(&mut guard, OFX_PROP_TIME, 0.0);
            define_double2(&mut guard, OFX_IMAGE_EFFECT_PROP_RENDER_SCALE, (1.0, 1.0));
        }
        dispatch::call_action(self.main_entry, OFX_ACTION_INSTANCE_CHANGED, self.self_handle.0, Some(&in_args), None)
    }

    /// `Instance::overlayEntry`: calls the plug-in's overlay entry point if
    /// it declared one, discarding its own returned status either way —
    /// `Ok` just means "we found an entry point and called it".
    fn overlay_entry_raw(&self, action: &str, in_args: &PropertySet) -> OfxStatus {
        let Some(overlay) = self.overlay_entry else {
            return OfxStatus::Failed;
        };
        let args = Arc::new(Mutex::new(in_args.copy_for("overlayArgs", true)));
        let _ = dispatch::call_action(overlay, action, self.self_handle.0, Some(&args), None);
        OfxStatus::Ok
    }
}

impl Drop for ImageEffectInstance {
    fn drop(&mut self) {
        if self.created && !self.destroyed {
            let _ =
                dispatch::call_action(self.main_entry, OFX_ACTION_DESTROY_INSTANCE, self.self_handle.0, None, None);
        }
        if !self.self_handle.is_null() {
            IMAGE_EFFECT_HANDLES.forget(self.self_handle.0);
        }
    }
}

/// Resolves an `OfxImageEffectHandle` handed back across the ABI (in a
/// describe/instance action's own handle argument, or stashed by the
/// embedder from a prior `createInstance`) back to its live instance, the
/// way the image-effect suite's handle-based entry points need to.
pub fn resolve_handle(handle: OfxImageEffectHandle) -> Result<Arc<Mutex<ImageEffectInstance>>, HandleError> {
    IMAGE_EFFECT_HANDLES.resolve(handle.0)
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_char, c_void};

    use ofxh_abi::OfxPropertySetHandle;

    use super::*;
    use crate::descriptor::ImageEffectDescriptor;

    struct StubCallbacks;
    impl EffectCallbacks for StubCallbacks {
        fn project_size(&self) -> (f64, f64) {
            (1920.0, 1080.0)
        }
        fn project_offset(&self) -> (f64, f64) {
            (0.0, 0.0)
        }
        fn project_extent(&self) -> (f64, f64) {
            (1920.0, 1080.0)
        }
        fn project_pixel_aspect_ratio(&self) -> f64 {
            1.0
        }
        fn effect_duration(&self) -> f64 {
            1.0
        }
        fn frame_rate(&self) -> f64 {
            24.0
        }
    }

    struct StubClipCallbacks;
    impl ClipCallbacks for StubClipCallbacks {
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
            (0.0, 100.0)
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
            (0.0, 100.0)
        }
        fn continuous_samples(&self) -> bool {
            false
        }
        fn region_of_definition(&self, _time: f64) -> (f64, f64, f64, f64) {
            (0.0, 0.0, 1920.0, 1080.0)
        }
    }

    unsafe extern "C" fn stub_ok(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Ok.as_raw()
    }

    unsafe extern "C" fn stub_failed(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Failed.as_raw()
    }

    fn build_instance(main_entry: MainEntryFn) -> (Arc<Mutex<ImageEffectInstance>>, Arc<dyn EffectCallbacks>, Arc<dyn ClipCallbacks>) {
        let mut descriptor = ImageEffectDescriptor::new("/plugins/blur.ofx.bundle");
        descriptor.define_clip("Source");
        descriptor.define_clip("Output");

        let callbacks: Arc<dyn EffectCallbacks> = Arc::new(StubCallbacks);
        let clip_cb: Arc<dyn ClipCallbacks> = Arc::new(StubClipCallbacks);
        let mut clip_callbacks: HashMap<String, Weak<dyn ClipCallbacks>> = HashMap::new();
        clip_callbacks.insert("Source".to_string(), Arc::downgrade(&clip_cb));
        clip_callbacks.insert("Output".to_string(), Arc::downgrade(&clip_cb));

        let instance = ImageEffectInstance::new(
            &mut descriptor,
            main_entry,
            "OfxImageEffectContextFilter",
            false,
            Arc::downgrade(&callbacks),
            clip_callbacks,
        );
        (instance, callbacks, clip_cb)
    }

    #[test]
    fn create_then_destroy_round_trips() {
        let (instance, _callbacks, _clip_cb) = build_instance(stub_ok);
        let mut guard = instance.lock().unwrap();
        assert!(guard.create_instance().is_ok());
        assert!(guard.get_clip("Source").is_ok());
        assert!(guard.destroy_instance().is_ok());
    }

    #[test]
    fn is_identity_returns_none_on_failure() {
        let (instance, _callbacks, _clip_cb) = build_instance(stub_failed);
        let mut guard = instance.lock().unwrap();
        assert!(guard.is_identity(0.0, "OfxImageFieldNone", (0, 0, 100, 100), (1.0, 1.0)).is_none());
    }

    #[test]
    fn get_region_of_definition_reads_back_regardless_of_status() {
        let (instance, _callbacks, _clip_cb) = build_instance(stub_failed);
        let mut guard = instance.lock().unwrap();
        assert_eq!(guard.get_region_of_definition(0.0, (1.0, 1.0)), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_clip_is_an_error() {
        let (instance, _callbacks, _clip_cb) = build_instance(stub_ok);
        let guard = instance.lock().unwrap();
        assert!(matches!(guard.get_clip("Mask"), Err(EffectError::UnknownClip(_))));
    }

    #[test]
    fn resolve_handle_round_trips_to_the_registering_instance() {
        let (instance, _callbacks, _clip_cb) = build_instance(stub_ok);
        let handle = instance.lock().unwrap().self_handle();
        let resolved = resolve_handle(handle).expect("freshly registered handle resolves");
        assert!(Arc::ptr_eq(&instance, &resolved));
    }

    #[test]
    fn resolve_handle_forgets_after_drop() {
        let (instance, _callbacks, _clip_cb) = build_instance(stub_ok);
        let handle = instance.lock().unwrap().self_handle();
        drop(instance);
        assert!(matches!(resolve_handle(handle), Err(HandleError::Unknown)));
    }
}
