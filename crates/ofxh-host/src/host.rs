//! The host facade itself (§4.J).
//!
//! Grounded in `ofxhImageEffectAPI.cpp`'s `Host` constructor, which builds
//! exactly this: a property set seeded with the host's capabilities, an
//! `OfxHost` struct wrapping that set's handle plus a `fetchSuite` pointer,
//! and the plug-in cache/registry pair the rest of the facade dispatches
//! through.

use std::ffi::c_void;
use std::sync::{Arc, Mutex};

use log::{error, warn};
use once_cell::sync::{Lazy, OnceCell};
use ofxh_abi::properties::*;
use ofxh_abi::{OfxHost, OfxPropertySetHandle, OfxStatus};
use ofxh_binary::Binary;
use ofxh_image_effect_api::{HostHandleSource, PluginRegistry};
use ofxh_plugin_cache::{ApiHandler, PluginCache, PluginHandle};
use ofxh_property::{PropertySet, WriteOrigin};

use crate::suites;

const HOST_TYPE: &str = "OfxTypeImageEffectHost";

/// Capabilities advertised through the host property set (§4.J). Every
/// field here is a value the original hard-codes once in `Host`'s
/// constructor; an embedder fills these in instead of this crate guessing
/// at what a given application actually supports.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub name: String,
    pub label: String,
    pub version_major: i32,
    pub version_minor: i32,
    pub is_background: bool,
    pub supports_overlays: bool,
    pub supports_multi_resolution: bool,
    pub supports_tiles: bool,
    pub temporal_clip_access: bool,
    pub supports_multiple_clip_depths: bool,
    pub supports_multiple_clip_pars: bool,
    pub setable_frame_rate: bool,
    pub setable_fielding: bool,
    pub sequential_render: bool,
    pub host_frame_threading: bool,
    pub supported_contexts: Vec<String>,
    pub supported_pixel_depths: Vec<String>,
    pub supported_components: Vec<String>,
    pub supports_string_animation: bool,
    pub supports_choice_animation: bool,
    pub supports_boolean_animation: bool,
    pub supports_custom_animation: bool,
    pub supports_parametric_animation: bool,
    pub supports_custom_interact: bool,
    pub max_parameters: i32,
    pub max_pages: i32,
    pub page_row_column_count: (i32, i32),
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: "ofxh-host".to_string(),
            label: "ofxh-host".to_string(),
            version_major: 1,
            version_minor: 0,
            is_background: false,
            supports_overlays: false,
            supports_multi_resolution: true,
            supports_tiles: true,
            temporal_clip_access: false,
            supports_multiple_clip_depths: false,
            supports_multiple_clip_pars: false,
            setable_frame_rate: false,
            setable_fielding: false,
            sequential_render: false,
            host_frame_threading: false,
            supported_contexts: vec![
                "OfxImageEffectContextGenerator".to_string(),
                "OfxImageEffectContextFilter".to_string(),
                "OfxImageEffectContextGeneral".to_string(),
            ],
            supported_pixel_depths: vec!["OfxBitDepthFloat".to_string()],
            supported_components: vec![
                "OfxImageComponentRGBA".to_string(),
                "OfxImageComponentAlpha".to_string(),
            ],
            supports_string_animation: true,
            supports_choice_animation: true,
            supports_boolean_animation: true,
            supports_custom_animation: true,
            supports_parametric_animation: false,
            supports_custom_interact: false,
            max_parameters: -1,
            max_pages: -1,
            page_row_column_count: (-1, -1),
        }
    }
}

fn build_host_properties(config: &HostConfig) -> PropertySet {
    let mut props = PropertySet::new("host", true);
    let host = WriteOrigin::Host;

    props.define(OFX_PROP_TYPE, ofxh_property::PropType::String, 1);
    props.set_string(OFX_PROP_TYPE, 0, HOST_TYPE, host).unwrap();
    props.define(OFX_PROP_NAME, ofxh_property::PropType::String, 1);
    props.set_string(OFX_PROP_NAME, 0, config.name.clone(), host).unwrap();
    props.define(OFX_PROP_LABEL, ofxh_property::PropType::String, 1);
    props.set_string(OFX_PROP_LABEL, 0, config.label.clone(), host).unwrap();
    props.define(OFX_PROP_API_VERSION, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_PROP_API_VERSION, 0, ofxh_abi::suites::SUPPORTED_SUITE_VERSION, host)
        .unwrap();
    props.define(OFX_PROP_VERSION, ofxh_property::PropType::Int, 2);
    props.set_int(OFX_PROP_VERSION, 0, config.version_major, host).unwrap();
    props.set_int(OFX_PROP_VERSION, 1, config.version_minor, host).unwrap();
    props.define(OFX_PROP_VERSION_LABEL, ofxh_property::PropType::String, 1);
    props
        .set_string(
            OFX_PROP_VERSION_LABEL,
            0,
            format!("{}.{}", config.version_major, config.version_minor),
            host,
        )
        .unwrap();

    props.define(OFX_IMAGE_EFFECT_HOST_PROP_IS_BACKGROUND, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_HOST_PROP_IS_BACKGROUND, 0, config.is_background as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTS_OVERLAYS, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_PROP_SUPPORTS_OVERLAYS, 0, config.supports_overlays as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTI_RESOLUTION, ofxh_property::PropType::Int, 1);
    props
        .set_int(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTI_RESOLUTION,
            0,
            config.supports_multi_resolution as i32,
            host,
        )
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES, 0, config.supports_tiles as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_TEMPORAL_CLIP_ACCESS, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_PROP_TEMPORAL_CLIP_ACCESS, 0, config.temporal_clip_access as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_DEPTHS, ofxh_property::PropType::Int, 1);
    props
        .set_int(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_DEPTHS,
            0,
            config.supports_multiple_clip_depths as i32,
            host,
        )
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_PARS, ofxh_property::PropType::Int, 1);
    props
        .set_int(
            OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_PARS,
            0,
            config.supports_multiple_clip_pars as i32,
            host,
        )
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SETABLE_FRAME_RATE, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_PROP_SETABLE_FRAME_RATE, 0, config.setable_frame_rate as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PROP_SETABLE_FIELDING, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_PROP_SETABLE_FIELDING, 0, config.setable_fielding as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_INSTANCE_PROP_SEQUENTIAL_RENDER, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_INSTANCE_PROP_SEQUENTIAL_RENDER, 0, config.sequential_render as i32, host)
        .unwrap();
    props.define(OFX_IMAGE_EFFECT_PLUGIN_PROP_HOST_FRAME_THREADING, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_IMAGE_EFFECT_PLUGIN_PROP_HOST_FRAME_THREADING, 0, config.host_frame_threading as i32, host)
        .unwrap();

    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, ofxh_property::PropType::String, 0);
    for (i, ctx) in config.supported_contexts.iter().enumerate() {
        props.set_string(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, i, ctx.clone(), host).unwrap();
    }
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_PIXEL_DEPTHS, ofxh_property::PropType::String, 0);
    for (i, depth) in config.supported_pixel_depths.iter().enumerate() {
        props.set_string(OFX_IMAGE_EFFECT_PROP_SUPPORTED_PIXEL_DEPTHS, i, depth.clone(), host).unwrap();
    }
    props.define(OFX_IMAGE_EFFECT_PROP_SUPPORTED_COMPONENTS, ofxh_property::PropType::String, 0);
    for (i, comp) in config.supported_components.iter().enumerate() {
        props.set_string(OFX_IMAGE_EFFECT_PROP_SUPPORTED_COMPONENTS, i, comp.clone(), host).unwrap();
    }

    props.define(OFX_PARAM_HOST_PROP_SUPPORTS_STRING_ANIMATION, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_PARAM_HOST_PROP_SUPPORTS_STRING_ANIMATION, 0, config.supports_string_animation as i32, host)
        .unwrap();
    props.define(OFX_PARAM_HOST_PROP_SUPPORTS_CHOICE_ANIMATION, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_PARAM_HOST_PROP_SUPPORTS_CHOICE_ANIMATION, 0, config.supports_choice_animation as i32, host)
        .unwrap();
    props.define(OFX_PARAM_HOST_PROP_SUPPORTS_BOOLEAN_ANIMATION, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_PARAM_HOST_PROP_SUPPORTS_BOOLEAN_ANIMATION, 0, config.supports_boolean_animation as i32, host)
        .unwrap();
    props.define(OFX_PARAM_HOST_PROP_SUPPORTS_CUSTOM_ANIMATION, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_PARAM_HOST_PROP_SUPPORTS_CUSTOM_ANIMATION, 0, config.supports_custom_animation as i32, host)
        .unwrap();
    props.define(OFX_PARAM_HOST_PROP_SUPPORTS_PARAMETRIC_ANIMATION, ofxh_property::PropType::Int, 1);
    props
        .set_int(
            OFX_PARAM_HOST_PROP_SUPPORTS_PARAMETRIC_ANIMATION,
            0,
            config.supports_parametric_animation as i32,
            host,
        )
        .unwrap();
    props.define(OFX_PARAM_HOST_PROP_SUPPORTS_CUSTOM_INTERACT, ofxh_property::PropType::Int, 1);
    props
        .set_int(OFX_PARAM_HOST_PROP_SUPPORTS_CUSTOM_INTERACT, 0, config.supports_custom_interact as i32, host)
        .unwrap();
    props.define(OFX_PARAM_HOST_PROP_MAX_PARAMETERS, ofxh_property::PropType::Int, 1);
    props.set_int(OFX_PARAM_HOST_PROP_MAX_PARAMETERS, 0, config.max_parameters, host).unwrap();
    props.define(OFX_PARAM_HOST_PROP_MAX_PAGES, ofxh_property::PropType::Int, 1);
    props.set_int(OFX_PARAM_HOST_PROP_MAX_PAGES, 0, config.max_pages, host).unwrap();
    props.define(OFX_PARAM_HOST_PROP_PAGE_ROW_COLUMN_COUNT, ofxh_property::PropType::Int, 2);
    props
        .set_int(OFX_PARAM_HOST_PROP_PAGE_ROW_COLUMN_COUNT, 0, config.page_row_column_count.0, host)
        .unwrap();
    props
        .set_int(OFX_PARAM_HOST_PROP_PAGE_ROW_COLUMN_COUNT, 1, config.page_row_column_count.1, host)
        .unwrap();

    props
}

/// The host facade (§4.J): owns the process-wide plug-in cache/registry
/// pair, the registered host property set, and the embedder's behavioural
/// hooks, and answers every `fetchSuite` call a loaded plug-in makes.
///
/// Modelled as a de-facto process-wide singleton (mirroring the global
/// plug-in cache's own model, §4.D): exactly one [`Host`]'s embedder hooks
/// are reachable from the free `extern "C"` suite trampolines the real OFX
/// ABI requires, since a plug-in's `main_entry` callback carries no
/// host-identifying argument beyond the raw handles a single process's
/// `Host` issued anyway. A later `Host::new` replaces the active one.
pub struct Host {
    properties: Arc<Mutex<PropertySet>>,
    host_handle: OfxPropertySetHandle,
    ofx_host: Box<OfxHost>,
    cache: Mutex<PluginCache>,
    registry: OnceCell<Arc<PluginRegistry>>,
    embedder: Arc<dyn EmbedderHooksHandle>,
}

/// Re-exported under its real name in `lib.rs`; aliased here only so this
/// module doesn't need a `crate::embedder` import cycle comment.
use crate::embedder::EmbedderHooks as EmbedderHooksHandle;

static ACTIVE_HOST: Lazy<Mutex<Option<Arc<Host>>>> = Lazy::new(|| Mutex::new(None));

extern "C" fn fetch_suite_trampoline(
    host: OfxPropertySetHandle,
    suite_name: *const std::os::raw::c_char,
    suite_version: i32,
) -> *const c_void {
    if PropertySet::resolve_handle(host).is_err() {
        error!("fetchSuite called with an unresolvable host handle");
        return std::ptr::null();
    }
    let name = unsafe { std::ffi::CStr::from_ptr(suite_name) }.to_string_lossy().into_owned();
    suites::fetch(&name, suite_version)
}

impl Host {
    /// Builds a fresh facade, registers its host property set, and installs
    /// itself as the process's active host (`ofxhImageEffectAPI.cpp`'s
    /// `Host` constructor plus `PluginCache::getPluginCache`'s singleton
    /// framing).
    #[must_use]
    pub fn new(config: HostConfig, embedder: Arc<dyn EmbedderHooksHandle>) -> Arc<Self> {
        let properties = Arc::new(Mutex::new(build_host_properties(&config)));
        let host_handle = PropertySet::register_handle(&properties);
        let ofx_host = Box::new(OfxHost {
            host: host_handle,
            fetch_suite: fetch_suite_trampoline,
        });

        let host = Arc::new(Self {
            properties,
            host_handle,
            ofx_host,
            cache: Mutex::new(PluginCache::new()),
            registry: OnceCell::new(),
            embedder,
        });

        let registry = Arc::new(PluginRegistry::new(Arc::clone(&host) as Arc<dyn HostHandleSource>));
        host.cache.lock().expect("plugin cache poisoned").register_api_handler(registry.clone());
        host.registry.set(registry).ok().expect("registry set exactly once in new()");

        *ACTIVE_HOST.lock().expect("active host poisoned") = Some(Arc::clone(&host));
        host
    }

    /// The [`Host`] installed by the most recent [`Host::new`] call, if
    /// any. Suite trampolines that have no handle of their own to resolve
    /// back to a facade (the message suite) go through this.
    #[must_use]
    pub fn current() -> Option<Arc<Host>> {
        ACTIVE_HOST.lock().expect("active host poisoned").clone()
    }

    /// Clears the process-wide active-host slot if it's still this one
    /// (`clearPluginCache`'s role for the facade half).
    pub fn shutdown(&self) {
        let mut active = ACTIVE_HOST.lock().expect("active host poisoned");
        if let Some(current) = active.as_ref() {
            if current.host_handle == self.host_handle {
                *active = None;
            }
        }
        drop(active);
        PropertySet::forget_handle(self.host_handle);
    }

    #[must_use]
    pub fn properties(&self) -> &Arc<Mutex<PropertySet>> {
        &self.properties
    }

    #[must_use]
    pub fn ofx_host(&self) -> *const OfxHost {
        &*self.ofx_host as *const OfxHost
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        self.registry.get().expect("registry set in new()")
    }

    #[must_use]
    pub fn embedder(&self) -> &Arc<dyn EmbedderHooksHandle> {
        &self.embedder
    }

    /// Adds a search directory the way `PluginCache::setPluginHostPath`'s
    /// callers do before the first scan.
    pub fn add_plugin_path(&self, dir: impl Into<std::path::PathBuf>, recurse: bool) {
        self.cache.lock().expect("plugin cache poisoned").add_path(dir, recurse);
    }

    /// Rescans every search path and rehydrates the [`PluginRegistry`] from
    /// the reconciled cache.
    ///
    /// `PluginCache::scan_and_reconcile` copies an unchanged binary's
    /// cached plug-in entries forward *without* re-running `discover` on
    /// them (§4.D "unchanged binaries aren't re-opened"), which leaves the
    /// in-memory [`PluginRegistry`] with no entry at all for a plug-in
    /// served from a cache hit on this run. Rather than teach the registry
    /// to construct an [`ofxh_image_effect_api::ImageEffectPlugin`] from a
    /// serialized [`ofxh_xml::CachedPlugin`] directly, this re-opens every
    /// bundle the cache reports — fresh or cache-hit alike — and replays
    /// `load`→`describe`→`unload` through the registry's own
    /// [`ApiHandler::discover`], trading the cache's dispatch-skip
    /// optimization away for one guarantee: after this call returns, every
    /// plug-in the cache knows about also has a live [`ofxh_image_effect_api::ImageEffectPlugin`].
    pub fn refresh_plugins(&self) {
        let mut cache = self.cache.lock().expect("plugin cache poisoned");
        cache.scan_and_reconcile();
        let registry = self.registry();
        for bundle in cache.bundles() {
            let binary = Arc::new(Mutex::new(Binary::new(bundle.binary.path.clone())));
            let _handle = PluginHandle::new(Arc::clone(&binary));
            for plugin in &bundle.plugins {
                if plugin.api != registry.api_name() {
                    continue;
                }
                let _ = registry.discover(
                    &binary,
                    &plugin.name,
                    plugin.index,
                    plugin.api_version,
                    plugin.major_version,
                    plugin.minor_version,
                );
            }
        }
    }
}

impl HostHandleSource for Host {
    fn ofx_host_handle(&self) -> *const OfxHost {
        self.ofx_host()
    }
}

unsafe impl Send for Host {}
unsafe impl Sync for Host {}

/// Serializes tests that touch `ACTIVE_HOST` — it's process-wide state, so
/// two such tests running concurrently (the default `cargo test` behaviour)
/// would race each other's `Host::new`/`shutdown` calls.
#[cfg(test)]
pub(crate) static ACTIVE_HOST_TEST_LOCK: Mutex<()> = Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::MessageType;
    use ofxh_clip::ClipCallbacks;
    use ofxh_image_effect::EffectCallbacks;

    struct NullEmbedder;

    impl EmbedderHooksHandle for NullEmbedder {
        fn new_effect_callbacks(&self, _plugin_identifier: &str, _context: &str) -> Arc<dyn EffectCallbacks> {
            unimplemented!("not exercised by host-construction tests")
        }

        fn new_clip_callbacks(
            &self,
            _plugin_identifier: &str,
            _context: &str,
            _clip_name: &str,
        ) -> Arc<dyn ClipCallbacks> {
            unimplemented!("not exercised by host-construction tests")
        }

        fn vmessage(&self, _message_type: MessageType, _id: &str, _text: &str) -> OfxStatus {
            OfxStatus::ReplyDefault
        }

        fn set_persistent_message(&self, _message_type: MessageType, _id: &str, _text: &str) {}

        fn clear_persistent_message(&self) {}
    }

    fn build() -> Arc<Host> {
        Host::new(HostConfig::default(), Arc::new(NullEmbedder))
    }

    #[test]
    fn new_registers_a_resolvable_host_handle() {
        let _guard = ACTIVE_HOST_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let host = build();
        let handle = host.ofx_host();
        assert!(!handle.is_null());
        let resolved = PropertySet::resolve_handle(unsafe { (*handle).host });
        assert!(resolved.is_ok());
        host.shutdown();
    }

    #[test]
    fn host_properties_carry_the_configured_name() {
        let _guard = ACTIVE_HOST_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let host = build();
        let mut props = host.properties().lock().expect("poisoned");
        assert_eq!(props.get_string(OFX_PROP_NAME, 0).unwrap(), "ofxh-host");
        drop(props);
        host.shutdown();
    }

    #[test]
    fn current_reflects_the_most_recently_built_host() {
        let _guard = ACTIVE_HOST_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let host = build();
        assert!(Host::current().is_some());
        host.shutdown();
        assert!(Host::current().is_none());
    }
}
