use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ofxh_abi::actions::OFX_IMAGE_EFFECT_ACTION_DESCRIBE_IN_CONTEXT;
use ofxh_abi::properties::OFX_IMAGE_EFFECT_PROP_CONTEXT;
use ofxh_abi::OfxStatus;
use ofxh_binary::Binary;
use ofxh_image_effect::{dispatch, ImageEffectDescriptor, MainEntryFn};
use ofxh_plugin_cache::PluginHandle;
use ofxh_property::{PropType, PropertySet, WriteOrigin};

use crate::error::PluginApiError;

/// One `OfxGetPlugin` entry confirmed to support `OfxImageEffectPluginAPI`
/// (`ofxhImageEffectAPI.h::ImageEffectPlugin` / `ofxhPluginCache.h::Plugin`).
/// Holds the describe-time [`ImageEffectDescriptor`] plus a lazily-grown
/// cache of per-context descriptors, one `describeInContext` dispatch each.
pub struct ImageEffectPlugin {
    identifier: String,
    api_version: i32,
    major_version: i32,
    minor_version: i32,
    bundle_path: PathBuf,
    binary: Arc<Mutex<Binary>>,
    index: i32,
    main_entry: MainEntryFn,
    descriptor: ImageEffectDescriptor,
    contexts: BTreeSet<String>,
    context_descriptors: HashMap<String, ImageEffectDescriptor>,
}

impl ImageEffectPlugin {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        identifier: impl Into<String>,
        api_version: i32,
        major_version: i32,
        minor_version: i32,
        bundle_path: PathBuf,
        binary: Arc<Mutex<Binary>>,
        index: i32,
        main_entry: MainEntryFn,
        descriptor: ImageEffectDescriptor,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            api_version,
            major_version,
            minor_version,
            bundle_path,
            binary,
            index,
            main_entry,
            descriptor,
            contexts: BTreeSet::new(),
            context_descriptors: HashMap::new(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn api_version(&self) -> i32 {
        self.api_version
    }

    #[must_use]
    pub fn version_major(&self) -> i32 {
        self.major_version
    }

    #[must_use]
    pub fn version_minor(&self) -> i32 {
        self.minor_version
    }

    #[must_use]
    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    #[must_use]
    pub fn descriptor(&self) -> &ImageEffectDescriptor {
        &self.descriptor
    }

    pub fn descriptor_mut(&mut self) -> &mut ImageEffectDescriptor {
        &mut self.descriptor
    }

    /// Greater major wins outright; equal major falls back to minor
    /// (`Plugin::trumps`). Two otherwise-equal versions never trump each
    /// other, so the first one discovered keeps its slot.
    #[must_use]
    pub fn trumps(&self, other: &ImageEffectPlugin) -> bool {
        if self.major_version > other.major_version {
            return true;
        }
        self.major_version == other.major_version && self.minor_version > other.minor_version
    }

    /// Contexts the plug-in declared support for at describe time
    /// (`kOfxImageEffectPropSupportedContexts`), populated once by
    /// [`crate::registry::PluginRegistry::discover`].
    #[must_use]
    pub fn contexts(&self) -> &BTreeSet<String> {
        &self.contexts
    }

    pub(crate) fn set_contexts(&mut self, contexts: BTreeSet<String>) {
        self.contexts = contexts;
    }

    /// The per-context descriptor, describing it lazily on first request
    /// (`ImageEffectPlugin::getContext`). Fails if `context` was never
    /// declared as supported at describe time.
    pub fn context_descriptor(&mut self, context: &str) -> Result<&ImageEffectDescriptor, PluginApiError> {
        if !self.contexts.contains(context) {
            return Err(PluginApiError::UnknownContext(context.to_string()));
        }

        if !self.context_descriptors.contains_key(context) {
            // Lazily re-entering the plug-in outside of `discover`'s own
            // load→describe→unload sweep, so keep the binary ref'd for the
            // duration of the call the way `PluginHandle` does for every
            // out-of-band dispatch.
            let _handle = PluginHandle::new(Arc::clone(&self.binary));

            let mut in_args = PropertySet::new("inArgs", true);
            in_args.define(OFX_IMAGE_EFFECT_PROP_CONTEXT, PropType::String, 1);
            in_args
                .set_string(OFX_IMAGE_EFFECT_PROP_CONTEXT, 0, context, WriteOrigin::Host)
                .expect("just defined");
            let in_args = Arc::new(Mutex::new(in_args));

            let mut new_descriptor = ImageEffectDescriptor::new(self.bundle_path.to_string_lossy().into_owned());
            let handle = (new_descriptor.properties_mut() as *mut PropertySet).cast::<std::ffi::c_void>();

            let status = dispatch::call_action(
                self.main_entry,
                OFX_IMAGE_EFFECT_ACTION_DESCRIBE_IN_CONTEXT,
                handle,
                Some(&in_args),
                None,
            );

            if !(status.is_success() || status == OfxStatus::ReplyDefault) {
                return Err(PluginApiError::DescribeInContextFailed {
                    context: context.to_string(),
                    status,
                });
            }

            self.context_descriptors.insert(context.to_string(), new_descriptor);
        }

        Ok(self.context_descriptors.get(context).expect("just inserted"))
    }

    /// Fire-and-forget `OfxActionUnload` (`ImageEffectPlugin::unload`).
    pub fn unload(&self) -> OfxStatus {
        let _handle = PluginHandle::new(Arc::clone(&self.binary));
        dispatch::call_action(self.main_entry, ofxh_abi::actions::OFX_ACTION_UNLOAD, std::ptr::null_mut(), None, None)
    }

    #[must_use]
    pub fn binary(&self) -> &Arc<Mutex<Binary>> {
        &self.binary
    }

    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }

    #[must_use]
    pub fn main_entry(&self) -> MainEntryFn {
        self.main_entry
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_char, c_void};

    use ofxh_abi::OfxPropertySetHandle;

    use super::*;

    unsafe extern "C" fn echoes_ok(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Ok.as_raw()
    }

    unsafe extern "C" fn echoes_failed(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Failed.as_raw()
    }

    fn build_plugin(major: i32, minor: i32, main_entry: MainEntryFn) -> ImageEffectPlugin {
        let binary = Arc::new(Mutex::new(Binary::new("/nonexistent/Foo.ofx")));
        let descriptor = ImageEffectDescriptor::new("/nonexistent/Foo.ofx.bundle");
        let mut plugin = ImageEffectPlugin::new(
            "com.example.foo",
            1,
            major,
            minor,
            PathBuf::from("/nonexistent/Foo.ofx.bundle"),
            binary,
            0,
            main_entry,
            descriptor,
        );
        plugin.set_contexts(BTreeSet::from(["OfxImageEffectContextFilter".to_string()]));
        plugin
    }

    #[test]
    fn trumps_prefers_higher_major() {
        let newer = build_plugin(2, 0, echoes_ok);
        let older = build_plugin(1, 9, echoes_ok);
        assert!(newer.trumps(&older));
        assert!(!older.trumps(&newer));
    }

    #[test]
    fn trumps_falls_back_to_minor_on_equal_major() {
        let newer = build_plugin(1, 2, echoes_ok);
        let older = build_plugin(1, 1, echoes_ok);
        assert!(newer.trumps(&older));
        assert!(!older.trumps(&newer));
    }

    #[test]
    fn trumps_is_false_between_equal_versions() {
        let a = build_plugin(1, 0, echoes_ok);
        let b = build_plugin(1, 0, echoes_ok);
        assert!(!a.trumps(&b));
        assert!(!b.trumps(&a));
    }

    #[test]
    fn context_descriptor_rejects_undeclared_context() {
        let mut plugin = build_plugin(1, 0, echoes_ok);
        let err = plugin.context_descriptor("OfxImageEffectContextGeneral").unwrap_err();
        assert!(matches!(err, PluginApiError::UnknownContext(ref ctx) if ctx == "OfxImageEffectContextGeneral"));
    }

    #[test]
    fn context_descriptor_describes_lazily_and_caches() {
        let mut plugin = build_plugin(1, 0, echoes_ok);
        assert!(plugin.context_descriptors.is_empty());

        plugin.context_descriptor("OfxImageEffectContextFilter").expect("describeInContext succeeds");
        assert_eq!(plugin.context_descriptors.len(), 1);

        plugin.context_descriptor("OfxImageEffectContextFilter").expect("cached result still ok");
        assert_eq!(plugin.context_descriptors.len(), 1, "second call must reuse the cached descriptor");
    }

    #[test]
    fn context_descriptor_surfaces_describe_failure() {
        let mut plugin = build_plugin(1, 0, echoes_failed);
        let err = plugin.context_descriptor("OfxImageEffectContextFilter").unwrap_err();
        assert!(matches!(err, PluginApiError::DescribeInContextFailed { .. }));
    }
}
