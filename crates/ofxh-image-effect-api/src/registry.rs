use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{error, warn};

use ofxh_abi::actions::{OFX_ACTION_DESCRIBE, OFX_ACTION_LOAD, OFX_ACTION_UNLOAD};
use ofxh_abi::properties::{OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, OFX_PROP_LABEL};
use ofxh_abi::{OfxGetPluginFn, OfxStatus};
use ofxh_binary::Binary;
use ofxh_image_effect::{dispatch, ImageEffectDescriptor, MainEntryFn};
use ofxh_plugin_cache::ApiHandler;
use ofxh_property::PropertySet;

use crate::host::HostHandleSource;
use crate::plugin::ImageEffectPlugin;

const API_NAME: &str = "OfxImageEffectPluginAPI";

/// Orders `(identifier, major)` for the "latest minor per major" map
/// (`MajorPlugin`'s `operator<`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MajorKey {
    identifier: String,
    major: i32,
}

#[derive(Default)]
struct State {
    plugins: Vec<Arc<Mutex<ImageEffectPlugin>>>,
    by_id: HashMap<String, Arc<Mutex<ImageEffectPlugin>>>,
    by_id_major: HashMap<MajorKey, Arc<Mutex<ImageEffectPlugin>>>,
}

/// The image-effect `ApiHandler` (§4.E): drives `load` → `describe` →
/// `unload` for each plug-in the generic cache in `ofxh-plugin-cache`
/// discovers, confirms it into per-identifier lookup tables keeping the
/// highest-`trumps` version, and serves lazy per-context descriptions
/// through the confirmed [`ImageEffectPlugin`] handles
/// (`ofxhImageEffectAPI.cpp::PluginCache`).
pub struct PluginRegistry {
    host: Arc<dyn HostHandleSource>,
    state: Mutex<State>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new(host: Arc<dyn HostHandleSource>) -> Self {
        Self {
            host,
            state: Mutex::new(State::default()),
        }
    }

    /// All confirmed plug-ins, in discovery order (`PluginCache::getPlugins`).
    #[must_use]
    pub fn plugins(&self) -> Vec<Arc<Mutex<ImageEffectPlugin>>> {
        self.state.lock().expect("registry mutex poisoned").plugins.clone()
    }

    /// The highest-`trumps` plug-in for `id`, optionally pinned to an exact
    /// `(major, minor)` (`PluginCache::getPluginById`).
    #[must_use]
    pub fn plugin_by_id(
        &self,
        id: &str,
        major: Option<i32>,
        minor: Option<i32>,
    ) -> Option<Arc<Mutex<ImageEffectPlugin>>> {
        let state = self.state.lock().expect("registry mutex poisoned");
        best_match(&state.plugins, major, minor, |p| p.identifier() == id)
    }

    /// The highest-`trumps` plug-in whose describe-time label matches
    /// `label` (`PluginCache::getPluginByLabel`).
    #[must_use]
    pub fn plugin_by_label(
        &self,
        label: &str,
        major: Option<i32>,
        minor: Option<i32>,
    ) -> Option<Arc<Mutex<ImageEffectPlugin>>> {
        let state = self.state.lock().expect("registry mutex poisoned");
        best_match(&state.plugins, major, minor, |p| {
            p.descriptor_mut().properties_mut().get_string(OFX_PROP_LABEL, 0).as_deref() == Ok(label)
        })
    }

    fn confirm(&self, plugin: ImageEffectPlugin) {
        let plugin = Arc::new(Mutex::new(plugin));
        let mut state = self.state.lock().expect("registry mutex poisoned");
        state.plugins.push(Arc::clone(&plugin));

        let (identifier, major) = {
            let guard = plugin.lock().expect("plugin mutex poisoned");
            (guard.identifier().to_string(), guard.version_major())
        };

        let trumps_current = |current: &Arc<Mutex<ImageEffectPlugin>>| {
            plugin.lock().expect("plugin mutex poisoned").trumps(&current.lock().expect("plugin mutex poisoned"))
        };

        match state.by_id.get(&identifier) {
            Some(current) if !trumps_current(current) => {}
            _ => {
                state.by_id.insert(identifier.clone(), Arc::clone(&plugin));
            }
        }

        let key = MajorKey { identifier, major };
        match state.by_id_major.get(&key) {
            Some(current) if !trumps_current(current) => {}
            _ => {
                state.by_id_major.insert(key, plugin);
            }
        }
    }
}

impl ApiHandler for PluginRegistry {
    fn api_name(&self) -> &str {
        API_NAME
    }

    fn min_version(&self) -> i32 {
        1
    }

    fn max_version(&self) -> i32 {
        1
    }

    fn discover(
        &self,
        binary: &Arc<Mutex<Binary>>,
        raw_identifier: &str,
        index: i32,
        api_version: i32,
        major_version: i32,
        minor_version: i32,
    ) -> PropertySet {
        let empty = || PropertySet::new("apiproperties", true);

        let bundle_path = {
            let guard = binary.lock().expect("binary mutex poisoned");
            bundle_path_of(guard.path())
        };

        let Some((main_entry, set_host)) = resolve_entry_points(binary, index) else {
            error!("plug-in {raw_identifier} has no resolvable OfxGetPlugin entry at index {index}");
            return empty();
        };

        set_host(self.host.ofx_host_handle());

        let load_status = dispatch::call_action(main_entry, OFX_ACTION_LOAD, std::ptr::null_mut(), None, None);
        if !successful(load_status) {
            error!("load failed on plug-in {raw_identifier}: {load_status}");
            return empty();
        }

        let mut descriptor = ImageEffectDescriptor::new(bundle_path.to_string_lossy().into_owned());
        let handle = (descriptor.properties_mut() as *mut PropertySet).cast::<std::ffi::c_void>();
        let describe_status = dispatch::call_action(main_entry, OFX_ACTION_DESCRIBE, handle, None, None);
        if !successful(describe_status) {
            error!("describe failed on plug-in {raw_identifier}: {describe_status}");
            // Matches `loadFromPlugin`'s early return on a failed describe:
            // no unload is attempted, leaving the binary loaded.
            return empty();
        }

        let contexts = supported_contexts(descriptor.properties_mut());

        let unload_status = dispatch::call_action(main_entry, OFX_ACTION_UNLOAD, std::ptr::null_mut(), None, None);
        if !successful(unload_status) {
            warn!("unload failed on plug-in {raw_identifier}: {unload_status}");
        }

        let api_properties = descriptor.properties().copy_for("apiproperties", true);

        let mut plugin = ImageEffectPlugin::new(
            raw_identifier,
            api_version,
            major_version,
            minor_version,
            bundle_path,
            Arc::clone(binary),
            index,
            main_entry,
            descriptor,
        );
        plugin.set_contexts(contexts);
        self.confirm(plugin);

        api_properties
    }
}

fn successful(status: OfxStatus) -> bool {
    status.is_success() || status == OfxStatus::ReplyDefault
}

/// `<bundle>.ofx.bundle/Contents/<arch>/<basename>` → `<bundle>.ofx.bundle`.
fn bundle_path_of(binary_path: &Path) -> PathBuf {
    binary_path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| binary_path.to_path_buf())
}

fn resolve_entry_points(
    binary: &Arc<Mutex<Binary>>,
    index: i32,
) -> Option<(MainEntryFn, extern "C" fn(*const ofxh_abi::OfxHost))> {
    let guard = binary.lock().expect("binary mutex poisoned");
    let get_plugin: OfxGetPluginFn = guard.find_symbol("OfxGetPlugin")?;
    drop(guard);

    let raw = unsafe { get_plugin(index) };
    if raw.is_null() {
        return None;
    }
    let plugin = unsafe { &*raw };
    Some((plugin.main_entry, plugin.set_host))
}

fn supported_contexts(properties: &mut PropertySet) -> BTreeSet<String> {
    let dim = properties.dimension(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS).unwrap_or(0);
    (0..dim)
        .filter_map(|i| properties.get_string(OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS, i).ok())
        .collect()
}

fn best_match(
    plugins: &[Arc<Mutex<ImageEffectPlugin>>],
    major: Option<i32>,
    minor: Option<i32>,
    mut matches: impl FnMut(&mut ImageEffectPlugin) -> bool,
) -> Option<Arc<Mutex<ImageEffectPlugin>>> {
    let mut best: Option<Arc<Mutex<ImageEffectPlugin>>> = None;
    for candidate in plugins {
        let mut guard = candidate.lock().expect("plugin mutex poisoned");
        if !matches(&mut guard) {
            continue;
        }
        if let Some(m) = major {
            if guard.version_major() != m {
                continue;
            }
        }
        if let Some(m) = minor {
            if guard.version_minor() != m {
                continue;
            }
        }
        let trumps_best = match &best {
            None => true,
            Some(b) => guard.trumps(&b.lock().expect("plugin mutex poisoned")),
        };
        drop(guard);
        if trumps_best {
            best = Some(Arc::clone(candidate));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_char, c_void};

    use ofxh_abi::{OfxHost, OfxPropertySetHandle};

    use super::*;

    struct NullHost;

    impl HostHandleSource for NullHost {
        fn ofx_host_handle(&self) -> *const OfxHost {
            std::ptr::null()
        }
    }

    unsafe extern "C" fn echoes_ok(
        _action: *const c_char,
        _handle: *mut c_void,
        _in_args: OfxPropertySetHandle,
        _out_args: OfxPropertySetHandle,
    ) -> i32 {
        OfxStatus::Ok.as_raw()
    }

    fn make_plugin(identifier: &str, major: i32, minor: i32) -> ImageEffectPlugin {
        let binary = Arc::new(Mutex::new(Binary::new("/nonexistent/Foo.ofx")));
        let descriptor = ImageEffectDescriptor::new("/nonexistent/Foo.ofx.bundle");
        ImageEffectPlugin::new(
            identifier,
            1,
            major,
            minor,
            PathBuf::from("/nonexistent/Foo.ofx.bundle"),
            binary,
            0,
            echoes_ok,
            descriptor,
        )
    }

    #[test]
    fn bundle_path_of_strips_contents_and_arch() {
        let binary_path = Path::new("/plugins/Foo.ofx.bundle/Contents/Linux-x86-64/Foo.ofx");
        assert_eq!(bundle_path_of(binary_path), PathBuf::from("/plugins/Foo.ofx.bundle"));
    }

    #[test]
    fn bundle_path_of_falls_back_when_too_shallow() {
        let binary_path = Path::new("Foo.ofx");
        assert_eq!(bundle_path_of(binary_path), PathBuf::from("Foo.ofx"));
    }

    #[test]
    fn confirm_keeps_highest_trumps_version_per_identifier() {
        let registry = PluginRegistry::new(Arc::new(NullHost));
        registry.confirm(make_plugin("com.example.foo", 1, 0));
        registry.confirm(make_plugin("com.example.foo", 2, 0));
        registry.confirm(make_plugin("com.example.foo", 1, 5));

        assert_eq!(registry.plugins().len(), 3, "every confirmed plugin stays in the flat list");

        let best = registry.plugin_by_id("com.example.foo", None, None).expect("present");
        assert_eq!(best.lock().unwrap().version_major(), 2);

        let pinned = registry.plugin_by_id("com.example.foo", Some(1), None).expect("present");
        assert_eq!(pinned.lock().unwrap().version_minor(), 5, "pinning to major=1 still picks the best minor");
    }

    #[test]
    fn confirm_keeps_first_plugin_on_exact_version_tie() {
        let registry = PluginRegistry::new(Arc::new(NullHost));
        registry.confirm(make_plugin("com.example.foo", 1, 0));
        registry.confirm(make_plugin("com.example.foo", 1, 0));

        let state = registry.state.lock().unwrap();
        let kept = state.by_id.get("com.example.foo").expect("present");
        assert!(std::ptr::eq(kept.as_ref(), state.plugins[0].as_ref()), "neither tie-breaker trumps the incumbent");
    }

    #[test]
    fn plugin_by_id_returns_none_for_unknown_identifier() {
        let registry = PluginRegistry::new(Arc::new(NullHost));
        registry.confirm(make_plugin("com.example.foo", 1, 0));
        assert!(registry.plugin_by_id("com.example.bar", None, None).is_none());
    }
}
