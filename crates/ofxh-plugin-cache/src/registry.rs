use std::ffi::CStr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use once_cell::sync::Lazy;

use ofxh_abi::{OfxGetNumberOfPluginsFn, OfxGetPluginFn};
use ofxh_binary::{Binary, Signature};
use ofxh_property::PropertySet;
use ofxh_xml::{CacheDocument, CachedBinary, CachedBundle, CachedPlugin};

use crate::arch::candidate_binary_paths;
use crate::error::CacheError;
use crate::scan::{
    bundle_basename, default_search_entries, env_search_entries, host_search_entries,
    scan_directory, SearchEntry,
};

/// Implemented by the component that knows how to drive the OFX `load` →
/// `describe` → `unload` action sequence for one API (§4.E). The cache
/// dispatches a freshly found or changed plug-in to the first handler whose
/// (api, version) matches.
pub trait ApiHandler: Send + Sync {
    fn api_name(&self) -> &str;
    fn min_version(&self) -> i32;
    fn max_version(&self) -> i32;

    #[must_use]
    fn handles(&self, api: &str, version: i32) -> bool {
        api == self.api_name() && version >= self.min_version() && version <= self.max_version()
    }

    /// Runs discovery for one plug-in entry found inside `binary` and
    /// returns the api-properties set to persist in the cache.
    fn discover(
        &self,
        binary: &Arc<Mutex<Binary>>,
        raw_identifier: &str,
        index: i32,
        api_version: i32,
        major_version: i32,
        minor_version: i32,
    ) -> PropertySet;
}

/// The process-wide plug-in registry (§4.D "Registry"). Owns the search
/// path, the reconciled cache contents, and the set of registered API
/// handlers.
pub struct PluginCache {
    search: Vec<SearchEntry>,
    handlers: Vec<Arc<dyn ApiHandler>>,
    bundles: Vec<CachedBundle>,
    binaries: Vec<Arc<Mutex<Binary>>>,
    dirty: bool,
    seek_enabled: bool,
}

impl Default for PluginCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginCache {
    #[must_use]
    pub fn new() -> Self {
        let mut search = Vec::new();
        if let Ok(value) = std::env::var("OFX_PLUGIN_PATH") {
            search.extend(env_search_entries(&value));
        }
        search.extend(default_search_entries());
        Self {
            search,
            handlers: Vec::new(),
            bundles: Vec::new(),
            binaries: Vec::new(),
            dirty: false,
            seek_enabled: true,
        }
    }

    pub fn add_path(&mut self, dir: impl Into<PathBuf>, recurse: bool) {
        self.search.push(SearchEntry {
            dir: dir.into(),
            recurse,
        });
    }

    pub fn prepend_path(&mut self, dir: impl Into<PathBuf>, recurse: bool) {
        self.search.insert(
            0,
            SearchEntry {
                dir: dir.into(),
                recurse,
            },
        );
    }

    pub fn set_plugin_host_path(&mut self, host_id: &str) {
        self.search.extend(host_search_entries(host_id));
    }

    pub fn set_plugin_seek_enabled(&mut self, enabled: bool) {
        self.seek_enabled = enabled;
    }

    pub fn register_api_handler(&mut self, handler: Arc<dyn ApiHandler>) {
        self.handlers.push(handler);
    }

    #[must_use]
    pub fn find_api_handler(&self, api: &str, version: i32) -> Option<Arc<dyn ApiHandler>> {
        self.handlers
            .iter()
            .find(|h| h.handles(api, version))
            .cloned()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn bundles(&self) -> &[CachedBundle] {
        &self.bundles
    }

    /// A last-resort lookup for a bare binary basename across the whole
    /// search path, used by plug-ins that reference sibling binaries by
    /// name rather than full path (`seekPluginFile`).
    #[must_use]
    pub fn seek_plugin_file(&self, base_name: &str) -> Option<PathBuf> {
        if !self.seek_enabled {
            return None;
        }
        for entry in &self.search {
            let candidate = entry.dir.join(base_name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// Loads a previously written cache document. A version mismatch or
    /// malformed document is reported by `ofxh_xml::read_cache` as `None`;
    /// the cache then starts empty and a full rescan marks everything
    /// dirty (§4.D "Output": "a mismatch discards the cache silently").
    pub fn load_cache_xml(&mut self, xml: &[u8]) {
        match ofxh_xml::read_cache(xml) {
            Some(doc) => {
                self.bundles = doc.bundles;
                self.dirty = false;
            }
            None => {
                debug!("plug-in cache missing or incompatible, starting empty");
                self.bundles.clear();
                self.dirty = true;
            }
        }
    }

    #[must_use]
    pub fn save_cache_xml(&self) -> String {
        ofxh_xml::write_cache(&CacheDocument {
            bundles: self
                .bundles
                .iter()
                .map(|b| CachedBundle {
                    binary: b.binary.clone(),
                    plugins: b.plugins.iter().map(clone_cached_plugin).collect(),
                })
                .collect(),
        })
    }

    /// Scans the whole search path and reconciles the result against the
    /// loaded cache (§4.D "Cache reconcile"). Binaries that are new or
    /// whose (mtime, size) changed are re-discovered; binaries that
    /// vanished from disk are dropped. Either case marks the cache dirty.
    pub fn scan_and_reconcile(&mut self) {
        let mut found_bundles = Vec::new();
        for entry in &self.search {
            scan_directory(&entry.dir, entry.recurse, &mut found_bundles);
        }

        let mut next_bundles = Vec::new();
        for bundle_dir in &found_bundles {
            let Some(basename) = bundle_basename(bundle_dir) else {
                continue;
            };
            let binary_name = format!("{basename}.ofx");
            let Some(binary_path) = candidate_binary_paths(bundle_dir, &binary_name)
                .into_iter()
                .find(|p| p.is_file())
            else {
                warn!("no binary for bundle {}", bundle_dir.display());
                continue;
            };

            let path_str = binary_path.to_string_lossy().into_owned();
            let bundle_path_str = bundle_dir.to_string_lossy().into_owned();
            let on_disk = Binary::new(&binary_path);
            let signature = on_disk.signature();

            let cached_index = self.bundles.iter().position(|b| b.binary.path == path_str);
            let unchanged = match (cached_index, signature) {
                (Some(i), Some(sig)) => {
                    let cached = &self.bundles[i].binary;
                    cached.mtime == signature_to_i64(sig.mtime) && cached.size == sig.size
                }
                _ => false,
            };

            if let (true, Some(i)) = (unchanged, cached_index) {
                let cached = &self.bundles[i];
                next_bundles.push(CachedBundle {
                    binary: cached.binary.clone(),
                    plugins: cached.plugins.iter().map(clone_cached_plugin).collect(),
                });
                continue;
            }

            self.dirty = true;
            let binary = Arc::new(Mutex::new(on_disk));
            let plugins = self.discover_binary(&binary, &path_str);
            let (mtime, size) = signature
                .map(|s| (signature_to_i64(s.mtime), s.size))
                .unwrap_or((0, 0));
            self.binaries.push(binary);
            next_bundles.push(CachedBundle {
                binary: CachedBinary {
                    path: path_str,
                    bundle_path: bundle_path_str,
                    mtime,
                    size,
                },
                plugins,
            });
        }

        if next_bundles.len() != self.bundles.len() {
            self.dirty = true;
        }
        self.bundles = next_bundles;
    }

    /// Resolves the two discovery symbols and enumerates every plug-in the
    /// binary advertises, dispatching each to the handler registered for
    /// its (api, version) (§4.E).
    fn discover_binary(&self, binary: &Arc<Mutex<Binary>>, path: &str) -> Vec<CachedPlugin> {
        let _handle = crate::handle::PluginHandle::new(Arc::clone(binary));
        let guard = binary.lock().expect("binary mutex poisoned");
        let get_count: Option<OfxGetNumberOfPluginsFn> = guard.find_symbol("OfxGetNumberOfPlugins");
        let get_plugin: Option<OfxGetPluginFn> = guard.find_symbol("OfxGetPlugin");
        drop(guard);

        let (Some(get_count), Some(get_plugin)) = (get_count, get_plugin) else {
            warn!("binary {path} is missing OFX discovery symbols");
            return Vec::new();
        };

        let mut out = Vec::new();
        let count = unsafe { get_count() };
        for index in 0..count {
            let raw = unsafe { get_plugin(index) };
            if raw.is_null() {
                continue;
            }
            let plugin = unsafe { &*raw };
            let api = unsafe { CStr::from_ptr(plugin.plugin_api) }
                .to_string_lossy()
                .into_owned();
            let identifier = unsafe { CStr::from_ptr(plugin.plugin_identifier) }
                .to_string_lossy()
                .into_owned();

            let Some(handler) = self.find_api_handler(&api, plugin.api_version) else {
                warn!("no handler registered for api={api} in {path}");
                continue;
            };
            let major_version = plugin.plugin_version_major as i32;
            let minor_version = plugin.plugin_version_minor as i32;
            let props = handler.discover(
                binary,
                &identifier,
                index,
                plugin.api_version,
                major_version,
                minor_version,
            );
            out.push(CachedPlugin {
                name: identifier,
                index,
                api,
                api_version: plugin.api_version,
                major_version,
                minor_version,
                api_properties: props,
            });
        }
        out
    }
}

fn signature_to_i64(mtime: std::time::SystemTime) -> i64 {
    mtime
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn clone_cached_plugin(p: &CachedPlugin) -> CachedPlugin {
    CachedPlugin {
        name: p.name.clone(),
        index: p.index,
        api: p.api.clone(),
        api_version: p.api_version,
        major_version: p.major_version,
        minor_version: p.minor_version,
        api_properties: p.api_properties.copy_for("apiproperties", true),
    }
}

/// Process-wide singleton, framed by explicit init/clear so embedders
/// control its lifetime rather than relying on lazy first-use (§4.D
/// "Registry"; mirrors `PluginCache::getPluginCache`/`clearPluginCache`).
static GLOBAL_CACHE: Lazy<Mutex<Option<PluginCache>>> = Lazy::new(|| Mutex::new(None));

/// Initializes the process-wide cache. A no-op if already initialized.
pub fn init_global_cache() {
    let mut slot = GLOBAL_CACHE.lock().expect("plugin cache mutex poisoned");
    if slot.is_none() {
        *slot = Some(PluginCache::new());
    }
}

pub fn clear_global_cache() {
    let mut slot = GLOBAL_CACHE.lock().expect("plugin cache mutex poisoned");
    *slot = None;
}

pub fn with_global_cache<R>(f: impl FnOnce(&mut PluginCache) -> R) -> Result<R, CacheError> {
    let mut slot = GLOBAL_CACHE.lock().expect("plugin cache mutex poisoned");
    match slot.as_mut() {
        Some(cache) => Ok(f(cache)),
        None => Err(CacheError::NoHandler {
            api: "<uninitialized cache>".into(),
            version: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct NoopHandler;
    impl ApiHandler for NoopHandler {
        fn api_name(&self) -> &str {
            "OfxImageEffectPluginAPI"
        }
        fn min_version(&self) -> i32 {
            1
        }
        fn max_version(&self) -> i32 {
            1
        }
        fn discover(
            &self,
            _binary: &Arc<Mutex<Binary>>,
            _raw_identifier: &str,
            _index: i32,
            _api_version: i32,
            _major_version: i32,
            _minor_version: i32,
        ) -> PropertySet {
            PropertySet::new("apiproperties", true)
        }
    }

    #[test]
    fn handler_lookup_matches_on_api_and_version_range() {
        let mut cache = PluginCache::new();
        cache.register_api_handler(Arc::new(NoopHandler));
        assert!(cache.find_api_handler("OfxImageEffectPluginAPI", 1).is_some());
        assert!(cache.find_api_handler("OfxImageEffectPluginAPI", 2).is_none());
        assert!(cache.find_api_handler("OfxOtherAPI", 1).is_none());
    }

    #[test]
    fn seek_plugin_file_respects_enabled_flag() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("helper.so"), b"x").unwrap();
        let mut cache = PluginCache::new();
        cache.prepend_path(tmp.path().to_path_buf(), false);
        assert!(cache.seek_plugin_file("helper.so").is_some());
        cache.set_plugin_seek_enabled(false);
        assert!(cache.seek_plugin_file("helper.so").is_none());
    }

    #[test]
    fn scan_and_reconcile_drops_vanished_bundles() {
        let mut cache = PluginCache::new();
        cache.bundles.push(CachedBundle {
            binary: CachedBinary {
                path: "/nonexistent/Foo.ofx.bundle/Contents/Linux-x86-64/Foo.ofx".into(),
                bundle_path: "/nonexistent/Foo.ofx.bundle".into(),
                mtime: 0,
                size: 0,
            },
            plugins: Vec::new(),
        });
        cache.search = vec![SearchEntry {
            dir: Path::new("/nonexistent").to_path_buf(),
            recurse: true,
        }];
        cache.scan_and_reconcile();
        assert!(cache.bundles.is_empty());
        assert!(cache.is_dirty());
    }
}
