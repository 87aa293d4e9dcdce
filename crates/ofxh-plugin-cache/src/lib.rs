#![allow(unsafe_code)]
mod arch;
mod error;
mod handle;
mod registry;
mod scan;

pub use arch::{candidate_binary_paths, FALLBACK_ARCH, PRIMARY_ARCH};
pub use error::CacheError;
pub use handle::PluginHandle;
pub use registry::{clear_global_cache, init_global_cache, with_global_cache, ApiHandler, PluginCache};
pub use scan::{bundle_basename, default_search_entries, env_search_entries, SearchEntry};
