use thiserror::Error;

/// Failures reported by the plug-in registry (§4.D).
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("no API handler registered for api={api} version={version}")]
    NoHandler { api: String, version: i32 },

    #[error("bundle path has no binary matching any known architecture: {0}")]
    NoBinaryForArch(String),
}
