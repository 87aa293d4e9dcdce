use std::path::{Path, PathBuf};
use std::time::SystemTime;

use libloading::Library;
use log::warn;

/// A (mtime, size) pair used to detect whether a binary on disk has
/// changed since it was last inspected (§4.D cache reconcile).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub mtime: SystemTime,
    pub size: u64,
}

/// A loaded-or-loadable shared library backing one plug-in bundle binary
/// (§4.A).
///
/// Mirrors the reference `Binary` class: construction stats the file (an
/// unreadable path makes the binary permanently `invalid`, never retried),
/// `load`/`unload` are explicit, and `ref_`/`unref` layer a clamped-at-zero
/// usage count on top so a binary stays resident for as long as anything
/// holds it open (the `PluginHandle` RAII wrapper in `ofxh-plugin-cache`
/// drives this during action dispatch).
pub struct Binary {
    path: PathBuf,
    invalid: bool,
    signature: Option<Signature>,
    library: Option<Library>,
    users: u32,
}

impl Binary {
    /// Stats `path`. A binary whose file cannot be stat'd is marked
    /// invalid up front and never attempts to load.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let signature = std::fs::metadata(&path).ok().and_then(|meta| {
            Some(Signature {
                mtime: meta.modified().ok()?,
                size: meta.len(),
            })
        });
        let invalid = signature.is_none();
        if invalid {
            warn!("cannot stat plug-in binary {}", path.display());
        }
        Self {
            path,
            invalid,
            signature,
            library: None,
            users: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    #[must_use]
    pub fn signature(&self) -> Option<Signature> {
        self.signature
    }

    /// Re-stats the file on disk, refreshing the cached signature.
    /// Returns `true` if the (mtime, size) pair changed (or the file
    /// vanished/reappeared), the trigger for §4.D's dirty-cache logic.
    pub fn refresh_signature(&mut self) -> bool {
        let new_signature = std::fs::metadata(&self.path).ok().and_then(|meta| {
            Some(Signature {
                mtime: meta.modified().ok()?,
                size: meta.len(),
            })
        });
        let changed = new_signature != self.signature;
        self.signature = new_signature;
        changed
    }

    /// Opens the shared library. A no-op if already loaded; a no-op if
    /// already invalid (matches the original: an invalid binary never
    /// retries a load).
    pub fn load(&mut self) {
        if self.invalid || self.library.is_some() {
            return;
        }
        match unsafe { Library::new(&self.path) } {
            Ok(lib) => self.library = Some(lib),
            Err(err) => {
                warn!("couldn't open library {}: {err}", self.path.display());
                self.invalid = true;
            }
        }
    }

    /// Closes the shared library, invalidating every symbol previously
    /// returned by [`Self::find_symbol`]. A no-op if not loaded.
    pub fn unload(&mut self) {
        self.library = None;
    }

    /// Looks up `symbol`. Returns `None` if the library isn't loaded or
    /// the symbol doesn't exist — the host never distinguishes the two
    /// (§4.A).
    pub fn find_symbol<T: Copy>(&self, symbol: &str) -> Option<T> {
        let lib = self.library.as_ref()?;
        unsafe {
            lib.get::<T>(symbol.as_bytes())
                .ok()
                .map(|sym| *sym)
        }
    }

    /// Bumps the user count, loading on the 0→1 transition.
    pub fn add_ref(&mut self) {
        if self.users == 0 {
            self.load();
        }
        self.users += 1;
    }

    /// Drops the user count, unloading on the 1→0 transition. Clamped at
    /// zero; an unbalanced `release_ref` is a caller bug, not a panic.
    pub fn release_ref(&mut self) {
        self.users = self.users.saturating_sub(1);
        if self.users == 0 {
            self.unload();
        }
    }

    #[must_use]
    pub fn ref_count(&self) -> u32 {
        self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_invalid() {
        let binary = Binary::new("/nonexistent/path/to/nothing.so");
        assert!(binary.is_invalid());
        assert!(binary.signature().is_none());
    }

    #[test]
    fn existing_non_library_file_is_not_invalid_but_fails_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a shared library").unwrap();
        let mut binary = Binary::new(file.path());
        assert!(!binary.is_invalid());
        binary.load();
        assert!(binary.is_invalid());
        assert!(!binary.is_loaded());
    }

    #[test]
    fn ref_count_clamps_at_zero() {
        let mut binary = Binary::new("/nonexistent/path/to/nothing.so");
        binary.release_ref();
        binary.release_ref();
        assert_eq!(binary.ref_count(), 0);
    }

    #[test]
    fn ref_unref_balances() {
        let mut binary = Binary::new("/nonexistent/path/to/nothing.so");
        binary.add_ref();
        binary.add_ref();
        assert_eq!(binary.ref_count(), 2);
        binary.release_ref();
        assert_eq!(binary.ref_count(), 1);
    }

    #[test]
    fn find_symbol_on_unloaded_binary_is_none() {
        let binary = Binary::new("/nonexistent/path/to/nothing.so");
        assert!(binary.find_symbol::<extern "C" fn()>("anything").is_none());
    }

    #[test]
    fn refresh_signature_detects_change() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let mut binary = Binary::new(file.path());
        assert!(!binary.refresh_signature());
        file.write_all(b"defgh").unwrap();
        file.flush().unwrap();
        assert!(binary.refresh_signature());
    }
}
