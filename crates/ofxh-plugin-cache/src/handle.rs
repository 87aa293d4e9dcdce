use std::sync::{Arc, Mutex};

use ofxh_binary::Binary;

/// RAII wrapper that keeps a binary loaded for the duration of an action
/// dispatch sequence. Grounded in `ofxhPluginCache.cpp`'s `PluginHandle`,
/// whose constructor/destructor pair are the only place that calls
/// `Binary::ref_`/`unref` around a `load`→`...`→`unload` action sequence.
pub struct PluginHandle {
    binary: Arc<Mutex<Binary>>,
}

impl PluginHandle {
    #[must_use]
    pub fn new(binary: Arc<Mutex<Binary>>) -> Self {
        binary.lock().expect("binary mutex poisoned").add_ref();
        Self { binary }
    }

    #[must_use]
    pub fn binary(&self) -> &Arc<Mutex<Binary>> {
        &self.binary
    }
}

impl Drop for PluginHandle {
    fn drop(&mut self) {
        self.binary.lock().expect("binary mutex poisoned").release_ref();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_refs_on_construct_and_unrefs_on_drop() {
        let binary = Arc::new(Mutex::new(Binary::new("/nonexistent/nothing.so")));
        {
            let handle = PluginHandle::new(Arc::clone(&binary));
            assert_eq!(binary.lock().unwrap().ref_count(), 1);
            drop(handle);
        }
        assert_eq!(binary.lock().unwrap().ref_count(), 0);
    }
}
