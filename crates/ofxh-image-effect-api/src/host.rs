use ofxh_abi::OfxHost;

/// Supplies the `OfxHost*` a freshly resolved plug-in's `set_host` must be
/// called with before `load`/`describe` (`PluginHandle::PluginHandle`
/// calling `_op->setHost(host->getHandle())`).
///
/// This cache only needs a raw, stable pointer to pass across the ABI — it
/// has no business owning the host facade itself, so the facade (built
/// separately) is the thing that implements this, not the other way
/// around.
pub trait HostHandleSource: Send + Sync {
    fn ofx_host_handle(&self) -> *const OfxHost;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct FixedHost(*const OfxHost);

    unsafe impl Send for FixedHost {}
    unsafe impl Sync for FixedHost {}

    impl HostHandleSource for FixedHost {
        fn ofx_host_handle(&self) -> *const OfxHost {
            self.0
        }
    }

    #[test]
    fn returns_the_pointer_it_was_built_with() {
        let sentinel = 0x1234_usize as *const OfxHost;
        let source = FixedHost(sentinel);
        assert_eq!(source.ofx_host_handle(), sentinel);
    }

    #[test]
    fn trait_object_is_send_and_sync() {
        fn assert_bounds<T: Send + Sync>() {}
        assert_bounds::<Arc<dyn HostHandleSource>>();
    }
}
