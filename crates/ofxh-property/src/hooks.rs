use crate::error::PropertyError;
use crate::value::PropScalar;

/// Origin of a write, so read-only enforcement can distinguish ABI traffic
/// from host-internal bookkeeping (§4.B: "writes originating inside the
/// host bypass this flag").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrigin {
    /// The write arrived through the plug-in C ABI (a suite function call).
    Plugin,
    /// The write was made by host code directly (construction, virtual
    /// property seeding, internal bookkeeping).
    Host,
}

/// A get hook intercepts every read of the properties it's installed on;
/// the embedder or another component supplies one implementation that can
/// answer for many different property names (§4.G: clip virtual fields are
/// all served by the owning clip instance through one hook).
pub trait GetHook: Send + Sync {
    fn dimension(&self, name: &str) -> Result<usize, PropertyError>;
    fn get_int(&self, name: &str, index: usize) -> Result<i32, PropertyError>;
    fn get_double(&self, name: &str, index: usize) -> Result<f64, PropertyError>;
    fn get_string(&self, name: &str, index: usize) -> Result<String, PropertyError>;
    fn get_pointer(&self, name: &str, index: usize) -> Result<*mut std::ffi::c_void, PropertyError>;
}

/// A set hook observes every write to the property it's installed on. Set
/// hooks cannot veto or transform the write; they fire strictly after the
/// value has landed in `current` (§4.B).
pub trait SetHook: Send + Sync {
    /// `index_or_count` is the index written for a scalar `set`, or the
    /// number of values written for a bulk `set_n`.
    fn on_set(&self, name: &str, value: &PropScalar, index_or_count: usize);
}

/// A notify hook fires once per `set`/`set_n` call, regardless of how many
/// indices were touched (§4.B).
pub trait NotifyHook: Send + Sync {
    fn on_notify(&self, name: &str);
}
