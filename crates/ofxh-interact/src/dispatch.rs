use ofxh_abi::OfxStatus;
use ofxh_property::PropertySet;

/// The owning effect's overlay entry point (`ofxhInteract.cpp`'s calls to
/// `_effect.overlayEntry(action, handle, argsHandle, 0)`). An
/// [`crate::InteractInstance`] never calls a plug-in directly — building the
/// argument property set is this crate's job, actually crossing the C ABI is
/// the effect instance's.
pub trait OverlayDispatch: Send + Sync {
    fn overlay_entry(&self, action: &str, in_args: &PropertySet) -> OfxStatus;
}
