use ofxh_abi::OfxStatus;

/// Geometry and rendering surface an embedder provides for one overlay
/// instance (`ofxhInteract.h::Instance`'s pure-virtual `getViewportSize`,
/// `getPixelScale`, `getBackgroundColour`, `swapBuffers`, `redraw`). The host
/// itself has no notion of a window system; every field here is virtual.
pub trait InteractCallbacks: Send + Sync {
    fn viewport_size(&self) -> (f64, f64);
    fn pixel_scale(&self) -> (f64, f64);
    fn background_colour(&self) -> (f64, f64, f64);
    fn swap_buffers(&self) -> OfxStatus;
    fn redraw(&self) -> OfxStatus;
}
