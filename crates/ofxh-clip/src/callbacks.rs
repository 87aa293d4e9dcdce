/// Embedder-supplied answers for a clip's virtual (get-hook-served)
/// properties (`ofxhClip.h::Instance`'s pure virtuals). One implementation
/// per concrete clip the embedder exposes; the host never computes these
/// values itself.
pub trait ClipCallbacks: Send + Sync {
    fn pixel_depth(&self) -> String;
    fn components(&self) -> String;
    fn unmapped_bit_depth(&self) -> String;
    fn unmapped_components(&self) -> String;
    fn premult(&self) -> String;
    fn aspect_ratio(&self) -> f64;
    fn frame_rate(&self) -> f64;
    fn frame_range(&self) -> (f64, f64);
    fn field_order(&self) -> String;
    fn connected(&self) -> bool;
    fn unmapped_frame_rate(&self) -> f64;
    fn unmapped_frame_range(&self) -> (f64, f64);
    fn continuous_samples(&self) -> bool;

    /// The clip's region of definition at `time` (x1, y1, x2, y2).
    fn region_of_definition(&self, time: f64) -> (f64, f64, f64, f64);
}
