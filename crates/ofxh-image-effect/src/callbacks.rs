/// Virtual properties of an effect instance that only the embedder knows
/// (`ofxhImageEffect.cpp`'s `Instance::getProjectSize` and friends — pure
/// virtuals on the original `Instance`, served here through a get hook
/// instead of subclassing).
pub trait EffectCallbacks: Send + Sync {
    fn project_size(&self) -> (f64, f64);
    fn project_offset(&self) -> (f64, f64);
    fn project_extent(&self) -> (f64, f64);
    fn project_pixel_aspect_ratio(&self) -> f64;
    fn effect_duration(&self) -> f64;
    fn frame_rate(&self) -> f64;

    /// Lets the embedder cancel an in-flight render (`Instance::abort`,
    /// default `false` in the original).
    fn abort(&self) -> bool {
        false
    }
}
