/// Narrow callback surface implemented by an image-effect instance so that
/// parameter and clip instances can schedule `instanceChanged` without
/// depending on the image-effect crate directly — the cyclic
/// effect↔clip/param relationship is broken by holding a `Weak<dyn
/// ChangeSink>` here instead of a concrete type (see workspace dependency
/// notes).
pub trait ChangeSink: Send + Sync {
    /// A parameter's value changed through the suite; schedule
    /// `instanceChanged` with `paramName` set.
    fn param_changed(&self, param_name: &str);

    /// A clip's connection or preferences changed; schedule
    /// `instanceChanged` with `clipName` set.
    fn clip_changed(&self, clip_name: &str);
}
