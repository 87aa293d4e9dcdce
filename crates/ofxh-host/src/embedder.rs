//! The embedder contract (§6 "Host surface"): everything a concrete host
//! application plugs in that this crate cannot supply generically.
//!
//! The original's `newInstance`/three `makeDescriptor` overloads existed so
//! an embedder could hand back its own `Effect::Instance`/`Descriptor`
//! subclasses; this redesign already owns concrete
//! [`ofxh_image_effect::ImageEffectInstance`]/[`ofxh_image_effect::ImageEffectDescriptor`]
//! types (§9 "capability interfaces" redesign note), so the embedder's job
//! narrows to supplying the *behavioural* virtuals those concrete types
//! call back into — project geometry, clip geometry, message delivery —
//! rather than constructing the objects themselves.

use std::sync::Arc;

use ofxh_abi::{properties::message_type, OfxStatus};
use ofxh_clip::ClipCallbacks;
use ofxh_image_effect::EffectCallbacks;

/// Category tag for a plug-in-originated message (§7: "category tags
/// (`log`/`error`/`fatal`/`question`/`message`)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Log,
    Error,
    Fatal,
    Question,
    Message,
}

impl MessageType {
    #[must_use]
    pub fn wire_str(self) -> &'static str {
        match self {
            Self::Log => message_type::LOG,
            Self::Error => message_type::ERROR,
            Self::Fatal => message_type::FATAL,
            Self::Question => message_type::QUESTION,
            Self::Message => message_type::MESSAGE,
        }
    }
}

/// Everything the embedder implements to finish the host (§6). A [`crate::Host`]
/// holds one `Arc<dyn EmbedderHooks>` and calls through it for every
/// instance it creates and every message a plug-in sends.
pub trait EmbedderHooks: Send + Sync {
    /// Supplies the project-geometry/timing virtuals a freshly created
    /// effect instance needs (`newInstance`'s role narrowed to the
    /// behavioural half, since the object itself is always an
    /// `ImageEffectInstance`).
    fn new_effect_callbacks(&self, plugin_identifier: &str, context: &str) -> Arc<dyn EffectCallbacks>;

    /// Supplies one clip's geometry/connection virtuals, called once per
    /// clip a descriptor declared (the clip-factory half of the embedder
    /// contract).
    fn new_clip_callbacks(&self, plugin_identifier: &str, context: &str, clip_name: &str) -> Arc<dyn ClipCallbacks>;

    /// Routes a `message`-suite call to the embedder's UI/log. A `question`
    /// message's return status is the caller-visible reply
    /// (`replyYes`/`replyNo`/`replyDefault`); every other kind's return
    /// value is advisory only.
    fn vmessage(&self, message_type: MessageType, id: &str, text: &str) -> OfxStatus;

    /// Records a persistent (sticky) message against whatever the embedder
    /// considers "this instance" (usually surfaced in a node's UI until
    /// explicitly cleared).
    fn set_persistent_message(&self, message_type: MessageType, id: &str, text: &str);

    fn clear_persistent_message(&self);

    /// Optional: releases any OpenGL-backed resources the embedder holds
    /// for a plug-in's overlay. No-op by default, since overlay/OpenGL
    /// state is otherwise entirely out of scope here (§9 Non-goals).
    fn flush_opengl_resources(&self) {}
}
