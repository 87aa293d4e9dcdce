//! `OfxMessageSuiteV1` (§4.F "Message Suite", §7 "category tags").
//!
//! The real ABI's `message`/`setPersistentMessage` take a C `printf`-style
//! `format, ...` tail; stable Rust has no variadic-call support, so — per
//! the same "decode positional arguments, route to a typed method, no
//! variadic machinery beyond the ABI stub" principle the parameter suite
//! uses for its per-kind value arguments — this suite's ABI stub takes one
//! already-formatted `text` argument instead of a format string plus
//! varargs. An embedder wanting `printf`-style substitution formats the
//! string on its own side of the call before invoking the suite function,
//! exactly as a C plug-in would have to format it before calling
//! `message()` itself.
//!
//! Every function routes to the active [`crate::Host`]'s
//! [`EmbedderHooks`](crate::EmbedderHooks), since the handle argument these
//! real functions take identifies the calling *instance*, not the host —
//! reaching the embedder still goes through [`Host::current`].

use std::ffi::{c_char, CStr};

use ofxh_abi::properties::message_type;
use ofxh_abi::{OfxImageEffectHandle, OfxStatus};

use crate::embedder::MessageType;
use crate::host::Host;

#[repr(C)]
pub struct OfxMessageSuiteV1 {
    pub message: extern "C" fn(OfxImageEffectHandle, *const c_char, *const c_char, *const c_char) -> i32,
    pub set_persistent_message: extern "C" fn(OfxImageEffectHandle, *const c_char, *const c_char, *const c_char) -> i32,
    pub clear_persistent_message: extern "C" fn(OfxImageEffectHandle) -> i32,
}

pub static SUITE: OfxMessageSuiteV1 = OfxMessageSuiteV1 {
    message,
    set_persistent_message,
    clear_persistent_message,
};

fn parse_message_type(wire: &str) -> MessageType {
    match wire {
        s if s == message_type::ERROR => MessageType::Error,
        s if s == message_type::FATAL => MessageType::Fatal,
        s if s == message_type::QUESTION => MessageType::Question,
        s if s == message_type::MESSAGE => MessageType::Message,
        _ => MessageType::Log,
    }
}

unsafe fn c_str<'a>(ptr: *const c_char) -> &'a str {
    CStr::from_ptr(ptr).to_str().unwrap_or("")
}

extern "C" fn message(_handle: OfxImageEffectHandle, message_type: *const c_char, id: *const c_char, text: *const c_char) -> i32 {
    let Some(host) = Host::current() else {
        return OfxStatus::ErrFatal.as_raw();
    };
    let kind = parse_message_type(unsafe { c_str(message_type) });
    let id = unsafe { c_str(id) };
    let text = unsafe { c_str(text) };
    host.embedder().vmessage(kind, id, text).as_raw()
}

extern "C" fn set_persistent_message(_handle: OfxImageEffectHandle, message_type: *const c_char, id: *const c_char, text: *const c_char) -> i32 {
    let Some(host) = Host::current() else {
        return OfxStatus::ErrFatal.as_raw();
    };
    let kind = parse_message_type(unsafe { c_str(message_type) });
    let id = unsafe { c_str(id) };
    let text = unsafe { c_str(text) };
    host.embedder().set_persistent_message(kind, id, text);
    OfxStatus::Ok.as_raw()
}

extern "C" fn clear_persistent_message(_handle: OfxImageEffectHandle) -> i32 {
    let Some(host) = Host::current() else {
        return OfxStatus::ErrFatal.as_raw();
    };
    host.embedder().clear_persistent_message();
    OfxStatus::Ok.as_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use crate::host::HostConfig;
    use ofxh_clip::ClipCallbacks;
    use ofxh_image_effect::EffectCallbacks;

    struct RecordingEmbedder {
        received: AtomicBool,
    }

    impl crate::EmbedderHooks for RecordingEmbedder {
        fn new_effect_callbacks(&self, _plugin_identifier: &str, _context: &str) -> Arc<dyn EffectCallbacks> {
            unimplemented!("not exercised by message-suite tests")
        }

        fn new_clip_callbacks(&self, _plugin_identifier: &str, _context: &str, _clip_name: &str) -> Arc<dyn ClipCallbacks> {
            unimplemented!("not exercised by message-suite tests")
        }

        fn vmessage(&self, _message_type: MessageType, _id: &str, _text: &str) -> OfxStatus {
            self.received.store(true, Ordering::SeqCst);
            OfxStatus::ReplyDefault
        }

        fn set_persistent_message(&self, _message_type: MessageType, _id: &str, _text: &str) {
            self.received.store(true, Ordering::SeqCst);
        }

        fn clear_persistent_message(&self) {
            self.received.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn message_routes_to_the_active_embedder() {
        let _guard = crate::host::ACTIVE_HOST_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let embedder = Arc::new(RecordingEmbedder { received: AtomicBool::new(false) });
        let host = Host::new(HostConfig::default(), embedder.clone());

        let kind = CString::new(message_type::LOG).unwrap();
        let id = CString::new("node-1").unwrap();
        let text = CString::new("hello").unwrap();
        let status = message(OfxImageEffectHandle::NULL, kind.as_ptr(), id.as_ptr(), text.as_ptr());

        assert_eq!(status, OfxStatus::ReplyDefault.as_raw());
        assert!(embedder.received.load(Ordering::SeqCst));
        host.shutdown();
    }

    #[test]
    fn no_active_host_reports_fatal() {
        let _guard = crate::host::ACTIVE_HOST_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let embedder = Arc::new(RecordingEmbedder { received: AtomicBool::new(false) });
        let host = Host::new(HostConfig::default(), embedder);
        host.shutdown();

        let kind = CString::new(message_type::LOG).unwrap();
        let id = CString::new("node-1").unwrap();
        let text = CString::new("hello").unwrap();
        let status = message(OfxImageEffectHandle::NULL, kind.as_ptr(), id.as_ptr(), text.as_ptr());
        assert_eq!(status, OfxStatus::ErrFatal.as_raw());
    }
}
