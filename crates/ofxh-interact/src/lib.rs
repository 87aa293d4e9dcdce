//! Overlay interact descriptors/instances and the draw/pen/key/focus action
//! surface a plug-in's custom UI is dispatched through (§4.I).

mod callbacks;
mod descriptor;
mod dispatch;
mod error;
mod hook;
mod instance;

pub use callbacks::InteractCallbacks;
pub use descriptor::InteractDescriptor;
pub use dispatch::OverlayDispatch;
pub use error::InteractError;
pub use hook::InteractGetHook;
pub use instance::InteractInstance;
