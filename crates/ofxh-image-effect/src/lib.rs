//! Image-effect descriptors/instances and the action-dispatch funnel every
//! plug-in call flows through (§4.H).
//!
//! An [`ImageEffectDescriptor`] is what a plug-in declared at `describe`
//! time; an [`ImageEffectInstance`] is a live instantiation of it in one
//! context, holding its own clips and parameters and calling back into the
//! plug-in's `mainEntry` through [`dispatch::call_action`] for every action.

#![allow(unsafe_code)]

mod callbacks;
mod descriptor;
pub mod dispatch;
mod error;
mod hook;
mod instance;

pub use callbacks::EffectCallbacks;
pub use descriptor::ImageEffectDescriptor;
pub use dispatch::{call_action, MainEntryFn};
pub use error::EffectError;
pub use hook::EffectGetHook;
pub use instance::{resolve_handle, ClipPreferences, ImageEffectInstance};
