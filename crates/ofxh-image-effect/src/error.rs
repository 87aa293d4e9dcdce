use ofxh_abi::OfxStatus;
use ofxh_clip::ClipError;
use ofxh_interact::InteractError;
use ofxh_param::ParamError;
use ofxh_property::PropertyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EffectError {
    #[error("unknown clip '{0}'")]
    UnknownClip(String),

    #[error("action '{action}' dispatched out of order: {reason}")]
    OutOfOrder { action: &'static str, reason: &'static str },

    #[error("plug-in mainEntry returned {0}")]
    PluginFailed(OfxStatus),

    #[error("plug-in panicked during '{0}'")]
    PluginPanicked(&'static str),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Clip(#[from] ClipError),

    #[error(transparent)]
    Interact(#[from] InteractError),
}

impl From<&EffectError> for OfxStatus {
    fn from(err: &EffectError) -> Self {
        match err {
            EffectError::UnknownClip(_) => OfxStatus::ErrBadHandle,
            EffectError::OutOfOrder { .. } => OfxStatus::ErrBadHandle,
            EffectError::PluginFailed(status) => *status,
            EffectError::PluginPanicked(_) => OfxStatus::Failed,
            EffectError::Property(e) => e.into(),
            EffectError::Param(e) => e.into(),
            EffectError::Clip(e) => e.into(),
            EffectError::Interact(e) => e.into(),
        }
    }
}

impl From<EffectError> for OfxStatus {
    fn from(err: EffectError) -> Self {
        (&err).into()
    }
}
