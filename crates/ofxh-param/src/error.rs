use ofxh_abi::OfxStatus;
use ofxh_property::PropertyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamError {
    #[error("unknown parameter '{0}'")]
    Unknown(String),

    #[error("parameter '{name}' is of kind {actual:?}, expected {expected:?}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("parameter '{0}' does not support keyframes")]
    NotAnimatable(String),

    #[error("no keyframe at the requested index")]
    NoSuchKey,

    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl From<&ParamError> for OfxStatus {
    fn from(err: &ParamError) -> Self {
        match err {
            ParamError::Unknown(_) => OfxStatus::ErrBadHandle,
            ParamError::WrongKind { .. } => OfxStatus::ErrValue,
            ParamError::NotAnimatable(_) => OfxStatus::ErrMissingHostFeature,
            ParamError::NoSuchKey => OfxStatus::ErrBadIndex,
            ParamError::Property(e) => e.into(),
        }
    }
}

impl From<ParamError> for OfxStatus {
    fn from(err: ParamError) -> Self {
        (&err).into()
    }
}
