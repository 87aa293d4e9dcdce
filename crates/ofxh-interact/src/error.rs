use ofxh_abi::OfxStatus;
use ofxh_property::PropertyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InteractError {
    #[error("unknown interact property '{0}'")]
    Unknown(String),
    #[error("host does not support writable interact properties")]
    Unsupported,
    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl From<&InteractError> for OfxStatus {
    fn from(err: &InteractError) -> Self {
        match err {
            InteractError::Unknown(_) => OfxStatus::ErrValue,
            InteractError::Unsupported => OfxStatus::ErrMissingHostFeature,
            InteractError::Property(e) => e.into(),
        }
    }
}

impl From<InteractError> for OfxStatus {
    fn from(err: InteractError) -> Self {
        (&err).into()
    }
}
