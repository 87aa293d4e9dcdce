use ofxh_abi::OfxStatus;
use ofxh_property::PropertyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipError {
    #[error("unknown clip '{0}'")]
    Unknown(String),
    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl From<&ClipError> for OfxStatus {
    fn from(err: &ClipError) -> Self {
        match err {
            ClipError::Unknown(_) => OfxStatus::ErrBadHandle,
            ClipError::Property(e) => e.into(),
        }
    }
}

impl From<ClipError> for OfxStatus {
    fn from(err: ClipError) -> Self {
        (&err).into()
    }
}
