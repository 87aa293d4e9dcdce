use thiserror::Error;

use ofxh_abi::OfxStatus;

/// Failures raised by typed reads/writes against a [`crate::PropertySet`]
/// (§4.B).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("unknown property '{0}'")]
    Unknown(String),

    #[error("property '{0}' is {actual:?}, not {expected:?}", actual = .actual, expected = .expected)]
    BadType {
        name: String,
        expected: crate::value::PropType,
        actual: crate::value::PropType,
    },

    #[error("index {index} out of range for property '{name}' (dimension {dimension})")]
    BadIndex {
        name: String,
        index: usize,
        dimension: usize,
    },

    #[error("property '{0}' is read-only to plug-ins")]
    ReadOnly(String),

    #[error("property '{name}' requires exactly {expected} values, got {actual}")]
    WrongCount {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl From<&PropertyError> for OfxStatus {
    fn from(err: &PropertyError) -> Self {
        match err {
            PropertyError::Unknown(_) => OfxStatus::ErrUnknown,
            PropertyError::BadType { .. } => OfxStatus::ErrValue,
            PropertyError::BadIndex { .. } => OfxStatus::ErrBadIndex,
            PropertyError::ReadOnly(_) => OfxStatus::ErrValue,
            PropertyError::WrongCount { .. } => OfxStatus::ErrValue,
        }
    }
}

impl From<PropertyError> for OfxStatus {
    fn from(err: PropertyError) -> Self {
        (&err).into()
    }
}

/// Failures raised by [`crate::handle::HandleManager`] when resolving an
/// opaque ABI handle back to its host-side object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    #[error("handle does not refer to any known object")]
    Unknown,

    #[error("handle refers to an object that has already been destroyed")]
    Dangling,
}

impl From<HandleError> for OfxStatus {
    fn from(_: HandleError) -> Self {
        OfxStatus::ErrBadHandle
    }
}
