use ofxh_abi::OfxStatus;
use ofxh_image_effect::EffectError;
use ofxh_image_effect_api::PluginApiError;
use ofxh_param::ParamError;
use ofxh_property::{HandleError, PropertyError};
use thiserror::Error;

/// Errors this crate's own entry points (suite functions, [`crate::Host`]
/// methods) can report, one layer above the per-crate errors they wrap.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("unresolvable handle")]
    BadHandle(#[from] HandleError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error(transparent)]
    PluginApi(#[from] PluginApiError),

    #[error("unknown suite '{name}' v{version}")]
    UnknownSuite { name: String, version: i32 },

    #[error("no embedder hooks installed")]
    NoEmbedder,
}

impl From<&HostError> for OfxStatus {
    fn from(err: &HostError) -> Self {
        match err {
            HostError::BadHandle(e) => e.clone().into(),
            HostError::Property(e) => e.into(),
            HostError::Param(e) => e.into(),
            HostError::Effect(e) => e.into(),
            HostError::PluginApi(e) => e.into(),
            HostError::UnknownSuite { .. } => OfxStatus::ErrMissingHostFeature,
            HostError::NoEmbedder => OfxStatus::ErrFatal,
        }
    }
}

impl From<HostError> for OfxStatus {
    fn from(err: HostError) -> Self {
        (&err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_suite_maps_to_missing_host_feature() {
        let err = HostError::UnknownSuite {
            name: "OfxOpenGLRenderSuite".to_string(),
            version: 1,
        };
        assert_eq!(OfxStatus::from(&err), OfxStatus::ErrMissingHostFeature);
    }

    #[test]
    fn bad_handle_maps_through_handle_error() {
        let err = HostError::BadHandle(HandleError::Dangling);
        assert_eq!(OfxStatus::from(&err), OfxStatus::ErrBadHandle);
    }
}
