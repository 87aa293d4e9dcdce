use ofxh_abi::OfxStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginApiError {
    #[error("binary is missing OfxGetPlugin or the plug-in index is out of range")]
    MissingEntryPoint,

    #[error("'{action}' returned {status}")]
    ActionFailed { action: &'static str, status: OfxStatus },

    #[error("context '{0}' is not among the plug-in's declared contexts")]
    UnknownContext(String),

    #[error("describeInContext('{context}') returned {status}")]
    DescribeInContextFailed { context: String, status: OfxStatus },
}

impl From<&PluginApiError> for OfxStatus {
    fn from(err: &PluginApiError) -> Self {
        match err {
            PluginApiError::MissingEntryPoint => OfxStatus::ErrBadHandle,
            PluginApiError::ActionFailed { status, .. } => *status,
            PluginApiError::UnknownContext(_) => OfxStatus::ErrValue,
            PluginApiError::DescribeInContextFailed { status, .. } => *status,
        }
    }
}

impl From<PluginApiError> for OfxStatus {
    fn from(err: PluginApiError) -> Self {
        (&err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_context_maps_to_err_value() {
        let err = PluginApiError::UnknownContext("OfxImageEffectContextGeneral".to_string());
        assert_eq!(OfxStatus::from(&err), OfxStatus::ErrValue);
    }

    #[test]
    fn action_failed_passes_through_its_status() {
        let err = PluginApiError::ActionFailed { action: "OfxActionLoad", status: OfxStatus::ErrFatal };
        assert_eq!(OfxStatus::from(&err), OfxStatus::ErrFatal);
    }

    #[test]
    fn describe_in_context_failed_passes_through_its_status() {
        let err = PluginApiError::DescribeInContextFailed {
            context: "OfxImageEffectContextFilter".to_string(),
            status: OfxStatus::Failed,
        };
        assert_eq!(OfxStatus::from(&err), OfxStatus::Failed);
    }

    #[test]
    fn missing_entry_point_maps_to_err_bad_handle() {
        assert_eq!(OfxStatus::from(&PluginApiError::MissingEntryPoint), OfxStatus::ErrBadHandle);
    }

    #[test]
    fn owned_conversion_matches_by_reference() {
        let err = PluginApiError::UnknownContext("x".to_string());
        let status: OfxStatus = err.into();
        assert_eq!(status, OfxStatus::ErrValue);
    }
}
