use std::fmt;

/// Wire-format OFX status code, as returned by `mainEntry` and every suite
/// function. Values are fixed by the OFX specification and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum OfxStatus {
    /// `kOfxStatOK`
    Ok = 0,
    /// `kOfxStatFailed`
    Failed = 1,
    /// `kOfxStatErrFatal`
    ErrFatal = 2,
    /// `kOfxStatErrUnknown`
    ErrUnknown = 3,
    /// `kOfxStatErrMissingHostFeature`
    ErrMissingHostFeature = 4,
    /// `kOfxStatErrUnsupported`
    ErrUnsupported = 5,
    /// `kOfxStatErrExists`
    ErrExists = 6,
    /// `kOfxStatErrFormat`
    ErrFormat = 7,
    /// `kOfxStatErrMemory`
    ErrMemory = 8,
    /// `kOfxStatErrBadHandle`
    ErrBadHandle = 9,
    /// `kOfxStatErrBadIndex`
    ErrBadIndex = 10,
    /// `kOfxStatErrValue`
    ErrValue = 11,
    /// `kOfxStatReplyYes`
    ReplyYes = 12,
    /// `kOfxStatReplyNo`
    ReplyNo = 13,
    /// `kOfxStatReplyDefault`
    ReplyDefault = 14,
}

impl OfxStatus {
    /// `ok` and `default` are both successes at the action-dispatch layer (§4.H).
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::ReplyDefault)
    }

    /// Convert a raw wire value returned across the C ABI. Unrecognized
    /// values (a misbehaving plugin) fold to `ErrUnknown` rather than panic.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Ok,
            1 => Self::Failed,
            2 => Self::ErrFatal,
            3 => Self::ErrUnknown,
            4 => Self::ErrMissingHostFeature,
            5 => Self::ErrUnsupported,
            6 => Self::ErrExists,
            7 => Self::ErrFormat,
            8 => Self::ErrMemory,
            9 => Self::ErrBadHandle,
            10 => Self::ErrBadIndex,
            11 => Self::ErrValue,
            12 => Self::ReplyYes,
            13 => Self::ReplyNo,
            14 => Self::ReplyDefault,
            _ => Self::ErrUnknown,
        }
    }

    #[must_use]
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for OfxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::Failed => "failed",
            Self::ErrFatal => "fatal",
            Self::ErrUnknown => "unknown",
            Self::ErrMissingHostFeature => "missing host feature",
            Self::ErrUnsupported => "unsupported",
            Self::ErrExists => "exists",
            Self::ErrFormat => "format",
            Self::ErrMemory => "memory",
            Self::ErrBadHandle => "bad handle",
            Self::ErrBadIndex => "bad index",
            Self::ErrValue => "value",
            Self::ReplyYes => "yes",
            Self::ReplyNo => "no",
            Self::ReplyDefault => "default",
        };
        f.write_str(name)
    }
}

impl From<i32> for OfxStatus {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

impl From<OfxStatus> for i32 {
    fn from(status: OfxStatus) -> Self {
        status.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_value() {
        for raw in 0..=14 {
            assert_eq!(OfxStatus::from_raw(raw).as_raw(), raw);
        }
    }

    #[test]
    fn unknown_raw_folds_to_err_unknown() {
        assert_eq!(OfxStatus::from_raw(999), OfxStatus::ErrUnknown);
    }

    #[test]
    fn ok_and_default_are_success() {
        assert!(OfxStatus::Ok.is_success());
        assert!(OfxStatus::ReplyDefault.is_success());
        assert!(!OfxStatus::Failed.is_success());
    }
}
