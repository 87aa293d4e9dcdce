use thiserror::Error;

/// Failures while reading or writing the XML cache (§4.C).
///
/// A malformed document is reported but the caller is expected to discard
/// the *whole* cache on any of these, not attempt partial recovery — this
/// matches the original's behaviour of flipping a single `_ignoreCache`
/// flag the moment anything looks wrong.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("unterminated numeric character reference")]
    UnterminatedCharRef,

    #[error("invalid numeric character reference '{0}'")]
    InvalidCharRef(String),
}
