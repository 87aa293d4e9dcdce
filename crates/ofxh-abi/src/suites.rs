//! Fixed wire names for the suites a host can hand out via `fetchSuite` (§6).

pub const OFX_PROPERTY_SUITE: &str = "OfxPropertySuite";
pub const OFX_PARAMETER_SUITE: &str = "OfxParameterSuite";
pub const OFX_IMAGE_EFFECT_SUITE: &str = "OfxImageEffectSuite";
pub const OFX_MEMORY_SUITE: &str = "OfxMemorySuite";
pub const OFX_MULTI_THREAD_SUITE: &str = "OfxMultiThreadSuite";
pub const OFX_MESSAGE_SUITE: &str = "OfxMessageSuite";
pub const OFX_INTERACT_SUITE: &str = "OfxInteractSuite";
pub const OFX_PROGRESS_SUITE: &str = "OfxProgressSuite";
pub const OFX_TIME_LINE_SUITE: &str = "OfxTimeLineSuite";

/// Every suite in this host implements only version 1 (§4.F Open Question:
/// "only v1 of each suite appears in the source; hosts advertising higher
/// versions must define behaviour explicitly" — we don't, so we refuse).
pub const SUPPORTED_SUITE_VERSION: i32 = 1;
