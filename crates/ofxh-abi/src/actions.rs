//! Fixed wire names for actions dispatched through `mainEntry` (§4.H, §6).

pub const OFX_ACTION_LOAD: &str = "OfxActionLoad";
pub const OFX_ACTION_DESCRIBE: &str = "OfxActionDescribe";
pub const OFX_ACTION_UNLOAD: &str = "OfxActionUnload";
pub const OFX_ACTION_PURGE_CACHES: &str = "OfxActionPurgeCaches";
pub const OFX_ACTION_SYNC_PRIVATE_DATA: &str = "OfxActionSyncPrivateData";
pub const OFX_ACTION_CREATE_INSTANCE: &str = "OfxActionCreateInstance";
pub const OFX_ACTION_DESTROY_INSTANCE: &str = "OfxActionDestroyInstance";
pub const OFX_ACTION_INSTANCE_CHANGED: &str = "OfxActionInstanceChanged";
pub const OFX_ACTION_BEGIN_INSTANCE_CHANGED: &str = "OfxActionBeginInstanceChanged";
pub const OFX_ACTION_END_INSTANCE_CHANGED: &str = "OfxActionEndInstanceChanged";
pub const OFX_ACTION_BEGIN_INSTANCE_EDIT: &str = "OfxActionBeginInstanceEdit";
pub const OFX_ACTION_END_INSTANCE_EDIT: &str = "OfxActionEndInstanceEdit";

pub const OFX_IMAGE_EFFECT_ACTION_DESCRIBE_IN_CONTEXT: &str =
    "OfxImageEffectActionDescribeInContext";
pub const OFX_IMAGE_EFFECT_ACTION_GET_REGION_OF_DEFINITION: &str =
    "OfxImageEffectActionGetRegionOfDefinition";
pub const OFX_IMAGE_EFFECT_ACTION_GET_REGIONS_OF_INTEREST: &str =
    "OfxImageEffectActionGetRegionsOfInterest";
pub const OFX_IMAGE_EFFECT_ACTION_GET_TIME_DOMAIN: &str = "OfxImageEffectActionGetTimeDomain";
pub const OFX_IMAGE_EFFECT_ACTION_GET_FRAMES_NEEDED: &str = "OfxImageEffectActionGetFramesNeeded";
pub const OFX_IMAGE_EFFECT_ACTION_IS_IDENTITY: &str = "OfxImageEffectActionIsIdentity";
pub const OFX_IMAGE_EFFECT_ACTION_RENDER: &str = "OfxImageEffectActionRender";
pub const OFX_IMAGE_EFFECT_ACTION_BEGIN_SEQUENCE_RENDER: &str =
    "OfxImageEffectActionBeginSequenceRender";
pub const OFX_IMAGE_EFFECT_ACTION_END_SEQUENCE_RENDER: &str =
    "OfxImageEffectActionEndSequenceRender";
pub const OFX_IMAGE_EFFECT_ACTION_GET_CLIP_PREFERENCES: &str =
    "OfxImageEffectActionGetClipPreferences";

pub const OFX_INTERACT_ACTION_DRAW: &str = "OfxInteractActionDraw";
pub const OFX_INTERACT_ACTION_PEN_MOTION: &str = "OfxInteractActionPenMotion";
pub const OFX_INTERACT_ACTION_PEN_DOWN: &str = "OfxInteractActionPenDown";
pub const OFX_INTERACT_ACTION_PEN_UP: &str = "OfxInteractActionPenUp";
pub const OFX_INTERACT_ACTION_KEY_DOWN: &str = "OfxInteractActionKeyDown";
pub const OFX_INTERACT_ACTION_KEY_UP: &str = "OfxInteractActionKeyUp";
pub const OFX_INTERACT_ACTION_KEY_REPEAT: &str = "OfxInteractActionKeyRepeat";
pub const OFX_INTERACT_ACTION_GAIN_FOCUS: &str = "OfxInteractActionGainFocus";
pub const OFX_INTERACT_ACTION_LOSE_FOCUS: &str = "OfxInteractActionLoseFocus";
