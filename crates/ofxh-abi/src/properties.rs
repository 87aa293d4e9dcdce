//! Fixed wire names for properties (§3, §4.F, §4.G, §4.H) and the string
//! enumerations ("value types") those properties take.

// Generic
pub const OFX_PROP_TYPE: &str = "OfxPropType";
pub const OFX_PROP_NAME: &str = "OfxPropName";
pub const OFX_PROP_LABEL: &str = "OfxPropLabel";
pub const OFX_PROP_SHORT_LABEL: &str = "OfxPropShortLabel";
pub const OFX_PROP_LONG_LABEL: &str = "OfxPropLongLabel";
pub const OFX_PROP_VERSION: &str = "OfxPropVersion";
pub const OFX_PROP_VERSION_LABEL: &str = "OfxPropVersionLabel";
pub const OFX_PROP_API_VERSION: &str = "OfxPropAPIVersion";
pub const OFX_PROP_TIME: &str = "OfxPropTime";
pub const OFX_PROP_IS_INTERACTIVE: &str = "OfxPropIsInteractive";

// Host properties
pub const OFX_IMAGE_EFFECT_HOST_PROP_IS_BACKGROUND: &str = "OfxImageEffectHostPropIsBackground";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTS_OVERLAYS: &str = "OfxImageEffectPropSupportsOverlays";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTI_RESOLUTION: &str =
    "OfxImageEffectPropSupportsMultiResolution";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES: &str = "OfxImageEffectPropSupportsTiles";
pub const OFX_IMAGE_EFFECT_PROP_TEMPORAL_CLIP_ACCESS: &str =
    "OfxImageEffectPropTemporalClipAccess";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_DEPTHS: &str =
    "OfxImageEffectPropSupportsMultipleClipDepths";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTS_MULTIPLE_CLIP_PARS: &str =
    "OfxImageEffectPropSupportsMultipleClipPARs";
pub const OFX_IMAGE_EFFECT_PROP_SETABLE_FRAME_RATE: &str = "OfxImageEffectPropSetableFrameRate";
pub const OFX_IMAGE_EFFECT_PROP_SETABLE_FIELDING: &str = "OfxImageEffectPropSetableFielding";
pub const OFX_IMAGE_EFFECT_INSTANCE_PROP_SEQUENTIAL_RENDER: &str =
    "OfxImageEffectInstancePropSequentialRender";
pub const OFX_PARAM_HOST_PROP_SUPPORTS_STRING_ANIMATION: &str =
    "OfxParamHostPropSupportsStringAnimation";
pub const OFX_PARAM_HOST_PROP_SUPPORTS_CUSTOM_INTERACT: &str =
    "OfxParamHostPropSupportsCustomInteract";
pub const OFX_PARAM_HOST_PROP_SUPPORTS_CHOICE_ANIMATION: &str =
    "OfxParamHostPropSupportsChoiceAnimation";
pub const OFX_PARAM_HOST_PROP_SUPPORTS_BOOLEAN_ANIMATION: &str =
    "OfxParamHostPropSupportsBooleanAnimation";
pub const OFX_PARAM_HOST_PROP_SUPPORTS_CUSTOM_ANIMATION: &str =
    "OfxParamHostPropSupportsCustomAnimation";
pub const OFX_PARAM_HOST_PROP_SUPPORTS_PARAMETRIC_ANIMATION: &str =
    "OfxParamHostPropSupportsParametricAnimation";
pub const OFX_PARAM_HOST_PROP_MAX_PARAMETERS: &str = "OfxParamHostPropMaxParameters";
pub const OFX_PARAM_HOST_PROP_MAX_PAGES: &str = "OfxParamHostPropMaxPages";
pub const OFX_PARAM_HOST_PROP_PAGE_ROW_COLUMN_COUNT: &str = "OfxParamHostPropPageRowColumnCount";

// Image-effect plugin / descriptor properties
pub const OFX_IMAGE_EFFECT_PLUGIN_PROP_GROUPING: &str = "OfxImageEffectPluginPropGrouping";
pub const OFX_IMAGE_EFFECT_PLUGIN_PROP_SINGLE_INSTANCE: &str =
    "OfxImageEffectPluginPropSingleInstance";
pub const OFX_IMAGE_EFFECT_PLUGIN_RENDER_THREAD_SAFETY: &str =
    "OfxImageEffectPluginRenderThreadSafety";
pub const OFX_IMAGE_EFFECT_PLUGIN_PROP_HOST_FRAME_THREADING: &str =
    "OfxImageEffectPluginPropHostFrameThreading";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTED_CONTEXTS: &str = "OfxImageEffectPropSupportedContexts";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTED_PIXEL_DEPTHS: &str =
    "OfxImageEffectPropSupportedPixelDepths";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTED_COMPONENTS: &str =
    "OfxImageEffectPropSupportedComponents";
pub const OFX_IMAGE_EFFECT_PLUGIN_PROP_FIELD_RENDER_TWICE_ALWAYS: &str =
    "OfxImageEffectPluginPropFieldRenderTwiceAlways";
pub const OFX_IMAGE_EFFECT_PROP_CONTEXT: &str = "OfxImageEffectPropContext";
pub const OFX_IMAGE_EFFECT_PLUGIN_PROP_OVERLAY_INTERACT_V1: &str =
    "OfxImageEffectPluginPropOverlayInteractV1";
pub const OFX_PLUGIN_PROP_FILE_PATH: &str = "OfxPluginPropFilePath";
pub const OFX_PROP_CHANGE_REASON: &str = "OfxPropChangeReason";
pub const OFX_PROP_INSTANCE_DATA: &str = "OfxPropInstanceData";

// Effect-instance virtual properties, served through a get hook back to the
// embedder (`ofxhImageEffect.cpp`'s `effectInstanceStuff`).
pub const OFX_IMAGE_EFFECT_PROP_PROJECT_SIZE: &str = "OfxImageEffectPropProjectSize";
pub const OFX_IMAGE_EFFECT_PROP_PROJECT_OFFSET: &str = "OfxImageEffectPropProjectOffset";
pub const OFX_IMAGE_EFFECT_PROP_PROJECT_EXTENT: &str = "OfxImageEffectPropProjectExtent";
pub const OFX_IMAGE_EFFECT_PROP_PROJECT_PIXEL_ASPECT_RATIO: &str =
    "OfxImageEffectPropProjectPixelAspectRatio";
pub const OFX_IMAGE_EFFECT_INSTANCE_PROP_EFFECT_DURATION: &str =
    "OfxImageEffectInstancePropEffectDuration";
pub const OFX_IMAGE_EFFECT_PROP_CLIP_PREFERENCES_SLAVE_PARAM: &str =
    "OfxImageEffectPropClipPreferencesSlaveParam";

pub const OFX_IMAGE_EFFECT_CONTEXT_GENERATOR: &str = "OfxImageEffectContextGenerator";
pub const OFX_IMAGE_EFFECT_CONTEXT_FILTER: &str = "OfxImageEffectContextFilter";
pub const OFX_IMAGE_EFFECT_CONTEXT_TRANSITION: &str = "OfxImageEffectContextTransition";
pub const OFX_IMAGE_EFFECT_CONTEXT_PAINT: &str = "OfxImageEffectContextPaint";
pub const OFX_IMAGE_EFFECT_CONTEXT_GENERAL: &str = "OfxImageEffectContextGeneral";
pub const OFX_IMAGE_EFFECT_CONTEXT_RETIMER: &str = "OfxImageEffectContextRetimer";
pub const OFX_IMAGE_EFFECT_CONTEXT_READER: &str = "OfxImageEffectContextReader";
pub const OFX_IMAGE_EFFECT_CONTEXT_WRITER: &str = "OfxImageEffectContextWriter";

// Clip descriptor/instance properties
pub const OFX_IMAGE_CLIP_PROP_SUPPORTED_COMPONENTS: &str = "OfxImageClipPropSupportedComponents";
pub const OFX_IMAGE_CLIP_PROP_TEMPORAL_CLIP_ACCESS: &str = "OfxImageClipPropTemporalClipAccess";
pub const OFX_IMAGE_CLIP_PROP_OPTIONAL: &str = "OfxImageClipPropOptional";
pub const OFX_IMAGE_CLIP_PROP_IS_MASK: &str = "OfxImageClipPropIsMask";
pub const OFX_IMAGE_CLIP_PROP_FIELD_EXTRACTION: &str = "OfxImageClipPropFieldExtraction";
pub const OFX_IMAGE_EFFECT_PROP_SUPPORTS_TILES_CLIP: &str = "OfxImageEffectPropSupportsTiles";

pub const OFX_IMAGE_EFFECT_PROP_PIXEL_DEPTH: &str = "OfxImageEffectPropPixelDepth";
pub const OFX_IMAGE_EFFECT_PROP_COMPONENTS: &str = "OfxImageEffectPropComponents";
pub const OFX_IMAGE_CLIP_PROP_UNMAPPED_PIXEL_DEPTH: &str = "OfxImageClipPropUnmappedPixelDepth";
pub const OFX_IMAGE_CLIP_PROP_UNMAPPED_COMPONENTS: &str = "OfxImageClipPropUnmappedComponents";
pub const OFX_IMAGE_EFFECT_PROP_PRE_MULTIPLICATION: &str = "OfxImageEffectPropPreMultiplication";
pub const OFX_IMAGE_PROP_PIXEL_ASPECT_RATIO: &str = "OfxImagePropPixelAspectRatio";
pub const OFX_IMAGE_EFFECT_PROP_FRAME_RATE: &str = "OfxImageEffectPropFrameRate";
pub const OFX_IMAGE_EFFECT_PROP_FRAME_RANGE: &str = "OfxImageEffectPropFrameRange";
pub const OFX_IMAGE_CLIP_PROP_FIELD_ORDER: &str = "OfxImageClipPropFieldOrder";
pub const OFX_IMAGE_CLIP_PROP_CONNECTED: &str = "OfxImageClipPropConnected";
pub const OFX_IMAGE_CLIP_PROP_UNMAPPED_FRAME_RATE: &str = "OfxImageClipPropUnmappedFrameRate";
pub const OFX_IMAGE_CLIP_PROP_UNMAPPED_FRAME_RANGE: &str = "OfxImageClipPropUnmappedFrameRange";
pub const OFX_IMAGE_CLIP_PROP_CONTINUOUS_SAMPLES: &str = "OfxImageClipPropContinuousSamples";
pub const OFX_IMAGE_EFFECT_FRAME_VARYING: &str = "OfxImageEffectFrameVarying";
pub const OFX_IMAGE_CLIP_PROP_FRAME_NEEDED: &str = "OfxImageClipPropFrameRange";
pub const OFX_IMAGE_EFFECT_PROP_REGION_OF_INTEREST: &str = "OfxImageEffectPropRegionOfInterest";
pub const OFX_IMAGE_EFFECT_PROP_REGION_OF_DEFINITION: &str =
    "OfxImageEffectPropRegionOfDefinition";
pub const OFX_IMAGE_EFFECT_PROP_RENDER_WINDOW: &str = "OfxImageEffectPropRenderWindow";
pub const OFX_IMAGE_EFFECT_PROP_RENDER_SCALE: &str = "OfxImageEffectPropRenderScale";
pub const OFX_IMAGE_EFFECT_PROP_FIELD_TO_RENDER: &str = "OfxImageEffectPropFieldToRender";
pub const OFX_IMAGE_EFFECT_PROP_FRAME_STEP: &str = "OfxImageEffectPropFrameStep";
pub const OFX_PROP_IS_IDENTITY_TIME: &str = "OfxPropTime";
pub const OFX_PROP_IS_IDENTITY_CLIP: &str = "OfxPropName";
pub const OFX_IMAGE_CLIP_PROP_OUTPUT_FRAME_RATE: &str = "OfxImageEffectPropFrameRate";
pub const OFX_IMAGE_CLIP_PROP_OUTPUT_PAR: &str = "OfxImagePropPixelAspectRatio";
pub const OFX_IMAGE_CLIP_PROP_OUTPUT_PREMULT: &str = "OfxImageEffectPropPreMultiplication";

// Image properties
pub const OFX_IMAGE_PROP_DATA: &str = "OfxImagePropData";
pub const OFX_IMAGE_PROP_BOUNDS: &str = "OfxImagePropBounds";
pub const OFX_IMAGE_PROP_ROW_BYTES: &str = "OfxImagePropRowBytes";
pub const OFX_IMAGE_PROP_FIELD: &str = "OfxImagePropField";
pub const OFX_IMAGE_PROP_UNIQUE_IDENTIFIER: &str = "OfxImagePropUniqueIdentifier";

// Parameter universal properties
pub const OFX_PARAM_PROP_PARENT: &str = "OfxParamPropParent";
pub const OFX_PARAM_PROP_SCRIPT_NAME: &str = "OfxParamPropScriptName";
pub const OFX_PARAM_PROP_HINT: &str = "OfxParamPropHint";
pub const OFX_PARAM_PROP_SECRET: &str = "OfxParamPropSecret";
pub const OFX_PARAM_PROP_ENABLED: &str = "OfxParamPropEnabled";
pub const OFX_PARAM_PROP_DATA_PTR: &str = "OfxParamPropDataPtr";
pub const OFX_PARAM_PROP_TYPE: &str = "OfxParamPropType";
pub const OFX_PARAM_PROP_ANIMATES: &str = "OfxParamPropAnimates";
pub const OFX_PARAM_PROP_PERSISTANT: &str = "OfxParamPropPersistant";
pub const OFX_PARAM_PROP_EVALUATE_ON_CHANGE: &str = "OfxParamPropEvaluateOnChange";
pub const OFX_PARAM_PROP_CAN_UNDO: &str = "OfxParamPropCanUndo";

// Parameter kind-specific properties
pub const OFX_PARAM_PROP_MIN: &str = "OfxParamPropMin";
pub const OFX_PARAM_PROP_MAX: &str = "OfxParamPropMax";
pub const OFX_PARAM_PROP_DISPLAY_MIN: &str = "OfxParamPropDisplayMin";
pub const OFX_PARAM_PROP_DISPLAY_MAX: &str = "OfxParamPropDisplayMax";
pub const OFX_PARAM_PROP_DEFAULT: &str = "OfxParamPropDefault";
pub const OFX_PARAM_PROP_DIGITS: &str = "OfxParamPropDigits";
pub const OFX_PARAM_PROP_INCREMENT: &str = "OfxParamPropIncrement";
pub const OFX_PARAM_PROP_DOUBLE_TYPE: &str = "OfxParamPropDoubleType";
pub const OFX_PARAM_PROP_SHOW_TIME_MARKER: &str = "OfxParamPropShowTimeMarker";
pub const OFX_PARAM_PROP_DIMENSION_LABEL: &str = "OfxParamPropDimensionLabel";
pub const OFX_PARAM_PROP_CHOICE_OPTION: &str = "OfxParamPropChoiceOption";
pub const OFX_PARAM_PROP_STRING_MODE: &str = "OfxParamPropStringMode";
pub const OFX_PARAM_PROP_STRING_FILE_PATH_EXISTS: &str = "OfxParamPropStringFilePathExists";
pub const OFX_PARAM_PROP_CUSTOM_INTERP_CALLBACK_V1: &str = "OfxParamPropCustomInterpCallbackV1";
pub const OFX_PARAM_PROP_GROUP_OPEN: &str = "OfxParamPropGroupOpen";
pub const OFX_PARAM_PROP_PAGE_CHILD: &str = "OfxParamPropPageChild";
pub const OFX_PARAM_PROP_INTERACT_V1: &str = "OfxParamPropInteractV1";
pub const OFX_PARAM_PROP_INTERACT_SIZE: &str = "OfxParamPropInteractSize";
pub const OFX_PARAM_PROP_INTERACT_SIZE_ASPECT: &str = "OfxParamPropInteractSizeAspect";
pub const OFX_PARAM_PROP_INTERACT_MINIMUM_SIZE: &str = "OfxParamPropInteractMinimumSize";
pub const OFX_PARAM_PROP_INTERACT_PREFERRED_SIZE: &str = "OfxParamPropInteractPreferredSize";

// Interact properties
pub const OFX_INTERACT_PROP_PIXEL_SCALE: &str = "OfxInteractPropPixelScale";
pub const OFX_INTERACT_PROP_BACKGROUND_COLOUR: &str = "OfxInteractPropBackgroundColour";
pub const OFX_INTERACT_PROP_VIEWPORT_SIZE: &str = "OfxInteractPropViewportSize";
pub const OFX_INTERACT_PROP_SLAVE_TO_PARAM: &str = "OfxInteractPropSlaveToParam";
pub const OFX_INTERACT_PROP_PEN_POSITION: &str = "OfxInteractPropPenPosition";
pub const OFX_INTERACT_PROP_PEN_PRESSURE: &str = "OfxInteractPropPenPressure";
pub const OFX_PROP_PEN_VIEWPORT_POSITION: &str = "OfxPropPenViewportPosition";
pub const OFX_PROP_KEY_SYM: &str = "OfxPropKeySym";
pub const OFX_PROP_KEY_STRING: &str = "OfxPropKeyString";

/// Parameter kind names (`kOfxParamType*`).
pub mod param_type {
    pub const INTEGER: &str = "OfxParamTypeInteger";
    pub const DOUBLE: &str = "OfxParamTypeDouble";
    pub const BOOLEAN: &str = "OfxParamTypeBoolean";
    pub const CHOICE: &str = "OfxParamTypeChoice";
    pub const RGBA: &str = "OfxParamTypeRGBA";
    pub const RGB: &str = "OfxParamTypeRGB";
    pub const DOUBLE2D: &str = "OfxParamTypeDouble2D";
    pub const DOUBLE3D: &str = "OfxParamTypeDouble3D";
    pub const INTEGER2D: &str = "OfxParamTypeInteger2D";
    pub const INTEGER3D: &str = "OfxParamTypeInteger3D";
    pub const STRING: &str = "OfxParamTypeString";
    pub const CUSTOM: &str = "OfxParamTypeCustom";
    pub const GROUP: &str = "OfxParamTypeGroup";
    pub const PAGE: &str = "OfxParamTypePage";
    pub const PUSHBUTTON: &str = "OfxParamTypePushButton";
}

/// Pixel bit depths (`kOfxBitDepth*`).
pub mod bit_depth {
    pub const NONE: &str = "OfxBitDepthNone";
    pub const BYTE: &str = "OfxBitDepthByte";
    pub const SHORT: &str = "OfxBitDepthShort";
    pub const FLOAT: &str = "OfxBitDepthFloat";
}

/// Pixel component layouts (`kOfxImageComponent*`).
pub mod image_component {
    pub const NONE: &str = "OfxImageComponentNone";
    pub const RGBA: &str = "OfxImageComponentRGBA";
    pub const RGB: &str = "OfxImageComponentRGB";
    pub const ALPHA: &str = "OfxImageComponentAlpha";
}

/// Premultiplication state (`kOfxImage*`).
pub mod premultiplication {
    pub const OPAQUE: &str = "OfxImageOpaque";
    pub const PRE_MULTIPLIED: &str = "OfxImagePreMultiplied";
    pub const UN_PRE_MULTIPLIED: &str = "OfxImageUnPreMultiplied";
}

/// Field order / field-to-render (`kOfxField*`).
pub mod field {
    pub const NONE: &str = "OfxFieldNone";
    pub const BOTH: &str = "OfxFieldBoth";
    pub const LOWER: &str = "OfxFieldLower";
    pub const UPPER: &str = "OfxFieldUpper";
}

/// `OfxParamPropDoubleType` values.
pub mod double_type {
    pub const PLAIN: &str = "OfxParamDoubleTypePlain";
    pub const ANGLE: &str = "OfxParamDoubleTypeScale";
    pub const TIME: &str = "OfxParamDoubleTypeTime";
    pub const ABSOLUTE_TIME: &str = "OfxParamDoubleTypeAbsoluteTime";
    pub const X: &str = "OfxParamDoubleTypeX";
    pub const Y: &str = "OfxParamDoubleTypeY";
    pub const XY_ABSOLUTE: &str = "OfxParamDoubleTypeXYAbsolute";
}

/// `OfxParamPropStringMode` values.
pub mod string_mode {
    pub const SINGLE_LINE: &str = "OfxParamStringIsSingleLine";
    pub const MULTI_LINE: &str = "OfxParamStringIsMultiLine";
    pub const FILE_PATH: &str = "OfxParamStringIsFilePath";
    pub const DIR_PATH: &str = "OfxParamStringIsDirectoryPath";
    pub const LABEL: &str = "OfxParamStringIsLabel";
    pub const RICH_TEXT: &str = "OfxParamStringIsRichTextFormat";
}

/// `instanceChanged` reason values (`kOfxChange*`).
pub mod change_reason {
    pub const USER_EDITED: &str = "OfxChangeUserEdited";
    pub const PLUGIN_EDITED: &str = "OfxChangePluginEdited";
    pub const TIME: &str = "OfxChangeTime";
}

/// Message-suite category tags (§7).
pub mod message_type {
    pub const LOG: &str = "OfxMessageLog";
    pub const ERROR: &str = "OfxMessageError";
    pub const FATAL: &str = "OfxMessageFatal";
    pub const QUESTION: &str = "OfxMessageQuestion";
    pub const MESSAGE: &str = "OfxMessageMessage";
}
