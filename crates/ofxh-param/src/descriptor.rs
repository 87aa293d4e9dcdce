use ofxh_abi::properties::*;
use ofxh_property::{PropStorage, PropType, PropertySet};

use crate::kind::{ParamKind, Storage};

/// A plugin-declared parameter, built from the universal param-descriptor
/// property set plus whatever `ParamKind::storage` adds (§4.F "Kinds and
/// property contributions").
pub struct ParamDescriptor {
    name: String,
    kind: ParamKind,
    properties: PropertySet,
}

impl ParamDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        let name = name.into();
        let mut properties = PropertySet::new("paramDescriptor", false);

        properties.define(OFX_PROP_NAME, PropType::String, 1);
        properties.define_with_default(
            OFX_PROP_NAME,
            1,
            PropStorage::String(vec![name.clone()]),
        );
        properties.define(OFX_PROP_LABEL, PropType::String, 1);
        properties.define(OFX_PROP_SHORT_LABEL, PropType::String, 1);
        properties.define(OFX_PROP_LONG_LABEL, PropType::String, 1);
        properties.define(OFX_PARAM_PROP_PARENT, PropType::String, 1);
        properties.define(OFX_PARAM_PROP_SCRIPT_NAME, PropType::String, 1);
        properties.define(OFX_PARAM_PROP_HINT, PropType::String, 1);
        properties.define(OFX_PARAM_PROP_SECRET, PropType::Int, 1);
        properties.define(OFX_PARAM_PROP_ENABLED, PropType::Int, 1);
        properties.define(OFX_PARAM_PROP_DATA_PTR, PropType::Pointer, 1);
        properties.define_with_default(
            OFX_PARAM_PROP_TYPE,
            1,
            PropStorage::String(vec![kind.type_name().to_string()]),
        );

        if kind.is_animatable() {
            properties.define(OFX_PARAM_PROP_ANIMATES, PropType::Int, 1);
        }

        match kind.storage() {
            Storage::Int(dim) => define_numeric(&mut properties, dim, PropType::Int),
            Storage::Double(dim) => define_numeric(&mut properties, dim, PropType::Double),
            Storage::String => {
                properties.define(OFX_PARAM_PROP_DEFAULT, PropType::String, 1);
            }
            Storage::None => {}
        }

        let labels = kind.dimension_labels();
        if !labels.is_empty() {
            properties.define(OFX_PARAM_PROP_DIMENSION_LABEL, PropType::String, labels.len());
            for (i, label) in labels.iter().enumerate() {
                let _ = properties.set_string(
                    OFX_PARAM_PROP_DIMENSION_LABEL,
                    i,
                    (*label).to_string(),
                    ofxh_property::WriteOrigin::Host,
                );
            }
        }

        match kind {
            ParamKind::Double | ParamKind::Double2D | ParamKind::Double3D => {
                properties.define(OFX_PARAM_PROP_DIGITS, PropType::Int, 1);
                properties.define(OFX_PARAM_PROP_INCREMENT, PropType::Double, 1);
                properties.define(OFX_PARAM_PROP_DOUBLE_TYPE, PropType::String, 1);
                if kind == ParamKind::Double {
                    properties.define(OFX_PARAM_PROP_SHOW_TIME_MARKER, PropType::Int, 1);
                }
            }
            ParamKind::Choice => {
                properties.define(OFX_PARAM_PROP_CHOICE_OPTION, PropType::String, 0);
            }
            ParamKind::Rgb | ParamKind::Rgba => {
                let dim = if kind == ParamKind::Rgb { 3 } else { 4 };
                properties.define_with_default(
                    OFX_PARAM_PROP_DISPLAY_MIN,
                    dim,
                    PropStorage::Double(vec![0.0; dim]),
                );
                properties.define_with_default(
                    OFX_PARAM_PROP_DISPLAY_MAX,
                    dim,
                    PropStorage::Double(vec![1.0; dim]),
                );
            }
            ParamKind::String | ParamKind::Custom => {
                properties.define(OFX_PARAM_PROP_STRING_MODE, PropType::String, 1);
                properties.define(OFX_PARAM_PROP_STRING_FILE_PATH_EXISTS, PropType::Int, 1);
                if kind == ParamKind::Custom {
                    properties.define(OFX_PARAM_PROP_CUSTOM_INTERP_CALLBACK_V1, PropType::Pointer, 1);
                }
            }
            ParamKind::Group => {
                properties.define(OFX_PARAM_PROP_GROUP_OPEN, PropType::Int, 1);
            }
            ParamKind::Page => {
                properties.define(OFX_PARAM_PROP_PAGE_CHILD, PropType::String, 0);
            }
            _ => {}
        }

        if !kind.is_container() && kind != ParamKind::Pushbutton {
            properties.define(OFX_PARAM_PROP_INTERACT_V1, PropType::Pointer, 1);
            properties.define(OFX_PARAM_PROP_INTERACT_SIZE, PropType::Double, 2);
            properties.define(OFX_PARAM_PROP_INTERACT_SIZE_ASPECT, PropType::Double, 1);
            properties.define(OFX_PARAM_PROP_INTERACT_MINIMUM_SIZE, PropType::Int, 2);
            properties.define(OFX_PARAM_PROP_INTERACT_PREFERRED_SIZE, PropType::Int, 2);
        }

        Self {
            name,
            kind,
            properties,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }
}

fn define_numeric(properties: &mut PropertySet, dim: usize, ty: PropType) {
    properties.define(OFX_PARAM_PROP_MIN, ty, dim);
    properties.define(OFX_PARAM_PROP_MAX, ty, dim);
    properties.define(OFX_PARAM_PROP_DISPLAY_MIN, ty, dim);
    properties.define(OFX_PARAM_PROP_DISPLAY_MAX, ty, dim);
    properties.define(OFX_PARAM_PROP_DEFAULT, ty, dim);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_descriptor_has_universal_and_kind_properties() {
        let d = ParamDescriptor::new("radius", ParamKind::Integer);
        assert!(d.properties().contains(OFX_PARAM_PROP_MIN));
        assert!(d.properties().contains(OFX_PARAM_PROP_ANIMATES));
        assert!(d.properties().contains(OFX_PARAM_PROP_INTERACT_V1));
    }

    #[test]
    fn group_descriptor_has_no_interact_properties() {
        let d = ParamDescriptor::new("g", ParamKind::Group);
        assert!(!d.properties().contains(OFX_PARAM_PROP_INTERACT_V1));
        assert!(d.properties().contains(OFX_PARAM_PROP_GROUP_OPEN));
    }

    #[test]
    fn rgba_descriptor_defaults_display_range_to_unit_interval() {
        let mut d = ParamDescriptor::new("color", ParamKind::Rgba);
        let max = d
            .properties_mut()
            .get_double(OFX_PARAM_PROP_DISPLAY_MAX, 0)
            .unwrap();
        assert_eq!(max, 1.0);
    }
}
