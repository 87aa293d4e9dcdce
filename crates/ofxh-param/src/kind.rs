use ofxh_abi::properties::param_type;

/// The fifteen parameter kinds (§4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Integer,
    Integer2D,
    Integer3D,
    Double,
    Double2D,
    Double3D,
    Boolean,
    Choice,
    Rgb,
    Rgba,
    String,
    Custom,
    Group,
    Page,
    Pushbutton,
}

/// The value storage each kind actually needs underneath the universal
/// param-descriptor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Int(usize),
    Double(usize),
    String,
    None,
}

impl ParamKind {
    /// The `OfxParamType*` wire string (§6, `ofxhParam.cpp`'s `paramTypeToString`).
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Integer => param_type::INTEGER,
            Self::Integer2D => param_type::INTEGER2D,
            Self::Integer3D => param_type::INTEGER3D,
            Self::Double => param_type::DOUBLE,
            Self::Double2D => param_type::DOUBLE2D,
            Self::Double3D => param_type::DOUBLE3D,
            Self::Boolean => param_type::BOOLEAN,
            Self::Choice => param_type::CHOICE,
            Self::Rgb => param_type::RGB,
            Self::Rgba => param_type::RGBA,
            Self::String => param_type::STRING,
            Self::Custom => param_type::CUSTOM,
            Self::Group => param_type::GROUP,
            Self::Page => param_type::PAGE,
            Self::Pushbutton => param_type::PUSHBUTTON,
        }
    }

    #[must_use]
    pub fn storage(self) -> Storage {
        match self {
            Self::Integer => Storage::Int(1),
            Self::Integer2D => Storage::Int(2),
            Self::Integer3D => Storage::Int(3),
            Self::Double => Storage::Double(1),
            Self::Double2D => Storage::Double(2),
            Self::Double3D => Storage::Double(3),
            Self::Boolean => Storage::Int(1),
            Self::Choice => Storage::Int(1),
            Self::Rgb => Storage::Double(3),
            Self::Rgba => Storage::Double(4),
            Self::String | Self::Custom => Storage::String,
            Self::Group | Self::Page | Self::Pushbutton => Storage::None,
        }
    }

    /// All kinds except `Group`/`Page`/`Pushbutton`/`Custom` carry keyframe
    /// operations (`ofxhParam.h`'s `KeyframeParam` mixin), per the
    /// supplemented-features note: the original applies it uniformly to
    /// every concrete value-bearing instance.
    #[must_use]
    pub fn is_animatable(self) -> bool {
        !matches!(
            self,
            Self::Group | Self::Page | Self::Pushbutton | Self::Custom
        )
    }

    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Group | Self::Page)
    }

    #[must_use]
    pub fn dimension_labels(self) -> &'static [&'static str] {
        match self {
            Self::Double2D | Self::Integer2D => &["X", "Y"],
            Self::Double3D | Self::Integer3D => &["X", "Y", "Z"],
            Self::Rgb => &["R", "G", "B"],
            Self::Rgba => &["R", "G", "B", "A"],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_and_containers_are_not_animatable() {
        assert!(!ParamKind::Custom.is_animatable());
        assert!(!ParamKind::Group.is_animatable());
        assert!(!ParamKind::Page.is_animatable());
        assert!(!ParamKind::Pushbutton.is_animatable());
        assert!(ParamKind::Double.is_animatable());
        assert!(ParamKind::String.is_animatable());
    }

    #[test]
    fn storage_dimensions_match_kind() {
        assert_eq!(ParamKind::Rgba.storage(), Storage::Double(4));
        assert_eq!(ParamKind::Integer3D.storage(), Storage::Int(3));
        assert_eq!(ParamKind::Group.storage(), Storage::None);
    }
}
