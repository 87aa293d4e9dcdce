use ofxh_property::{PropStorage, PropertySet};

// Not part of the shared property table (`ofxh-abi::properties`) because no
// other crate reads them; only the overlay descriptor declares them.
const OFX_INTERACT_PROP_HAS_ALPHA: &str = "OfxInteractPropHasAlpha";
const OFX_INTERACT_PROP_BIT_DEPTH: &str = "OfxInteractPropBitDepth";

/// The authorable half of an overlay interact (`ofxhInteract.h::Descriptor`).
/// Carries only the two properties a plug-in declares at `describe` time;
/// everything else lives on the [`crate::InteractInstance`] it backs.
pub struct InteractDescriptor {
    properties: PropertySet,
}

impl InteractDescriptor {
    #[must_use]
    pub fn new() -> Self {
        let mut properties = PropertySet::new("interactDescriptor", false);
        properties.define_with_default(OFX_INTERACT_PROP_HAS_ALPHA, 1, PropStorage::Int(vec![0]));
        properties.define_with_default(OFX_INTERACT_PROP_BIT_DEPTH, 1, PropStorage::Int(vec![0]));
        Self { properties }
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }
}

impl Default for InteractDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_alpha_eight_bit() {
        let mut descriptor = InteractDescriptor::new();
        assert_eq!(descriptor.properties_mut().get_int(OFX_INTERACT_PROP_HAS_ALPHA, 0).unwrap(), 0);
        assert_eq!(descriptor.properties_mut().get_int(OFX_INTERACT_PROP_BIT_DEPTH, 0).unwrap(), 0);
    }
}
