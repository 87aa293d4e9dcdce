use std::collections::HashMap;

use crate::descriptor::ParamDescriptor;

/// Owns every parameter descriptor a plug-in declared while describing an
/// effect, in declaration order (`ofxhParam.h::SetDescriptor`). Unlike
/// [`crate::ParamSetInstance`] this never wires parent/page relationships
/// itself — that only makes sense once descriptors are instantiated, so it
/// stays the instance set's job.
#[derive(Default)]
pub struct ParamSetDescriptor {
    order: Vec<String>,
    by_name: HashMap<String, ParamDescriptor>,
}

impl ParamSetDescriptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `descriptor` to the set (`SetDescriptor::addParam`).
    pub fn add_param(&mut self, descriptor: ParamDescriptor) {
        let name = descriptor.name().to_string();
        self.order.push(name.clone());
        self.by_name.insert(name, descriptor);
    }

    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.by_name.get(name)
    }

    /// Declaration order (`SetDescriptor::getParamList`).
    #[must_use]
    pub fn param_list(&self) -> &[String] {
        &self.order
    }

    /// Iterates descriptors in declaration order
    /// (`SetDescriptor::getParams`, minus the map's unspecified ordering).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDescriptor)> {
        self.order
            .iter()
            .filter_map(|name| self.by_name.get(name).map(|d| (name.as_str(), d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ParamKind;

    #[test]
    fn preserves_declaration_order() {
        let mut set = ParamSetDescriptor::new();
        set.add_param(ParamDescriptor::new("b", ParamKind::Double));
        set.add_param(ParamDescriptor::new("a", ParamKind::Integer));
        assert_eq!(set.param_list(), ["b", "a"]);
    }

    #[test]
    fn looks_up_by_name() {
        let mut set = ParamSetDescriptor::new();
        set.add_param(ParamDescriptor::new("radius", ParamKind::Double));
        assert!(set.get_param("radius").is_some());
        assert!(set.get_param("missing").is_none());
    }
}
