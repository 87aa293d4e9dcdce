use std::collections::HashMap;
use std::sync::Weak;

use ofxh_abi::properties::{OFX_PARAM_PROP_PAGE_CHILD, OFX_PARAM_PROP_PARENT};
use ofxh_property::{ChangeSink, WriteOrigin};

use crate::descriptor::ParamDescriptor;
use crate::error::ParamError;
use crate::instance::ParamInstance;
use crate::kind::ParamKind;

/// Owns every parameter instance for one effect instance, in declaration
/// order (`ofxhParam.h::SetInstance`). Group/Page parent-child wiring is a
/// second pass over already-constructed instances, since a child can be
/// declared before or after its parent.
#[derive(Default)]
pub struct ParamSetInstance {
    order: Vec<String>,
    by_name: HashMap<String, ParamInstance>,
    page_children: HashMap<String, Vec<String>>,
}

impl ParamSetInstance {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates `descriptor` and appends it to the set
    /// (`SetInstance::addParam`/`newParam`).
    pub fn add_param(
        &mut self,
        descriptor: &ParamDescriptor,
        change_sink: Weak<dyn ChangeSink>,
    ) -> Result<(), ParamError> {
        let name = descriptor.name().to_string();
        let instance = ParamInstance::new(descriptor, change_sink);
        self.order.push(name.clone());
        self.by_name.insert(name, instance);
        Ok(())
    }

    #[must_use]
    pub fn get_param(&self, name: &str) -> Result<&ParamInstance, ParamError> {
        self.by_name
            .get(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))
    }

    pub fn get_param_mut(&mut self, name: &str) -> Result<&mut ParamInstance, ParamError> {
        self.by_name
            .get_mut(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))
    }

    #[must_use]
    pub fn param_list(&self) -> &[String] {
        &self.order
    }

    /// Wires Group children (every non-container param points at its parent
    /// by name via the `parent` property) and Page children (each Page's
    /// own `OfxParamPropPageChild` dimension-N values, set by the plug-in
    /// at describe time — read from the param, not looked up in reverse).
    pub fn resolve_parents(&mut self) {
        let parent_links: Vec<(String, String)> = self
            .order
            .iter()
            .filter_map(|name| {
                let instance = self.by_name.get_mut(name)?;
                let parent = instance.properties_mut().get_string(OFX_PARAM_PROP_PARENT, 0).ok()?;
                (!parent.is_empty()).then(|| (name.clone(), parent))
            })
            .collect();

        for (child, parent) in parent_links {
            if let Some(instance) = self.by_name.get_mut(&child) {
                instance.set_parent_name(Some(parent));
            }
        }

        let page_names: Vec<String> = self
            .order
            .iter()
            .filter(|name| {
                self.by_name
                    .get(*name)
                    .is_some_and(|i| i.kind() == ParamKind::Page)
            })
            .cloned()
            .collect();

        for page in page_names {
            let dim = self
                .by_name
                .get_mut(&page)
                .map(|i| i.properties_mut().dimension(OFX_PARAM_PROP_PAGE_CHILD).unwrap_or(0))
                .unwrap_or(0);
            let mut children = Vec::with_capacity(dim);
            if let Some(instance) = self.by_name.get_mut(&page) {
                for i in 0..dim {
                    if let Ok(child) = instance
                        .properties_mut()
                        .get_string(OFX_PARAM_PROP_PAGE_CHILD, i)
                    {
                        children.push(child);
                    }
                }
            }
            self.page_children.insert(page, children);
        }
    }

    #[must_use]
    pub fn page_children(&self, page: &str) -> Option<&[String]> {
        self.page_children.get(page).map(Vec::as_slice)
    }

    /// Group children, derived by scanning every param's resolved `parent`
    /// (`GroupInstance::getChildren`), computed on demand rather than kept
    /// as a running index since group membership only matters after
    /// `resolve_parents` has run.
    #[must_use]
    pub fn group_children(&self, group: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|name| {
                let instance = self.by_name.get(name)?;
                (instance.parent_name() == Some(group)).then(|| name.as_str())
            })
            .collect()
    }

    /// Copies every parameter's current value from `other`, offsetting
    /// keyframe times (`BaseSet`-level bulk copy used when duplicating an
    /// effect instance).
    pub fn copy_from(&mut self, other: &ParamSetInstance, offset: f64) -> Result<(), ParamError> {
        for name in self.order.clone() {
            if let Some(src) = other.by_name.get(&name) {
                if let Some(dst) = self.by_name.get_mut(&name) {
                    dst.copy_from(src, offset)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;
    impl ChangeSink for NullSink {
        fn param_changed(&self, _param_name: &str) {}
        fn clip_changed(&self, _clip_name: &str) {}
    }

    #[test]
    fn group_children_resolved_via_parent_property() {
        let group_desc = ParamDescriptor::new("grp", ParamKind::Group);
        let mut child_desc = ParamDescriptor::new("child", ParamKind::Double);
        child_desc
            .properties_mut()
            .set_string(OFX_PARAM_PROP_PARENT, 0, "grp", WriteOrigin::Host)
            .unwrap();

        let mut set = ParamSetInstance::new();
        set.add_param(&group_desc, Weak::<NullSink>::new()).unwrap();
        set.add_param(&child_desc, Weak::<NullSink>::new()).unwrap();
        set.resolve_parents();

        assert_eq!(set.group_children("grp"), vec!["child"]);
    }

    #[test]
    fn unknown_param_lookup_errors() {
        let set = ParamSetInstance::new();
        assert!(matches!(set.get_param("missing"), Err(ParamError::Unknown(_))));
    }
}
