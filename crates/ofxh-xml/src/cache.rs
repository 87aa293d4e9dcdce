use ofxh_property::{PropertySet, PropType, WriteOrigin};

use crate::escape::escape;
use crate::parser::{parse_incremental, XmlVisitor};

/// Version string stamped into the `<cache version="...">` root element.
/// A cache read back with a different version is discarded wholesale
/// (§4.C; `ofxhPluginCache.cpp`'s `elementBeginCallback` bails out of the
/// whole document the moment the version attribute doesn't match).
pub const CACHE_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq)]
pub struct CachedBinary {
    pub path: String,
    pub bundle_path: String,
    pub mtime: i64,
    pub size: u64,
}

pub struct CachedPlugin {
    pub name: String,
    pub index: i32,
    pub api: String,
    pub api_version: i32,
    pub major_version: i32,
    pub minor_version: i32,
    pub api_properties: PropertySet,
}

pub struct CachedBundle {
    pub binary: CachedBinary,
    pub plugins: Vec<CachedPlugin>,
}

#[derive(Default)]
pub struct CacheDocument {
    pub bundles: Vec<CachedBundle>,
}

/// Parses a full plug-in cache document. Returns `None` (rather than a
/// partial document) on a version mismatch or any structural error — the
/// original's `_ignoreCache` flag has no notion of a partially trusted
/// cache, so neither does this.
#[must_use]
pub fn read_cache(xml: &[u8]) -> Option<CacheDocument> {
    let mut visitor = CacheVisitor::default();
    if parse_incremental(xml, &mut visitor).is_err() {
        return None;
    }
    if visitor.version_mismatch || !visitor.errored.is_empty() {
        return None;
    }
    Some(visitor.doc)
}

/// Serializes `doc` using the same element/attribute shape the original
/// writer produces (§4.C). Pointer-typed properties are silently dropped
/// from `apiproperties`, matching `propertyXMLWrite`'s explicit skip.
#[must_use]
pub fn write_cache(doc: &CacheDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("<cache version=\"{}\">\n", CACHE_VERSION));
    for bundle in &doc.bundles {
        write_bundle(&mut out, bundle);
    }
    out.push_str("</cache>\n");
    out
}

fn write_bundle(out: &mut String, bundle: &CachedBundle) {
    out.push_str("  <bundle>\n");
    out.push_str(&format!(
        "    <binary path=\"{}\" bundle_path=\"{}\" mtime=\"{}\" size=\"{}\"/>\n",
        escape(&bundle.binary.path),
        escape(&bundle.binary.bundle_path),
        bundle.binary.mtime,
        bundle.binary.size,
    ));
    for plugin in &bundle.plugins {
        write_plugin(out, plugin);
    }
    out.push_str("  </bundle>\n");
}

fn write_plugin(out: &mut String, plugin: &CachedPlugin) {
    out.push_str(&format!(
        "    <plugin name=\"{}\" index=\"{}\" api=\"{}\" api_version=\"{}\" major_version=\"{}\" minor_version=\"{}\">\n",
        escape(&plugin.name),
        plugin.index,
        escape(&plugin.api),
        plugin.api_version,
        plugin.major_version,
        plugin.minor_version,
    ));
    out.push_str("      <apiproperties>\n");
    write_property_set(out, &plugin.api_properties);
    out.push_str("      </apiproperties>\n");
    out.push_str("    </plugin>\n");
}

/// Writes every non-pointer property in `set`, one `<property>` element
/// per name with a nested `<value>` per index. Ported from
/// `propertySetXMLWrite`/`propertyXMLWrite` in `ofxhPluginAPICache.cpp`.
pub fn write_property_set(out: &mut String, set: &PropertySet) {
    for name in set.names_in_order() {
        let Ok(prop) = set.property(name) else {
            continue;
        };
        if prop.prop_type() == PropType::Pointer {
            continue;
        }
        let dimension = prop.dimension().unwrap_or(0);
        out.push_str(&format!(
            "        <property name=\"{}\" type=\"{}\" dimension=\"{}\">\n",
            escape(name),
            type_name(prop.prop_type()),
            dimension,
        ));
        for index in 0..dimension {
            let value = match prop.prop_type() {
                PropType::Int => prop.get_int(index).map(|v| v.to_string()),
                PropType::Double => prop.get_double(index).map(|v| v.to_string()),
                PropType::String => prop.get_string(index),
                PropType::Pointer => unreachable!("pointer properties are skipped above"),
            };
            if let Ok(value) = value {
                out.push_str(&format!(
                    "          <value index=\"{index}\" value=\"{}\"/>\n",
                    escape(&value)
                ));
            }
        }
        out.push_str("        </property>\n");
    }
}

fn type_name(ty: PropType) -> &'static str {
    match ty {
        PropType::Int => "int",
        PropType::Double => "double",
        PropType::String => "string",
        PropType::Pointer => "pointer",
    }
}

fn parse_type_name(name: &str) -> Option<PropType> {
    match name {
        "int" => Some(PropType::Int),
        "double" => Some(PropType::Double),
        "string" => Some(PropType::String),
        "pointer" => Some(PropType::Pointer),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Cache,
    Bundle,
    Plugin,
    ApiProperties,
    Property,
}

/// Stack-based push-parser state, mirroring `elementBeginCallback`'s
/// `switch` on the enclosing element rather than building a full DOM.
#[derive(Default)]
struct CacheVisitor {
    stack: Vec<Frame>,
    doc: CacheDocument,
    version_mismatch: bool,
    errored: Vec<String>,

    current_bundle: Option<CachedBundle>,
    current_plugin: Option<CachedPlugin>,
    current_prop_name: Option<String>,
    current_prop_type: Option<PropType>,
}

impl XmlVisitor for CacheVisitor {
    fn element_begin(&mut self, name: &str, attrs: &[(String, String)]) {
        let get = |key: &str| attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        match name {
            "cache" => {
                if get("version") != Some(CACHE_VERSION) {
                    self.version_mismatch = true;
                }
                self.stack.push(Frame::Cache);
            }
            "bundle" => {
                self.current_bundle = Some(CachedBundle {
                    binary: CachedBinary {
                        path: String::new(),
                        bundle_path: String::new(),
                        mtime: 0,
                        size: 0,
                    },
                    plugins: Vec::new(),
                });
                self.stack.push(Frame::Bundle);
            }
            "binary" => {
                if let Some(bundle) = self.current_bundle.as_mut() {
                    bundle.binary = CachedBinary {
                        path: get("path").unwrap_or_default().to_string(),
                        bundle_path: get("bundle_path").unwrap_or_default().to_string(),
                        mtime: get("mtime").and_then(|v| v.parse().ok()).unwrap_or(0),
                        size: get("size").and_then(|v| v.parse().ok()).unwrap_or(0),
                    };
                } else {
                    self.errored.push("binary outside bundle".into());
                }
            }
            "plugin" => {
                self.current_plugin = Some(CachedPlugin {
                    name: get("name").unwrap_or_default().to_string(),
                    index: get("index").and_then(|v| v.parse().ok()).unwrap_or(0),
                    api: get("api").unwrap_or_default().to_string(),
                    api_version: get("api_version").and_then(|v| v.parse().ok()).unwrap_or(1),
                    major_version: get("major_version").and_then(|v| v.parse().ok()).unwrap_or(0),
                    minor_version: get("minor_version").and_then(|v| v.parse().ok()).unwrap_or(0),
                    api_properties: PropertySet::new("apiproperties", true),
                });
                self.stack.push(Frame::Plugin);
            }
            "apiproperties" => {
                self.stack.push(Frame::ApiProperties);
            }
            "property" => {
                let ty = get("type").and_then(parse_type_name);
                let Some(ty) = ty else {
                    self.errored.push(format!(
                        "unknown property type {:?}",
                        get("type")
                    ));
                    return;
                };
                let prop_name = get("name").unwrap_or_default().to_string();
                if let Some(plugin) = self.current_plugin.as_mut() {
                    if !plugin.api_properties.contains(&prop_name) {
                        plugin.api_properties.define(prop_name.clone(), ty, 0);
                    }
                }
                self.current_prop_name = Some(prop_name);
                self.current_prop_type = Some(ty);
                self.stack.push(Frame::Property);
            }
            "value" => {
                let Some(plugin) = self.current_plugin.as_mut() else {
                    return;
                };
                let Some(prop_name) = self.current_prop_name.clone() else {
                    return;
                };
                let Some(ty) = self.current_prop_type else {
                    return;
                };
                let index: usize = get("index").and_then(|v| v.parse().ok()).unwrap_or(0);
                let raw = get("value").unwrap_or_default();
                let set = &mut plugin.api_properties;
                let ok = match ty {
                    PropType::Int => raw
                        .parse::<i32>()
                        .ok()
                        .map(|v| set.set_int(&prop_name, index, v, WriteOrigin::Host)),
                    PropType::Double => raw
                        .parse::<f64>()
                        .ok()
                        .map(|v| set.set_double(&prop_name, index, v, WriteOrigin::Host)),
                    PropType::String => {
                        Some(set.set_string(&prop_name, index, raw.to_string(), WriteOrigin::Host))
                    }
                    PropType::Pointer => None,
                };
                if matches!(ok, Some(Err(_))) || ok.is_none() {
                    self.errored.push(format!("bad value for {prop_name}"));
                }
            }
            _ => {}
        }
    }

    fn characters(&mut self, _text: &str) {}

    fn element_end(&mut self, name: &str) {
        match name {
            "cache" => {
                self.stack.pop();
            }
            "bundle" => {
                if let Some(bundle) = self.current_bundle.take() {
                    self.doc.bundles.push(bundle);
                }
                self.stack.pop();
            }
            "plugin" => {
                if let Some(plugin) = self.current_plugin.take() {
                    if let Some(bundle) = self.current_bundle.as_mut() {
                        bundle.plugins.push(plugin);
                    }
                }
                self.stack.pop();
            }
            "apiproperties" => {
                self.stack.pop();
            }
            "property" => {
                self.current_prop_name = None;
                self.current_prop_type = None;
                self.stack.pop();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofxh_property::PropertySet;

    fn sample_doc() -> CacheDocument {
        let mut props = PropertySet::new("apiproperties", true);
        props.define("OfxImageEffectPluginPropGrouping".into(), PropType::String, 1);
        props
            .set_string("OfxImageEffectPluginPropGrouping", 0, "Filter".into(), WriteOrigin::Host)
            .unwrap();
        CacheDocument {
            bundles: vec![CachedBundle {
                binary: CachedBinary {
                    path: "/plugins/foo.ofx.bundle/Contents/Linux-x86-64/foo.ofx".into(),
                    bundle_path: "/plugins/foo.ofx.bundle".into(),
                    mtime: 12345,
                    size: 4096,
                },
                plugins: vec![CachedPlugin {
                    name: "com.example:Foo".into(),
                    index: 0,
                    api: "OfxImageEffectPluginAPI".into(),
                    api_version: 1,
                    major_version: 1,
                    minor_version: 0,
                    api_properties: props,
                }],
            }],
        }
    }

    #[test]
    fn writes_then_reads_back_the_same_document() {
        let doc = sample_doc();
        let xml = write_cache(&doc);
        let mut parsed = read_cache(xml.as_bytes()).expect("cache should parse");
        assert_eq!(parsed.bundles.len(), 1);
        assert_eq!(parsed.bundles[0].binary.mtime, 12345);
        assert_eq!(parsed.bundles[0].plugins[0].name, "com.example:Foo");
        let value = parsed.bundles[0].plugins[0]
            .api_properties
            .get_string("OfxImageEffectPluginPropGrouping", 0)
            .unwrap();
        assert_eq!(value, "Filter");
    }

    #[test]
    fn version_mismatch_discards_whole_cache() {
        let xml = br#"<cache version="999"><bundle><binary path="a" bundle_path="b" mtime="0" size="0"/></bundle></cache>"#;
        assert!(read_cache(xml).is_none());
    }

    #[test]
    fn malformed_document_discards_whole_cache() {
        let xml = br#"<cache version="1"><bundle>"#;
        assert!(read_cache(xml).is_none());
    }

    #[test]
    fn pointer_properties_are_not_serialized() {
        let mut props = PropertySet::new("apiproperties", true);
        props.define("OfxPropInstanceData".into(), PropType::Pointer, 1);
        let out = {
            let mut s = String::new();
            write_property_set(&mut s, &props);
            s
        };
        assert!(!out.contains("OfxPropInstanceData"));
    }
}
