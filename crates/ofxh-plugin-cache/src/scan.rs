//! Search-path assembly and bundle directory scanning (§4.D "Search").

use std::path::{Path, PathBuf};

const BUNDLE_SUFFIX: &str = ".ofx.bundle";

#[cfg(target_os = "windows")]
const PATH_LIST_SEP: char = ';';
#[cfg(not(target_os = "windows"))]
const PATH_LIST_SEP: char = ':';

/// One entry in the search path: a directory plus whether it is scanned
/// recursively.
#[derive(Debug, Clone)]
pub struct SearchEntry {
    pub dir: PathBuf,
    pub recurse: bool,
}

/// Splits `OFX_PLUGIN_PATH` on the platform list separator. Each resulting
/// directory is scanned recursively by default.
#[must_use]
pub fn env_search_entries(value: &str) -> Vec<SearchEntry> {
    value
        .split(PATH_LIST_SEP)
        .filter(|s| !s.is_empty())
        .map(|s| SearchEntry {
            dir: PathBuf::from(s),
            recurse: true,
        })
        .collect()
}

/// The OS-default plug-in directories appended after `OFX_PLUGIN_PATH`
/// (`ofxhPluginCache.cpp`'s `PluginCache()` constructor).
#[must_use]
pub fn default_search_entries() -> Vec<SearchEntry> {
    let dirs: &[&str] = if cfg!(target_os = "windows") {
        &[
            "C:\\Program Files\\Common Files\\OFX\\Plugins",
        ]
    } else if cfg!(any(target_os = "linux", target_os = "freebsd")) {
        &["/usr/OFX/Plugins"]
    } else if cfg!(target_os = "macos") {
        &["/Library/OFX/Plugins"]
    } else {
        &[]
    };
    dirs.iter()
        .map(|d| SearchEntry {
            dir: PathBuf::from(d),
            recurse: true,
        })
        .collect()
}

/// The per-embedder directories `setPluginHostPath` adds, named after the
/// host identifier rather than the generic `Plugins` directory.
#[must_use]
pub fn host_search_entries(host_id: &str) -> Vec<SearchEntry> {
    let dir = if cfg!(target_os = "windows") {
        format!("C:\\Program Files\\Common Files\\OFX\\{host_id}")
    } else if cfg!(any(target_os = "linux", target_os = "freebsd")) {
        format!("/usr/OFX/{host_id}")
    } else {
        format!("/Library/OFX/{host_id}")
    };
    vec![SearchEntry {
        dir: PathBuf::from(dir),
        recurse: true,
    }]
}

/// Scans `dir` for `*.ofx.bundle` directories, recursing into non-bundle
/// subdirectories when `recurse` is set. Matches `scanDirectory`: a bundle
/// directory is never itself recursed into looking for nested bundles.
pub fn scan_directory(dir: &Path, recurse: bool, found: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(BUNDLE_SUFFIX) {
            found.push(path);
        } else if recurse {
            scan_directory(&path, recurse, found);
        }
    }
}

/// The bundle's basename without the `.ofx.bundle` suffix, used to build
/// the `<basename>.ofx` binary file name.
#[must_use]
pub fn bundle_basename(bundle_dir: &Path) -> Option<String> {
    let name = bundle_dir.file_name()?.to_str()?;
    name.strip_suffix(BUNDLE_SUFFIX).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_path_splits_on_platform_separator() {
        let joined = format!("/a{PATH_LIST_SEP}/b{PATH_LIST_SEP}/c");
        let entries = env_search_entries(&joined);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].dir, PathBuf::from("/b"));
    }

    #[test]
    fn bundle_basename_strips_suffix() {
        assert_eq!(
            bundle_basename(Path::new("/plugins/Blur.ofx.bundle")),
            Some("Blur".to_string())
        );
        assert_eq!(bundle_basename(Path::new("/plugins/NotABundle")), None);
    }

    #[test]
    fn scan_finds_bundle_but_does_not_recurse_into_it() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = tmp.path().join("Foo.ofx.bundle");
        std::fs::create_dir_all(bundle.join("Contents/nested.ofx.bundle")).unwrap();
        let mut found = Vec::new();
        scan_directory(tmp.path(), true, &mut found);
        assert_eq!(found, vec![bundle]);
    }

    #[test]
    fn non_recursive_scan_only_sees_top_level() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub/Nested.ofx.bundle")).unwrap();
        let mut found = Vec::new();
        scan_directory(tmp.path(), false, &mut found);
        assert!(found.is_empty());
    }
}
