//! Per-platform plug-in bundle layout (§4.D "Search").
//!
//! A plug-in binary lives at `<bundle>.ofx.bundle/Contents/<arch>/<basename>`.
//! macOS is the one platform with a fallback: a 64-bit host first tries the
//! arch-qualified `MacOS-x86-64` slice, then the universal `MacOS` slice.

use std::path::PathBuf;

#[cfg(all(target_os = "linux", target_pointer_width = "64"))]
pub const PRIMARY_ARCH: &str = "Linux-x86-64";
#[cfg(all(target_os = "linux", target_pointer_width = "32"))]
pub const PRIMARY_ARCH: &str = "Linux-x86";

#[cfg(all(target_os = "freebsd", target_pointer_width = "64"))]
pub const PRIMARY_ARCH: &str = "FreeBSD-x86-64";
#[cfg(all(target_os = "freebsd", target_pointer_width = "32"))]
pub const PRIMARY_ARCH: &str = "FreeBSD-x86";

#[cfg(all(target_os = "macos", target_pointer_width = "64"))]
pub const PRIMARY_ARCH: &str = "MacOS-x86-64";
#[cfg(all(target_os = "macos", target_pointer_width = "32"))]
pub const PRIMARY_ARCH: &str = "MacOS";

#[cfg(all(target_os = "windows", target_pointer_width = "64"))]
pub const PRIMARY_ARCH: &str = "win64";
#[cfg(all(target_os = "windows", target_pointer_width = "32"))]
pub const PRIMARY_ARCH: &str = "win32";

#[cfg(not(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "macos",
    target_os = "windows"
)))]
pub const PRIMARY_ARCH: &str = "Linux-x86-64";

#[cfg(all(target_os = "macos", target_pointer_width = "64"))]
pub const FALLBACK_ARCH: Option<&str> = Some("MacOS");
#[cfg(not(all(target_os = "macos", target_pointer_width = "64")))]
pub const FALLBACK_ARCH: Option<&str> = None;

/// Candidate binary paths for `bundle_dir` + `basename`, primary arch first.
#[must_use]
pub fn candidate_binary_paths(bundle_dir: &std::path::Path, basename: &str) -> Vec<PathBuf> {
    let mut out = vec![bundle_dir.join("Contents").join(PRIMARY_ARCH).join(basename)];
    if let Some(fallback) = FALLBACK_ARCH {
        out.push(bundle_dir.join("Contents").join(fallback).join(basename));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn candidate_paths_include_primary_arch() {
        let paths = candidate_binary_paths(Path::new("/plugins/foo.ofx.bundle"), "foo.ofx");
        assert!(paths[0].ends_with(format!("Contents/{PRIMARY_ARCH}/foo.ofx")));
    }
}
