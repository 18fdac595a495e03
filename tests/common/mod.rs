//! Shared fixtures for filesystem-backed xattr tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xattr_compat::{removexattr, setxattr, XattrOptions};

/// Environment variable overriding where test files are created
pub const TEST_DIR_ENV: &str = "XATTR_COMPAT_TEST_DIR";

/// A scratch directory on a filesystem likely to support user xattrs.
///
/// `/tmp` is often tmpfs, which rejects `user.*` attributes on older kernels,
/// so the default is Cargo's per-target scratch directory instead.
pub fn scratch_dir() -> TempDir {
    let base = std::env::var_os(TEST_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_TARGET_TMPDIR")));
    std::fs::create_dir_all(&base).unwrap();
    tempfile::Builder::new()
        .prefix("xattr-compat-")
        .tempdir_in(base)
        .unwrap()
}

/// Create a regular file with some content inside `dir`.
pub fn file_in(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, "test content").unwrap();
    path
}

/// Whether `path` accepts user extended attributes at all.
pub fn supports_user_xattrs(path: &Path) -> bool {
    match setxattr(path, "user.probe", b"1", 0, XattrOptions::empty()) {
        Ok(()) => {
            removexattr(path, "user.probe", XattrOptions::empty()).unwrap();
            true
        }
        Err(e) => {
            println!(
                "Extended attributes not supported at {} ({e}) - test skipped",
                path.display()
            );
            false
        }
    }
}

/// Attributes the platform attaches on its own (SELinux labels, Solaris
/// system attributes), which tests must not count as their own.
#[allow(dead_code)]
pub fn is_system_attr(name: &[u8]) -> bool {
    name.starts_with(b"security.") || name.starts_with(b"SUNWattr_") || name.starts_with(b"system.")
}

/// Install a test writer for `tracing` output; repeated calls are harmless.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
