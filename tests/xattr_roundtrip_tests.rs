//! Round-trip tests against the real filesystem
//!
//! Every test probes for user xattr support first and skips when the scratch
//! filesystem has none.

mod common;

use common::{file_in, is_system_attr, scratch_dir, supports_user_xattrs};
use std::collections::BTreeSet;
use std::fs::File;
use xattr_compat::list::Names;
use xattr_compat::{
    fgetxattr, flist_names, flistxattr, fremovexattr, fsetxattr, get_value, getxattr, list_names,
    listxattr, removexattr, setxattr, XattrOptions,
};

fn own_names(buf: &[u8]) -> BTreeSet<Vec<u8>> {
    Names::new(buf)
        .filter(|name| !is_system_attr(name))
        .map(<[u8]>::to_vec)
        .collect()
}

/// set, get, list, remove, get on one file by path
#[test]
fn test_end_to_end_by_path() {
    common::init_tracing();
    let dir = scratch_dir();
    let path = file_in(&dir, "e2e.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    setxattr(&path, "user.test", b"hello", 0, XattrOptions::empty()).unwrap();

    let mut buf = [0u8; 16];
    let n = getxattr(&path, "user.test", Some(&mut buf), 0, XattrOptions::empty()).unwrap();
    assert_eq!(n, 5);
    assert_eq!(&buf[..n], b"hello");

    let mut names = [0u8; 256];
    let n = listxattr(&path, Some(&mut names), XattrOptions::empty()).unwrap();
    assert_eq!(
        own_names(&names[..n]),
        BTreeSet::from([b"user.test".to_vec()])
    );

    removexattr(&path, "user.test", XattrOptions::empty()).unwrap();

    let err = getxattr(&path, "user.test", Some(&mut buf), 0, XattrOptions::empty()).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[test]
fn test_size_query_matches_value_length() {
    let dir = scratch_dir();
    let path = file_in(&dir, "size.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    let value = vec![0xa5u8; 300];
    setxattr(&path, "user.sized", &value, 0, XattrOptions::empty()).unwrap();

    let size = getxattr(&path, "user.sized", None, 0, XattrOptions::empty()).unwrap();
    assert_eq!(size, value.len());
    assert_eq!(
        get_value(&path, "user.sized", XattrOptions::empty()).unwrap(),
        value
    );
}

#[test]
fn test_list_returns_exactly_the_names_set() {
    let dir = scratch_dir();
    let path = file_in(&dir, "list.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    let names = ["user.sopal", "user.sop.foo", "user.\u{2603}"];
    for (i, name) in names.iter().enumerate() {
        setxattr(&path, name, format!("v{i}").as_bytes(), 0, XattrOptions::empty()).unwrap();
    }

    let needed = listxattr(&path, None, XattrOptions::empty()).unwrap();
    let mut buf = vec![0u8; needed];
    let n = listxattr(&path, Some(&mut buf), XattrOptions::empty()).unwrap();
    assert_eq!(n, needed);

    let expected: BTreeSet<Vec<u8>> = names.iter().map(|n| n.as_bytes().to_vec()).collect();
    assert_eq!(own_names(&buf[..n]), expected);

    let owned: BTreeSet<Vec<u8>> = list_names(&path, XattrOptions::empty())
        .unwrap()
        .into_iter()
        .map(|n| n.into_encoded_bytes())
        .filter(|n| !is_system_attr(n))
        .collect();
    assert_eq!(owned, expected);
}

// The BSD extattr API only honours these modes with `bsd-exclusive-set`.
#[cfg(not(all(
    any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd"),
    not(feature = "bsd-exclusive-set")
)))]
#[test]
fn test_create_and_replace_modes() {
    let dir = scratch_dir();
    let path = file_in(&dir, "modes.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    // Nothing to replace yet.
    let err = setxattr(&path, "user.mode", b"a", 0, XattrOptions::REPLACE).unwrap_err();
    assert!(!err.is_contract_violation());

    setxattr(&path, "user.mode", b"a", 0, XattrOptions::CREATE).unwrap();
    let err = setxattr(&path, "user.mode", b"b", 0, XattrOptions::CREATE).unwrap_err();
    assert_eq!(err.raw_os_error(), Some(libc::EEXIST));

    setxattr(&path, "user.mode", b"c", 0, XattrOptions::REPLACE).unwrap();
    assert_eq!(
        get_value(&path, "user.mode", XattrOptions::empty()).unwrap(),
        b"c"
    );
}

#[test]
fn test_descriptor_round_trip() {
    let dir = scratch_dir();
    let path = file_in(&dir, "fd.txt");
    if !supports_user_xattrs(&path) {
        return;
    }
    let file = File::options().read(true).write(true).open(&path).unwrap();

    fsetxattr(&file, "user.fd", b"via descriptor", 0, XattrOptions::empty()).unwrap();

    let size = fgetxattr(&file, "user.fd", None, 0, XattrOptions::empty()).unwrap();
    let mut buf = vec![0u8; size];
    let n = fgetxattr(&file, "user.fd", Some(&mut buf), 0, XattrOptions::empty()).unwrap();
    assert_eq!(&buf[..n], b"via descriptor");

    // Visible by path too.
    assert_eq!(
        get_value(&path, "user.fd", XattrOptions::empty()).unwrap(),
        b"via descriptor"
    );

    let needed = flistxattr(&file, None, XattrOptions::empty()).unwrap();
    assert!(needed >= "user.fd\0".len());
    let names = flist_names(&file, XattrOptions::empty()).unwrap();
    assert!(names.iter().any(|n| n == "user.fd"));

    fremovexattr(&file, "user.fd", XattrOptions::empty()).unwrap();
    let err = fgetxattr(&file, "user.fd", None, 0, XattrOptions::empty()).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[test]
fn test_remove_missing_attribute_reports_native_error() {
    let dir = scratch_dir();
    let path = file_in(&dir, "missing.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    let err = removexattr(&path, "user.never", XattrOptions::empty()).unwrap_err();
    assert!(!err.is_contract_violation());
    assert!(err.is_not_found(), "unexpected error: {err}");
}

// extattr and the Solaris attribute files truncate instead of failing.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
#[test]
fn test_too_small_buffer_is_a_native_error() {
    let dir = scratch_dir();
    let path = file_in(&dir, "small.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    setxattr(&path, "user.long", b"0123456789", 0, XattrOptions::empty()).unwrap();
    let mut buf = [0u8; 4];
    let err = getxattr(&path, "user.long", Some(&mut buf), 0, XattrOptions::empty()).unwrap_err();
    assert_eq!(err.raw_os_error(), Some(libc::ERANGE));
}

/// Names listed as raw bytes can be fed back to every other operation.
#[cfg(any(target_os = "linux", target_os = "android"))]
#[test]
fn test_non_utf8_name_round_trip() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = scratch_dir();
    let path = file_in(&dir, "bytes.txt");
    if !supports_user_xattrs(&path) {
        return;
    }
    let name = OsStr::from_bytes(b"user.\xff\xfe");

    setxattr(&path, name, b"raw", 0, XattrOptions::empty()).unwrap();

    let listed = list_names(&path, XattrOptions::empty()).unwrap();
    let listed = listed
        .iter()
        .find(|n| n.as_bytes() == name.as_bytes())
        .unwrap();
    assert_eq!(
        get_value(&path, listed, XattrOptions::empty()).unwrap(),
        b"raw"
    );

    setxattr(&path, listed, b"again", 0, XattrOptions::REPLACE).unwrap();
    assert_eq!(get_value(&path, name, XattrOptions::empty()).unwrap(), b"again");

    removexattr(&path, listed, XattrOptions::empty()).unwrap();
    assert!(getxattr(&path, name, None, 0, XattrOptions::empty())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_empty_buffer_reports_size() {
    let dir = scratch_dir();
    let path = file_in(&dir, "empty-buf.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    setxattr(&path, "user.sized", b"0123456789", 0, XattrOptions::empty()).unwrap();
    let mut empty: [u8; 0] = [];
    let n = getxattr(&path, "user.sized", Some(&mut empty), 0, XattrOptions::empty()).unwrap();
    assert_eq!(n, 10);
    let needed = listxattr(&path, None, XattrOptions::empty()).unwrap();
    assert_eq!(
        listxattr(&path, Some(&mut empty), XattrOptions::empty()).unwrap(),
        needed
    );
}

#[test]
fn test_missing_file_is_a_native_error() {
    let dir = scratch_dir();
    let path = dir.path().join("does-not-exist");

    let err = getxattr(&path, "user.test", None, 0, XattrOptions::empty()).unwrap_err();
    assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
}

#[test]
fn test_directory_attributes() {
    let dir = scratch_dir();
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    if !supports_user_xattrs(&sub) {
        return;
    }

    setxattr(&sub, "user.dir", b"yes", 0, XattrOptions::empty()).unwrap();
    assert_eq!(
        get_value(&sub, "user.dir", XattrOptions::empty()).unwrap(),
        b"yes"
    );
}

/// The `xattr` crate serves as an independent reader and writer.
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn test_agrees_with_xattr_crate() {
    let dir = scratch_dir();
    let path = file_in(&dir, "oracle.txt");
    if !supports_user_xattrs(&path) {
        return;
    }

    setxattr(&path, "user.ours", b"written here", 0, XattrOptions::empty()).unwrap();
    assert_eq!(
        xattr::get(&path, "user.ours").unwrap().as_deref(),
        Some(&b"written here"[..])
    );

    xattr::set(&path, "user.theirs", b"written there").unwrap();
    assert_eq!(
        get_value(&path, "user.theirs", XattrOptions::empty()).unwrap(),
        b"written there"
    );

    let ours: BTreeSet<_> = list_names(&path, XattrOptions::empty())
        .unwrap()
        .into_iter()
        .collect();
    let theirs: BTreeSet<_> = xattr::list(&path).unwrap().collect();
    assert_eq!(ours, theirs);
}
