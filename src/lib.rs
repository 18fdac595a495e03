//! # xattr-compat
//!
//! One extended-attribute contract over every Unix flavour that has them:
//! - Linux `*xattr` / `l*xattr` / `f*xattr`
//! - FreeBSD, DragonFly and NetBSD `extattr_*` (user namespace)
//! - Solaris and illumos attribute directories (`O_XATTR`)
//! - macOS native `*xattr`, which already has the unified shape
//!
//! Eight operations (get, set, remove and list, each by path or by descriptor)
//! take the same arguments on every platform: a target, a name, a buffer, a
//! `position` and [`XattrOptions`]. The backend is picked at compile time.
//!
//! Except on macOS, `position` must be 0, `CREATE` and `REPLACE` exclude each
//! other, and `NOFOLLOW` is refused on descriptors; such calls fail with
//! `EINVAL` before any syscall is made. Native failures keep their errno.
//!
//! ## Example
//!
//! ```rust,no_run
//! use xattr_compat::{getxattr, listxattr, setxattr, XattrOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! setxattr("data.txt", "user.test", b"hello", 0, XattrOptions::empty())?;
//!
//! let mut buf = [0u8; 16];
//! let n = getxattr("data.txt", "user.test", Some(&mut buf), 0, XattrOptions::empty())?;
//! assert_eq!(&buf[..n], b"hello");
//!
//! let needed = listxattr("data.txt", None, XattrOptions::empty())?;
//! # let _ = needed;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod backend;
pub mod error;
pub mod list;
pub mod options;
mod owned;
pub mod sys;
mod validate;

pub use adapter::Adapter;
pub use backend::{Contract, XattrBackend};
pub use error::{Op, Result, Violation, XattrError};
pub use options::{SetMode, XattrOptions};

use std::ffi::{OsStr, OsString};
use std::os::fd::AsFd;
use std::path::Path;

/// Longest attribute name, in bytes, callers should expect to work everywhere
pub const XATTR_MAXNAMELEN: usize = 127;

/// Name of the macOS Finder info attribute
pub const XATTR_FINDERINFO_NAME: &str = "com.apple.FinderInfo";

/// Name of the macOS resource fork attribute, the one user of `position`
pub const XATTR_RESOURCEFORK_NAME: &str = "com.apple.ResourceFork";

const NATIVE: Adapter<sys::Native> = Adapter::native();

/// Read attribute `name` of the file at `path`.
///
/// With `value` set to `None` only the required size is returned.
///
/// # Errors
///
/// See [`Adapter::get`].
pub fn getxattr(
    path: impl AsRef<Path>,
    name: impl AsRef<OsStr>,
    value: Option<&mut [u8]>,
    position: u32,
    options: XattrOptions,
) -> Result<usize> {
    NATIVE.get(path, name, value, position, options)
}

/// Read attribute `name` of the open file `fd`.
///
/// # Errors
///
/// See [`Adapter::fget`].
pub fn fgetxattr(
    fd: impl AsFd,
    name: impl AsRef<OsStr>,
    value: Option<&mut [u8]>,
    position: u32,
    options: XattrOptions,
) -> Result<usize> {
    NATIVE.fget(fd, name, value, position, options)
}

/// Set attribute `name` of the file at `path`.
///
/// # Errors
///
/// See [`Adapter::set`].
pub fn setxattr(
    path: impl AsRef<Path>,
    name: impl AsRef<OsStr>,
    value: &[u8],
    position: u32,
    options: XattrOptions,
) -> Result<()> {
    NATIVE.set(path, name, value, position, options)
}

/// Set attribute `name` of the open file `fd`.
///
/// # Errors
///
/// See [`Adapter::fset`].
pub fn fsetxattr(
    fd: impl AsFd,
    name: impl AsRef<OsStr>,
    value: &[u8],
    position: u32,
    options: XattrOptions,
) -> Result<()> {
    NATIVE.fset(fd, name, value, position, options)
}

/// Remove attribute `name` from the file at `path`.
///
/// # Errors
///
/// See [`Adapter::remove`].
pub fn removexattr(
    path: impl AsRef<Path>,
    name: impl AsRef<OsStr>,
    options: XattrOptions,
) -> Result<()> {
    NATIVE.remove(path, name, options)
}

/// Remove attribute `name` from the open file `fd`.
///
/// # Errors
///
/// See [`Adapter::fremove`].
pub fn fremovexattr(fd: impl AsFd, name: impl AsRef<OsStr>, options: XattrOptions) -> Result<()> {
    NATIVE.fremove(fd, name, options)
}

/// List attribute names of the file at `path` as NUL-terminated strings.
///
/// # Errors
///
/// See [`Adapter::list`].
pub fn listxattr(
    path: impl AsRef<Path>,
    buf: Option<&mut [u8]>,
    options: XattrOptions,
) -> Result<usize> {
    NATIVE.list(path, buf, options)
}

/// List attribute names of the open file `fd` as NUL-terminated strings.
///
/// # Errors
///
/// See [`Adapter::flist`].
pub fn flistxattr(fd: impl AsFd, buf: Option<&mut [u8]>, options: XattrOptions) -> Result<usize> {
    NATIVE.flist(fd, buf, options)
}

/// The whole value of attribute `name` of the file at `path`.
///
/// # Errors
///
/// See [`Adapter::get_value`].
pub fn get_value(
    path: impl AsRef<Path>,
    name: impl AsRef<OsStr>,
    options: XattrOptions,
) -> Result<Vec<u8>> {
    NATIVE.get_value(path, name, options)
}

/// The whole value of attribute `name` of the open file `fd`.
///
/// # Errors
///
/// See [`Adapter::fget_value`].
pub fn fget_value(
    fd: impl AsFd,
    name: impl AsRef<OsStr>,
    options: XattrOptions,
) -> Result<Vec<u8>> {
    NATIVE.fget_value(fd, name, options)
}

/// All attribute names of the file at `path`.
///
/// # Errors
///
/// See [`Adapter::list_names`].
pub fn list_names(path: impl AsRef<Path>, options: XattrOptions) -> Result<Vec<OsString>> {
    NATIVE.list_names(path, options)
}

/// All attribute names of the open file `fd`.
///
/// # Errors
///
/// See [`Adapter::flist_names`].
pub fn flist_names(fd: impl AsFd, options: XattrOptions) -> Result<Vec<OsString>> {
    NATIVE.flist_names(fd, options)
}
