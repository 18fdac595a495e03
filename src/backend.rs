//! The interface every platform backend implements
//!
//! Backends see arguments that have already been validated (for strict
//! backends) and converted to C strings. They report native failures as
//! `io::Error` built from errno and never invent errors of their own, except
//! where they emulate a native concept the platform lacks.

use crate::options::XattrOptions;
use std::ffi::CStr;
use std::io;
use std::os::fd::BorrowedFd;

/// How much of the unified contract a backend relies on the adapter to enforce
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Contract {
    /// Position, option combination and descriptor `NOFOLLOW` are checked
    /// before dispatch.
    Strict,
    /// The native API already has the unified shape; arguments go through
    /// untouched and the kernel judges them.
    PassThrough,
}

/// Native extended-attribute operations for one platform family
///
/// `value`/`buf` set to `None` asks only for the size the result needs.
pub trait XattrBackend {
    /// Short name used in logs
    const NAME: &'static str;

    /// Whether the adapter validates arguments before calling in
    const CONTRACT: Contract;

    /// Read an attribute of the file at `path`, returning the value length.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn get(
        &self,
        path: &CStr,
        name: &CStr,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> io::Result<usize>;

    /// Read an attribute of the open file `fd`, returning the value length.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn fget(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> io::Result<usize>;

    /// Write an attribute of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn set(
        &self,
        path: &CStr,
        name: &CStr,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> io::Result<()>;

    /// Write an attribute of the open file `fd`.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn fset(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> io::Result<()>;

    /// Delete an attribute of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn remove(&self, path: &CStr, name: &CStr, options: XattrOptions) -> io::Result<()>;

    /// Delete an attribute of the open file `fd`.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn fremove(&self, fd: BorrowedFd<'_>, name: &CStr, options: XattrOptions) -> io::Result<()>;

    /// List the attribute names of the file at `path` as a NUL-terminated
    /// sequence, returning its total length.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn list(&self, path: &CStr, buf: Option<&mut [u8]>, options: XattrOptions)
        -> io::Result<usize>;

    /// List the attribute names of the open file `fd` as a NUL-terminated
    /// sequence, returning its total length.
    ///
    /// # Errors
    ///
    /// Returns the native error of the underlying call.
    fn flist(
        &self,
        fd: BorrowedFd<'_>,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> io::Result<usize>;
}
