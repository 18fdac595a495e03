//! macOS backend: the native calls already have the unified shape
//!
//! Position and options go to the kernel untouched, including `NOSECURITY`,
//! non-zero positions on `com.apple.ResourceFork` and `NOFOLLOW` on
//! descriptors. The adapter skips validation for this backend.

use super::{cvt, cvt_size, out_ptr};
use crate::backend::{Contract, XattrBackend};
use crate::options::XattrOptions;
use std::ffi::CStr;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

/// Backend for macOS and iOS
#[derive(Copy, Clone, Debug, Default)]
pub struct Macos;

impl XattrBackend for Macos {
    const NAME: &'static str = "darwin";
    const CONTRACT: Contract = Contract::PassThrough;

    fn get(
        &self,
        path: &CStr,
        name: &CStr,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(value);
        // SAFETY: path and name are NUL-terminated; ptr/len describe a live
        // buffer or are null/0.
        let ret = unsafe {
            libc::getxattr(
                path.as_ptr(),
                name.as_ptr(),
                ptr,
                len,
                position,
                options.bits(),
            )
        };
        cvt_size(ret)
    }

    fn fget(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(value);
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe {
            libc::fgetxattr(
                fd.as_raw_fd(),
                name.as_ptr(),
                ptr,
                len,
                position,
                options.bits(),
            )
        };
        cvt_size(ret)
    }

    fn set(
        &self,
        path: &CStr,
        name: &CStr,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        // SAFETY: value outlives the call and is only read.
        let ret = unsafe {
            libc::setxattr(
                path.as_ptr(),
                name.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                position,
                options.bits(),
            )
        };
        cvt(ret)
    }

    fn fset(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe {
            libc::fsetxattr(
                fd.as_raw_fd(),
                name.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                position,
                options.bits(),
            )
        };
        cvt(ret)
    }

    fn remove(&self, path: &CStr, name: &CStr, options: XattrOptions) -> io::Result<()> {
        // SAFETY: path and name are NUL-terminated.
        cvt(unsafe { libc::removexattr(path.as_ptr(), name.as_ptr(), options.bits()) })
    }

    fn fremove(&self, fd: BorrowedFd<'_>, name: &CStr, options: XattrOptions) -> io::Result<()> {
        // SAFETY: fd is borrowed for the duration of the call.
        cvt(unsafe { libc::fremovexattr(fd.as_raw_fd(), name.as_ptr(), options.bits()) })
    }

    fn list(
        &self,
        path: &CStr,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(buf);
        // SAFETY: ptr/len describe a live buffer or are null/0.
        let ret = unsafe { libc::listxattr(path.as_ptr(), ptr.cast(), len, options.bits()) };
        cvt_size(ret)
    }

    fn flist(
        &self,
        fd: BorrowedFd<'_>,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(buf);
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe { libc::flistxattr(fd.as_raw_fd(), ptr.cast(), len, options.bits()) };
        cvt_size(ret)
    }
}
