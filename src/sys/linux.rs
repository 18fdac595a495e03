//! Linux backend: flag translation over the native `*xattr` family
//!
//! The unified create/replace bits map onto `XATTR_CREATE`/`XATTR_REPLACE`.
//! `NOFOLLOW` selects the `l`-prefixed syscall for path-based calls; there is
//! no descriptor variant, so the adapter rejects it there before we are called.

use super::{cvt, cvt_size, out_ptr};
use crate::backend::{Contract, XattrBackend};
use crate::options::{SetMode, XattrOptions};
use libc::c_int;
use std::ffi::CStr;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

/// Backend for Linux and Android
#[derive(Copy, Clone, Debug, Default)]
pub struct Linux;

/// Native `setxattr` flags for the validated unified options
fn set_flags(options: XattrOptions) -> c_int {
    match options.set_mode() {
        Some(SetMode::CreateOnly) => libc::XATTR_CREATE,
        Some(SetMode::ReplaceOnly) => libc::XATTR_REPLACE,
        Some(SetMode::Upsert) | None => 0,
    }
}

impl XattrBackend for Linux {
    const NAME: &'static str = "linux";
    const CONTRACT: Contract = Contract::Strict;

    fn get(
        &self,
        path: &CStr,
        name: &CStr,
        value: Option<&mut [u8]>,
        _position: u32,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(value);
        // SAFETY: path and name are NUL-terminated; ptr/len describe a live
        // buffer or are null/0.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::getxattr(path.as_ptr(), name.as_ptr(), ptr, len)
            } else {
                libc::lgetxattr(path.as_ptr(), name.as_ptr(), ptr, len)
            }
        };
        cvt_size(ret)
    }

    fn fget(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: Option<&mut [u8]>,
        _position: u32,
        _options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(value);
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe { libc::fgetxattr(fd.as_raw_fd(), name.as_ptr(), ptr, len) };
        cvt_size(ret)
    }

    fn set(
        &self,
        path: &CStr,
        name: &CStr,
        value: &[u8],
        _position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        let flags = set_flags(options);
        // SAFETY: value outlives the call and is only read.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::setxattr(
                    path.as_ptr(),
                    name.as_ptr(),
                    value.as_ptr().cast(),
                    value.len(),
                    flags,
                )
            } else {
                libc::lsetxattr(
                    path.as_ptr(),
                    name.as_ptr(),
                    value.as_ptr().cast(),
                    value.len(),
                    flags,
                )
            }
        };
        cvt(ret)
    }

    fn fset(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: &[u8],
        _position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe {
            libc::fsetxattr(
                fd.as_raw_fd(),
                name.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                set_flags(options),
            )
        };
        cvt(ret)
    }

    fn remove(&self, path: &CStr, name: &CStr, options: XattrOptions) -> io::Result<()> {
        // SAFETY: path and name are NUL-terminated.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::removexattr(path.as_ptr(), name.as_ptr())
            } else {
                libc::lremovexattr(path.as_ptr(), name.as_ptr())
            }
        };
        cvt(ret)
    }

    fn fremove(&self, fd: BorrowedFd<'_>, name: &CStr, _options: XattrOptions) -> io::Result<()> {
        // SAFETY: fd is borrowed for the duration of the call.
        cvt(unsafe { libc::fremovexattr(fd.as_raw_fd(), name.as_ptr()) })
    }

    fn list(
        &self,
        path: &CStr,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(buf);
        // SAFETY: ptr/len describe a live buffer or are null/0.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::listxattr(path.as_ptr(), ptr.cast(), len)
            } else {
                libc::llistxattr(path.as_ptr(), ptr.cast(), len)
            }
        };
        cvt_size(ret)
    }

    fn flist(
        &self,
        fd: BorrowedFd<'_>,
        buf: Option<&mut [u8]>,
        _options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(buf);
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe { libc::flistxattr(fd.as_raw_fd(), ptr.cast(), len) };
        cvt_size(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_flags_translation() {
        assert_eq!(set_flags(XattrOptions::empty()), 0);
        assert_eq!(set_flags(XattrOptions::CREATE), libc::XATTR_CREATE);
        assert_eq!(set_flags(XattrOptions::REPLACE), libc::XATTR_REPLACE);
        assert_eq!(
            set_flags(XattrOptions::REPLACE | XattrOptions::NOFOLLOW),
            libc::XATTR_REPLACE
        );
        assert_eq!(set_flags(XattrOptions::NOSECURITY), 0);
    }
}
