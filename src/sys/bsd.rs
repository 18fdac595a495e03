//! BSD backend: the `extattr_*` family in the user namespace
//!
//! `extattr_list_*` returns length-prefixed names, rewritten in place with
//! [`convert_bsd_list`]. `extattr_set_*` returns the number of bytes written;
//! the contract wants 0, so any non-negative result becomes `Ok(())`.
//!
//! The native API has no create-only or replace-only mode. By default the
//! flags are accepted and ignored. With the `bsd-exclusive-set` feature the
//! backend probes for the attribute first and fails with `EEXIST`/`ENOATTR`,
//! which is racy against concurrent writers.

use super::{cvt, cvt_size, out_ptr};
use crate::backend::{Contract, XattrBackend};
use crate::list::convert_bsd_list;
use crate::options::XattrOptions;
use libc::EXTATTR_NAMESPACE_USER;
use std::ffi::CStr;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

/// Backend for FreeBSD, DragonFly and NetBSD
#[derive(Copy, Clone, Debug, Default)]
pub struct Bsd;

/// Rewrite the first `len` bytes of a native listing, if a buffer was given.
fn finish_list(buf: Option<&mut [u8]>, len: usize) -> usize {
    if let Some(buf) = buf {
        let len = len.min(buf.len());
        convert_bsd_list(&mut buf[..len]);
    }
    len
}

impl Bsd {
    #[cfg(feature = "bsd-exclusive-set")]
    fn precondition(
        &self,
        options: XattrOptions,
        probe: impl FnOnce() -> io::Result<usize>,
    ) -> io::Result<()> {
        if options.reduced().is_empty() {
            return Ok(());
        }
        crate::validate::exclusive_set(options, probe())
    }

    #[cfg(not(feature = "bsd-exclusive-set"))]
    fn precondition(
        &self,
        _options: XattrOptions,
        _probe: impl FnOnce() -> io::Result<usize>,
    ) -> io::Result<()> {
        Ok(())
    }
}

impl XattrBackend for Bsd {
    const NAME: &'static str = "bsd-extattr";
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
                libc::extattr_get_file(
                    path.as_ptr(),
                    EXTATTR_NAMESPACE_USER,
                    name.as_ptr(),
                    ptr,
                    len,
                )
            } else {
                libc::extattr_get_link(
                    path.as_ptr(),
                    EXTATTR_NAMESPACE_USER,
                    name.as_ptr(),
                    ptr,
                    len,
                )
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
        let ret = unsafe {
            libc::extattr_get_fd(
                fd.as_raw_fd(),
                EXTATTR_NAMESPACE_USER,
                name.as_ptr(),
                ptr,
                len,
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
        self.precondition(options, || self.get(path, name, None, position, options))?;
        // SAFETY: value outlives the call and is only read.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::extattr_set_file(
                    path.as_ptr(),
                    EXTATTR_NAMESPACE_USER,
                    name.as_ptr(),
                    value.as_ptr().cast(),
                    value.len(),
                )
            } else {
                libc::extattr_set_link(
                    path.as_ptr(),
                    EXTATTR_NAMESPACE_USER,
                    name.as_ptr(),
                    value.as_ptr().cast(),
                    value.len(),
                )
            }
        };
        // NetBSD declares the set calls as returning int.
        #[allow(clippy::unnecessary_cast)]
        let ret = ret as libc::ssize_t;
        cvt_size(ret).map(drop)
    }

    fn fset(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        self.precondition(options, || self.fget(fd, name, None, position, options))?;
        // SAFETY: fd is borrowed for the duration of the call.
        let ret = unsafe {
            libc::extattr_set_fd(
                fd.as_raw_fd(),
                EXTATTR_NAMESPACE_USER,
                name.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
            )
        };
        #[allow(clippy::unnecessary_cast)]
        let ret = ret as libc::ssize_t;
        cvt_size(ret).map(drop)
    }

    fn remove(&self, path: &CStr, name: &CStr, options: XattrOptions) -> io::Result<()> {
        // SAFETY: path and name are NUL-terminated.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::extattr_delete_file(path.as_ptr(), EXTATTR_NAMESPACE_USER, name.as_ptr())
            } else {
                libc::extattr_delete_link(path.as_ptr(), EXTATTR_NAMESPACE_USER, name.as_ptr())
            }
        };
        cvt(ret)
    }

    fn fremove(&self, fd: BorrowedFd<'_>, name: &CStr, _options: XattrOptions) -> io::Result<()> {
        // SAFETY: fd is borrowed for the duration of the call.
        cvt(unsafe {
            libc::extattr_delete_fd(fd.as_raw_fd(), EXTATTR_NAMESPACE_USER, name.as_ptr())
        })
    }

    fn list(
        &self,
        path: &CStr,
        mut buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(buf.as_deref_mut());
        // SAFETY: ptr/len describe a live buffer or are null/0.
        let ret = unsafe {
            if options.follows_symlinks() {
                libc::extattr_list_file(path.as_ptr(), EXTATTR_NAMESPACE_USER, ptr, len)
            } else {
                libc::extattr_list_link(path.as_ptr(), EXTATTR_NAMESPACE_USER, ptr, len)
            }
        };
        cvt_size(ret).map(|n| finish_list(buf, n))
    }

    fn flist(
        &self,
        fd: BorrowedFd<'_>,
        mut buf: Option<&mut [u8]>,
        _options: XattrOptions,
    ) -> io::Result<usize> {
        let (ptr, len) = out_ptr(buf.as_deref_mut());
        // SAFETY: fd is borrowed for the duration of the call.
        let ret =
            unsafe { libc::extattr_list_fd(fd.as_raw_fd(), EXTATTR_NAMESPACE_USER, ptr, len) };
        cvt_size(ret).map(|n| finish_list(buf, n))
    }
}
