//! The Attribute Access Adapter
//!
//! [`Adapter`] is the single entry point for the eight operations. It applies
//! the unified contract (for strict backends), converts paths and names to C
//! strings and tags native failures with the operation that produced them.

use crate::backend::{Contract, XattrBackend};
use crate::error::{Op, Result, Violation, XattrError};
use crate::options::XattrOptions;
use crate::sys::Native;
use crate::validate;
use std::ffi::{CString, OsStr};
use std::io;
use std::os::fd::AsFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use tracing::{debug, trace};

/// Dispatches the eight extended-attribute operations to a backend
#[derive(Copy, Clone, Debug, Default)]
pub struct Adapter<B> {
    backend: B,
}

impl Adapter<Native> {
    /// The adapter for the backend this crate was compiled for
    pub const fn native() -> Self {
        Self { backend: Native {} }
    }
}

fn c_path(op: Op, path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| XattrError::invalid(op, Violation::InteriorNul("path")))
}

/// An empty output buffer is a size query, the same as no buffer at all.
fn out_buf(buf: Option<&mut [u8]>) -> Option<&mut [u8]> {
    buf.filter(|buf| !buf.is_empty())
}

fn c_name(op: Op, name: &OsStr) -> Result<CString> {
    CString::new(name.as_bytes())
        .map_err(|_| XattrError::invalid(op, Violation::InteriorNul("name")))
}

impl<B: XattrBackend> Adapter<B> {
    /// Wrap a specific backend
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend calls are dispatched to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn admit(&self, op: Op, position: u32, options: XattrOptions) -> Result<()> {
        if B::CONTRACT == Contract::PassThrough {
            return Ok(());
        }
        validate::check(op, position, options).map_err(|violation| {
            debug!(%op, %violation, backend = B::NAME, "rejected before dispatch");
            XattrError::invalid(op, violation)
        })
    }

    fn finish<T>(op: Op, result: io::Result<T>) -> Result<T> {
        result.map_err(|e| {
            trace!(%op, error = %e, backend = B::NAME, "native call failed");
            XattrError::os(op, e)
        })
    }

    /// Read attribute `name` of the file at `path` into `value`.
    ///
    /// Returns the number of bytes written, or with `value` set to `None` (or
    /// an empty slice) the size a buffer needs; nothing is written then.
    ///
    /// # Errors
    ///
    /// Fails with [`XattrError::InvalidArgument`] if `position` is not 0 or
    /// `options` holds anything besides `NOFOLLOW`/`NOSECURITY` (strict
    /// backends), and with [`XattrError::Os`] if the native call fails, for
    /// example because the attribute does not exist or `value` is too small.
    pub fn get(
        &self,
        path: impl AsRef<Path>,
        name: impl AsRef<OsStr>,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> Result<usize> {
        let op = Op::Get;
        self.admit(op, position, options)?;
        let (path, name) = (c_path(op, path.as_ref())?, c_name(op, name.as_ref())?);
        trace!(%op, ?path, ?name, backend = B::NAME, "dispatch");
        Self::finish(op, self.backend.get(&path, &name, out_buf(value), position, options))
    }

    /// Read attribute `name` of the open file `fd` into `value`.
    ///
    /// # Errors
    ///
    /// As [`Adapter::get`]; additionally `NOFOLLOW` is a contract violation.
    pub fn fget(
        &self,
        fd: impl AsFd,
        name: impl AsRef<OsStr>,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> Result<usize> {
        let op = Op::FGet;
        self.admit(op, position, options)?;
        let name = c_name(op, name.as_ref())?;
        trace!(%op, ?name, backend = B::NAME, "dispatch");
        Self::finish(
            op,
            self.backend.fget(fd.as_fd(), &name, out_buf(value), position, options),
        )
    }

    /// Set attribute `name` of the file at `path` to `value`.
    ///
    /// # Errors
    ///
    /// Fails with [`XattrError::InvalidArgument`] if `position` is not 0 or
    /// `options` combine `CREATE` with `REPLACE` (strict backends), and with
    /// [`XattrError::Os`] if the native call fails.
    pub fn set(
        &self,
        path: impl AsRef<Path>,
        name: impl AsRef<OsStr>,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> Result<()> {
        let op = Op::Set;
        self.admit(op, position, options)?;
        let (path, name) = (c_path(op, path.as_ref())?, c_name(op, name.as_ref())?);
        trace!(%op, ?path, ?name, len = value.len(), backend = B::NAME, "dispatch");
        Self::finish(op, self.backend.set(&path, &name, value, position, options))
    }

    /// Set attribute `name` of the open file `fd` to `value`.
    ///
    /// # Errors
    ///
    /// As [`Adapter::set`]; additionally `NOFOLLOW` is a contract violation.
    pub fn fset(
        &self,
        fd: impl AsFd,
        name: impl AsRef<OsStr>,
        value: &[u8],
        position: u32,
        options: XattrOptions,
    ) -> Result<()> {
        let op = Op::FSet;
        self.admit(op, position, options)?;
        let name = c_name(op, name.as_ref())?;
        trace!(%op, ?name, len = value.len(), backend = B::NAME, "dispatch");
        Self::finish(
            op,
            self.backend.fset(fd.as_fd(), &name, value, position, options),
        )
    }

    /// Remove attribute `name` from the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails with [`XattrError::InvalidArgument`] if `options` holds anything
    /// besides `NOFOLLOW`/`NOSECURITY` (strict backends), and with
    /// [`XattrError::Os`] if the native call fails.
    pub fn remove(
        &self,
        path: impl AsRef<Path>,
        name: impl AsRef<OsStr>,
        options: XattrOptions,
    ) -> Result<()> {
        let op = Op::Remove;
        self.admit(op, 0, options)?;
        let (path, name) = (c_path(op, path.as_ref())?, c_name(op, name.as_ref())?);
        trace!(%op, ?path, ?name, backend = B::NAME, "dispatch");
        Self::finish(op, self.backend.remove(&path, &name, options))
    }

    /// Remove attribute `name` from the open file `fd`.
    ///
    /// # Errors
    ///
    /// As [`Adapter::remove`]; additionally `NOFOLLOW` is a contract violation.
    pub fn fremove(
        &self,
        fd: impl AsFd,
        name: impl AsRef<OsStr>,
        options: XattrOptions,
    ) -> Result<()> {
        let op = Op::FRemove;
        self.admit(op, 0, options)?;
        let name = c_name(op, name.as_ref())?;
        trace!(%op, ?name, backend = B::NAME, "dispatch");
        Self::finish(op, self.backend.fremove(fd.as_fd(), &name, options))
    }

    /// List the attribute names of the file at `path` into `buf` as
    /// NUL-terminated strings.
    ///
    /// Returns the total length of the list, or with `buf` set to `None` (or an
    /// empty slice) the size a buffer needs.
    ///
    /// # Errors
    ///
    /// Fails with [`XattrError::InvalidArgument`] if `options` holds anything
    /// besides `NOFOLLOW`/`NOSECURITY` (strict backends), and with
    /// [`XattrError::Os`] if the native call fails.
    pub fn list(
        &self,
        path: impl AsRef<Path>,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> Result<usize> {
        let op = Op::List;
        self.admit(op, 0, options)?;
        let path = c_path(op, path.as_ref())?;
        trace!(%op, ?path, backend = B::NAME, "dispatch");
        Self::finish(op, self.backend.list(&path, out_buf(buf), options))
    }

    /// List the attribute names of the open file `fd` into `buf`.
    ///
    /// # Errors
    ///
    /// As [`Adapter::list`]; additionally `NOFOLLOW` is a contract violation.
    pub fn flist(
        &self,
        fd: impl AsFd,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> Result<usize> {
        let op = Op::FList;
        self.admit(op, 0, options)?;
        trace!(%op, backend = B::NAME, "dispatch");
        Self::finish(op, self.backend.flist(fd.as_fd(), out_buf(buf), options))
    }
}
