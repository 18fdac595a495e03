//! Owned-value helpers
//!
//! Callers that just want the bytes use these instead of managing buffers:
//! query the size with an absent buffer, allocate, fetch, truncate. There is no
//! retry if the attribute grows in between; the native `ERANGE` comes back as
//! is.

use crate::adapter::Adapter;
use crate::backend::XattrBackend;
use crate::error::Result;
use crate::list::Names;
use crate::options::XattrOptions;
use std::ffi::{OsStr, OsString};
use std::os::fd::AsFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

fn decode_names(buf: &[u8]) -> Vec<OsString> {
    Names::new(buf)
        .map(|name| OsStr::from_bytes(name).to_os_string())
        .collect()
}

impl<B: XattrBackend> Adapter<B> {
    /// Fetch the full value of attribute `name` of the file at `path`.
    ///
    /// # Errors
    ///
    /// Any error of [`Adapter::get`], from either the size query or the read.
    pub fn get_value(
        &self,
        path: impl AsRef<Path>,
        name: impl AsRef<OsStr>,
        options: XattrOptions,
    ) -> Result<Vec<u8>> {
        let (path, name) = (path.as_ref(), name.as_ref());
        let size = self.get(path, name, None, 0, options)?;
        if size == 0 {
            return Ok(Vec::new());
        }
        let mut value = vec![0u8; size];
        let len = self.get(path, name, Some(&mut value), 0, options)?;
        value.truncate(len);
        Ok(value)
    }

    /// Fetch the full value of attribute `name` of the open file `fd`.
    ///
    /// # Errors
    ///
    /// Any error of [`Adapter::fget`].
    pub fn fget_value(
        &self,
        fd: impl AsFd,
        name: impl AsRef<OsStr>,
        options: XattrOptions,
    ) -> Result<Vec<u8>> {
        let (fd, name) = (fd.as_fd(), name.as_ref());
        let size = self.fget(fd, name, None, 0, options)?;
        if size == 0 {
            return Ok(Vec::new());
        }
        let mut value = vec![0u8; size];
        let len = self.fget(fd, name, Some(&mut value), 0, options)?;
        value.truncate(len);
        Ok(value)
    }

    /// Names of all attributes of the file at `path`.
    ///
    /// # Errors
    ///
    /// Any error of [`Adapter::list`].
    pub fn list_names(
        &self,
        path: impl AsRef<Path>,
        options: XattrOptions,
    ) -> Result<Vec<OsString>> {
        let path = path.as_ref();
        let size = self.list(path, None, options)?;
        if size == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; size];
        let len = self.list(path, Some(&mut buf), options)?;
        Ok(decode_names(&buf[..len.min(buf.len())]))
    }

    /// Names of all attributes of the open file `fd`.
    ///
    /// # Errors
    ///
    /// Any error of [`Adapter::flist`].
    pub fn flist_names(&self, fd: impl AsFd, options: XattrOptions) -> Result<Vec<OsString>> {
        let fd = fd.as_fd();
        let size = self.flist(fd, None, options)?;
        if size == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; size];
        let len = self.flist(fd, Some(&mut buf), options)?;
        Ok(decode_names(&buf[..len.min(buf.len())]))
    }
}
