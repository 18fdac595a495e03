//! Async xattr operations on open files and on paths
//!
//! Descriptor operations duplicate the file's descriptor before handing it to
//! the blocking pool, so a dropped future can never leave a task working on a
//! closed descriptor. Path operations come in pairs: the plain
//! variant follows symlinks, the `l` variant acts on the link itself.

use crate::error::{AsyncXattrError, Result};
use compio::fs::File;
use std::ffi::{OsStr, OsString};
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd};
use std::path::Path;
use xattr_compat::XattrOptions;

/// Trait for xattr operations on an open file
///
/// Names are raw bytes on most platforms, so they are taken as `OsStr`; a
/// name returned by [`XattrOps::list_xattr`] can be passed straight back.
#[allow(async_fn_in_trait)]
pub trait XattrOps {
    /// Get an extended attribute value
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the extended attribute
    ///
    /// # Returns
    ///
    /// The whole value of the extended attribute
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The extended attribute doesn't exist
    /// - Permission is denied
    /// - The filesystem has no xattr support
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use compio::fs::File;
    /// use compio_xattr::XattrOps;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("file.txt").await?;
    /// let value = file.get_xattr("user.custom").await?;
    /// println!("xattr value: {:?}", value);
    /// # Ok(())
    /// # }
    /// ```
    async fn get_xattr(&self, name: impl AsRef<OsStr>) -> Result<Vec<u8>>;

    /// Set an extended attribute value, creating or replacing it
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the extended attribute
    /// * `value` - Value to set
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Permission is denied
    /// - The filesystem has no xattr support
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use compio::fs::File;
    /// use compio_xattr::XattrOps;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("file.txt").await?;
    /// file.set_xattr("user.custom", b"value").await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn set_xattr(&self, name: impl AsRef<OsStr>, value: &[u8]) -> Result<()>;

    /// Set an extended attribute value with explicit options
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the extended attribute
    /// * `value` - Value to set
    /// * `options` - [`XattrOptions::CREATE`] to fail if it exists,
    ///   [`XattrOptions::REPLACE`] to fail if it does not
    ///
    /// # Errors
    ///
    /// As [`XattrOps::set_xattr`]. Combining `CREATE` with `REPLACE`, or
    /// passing `NOFOLLOW`, fails with `EINVAL` before reaching the kernel
    /// (except on macOS, where the kernel decides).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use compio::fs::File;
    /// use compio_xattr::{XattrOps, XattrOptions};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("file.txt").await?;
    /// file.set_xattr_with("user.once", b"first", XattrOptions::CREATE).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn set_xattr_with(
        &self,
        name: impl AsRef<OsStr>,
        value: &[u8],
        options: XattrOptions,
    ) -> Result<()>;

    /// Remove an extended attribute
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the extended attribute
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The extended attribute doesn't exist
    /// - Permission is denied
    async fn remove_xattr(&self, name: impl AsRef<OsStr>) -> Result<()>;

    /// List all extended attributes
    ///
    /// # Returns
    ///
    /// Vector of extended attribute names, including ones that are not UTF-8
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Permission is denied
    /// - The filesystem has no xattr support
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use compio::fs::File;
    /// use compio_xattr::XattrOps;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("file.txt").await?;
    /// for name in file.list_xattr().await? {
    ///     println!("xattr: {}", name.to_string_lossy());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn list_xattr(&self) -> Result<Vec<OsString>>;
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> xattr_compat::Result<T> + Send + 'static,
{
    let inner = compio::runtime::spawn_blocking(f)
        .await
        .map_err(AsyncXattrError::SpawnJoin)?;
    Ok(inner?)
}

fn dup_fd(file: &File) -> Result<OwnedFd> {
    // SAFETY: `file` is borrowed for the duration of this call, so its
    // descriptor is open while it is duplicated.
    let fd = unsafe { BorrowedFd::borrow_raw(file.as_raw_fd()) };
    fd.try_clone_to_owned().map_err(AsyncXattrError::Dup)
}

impl XattrOps for File {
    async fn get_xattr(&self, name: impl AsRef<OsStr>) -> Result<Vec<u8>> {
        let fd = dup_fd(self)?;
        let name = name.as_ref().to_os_string();
        blocking(move || xattr_compat::fget_value(&fd, &name, XattrOptions::empty())).await
    }

    async fn set_xattr(&self, name: impl AsRef<OsStr>, value: &[u8]) -> Result<()> {
        self.set_xattr_with(name, value, XattrOptions::empty()).await
    }

    async fn set_xattr_with(
        &self,
        name: impl AsRef<OsStr>,
        value: &[u8],
        options: XattrOptions,
    ) -> Result<()> {
        let fd = dup_fd(self)?;
        let (name, value) = (name.as_ref().to_os_string(), value.to_vec());
        blocking(move || xattr_compat::fsetxattr(&fd, &name, &value, 0, options)).await
    }

    async fn remove_xattr(&self, name: impl AsRef<OsStr>) -> Result<()> {
        let fd = dup_fd(self)?;
        let name = name.as_ref().to_os_string();
        blocking(move || xattr_compat::fremovexattr(&fd, &name, XattrOptions::empty())).await
    }

    async fn list_xattr(&self) -> Result<Vec<OsString>> {
        let fd = dup_fd(self)?;
        blocking(move || xattr_compat::flist_names(&fd, XattrOptions::empty())).await
    }
}

fn nofollow(follow: bool) -> XattrOptions {
    if follow {
        XattrOptions::empty()
    } else {
        XattrOptions::NOFOLLOW
    }
}

async fn get_at(path: &Path, name: impl AsRef<OsStr>, follow: bool) -> Result<Vec<u8>> {
    let (path, name) = (path.to_path_buf(), name.as_ref().to_os_string());
    blocking(move || xattr_compat::get_value(&path, &name, nofollow(follow))).await
}

async fn set_at(path: &Path, name: impl AsRef<OsStr>, value: &[u8], follow: bool) -> Result<()> {
    let (path, name, value) = (path.to_path_buf(), name.as_ref().to_os_string(), value.to_vec());
    blocking(move || xattr_compat::setxattr(&path, &name, &value, 0, nofollow(follow))).await
}

async fn remove_at(path: &Path, name: impl AsRef<OsStr>, follow: bool) -> Result<()> {
    let (path, name) = (path.to_path_buf(), name.as_ref().to_os_string());
    blocking(move || xattr_compat::removexattr(&path, &name, nofollow(follow))).await
}

async fn list_at(path: &Path, follow: bool) -> Result<Vec<OsString>> {
    let path = path.to_path_buf();
    blocking(move || xattr_compat::list_names(&path, nofollow(follow))).await
}

/// Get an extended attribute value at the given path, following symlinks.
///
/// # Errors
///
/// Fails if the attribute does not exist, permission is denied or the
/// filesystem has no xattr support.
pub async fn get_xattr_at_path(path: &Path, name: impl AsRef<OsStr>) -> Result<Vec<u8>> {
    get_at(path, name, true).await
}

/// Get an extended attribute value of the symlink itself.
///
/// # Errors
///
/// As [`get_xattr_at_path`].
pub async fn lget_xattr_at_path(path: &Path, name: impl AsRef<OsStr>) -> Result<Vec<u8>> {
    get_at(path, name, false).await
}

/// Set an extended attribute at the given path, following symlinks.
///
/// # Errors
///
/// Fails if permission is denied or the filesystem has no xattr support.
pub async fn set_xattr_at_path(path: &Path, name: impl AsRef<OsStr>, value: &[u8]) -> Result<()> {
    set_at(path, name, value, true).await
}

/// Set an extended attribute on the symlink itself.
///
/// Many filesystems refuse user attributes on symlinks.
///
/// # Errors
///
/// As [`set_xattr_at_path`].
pub async fn lset_xattr_at_path(path: &Path, name: impl AsRef<OsStr>, value: &[u8]) -> Result<()> {
    set_at(path, name, value, false).await
}

/// Remove an extended attribute at the given path, following symlinks.
///
/// # Errors
///
/// Fails if the attribute does not exist or permission is denied.
pub async fn remove_xattr_at_path(path: &Path, name: impl AsRef<OsStr>) -> Result<()> {
    remove_at(path, name, true).await
}

/// Remove an extended attribute from the symlink itself.
///
/// # Errors
///
/// As [`remove_xattr_at_path`].
pub async fn lremove_xattr_at_path(path: &Path, name: impl AsRef<OsStr>) -> Result<()> {
    remove_at(path, name, false).await
}

/// List extended attribute names at the given path, following symlinks.
///
/// # Errors
///
/// Fails if permission is denied or the filesystem has no xattr support.
pub async fn list_xattr_at_path(path: &Path) -> Result<Vec<OsString>> {
    list_at(path, true).await
}

/// List extended attribute names of the symlink itself.
///
/// # Errors
///
/// As [`list_xattr_at_path`].
pub async fn llist_xattr_at_path(path: &Path) -> Result<Vec<OsString>> {
    list_at(path, false).await
}
