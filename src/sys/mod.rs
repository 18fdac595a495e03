//! Platform backends, selected at compile time
//!
//! | Target | Backend | Native API |
//! |---|---|---|
//! | Linux, Android | [`linux::Linux`] | `*xattr` / `l*xattr` / `f*xattr` |
//! | FreeBSD, DragonFly, NetBSD | [`bsd::Bsd`] | `extattr_*` in the user namespace |
//! | Solaris, illumos | [`solaris::Solaris`] | `O_XATTR` attribute directories |
//! | macOS, iOS | [`macos::Macos`] | native `*xattr`, same shape as the contract |

#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
use libc::{c_int, c_void, ssize_t};
#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
use std::io;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub type Native = linux::Linux;

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd"))]
pub mod bsd;
#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd"))]
pub type Native = bsd::Bsd;

#[cfg(any(target_os = "solaris", target_os = "illumos"))]
pub mod solaris;
#[cfg(any(target_os = "solaris", target_os = "illumos"))]
pub type Native = solaris::Solaris;

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub mod macos;
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub type Native = macos::Macos;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "solaris",
    target_os = "illumos",
    target_os = "macos",
    target_os = "ios"
)))]
compile_error!("xattr-compat has no extended-attribute backend for this target");

/// Turn a `-1`-on-failure status into a `Result`.
#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
pub(crate) fn cvt(ret: c_int) -> io::Result<()> {
    if ret == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Turn a negative-on-failure size into a `Result`.
#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
pub(crate) fn cvt_size(ret: ssize_t) -> io::Result<usize> {
    usize::try_from(ret).map_err(|_| io::Error::last_os_error())
}

/// Pointer and capacity for an optional output buffer; `None` becomes the
/// null/0 size query. The adapter has already turned empty buffers into
/// `None`.
#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
pub(crate) fn out_ptr(buf: Option<&mut [u8]>) -> (*mut c_void, usize) {
    match buf {
        Some(buf) => (buf.as_mut_ptr().cast(), buf.len()),
        None => (std::ptr::null_mut(), 0),
    }
}
