//! Option flags shared by every backend
//!
//! The values are the historical macOS `<sys/xattr.h>` bits. Backends that talk
//! to a different native API translate them at the call boundary; the macOS
//! backend hands them to the kernel untouched.

use bitflags::bitflags;
use libc::c_int;

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod native {
    use libc::c_int;

    pub(super) const NOFOLLOW: c_int = libc::XATTR_NOFOLLOW;
    pub(super) const CREATE: c_int = libc::XATTR_CREATE;
    pub(super) const REPLACE: c_int = libc::XATTR_REPLACE;
    pub(super) const NOSECURITY: c_int = 0x0008;
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
mod native {
    use libc::c_int;

    pub(super) const NOFOLLOW: c_int = 0x0001;
    pub(super) const CREATE: c_int = 0x0002;
    pub(super) const REPLACE: c_int = 0x0004;
    pub(super) const NOSECURITY: c_int = 0x0008;
}

bitflags! {
    /// Options accepted by every extended-attribute operation.
    ///
    /// `CREATE` and `REPLACE` are only meaningful for the set family and are
    /// mutually exclusive. `NOFOLLOW` is orthogonal to both but is rejected on
    /// descriptor-based calls. `NOSECURITY` is only honoured by the macOS
    /// backend and ignored elsewhere.
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct XattrOptions: c_int {
        /// Operate on a symbolic link itself rather than its target
        const NOFOLLOW = native::NOFOLLOW;
        /// Fail if the attribute already exists
        const CREATE = native::CREATE;
        /// Fail if the attribute does not exist yet
        const REPLACE = native::REPLACE;
        /// Bypass authorization checking (macOS only)
        const NOSECURITY = native::NOSECURITY;

        // Keep unknown bits so validation can reject them.
        const _ = !0;
    }
}

/// Create/replace behaviour requested for a set call
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetMode {
    /// Create the attribute or overwrite an existing one
    Upsert,
    /// Only create; an existing attribute is an error
    CreateOnly,
    /// Only overwrite; a missing attribute is an error
    ReplaceOnly,
}

impl XattrOptions {
    /// Build options from a raw bitmask, keeping bits this crate does not know.
    pub const fn from_raw(bits: c_int) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Whether symbolic links in the last path component are resolved
    pub const fn follows_symlinks(self) -> bool {
        !self.contains(Self::NOFOLLOW)
    }

    /// The options left once the orthogonal bits (`NOFOLLOW`, `NOSECURITY`)
    /// are masked out.
    pub(crate) fn reduced(self) -> Self {
        self.difference(Self::NOFOLLOW | Self::NOSECURITY)
    }

    /// Interpret the reduced options as a set mode.
    ///
    /// Returns `None` when the reduced bits are anything other than nothing,
    /// `CREATE` alone, or `REPLACE` alone.
    pub fn set_mode(self) -> Option<SetMode> {
        let reduced = self.reduced();
        if reduced.is_empty() {
            Some(SetMode::Upsert)
        } else if reduced == Self::CREATE {
            Some(SetMode::CreateOnly)
        } else if reduced == Self::REPLACE {
            Some(SetMode::ReplaceOnly)
        } else {
            None
        }
    }
}
