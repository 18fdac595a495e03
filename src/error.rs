//! Error types for extended-attribute operations
//!
//! Failures come in two tiers. Contract violations are detected before any
//! native call is made and always carry `EINVAL`. Native failures carry the
//! `io::Error` the kernel produced, errno untouched.

use crate::options::XattrOptions;
use std::fmt;
use std::io;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, XattrError>;

/// The eight operations of the unified contract
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    FGet,
    Set,
    FSet,
    Remove,
    FRemove,
    List,
    FList,
}

impl Op {
    /// The C-style name of the operation, as used in log and error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "getxattr",
            Self::FGet => "fgetxattr",
            Self::Set => "setxattr",
            Self::FSet => "fsetxattr",
            Self::Remove => "removexattr",
            Self::FRemove => "fremovexattr",
            Self::List => "listxattr",
            Self::FList => "flistxattr",
        }
    }

    /// Whether the operation addresses its target through an open descriptor
    pub const fn is_descriptor(self) -> bool {
        matches!(self, Self::FGet | Self::FSet | Self::FRemove | Self::FList)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a call was rejected before reaching the kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("position must be 0, got {0}")]
    NonZeroPosition(u32),
    #[error("unsupported option combination {:#x}", .0.bits())]
    UnsupportedOptions(XattrOptions),
    #[error("XATTR_NOFOLLOW has no meaning for a file descriptor")]
    NoFollowOnDescriptor,
    #[error("{0} contains an interior NUL byte")]
    InteriorNul(&'static str),
}

/// Error type for extended-attribute operations
#[derive(Debug, Error)]
pub enum XattrError {
    /// The call broke the unified contract; nothing was sent to the kernel
    #[error("{op}: invalid argument: {violation}")]
    InvalidArgument { op: Op, violation: Violation },

    /// The native call failed; `source` holds the kernel's errno
    #[error("{op} failed: {source}")]
    Os {
        op: Op,
        #[source]
        source: io::Error,
    },
}

impl XattrError {
    pub(crate) fn invalid(op: Op, violation: Violation) -> Self {
        Self::InvalidArgument { op, violation }
    }

    pub(crate) fn os(op: Op, source: io::Error) -> Self {
        Self::Os { op, source }
    }

    /// The operation that failed
    pub fn op(&self) -> Op {
        match self {
            Self::InvalidArgument { op, .. } | Self::Os { op, .. } => *op,
        }
    }

    /// The errno for this failure: `EINVAL` for contract violations, the
    /// kernel's value for native failures.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::InvalidArgument { .. } => Some(libc::EINVAL),
            Self::Os { source, .. } => source.raw_os_error(),
        }
    }

    /// Whether the call was rejected before reaching the kernel
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Whether the kernel reported that the named attribute does not exist
    pub fn is_not_found(&self) -> bool {
        self.raw_os_error() == Some(NOT_FOUND_ERRNO)
    }
}

impl From<XattrError> for io::Error {
    fn from(err: XattrError) -> Self {
        match err {
            XattrError::InvalidArgument { .. } => io::Error::from_raw_os_error(libc::EINVAL),
            XattrError::Os { source, .. } => source,
        }
    }
}

/// errno reported for a missing attribute
#[cfg(any(target_os = "linux", target_os = "android"))]
pub const NOT_FOUND_ERRNO: i32 = libc::ENODATA;

/// errno reported for a missing attribute
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd"
))]
pub const NOT_FOUND_ERRNO: i32 = libc::ENOATTR;

/// errno reported for a missing attribute (the attribute pseudo-file is absent)
#[cfg(any(target_os = "solaris", target_os = "illumos"))]
pub const NOT_FOUND_ERRNO: i32 = libc::ENOENT;
