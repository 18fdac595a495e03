//! Contract checks applied before dispatch
//!
//! Every strict backend runs these before touching the kernel, so a rejected
//! call has no side effects. The checks are ordered the way the historical
//! shim ordered them: position, then option combination, then `NOFOLLOW` on a
//! descriptor.

use crate::error::{Op, Violation, NOT_FOUND_ERRNO};
use crate::options::{SetMode, XattrOptions};
use std::io;

/// Validate the arguments of `op`.
///
/// `position` is only inspected for the get and set families; callers of the
/// other operations pass 0.
pub(crate) fn check(op: Op, position: u32, options: XattrOptions) -> Result<(), Violation> {
    if position != 0 {
        return Err(Violation::NonZeroPosition(position));
    }

    let combination_ok = match op {
        Op::Set | Op::FSet => options.set_mode().is_some(),
        _ => options.reduced().is_empty(),
    };
    if !combination_ok {
        return Err(Violation::UnsupportedOptions(options));
    }

    if op.is_descriptor() && options.contains(XattrOptions::NOFOLLOW) {
        return Err(Violation::NoFollowOnDescriptor);
    }

    Ok(())
}

/// Decide a create-only or replace-only write from an existence probe.
///
/// `probe` is a size query for the attribute. A not-found error means the
/// attribute is absent; any other error is returned as is. Used where the
/// native API has no exclusive set of its own.
#[cfg_attr(
    not(all(
        feature = "bsd-exclusive-set",
        any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd")
    )),
    allow(dead_code)
)]
pub(crate) fn exclusive_set(options: XattrOptions, probe: io::Result<usize>) -> io::Result<()> {
    let exists = match probe {
        Ok(_) => true,
        Err(e) if e.raw_os_error() == Some(NOT_FOUND_ERRNO) => false,
        Err(e) => return Err(e),
    };
    match (options.set_mode(), exists) {
        (Some(SetMode::CreateOnly), true) => Err(io::Error::from_raw_os_error(libc::EEXIST)),
        (Some(SetMode::ReplaceOnly), false) => Err(io::Error::from_raw_os_error(NOT_FOUND_ERRNO)),
        _ => Ok(()),
    }
}
