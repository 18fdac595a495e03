//! Solaris backend: attributes as files in a hidden attribute directory
//!
//! Solaris has no xattr syscalls. Each file owns an attribute directory that
//! `openat(fd, name, O_XATTR)` reaches; every attribute is a regular file in
//! it. Get reads that file, set truncates and writes it, remove unlinks it and
//! list reads the directory.
//!
//! Every descriptor opened here is an [`OwnedFd`] or a [`Dir`], so it is
//! closed on every return path and never outlives the call.

use crate::backend::{Contract, XattrBackend};
use crate::list::NameSink;
use crate::options::{SetMode, XattrOptions};
use nix::dir::Dir;
use nix::fcntl::{self, OFlag};
use nix::sys::stat::{self, Mode};
use nix::unistd::{self, UnlinkatFlags, Whence};
use std::ffi::CStr;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

/// Backend for Solaris and illumos
#[derive(Copy, Clone, Debug, Default)]
pub struct Solaris;

const O_XATTR: OFlag = OFlag::from_bits_retain(libc::O_XATTR);

fn attr_mode() -> Mode {
    Mode::from_bits_truncate(0o644)
}

fn owned(fd: RawFd) -> OwnedFd {
    // SAFETY: fd was just returned by a successful open and is owned by no
    // one else.
    unsafe { OwnedFd::from_raw_fd(fd) }
}

/// Open the file an attribute call addresses by path.
fn open_target(path: &CStr, options: XattrOptions) -> io::Result<OwnedFd> {
    let mut flags = OFlag::O_RDONLY;
    if !options.follows_symlinks() {
        flags |= OFlag::O_NOFOLLOW;
    }
    let fd = fcntl::open(path, flags, Mode::empty())?;
    Ok(owned(fd))
}

/// Open `name` inside the attribute directory of `fd`.
fn open_attr(fd: BorrowedFd<'_>, name: &CStr, flags: OFlag) -> io::Result<OwnedFd> {
    let xfd = fcntl::openat(Some(fd.as_raw_fd()), name, flags | O_XATTR, attr_mode())?;
    Ok(owned(xfd))
}

fn open_attr_dir(fd: BorrowedFd<'_>) -> io::Result<OwnedFd> {
    open_attr(fd, c".", OFlag::O_RDONLY)
}

/// `open(2)` flags for writing an attribute file in the given mode
fn write_flags(mode: SetMode) -> OFlag {
    match mode {
        SetMode::Upsert => OFlag::O_TRUNC | OFlag::O_WRONLY | OFlag::O_CREAT,
        SetMode::CreateOnly => {
            OFlag::O_TRUNC | OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_EXCL
        }
        SetMode::ReplaceOnly => OFlag::O_TRUNC | OFlag::O_RDWR,
    }
}

fn read_attr(
    fd: BorrowedFd<'_>,
    name: &CStr,
    value: Option<&mut [u8]>,
    position: u32,
) -> io::Result<usize> {
    let xfd = open_attr(fd, name, OFlag::O_RDONLY)?;
    unistd::lseek(xfd.as_raw_fd(), libc::off_t::from(position), Whence::SeekSet)?;

    let Some(buf) = value else {
        let st = stat::fstat(xfd.as_raw_fd())?;
        return usize::try_from(st.st_size)
            .map_err(|_| io::Error::from_raw_os_error(libc::EOVERFLOW));
    };

    let mut filled = 0;
    while filled < buf.len() {
        match unistd::read(xfd.as_raw_fd(), &mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn write_attr(
    fd: BorrowedFd<'_>,
    name: &CStr,
    value: &[u8],
    options: XattrOptions,
) -> io::Result<()> {
    let mode = options.set_mode().unwrap_or(SetMode::Upsert);
    let xfd = open_attr(fd, name, write_flags(mode))?;

    let mut rest = value;
    while !rest.is_empty() {
        let n = unistd::write(&xfd, rest)?;
        rest = &rest[n..];
    }
    Ok(())
}

fn unlink_attr(fd: BorrowedFd<'_>, name: &CStr) -> io::Result<()> {
    let xdir = open_attr_dir(fd)?;
    unistd::unlinkat(Some(xdir.as_raw_fd()), name, UnlinkatFlags::NoRemoveDir)?;
    Ok(())
}

fn list_attrs(fd: BorrowedFd<'_>, buf: Option<&mut [u8]>) -> io::Result<usize> {
    let mut dir = Dir::from(open_attr_dir(fd)?)?;
    let mut sink = NameSink::new(buf);
    for entry in dir.iter() {
        let entry = entry?;
        let name = entry.file_name().to_bytes();
        if name != b"." && name != b".." {
            sink.push(name);
        }
    }
    Ok(sink.finish())
}

impl XattrBackend for Solaris {
    const NAME: &'static str = "solaris-xattrdir";
    const CONTRACT: Contract = Contract::Strict;

    fn get(
        &self,
        path: &CStr,
        name: &CStr,
        value: Option<&mut [u8]>,
        position: u32,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let target = open_target(path, options)?;
        read_attr(target.as_fd(), name, value, position)
    }

    fn fget(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: Option<&mut [u8]>,
        position: u32,
        _options: XattrOptions,
    ) -> io::Result<usize> {
        read_attr(fd, name, value, position)
    }

    fn set(
        &self,
        path: &CStr,
        name: &CStr,
        value: &[u8],
        _position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        let target = open_target(path, options)?;
        write_attr(target.as_fd(), name, value, options)
    }

    fn fset(
        &self,
        fd: BorrowedFd<'_>,
        name: &CStr,
        value: &[u8],
        _position: u32,
        options: XattrOptions,
    ) -> io::Result<()> {
        write_attr(fd, name, value, options)
    }

    fn remove(&self, path: &CStr, name: &CStr, options: XattrOptions) -> io::Result<()> {
        let target = open_target(path, options)?;
        unlink_attr(target.as_fd(), name)
    }

    fn fremove(&self, fd: BorrowedFd<'_>, name: &CStr, _options: XattrOptions) -> io::Result<()> {
        unlink_attr(fd, name)
    }

    fn list(
        &self,
        path: &CStr,
        buf: Option<&mut [u8]>,
        options: XattrOptions,
    ) -> io::Result<usize> {
        let target = open_target(path, options)?;
        list_attrs(target.as_fd(), buf)
    }

    fn flist(
        &self,
        fd: BorrowedFd<'_>,
        buf: Option<&mut [u8]>,
        _options: XattrOptions,
    ) -> io::Result<usize> {
        list_attrs(fd, buf)
    }
}
