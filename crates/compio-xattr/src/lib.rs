//! # compio-xattr
//!
//! Extended attributes for `compio::fs::File` and for paths, running the
//! `xattr-compat` calls on compio's blocking pool. No kernel has io_uring
//! opcodes for every xattr operation on every platform, so all of them go
//! through `spawn_blocking`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use compio::fs::File;
//! use compio_xattr::XattrOps;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("data.txt").await?;
//! file.set_xattr("user.origin", b"download").await?;
//! let value = file.get_xattr("user.origin").await?;
//! assert_eq!(value, b"download");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod xattr;

pub use error::{AsyncXattrError, Result};
pub use xattr::{
    get_xattr_at_path, lget_xattr_at_path, list_xattr_at_path, llist_xattr_at_path,
    lremove_xattr_at_path, lset_xattr_at_path, remove_xattr_at_path, set_xattr_at_path,
    XattrOps,
};
pub use xattr_compat::XattrOptions;
