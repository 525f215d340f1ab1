//! Inode and handle lifecycle for FUSE filesystems.
//!
//! A filesystem implements [`FuseHandler`]: lookup and forget drive the life of inode IDs,
//! opendir and releasedir drive the life of directory handles. [`core::InodeTable`] and
//! [`core::HandleTable`] provide the thread-safe bookkeeping behind them, and every lookup
//! response carries independent attribute and entry cache expirations.

mod fuse_handler;
pub use fuse_handler::FuseHandler;

pub mod core;
pub mod types;

mod mounting;
pub use mounting::{mount, spawn_mount, BackgroundSession, MountOption};

pub mod prelude;
pub mod templates;
