//! Everything needed to implement and mount a filesystem.

pub use crate::fuse_handler::FuseHandler;
pub use crate::mounting::{mount, spawn_mount, BackgroundSession, MountOption};
pub use crate::types::*;
