use std::io;
use std::path::Path;

use fuser::{mount2, spawn_mount2};
pub use fuser::{BackgroundSession, MountOption};
use log::info;

use crate::core::FuseDriver;
use crate::fuse_handler::FuseHandler;

/// Mounts `filesystem` at `mountpoint` and serves requests until it is unmounted.
///
/// With the `parallel` feature, requests are dispatched on `num_threads` worker threads;
/// otherwise they run on the session thread and `num_threads` is ignored.
pub fn mount<FS, P>(
    filesystem: FS,
    mountpoint: P,
    options: &[MountOption],
    num_threads: usize,
) -> io::Result<()>
where
    FS: FuseHandler,
    P: AsRef<Path>,
{
    info!("mounting on {:?}", mountpoint.as_ref());
    let driver = FuseDriver::new(filesystem, num_threads);
    mount2(driver, mountpoint, options)
}

/// Same as [`mount`], in a background session. The filesystem is unmounted when the
/// returned session is dropped.
pub fn spawn_mount<FS, P>(
    filesystem: FS,
    mountpoint: P,
    options: &[MountOption],
    num_threads: usize,
) -> io::Result<BackgroundSession>
where
    FS: FuseHandler,
    P: AsRef<Path>,
{
    info!("mounting on {:?} in background", mountpoint.as_ref());
    let driver = FuseDriver::new(filesystem, num_threads);
    spawn_mount2(driver, mountpoint, options)
}
