#![allow(dead_code)]

use fuse_lifecycle::prelude::*;

pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

pub fn request_info() -> RequestInfo {
    RequestInfo {
        id: 0,
        uid: 0,
        gid: 0,
        pid: 0,
    }
}

pub fn read_only(inode: InodeId) -> OpenDirRequest {
    OpenDirRequest {
        inode,
        flags: OpenFlags::READ_ONLY,
    }
}
