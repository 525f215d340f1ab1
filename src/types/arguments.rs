use std::ffi::OsString;
use std::time::SystemTime;

use fuser::{FileType, Request};

use super::expiration::Expiration;
use super::flags::OpenFlags;
use super::handle::HandleId;
use super::inode::{Generation, InodeId};

// Fuse related structs
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub id: u64,
    pub uid: u32,
    pub gid: u32,
    pub pid: u32,
}

impl<'a> From<&Request<'a>> for RequestInfo {
    fn from(req: &Request<'a>) -> Self {
        Self {
            id: req.unique(),
            uid: req.uid(),
            gid: req.gid(),
            pid: req.pid(),
        }
    }
}

/// Attribute snapshot of an inode. The filesystem is the only source of truth,
/// a fresh copy is returned on every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeAttributes {
    /// The size of the file in bytes.
    pub size: u64,
    pub kind: FileType,
}

impl InodeAttributes {
    pub fn directory() -> Self {
        Self {
            size: 0,
            kind: FileType::Directory,
        }
    }

    pub fn regular_file(size: u64) -> Self {
        Self {
            size,
            kind: FileType::RegularFile,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileType::Directory
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookUpInodeRequest {
    /// The directory inode the child belongs to.
    pub parent: InodeId,
    /// A single path component, relative to `parent`.
    pub name: OsString,
}

impl LookUpInodeRequest {
    pub fn new(parent: InodeId, name: impl Into<OsString>) -> Self {
        Self {
            parent,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookUpInodeResponse {
    /// Must stay valid until the kernel forgets it.
    pub child: InodeId,
    pub generation: Generation,
    pub attributes: InodeAttributes,
    /// Until when the kernel may serve `attributes` from its attribute cache.
    pub attributes_expiration: Expiration,
    /// Until when the kernel may keep the name -> inode mapping in its dentry cache.
    pub entry_expiration: Expiration,
}

impl LookUpInodeResponse {
    pub fn attributes_valid_at(&self, now: SystemTime) -> bool {
        self.attributes_expiration.allows_caching_at(now)
    }

    pub fn entry_valid_at(&self, now: SystemTime) -> bool {
        self.entry_expiration.allows_caching_at(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForgetInodeRequest {
    pub id: InodeId,
    /// How many lookups of `id` the kernel is dropping at once.
    pub nlookup: u64,
}

impl ForgetInodeRequest {
    /// Forget a single lookup.
    pub fn new(id: InodeId) -> Self {
        Self { id, nlookup: 1 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForgetInodeResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenDirRequest {
    pub inode: InodeId,
    pub flags: OpenFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenDirResponse {
    /// Echoed by the kernel in follow-up calls on the same open file, until release.
    pub handle: HandleId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseHandleRequest {
    pub handle: HandleId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseHandleResponse;
