//! Conversion of handler responses into the values fuser sends on the wire.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuser::{FileAttr, FileType};
use log::Level;

use crate::types::*;

const BLOCK_SIZE: u32 = 512;

/// Everything `ReplyEntry::entry` needs.
#[derive(Debug)]
pub(crate) struct EntryReply {
    pub ttl: Duration,
    pub attr: FileAttr,
    pub generation: u64,
}

/// fuser sends the same validity for the dentry and the attributes, so the shorter of the
/// two windows is used. A disabled axis therefore disables caching on the wire.
pub(crate) fn entry_ttl(response: &LookUpInodeResponse, now: SystemTime) -> Duration {
    response
        .attributes_expiration
        .remaining(now)
        .min(response.entry_expiration.remaining(now))
}

/// Only size and kind are tracked; the rest of the record is filled with neutral values.
/// Ownership is reported as the requesting user, permissions are not enforced.
pub(crate) fn to_fuse_attr(ino: InodeId, attributes: &InodeAttributes, req: &RequestInfo) -> FileAttr {
    let (perm, nlink) = match attributes.kind {
        FileType::Directory => (0o755, 2),
        _ => (0o644, 1),
    };
    FileAttr {
        ino: ino.into(),
        size: attributes.size,
        blocks: attributes.size.div_ceil(BLOCK_SIZE as u64),
        atime: UNIX_EPOCH,
        mtime: UNIX_EPOCH,
        ctime: UNIX_EPOCH,
        crtime: UNIX_EPOCH,
        kind: attributes.kind,
        perm,
        nlink,
        uid: req.uid,
        gid: req.gid,
        rdev: 0,
        blksize: BLOCK_SIZE,
        flags: 0,
    }
}

pub(crate) fn entry_reply(
    response: &LookUpInodeResponse,
    req: &RequestInfo,
    now: SystemTime,
) -> EntryReply {
    EntryReply {
        ttl: entry_ttl(response, now),
        attr: to_fuse_attr(response.child, &response.attributes, req),
        generation: response.generation.into(),
    }
}

/// What the driver sends back for a request the kernel waits on.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    Reply(T),
    /// Reply with the errno of `error`, logged at `level`.
    Error { error: FsError, level: Level },
}

/// Missing names are routine for the kernel, they are only logged at debug level.
pub(crate) fn answer<T>(result: FuseResult<T>) -> Outcome<T> {
    match result {
        Ok(response) => Outcome::Reply(response),
        Err(error) => {
            let level = if error.kind() == ErrorKind::NotFound {
                Level::Debug
            } else {
                Level::Warn
            };
            Outcome::Error { error, level }
        }
    }
}

/// Forget and release carry no error back to the kernel. Returns the handler error
/// to log, if any; the driver acknowledges either way.
pub(crate) fn acknowledge<T>(result: FuseResult<T>) -> Option<FsError> {
    result.err()
}
