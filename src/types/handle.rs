/// Represents an open instance of a directory in the fuse filesystem.
///
/// Handles are opaque to the kernel: it echoes them back in every follow-up call
/// made through the same open file, until the release. Two opens of the same
/// inode get two independent handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for HandleId {
    fn from(value: u64) -> Self {
        HandleId(value)
    }
}

impl From<HandleId> for u64 {
    fn from(value: HandleId) -> Self {
        value.0
    }
}
