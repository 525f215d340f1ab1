/// Represents an inode number in a FUSE (Filesystem in Userspace) filesystem.
///
/// Inode IDs are minted by the filesystem, never by the kernel, with the single
/// exception of [`ROOT_INODE`]. An ID handed to the kernel in a lookup response
/// must stay resolvable until the kernel forgets it. After that it may be
/// reissued, but only together with a different [`Generation`].
///
/// Note: This concept is separate from the traditional Unix inode, which is a data structure
/// describing file system objects like files or directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InodeId(u64);

/// The distinguished inode of the filesystem root.
///
/// The kernel may send requests for this ID without the filesystem ever having
/// returned it. Its value is the protocol constant and is never reassigned.
pub const ROOT_INODE: InodeId = InodeId(fuser::FUSE_ROOT_ID);

impl InodeId {
    pub fn is_root(&self) -> bool {
        *self == ROOT_INODE
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for InodeId {
    /// Converts a u64 into an InodeId.
    ///
    /// This allows for easy creation of InodeId instances from raw inode numbers.
    fn from(value: u64) -> Self {
        InodeId(value)
    }
}

impl From<InodeId> for u64 {
    fn from(value: InodeId) -> Self {
        value.0
    }
}

/// A generation number for one incarnation of an inode ID.
///
/// Only matters for filesystems exported over NFS that reuse IDs once the kernel
/// has forgotten them: on reuse, the generation must change. Otherwise it can be
/// held constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub const INITIAL: Generation = Generation(0);

    /// The generation to use when the ID is reissued.
    pub fn next(self) -> Generation {
        Generation(self.0.wrapping_add(1))
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Generation {
    fn from(value: u64) -> Self {
        Generation(value)
    }
}

impl From<Generation> for u64 {
    fn from(value: Generation) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_matches_protocol_constant() {
        assert_eq!(u64::from(ROOT_INODE), 1);
        assert!(ROOT_INODE.is_root());
        assert!(!InodeId::from(2).is_root());
    }

    #[test]
    fn test_generation_bump() {
        let first = Generation::INITIAL;
        assert_eq!(first.next(), Generation::from(1));
        assert_ne!(first.next(), first);
        assert_eq!(Generation::from(u64::MAX).next(), Generation::from(0));
    }
}
