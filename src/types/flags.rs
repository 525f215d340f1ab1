use bitflags::bitflags;

bitflags! {
    /// Mode and options flags passed through from the kernel to opendir.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct OpenFlags: i32 {
        const READ_ONLY = libc::O_RDONLY;
        const WRITE_ONLY = libc::O_WRONLY;
        const READ_WRITE = libc::O_RDWR;
        const CREATE = libc::O_CREAT;
        const CREATE_EXCLUSIVE = libc::O_EXCL;
        const NO_TERMINAL_CONTROL = libc::O_NOCTTY;
        const TRUNCATE = libc::O_TRUNC;
        const APPEND_MODE = libc::O_APPEND;
        const NON_BLOCKING_MODE = libc::O_NONBLOCK;
        const SYNC_DATA_ONLY = libc::O_DSYNC;
        const SYNC_DATA_AND_METADATA = libc::O_SYNC;
        const MUST_BE_DIRECTORY = libc::O_DIRECTORY;
        const DO_NOT_FOLLOW_SYMLINKS = libc::O_NOFOLLOW;
        const CLOSE_ON_EXEC = libc::O_CLOEXEC;
        const _ = !0;
    }
}

impl OpenFlags {
    /// O_RDONLY is zero, so the access mode has to be read through O_ACCMODE.
    pub fn is_read_only(&self) -> bool {
        self.bits() & libc::O_ACCMODE == libc::O_RDONLY
    }

    /// True when the access mode asks for write access, or the flags would modify the target.
    pub fn requests_write(&self) -> bool {
        !self.is_read_only()
            || self.intersects(OpenFlags::TRUNCATE | OpenFlags::CREATE | OpenFlags::APPEND_MODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode() {
        assert!(OpenFlags::READ_ONLY.is_read_only());
        assert!(OpenFlags::empty().is_read_only());
        assert!((OpenFlags::READ_ONLY | OpenFlags::MUST_BE_DIRECTORY).is_read_only());
        assert!(!OpenFlags::WRITE_ONLY.is_read_only());
        assert!(!OpenFlags::READ_WRITE.is_read_only());
    }

    #[test]
    fn test_requests_write() {
        assert!(!(OpenFlags::READ_ONLY | OpenFlags::NON_BLOCKING_MODE).requests_write());
        assert!(OpenFlags::READ_WRITE.requests_write());
        assert!(OpenFlags::TRUNCATE.requests_write());
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let flags = OpenFlags::from_bits_retain(0x4000_0000);
        assert_eq!(flags.bits(), 0x4000_0000);
    }
}
