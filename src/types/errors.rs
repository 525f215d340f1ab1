use std::error::Error;
use std::fmt;
use std::io;

/// Raw errno value as sent to the kernel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PosixError(i32);

impl PosixError {
    pub const FILE_NOT_FOUND: PosixError = PosixError(libc::ENOENT);
    pub const INPUT_OUTPUT_ERROR: PosixError = PosixError(libc::EIO);
    pub const PERMISSION_DENIED_ACCESS: PosixError = PosixError(libc::EACCES);
    pub const NOT_A_DIRECTORY: PosixError = PosixError(libc::ENOTDIR);
    pub const FUNCTION_NOT_IMPLEMENTED: PosixError = PosixError(libc::ENOSYS);

    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl From<PosixError> for io::Error {
    fn from(value: PosixError) -> Self {
        Self::from_raw_os_error(value.0)
    }
}

impl From<PosixError> for i32 {
    fn from(value: PosixError) -> Self {
        value.0
    }
}

/// Failure kinds a handler can surface to the transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested name has no child, or the inode is not live.
    NotFound,
    /// The target inode is not a directory.
    NotADirectory,
    /// The requested flags or mode are disallowed.
    PermissionDenied,
    /// The operation is intentionally not implemented by this filesystem.
    Unsupported,
    /// Failure of the backing storage.
    Io,
}

impl ErrorKind {
    pub fn to_error(self, context: impl Into<String>) -> FsError {
        FsError::new(self, context)
    }

    fn errno(self) -> PosixError {
        match self {
            ErrorKind::NotFound => PosixError::FILE_NOT_FOUND,
            ErrorKind::NotADirectory => PosixError::NOT_A_DIRECTORY,
            ErrorKind::PermissionDenied => PosixError::PERMISSION_DENIED_ACCESS,
            ErrorKind::Unsupported => PosixError::FUNCTION_NOT_IMPLEMENTED,
            ErrorKind::Io => PosixError::INPUT_OUTPUT_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::NotADirectory => "not a directory",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::Unsupported => "function not implemented",
            ErrorKind::Io => "input/output error",
        };
        f.write_str(name)
    }
}

/// Error returned by every fallible handler operation.
///
/// An `Io` error built from an [`io::Error`] keeps its OS error code, so the kernel sees
/// the original errno rather than a generic EIO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsError {
    kind: ErrorKind,
    context: String,
    raw_os_error: Option<i32>,
}

pub type FuseResult<T> = Result<T, FsError>;

impl FsError {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
            raw_os_error: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Errno sent back to the kernel.
    pub fn raw_error(&self) -> i32 {
        self.raw_os_error.unwrap_or_else(|| self.kind.errno().raw())
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.context)
        }
    }
}

impl Error for FsError {}

impl From<io::Error> for FsError {
    fn from(value: io::Error) -> Self {
        let kind = match value.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            io::ErrorKind::Unsupported => ErrorKind::Unsupported,
            _ => match value.raw_os_error() {
                Some(libc::ENOTDIR) => ErrorKind::NotADirectory,
                Some(libc::ENOSYS) => ErrorKind::Unsupported,
                _ => ErrorKind::Io,
            },
        };
        Self {
            kind,
            context: value.to_string(),
            raw_os_error: value.raw_os_error(),
        }
    }
}

impl From<PosixError> for FsError {
    fn from(value: PosixError) -> Self {
        io::Error::from(value).into()
    }
}
