mod arguments;
mod errors;
mod expiration;
mod flags;
mod handle;
mod inode;

pub use self::{arguments::*, errors::*, expiration::*, flags::*, handle::*, inode::*};

pub use fuser::{FileType as FileKind, KernelConfig};
