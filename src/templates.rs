// Ready to use handlers, to build on or to wrap.

mod default_fuse_handler;
pub use default_fuse_handler::DefaultFuseHandler;

mod memory_fs;
pub use memory_fs::{DirHandle, MemoryFs, MemoryFsBuilder, NodeKey};
