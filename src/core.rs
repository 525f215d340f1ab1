mod fuse_driver;
mod handle_table;
mod inode_table;
mod macros;
mod reply;

pub use fuse_driver::FuseDriver;
pub use handle_table::HandleTable;
pub use inode_table::{ForgetOutcome, InodeTable, InodeTableConfig, FIRST_MINTED_INODE};
