use log::{debug, warn};

use crate::prelude::*;

/// Base handler answering `Unsupported` (ENOSYS) to every operation.
///
/// Wrap it as the inner handler of a filesystem so that every operation the filesystem
/// does not override still has a total, uniform answer. `init` and `destroy` succeed.
pub struct DefaultFuseHandler {
    panic: bool,
}

impl DefaultFuseHandler {
    pub fn new() -> Self {
        DefaultFuseHandler { panic: false }
    }

    /// Panics on any unimplemented operation instead of returning ENOSYS.
    /// Meant for development, to find out which operations the kernel actually needs.
    pub fn new_with_panic() -> Self {
        DefaultFuseHandler { panic: true }
    }

    fn not_implemented<T>(&self, operation: &str) -> FuseResult<T> {
        if self.panic {
            panic!("Function not implemented: {}", operation)
        } else {
            Err(ErrorKind::Unsupported.to_error(operation))
        }
    }
}

impl Default for DefaultFuseHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FuseHandler for DefaultFuseHandler {
    fn get_inner(&self) -> &dyn FuseHandler {
        panic!("Base Fuse don't have inner type")
    }

    fn init(&self, _req: &RequestInfo, _config: &mut KernelConfig) -> FuseResult<()> {
        Ok(())
    }

    fn destroy(&self) {}

    fn lookup_inode(
        &self,
        _req: &RequestInfo,
        request: LookUpInodeRequest,
    ) -> FuseResult<LookUpInodeResponse> {
        warn!(
            "[Not Implemented] lookup(parent: {:?}, name {:?})",
            request.parent, request.name
        );
        self.not_implemented("lookup")
    }

    fn forget_inode(
        &self,
        _req: &RequestInfo,
        request: ForgetInodeRequest,
    ) -> FuseResult<ForgetInodeResponse> {
        debug!(
            "[Not Implemented] forget(id: {:?}, nlookup: {})",
            request.id, request.nlookup
        );
        self.not_implemented("forget")
    }

    fn open_dir(&self, _req: &RequestInfo, request: OpenDirRequest) -> FuseResult<OpenDirResponse> {
        warn!(
            "[Not Implemented] opendir(inode: {:?}, flags: {:?})",
            request.inode, request.flags
        );
        self.not_implemented("opendir")
    }

    fn release_handle(
        &self,
        _req: &RequestInfo,
        request: ReleaseHandleRequest,
    ) -> FuseResult<ReleaseHandleResponse> {
        debug!("[Not Implemented] releasedir(handle: {:?})", request.handle);
        self.not_implemented("releasedir")
    }
}
