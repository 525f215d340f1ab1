use crate::types::*;

/// The capability set a filesystem provides to the kernel.
///
/// Every method has a default implementation forwarding to [`FuseHandler::get_inner`],
/// so a filesystem only overrides what it supports and wraps a base handler for the rest.
/// The usual base is [`DefaultFuseHandler`](crate::templates::DefaultFuseHandler), which
/// answers `Unsupported` to everything:
///
/// ```text
/// struct MyFs {
///     inner: DefaultFuseHandler,
/// }
///
/// impl FuseHandler for MyFs {
///     fn get_inner(&self) -> &dyn FuseHandler {
///         &self.inner
///     }
///
///     fn lookup_inode(&self, req: &RequestInfo, request: LookUpInodeRequest)
///         -> FuseResult<LookUpInodeResponse> { ... }
/// }
/// ```
///
/// Methods are called concurrently from several kernel threads, including calls on the
/// same inode, so implementations must be thread-safe for all of them.
pub trait FuseHandler: Send + Sync + 'static {
    fn get_inner(&self) -> &dyn FuseHandler;

    /// Called once the session is established, before any other request.
    fn init(&self, req: &RequestInfo, config: &mut KernelConfig) -> FuseResult<()> {
        self.get_inner().init(req, config)
    }

    /// Called on unmount.
    fn destroy(&self) {
        self.get_inner().destroy();
    }

    /// Look up a child by name within a parent directory.
    ///
    /// The returned ID must stay valid until a matching `forget_inode`. A forgotten ID may
    /// only be returned again with a different generation.
    fn lookup_inode(
        &self,
        req: &RequestInfo,
        request: LookUpInodeRequest,
    ) -> FuseResult<LookUpInodeResponse> {
        self.get_inner().lookup_inode(req, request)
    }

    /// Forget an inode ID previously issued by `lookup_inode`.
    ///
    /// The kernel will not use the ID again unless the filesystem reissues it.
    /// Errors are logged by the driver and never reach the kernel.
    fn forget_inode(
        &self,
        req: &RequestInfo,
        request: ForgetInodeRequest,
    ) -> FuseResult<ForgetInodeResponse> {
        self.get_inner().forget_inode(req, request)
    }

    /// Open a directory inode, minting a handle independent from any other open.
    fn open_dir(&self, req: &RequestInfo, request: OpenDirRequest) -> FuseResult<OpenDirResponse> {
        self.get_inner().open_dir(req, request)
    }

    /// Release a handle minted by `open_dir`, once the kernel holds no more references to it.
    ///
    /// Errors are logged by the driver and never reach the kernel.
    fn release_handle(
        &self,
        req: &RequestInfo,
        request: ReleaseHandleRequest,
    ) -> FuseResult<ReleaseHandleResponse> {
        self.get_inner().release_handle(req, request)
    }
}
