use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::time::SystemTime;

use log::{debug, warn};
use parking_lot::RwLock;

use crate::core::{ForgetOutcome, HandleTable, InodeTable, InodeTableConfig};
use crate::prelude::*;
use crate::templates::DefaultFuseHandler;

/// Identity of a node in the in-memory tree, independent from the inode ID the kernel
/// knows it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(u64);

const ROOT_KEY: NodeKey = NodeKey(0);

struct Node {
    parent: NodeKey,
    attributes: InodeAttributes,
    children: HashMap<OsString, NodeKey>,
}

/// State of one open directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirHandle {
    pub inode: InodeId,
    pub flags: OpenFlags,
}

/// Tree of directories and sized files held in memory.
///
/// Inode IDs are minted on first lookup and kept while the kernel holds lookups on them;
/// forgotten IDs are recycled with a new generation. Every opendir gets its own handle.
/// Other operations are delegated to a [`DefaultFuseHandler`].
pub struct MemoryFs {
    inner: DefaultFuseHandler,
    nodes: RwLock<HashMap<NodeKey, Node>>,
    inodes: InodeTable<NodeKey>,
    handles: HandleTable<DirHandle>,
    cache_policy: CachePolicy,
}

impl MemoryFs {
    pub fn builder() -> MemoryFsBuilder {
        MemoryFsBuilder::new()
    }

    /// True for the root and for every ID returned by a lookup and not yet forgotten.
    pub fn is_valid(&self, id: InodeId) -> bool {
        self.inodes.is_valid(id)
    }

    pub fn generation(&self, id: InodeId) -> Option<Generation> {
        self.inodes.generation(id)
    }

    pub fn is_open(&self, handle: HandleId) -> bool {
        self.handles.is_open(handle)
    }

    pub fn dir_handle(&self, handle: HandleId) -> Option<DirHandle> {
        self.handles.get(handle)
    }

    /// Live inode IDs, root excluded.
    pub fn live_inodes(&self) -> usize {
        self.inodes.live_count()
    }

    pub fn open_handles(&self) -> usize {
        self.handles.open_count()
    }

    /// Changes the size of the file at `path`. Lookups issued afterwards report the new
    /// size; kernel caches keep the old one until the expirations handed out before.
    pub fn resize(&self, path: &str, size: u64) -> FuseResult<()> {
        let mut nodes = self.nodes.write();
        let key = walk(&nodes, path)
            .ok_or_else(|| ErrorKind::NotFound.to_error(format!("no such path {:?}", path)))?;
        match nodes.get_mut(&key) {
            Some(node) if !node.attributes.is_dir() => {
                node.attributes.size = size;
                Ok(())
            }
            Some(_) => Err(ErrorKind::Io.to_error(format!("{:?} is a directory", path))),
            None => Err(ErrorKind::NotFound.to_error(format!("no such path {:?}", path))),
        }
    }

    fn resolve_live(&self, id: InodeId) -> FuseResult<NodeKey> {
        self.inodes
            .resolve(id)
            .ok_or_else(|| ErrorKind::NotFound.to_error(format!("inode {:?} is not live", id)))
    }
}

impl FuseHandler for MemoryFs {
    fn get_inner(&self) -> &dyn FuseHandler {
        &self.inner
    }

    fn lookup_inode(
        &self,
        _req: &RequestInfo,
        request: LookUpInodeRequest,
    ) -> FuseResult<LookUpInodeResponse> {
        let parent_key = self.resolve_live(request.parent)?;
        let (child_key, attributes) = {
            let nodes = self.nodes.read();
            let parent = nodes
                .get(&parent_key)
                .ok_or_else(|| ErrorKind::NotFound.to_error("parent node is gone"))?;
            if !parent.attributes.is_dir() {
                return Err(ErrorKind::NotADirectory.to_error(format!(
                    "lookup {:?} in {:?}",
                    request.name, request.parent
                )));
            }
            let child_key = match request.name.as_os_str() {
                name if name == OsStr::new(".") => parent_key,
                name if name == OsStr::new("..") => parent.parent,
                name => *parent
                    .children
                    .get(name)
                    .ok_or_else(|| ErrorKind::NotFound.to_error(format!("{:?}", name)))?,
            };
            let child = nodes
                .get(&child_key)
                .ok_or_else(|| ErrorKind::NotFound.to_error("child node is gone"))?;
            (child_key, child.attributes)
        };

        let (child, generation) = self.inodes.lookup_or_mint(child_key)?;
        let (attributes_expiration, entry_expiration) =
            self.cache_policy.expirations(SystemTime::now());
        debug!(
            "lookup {:?} in {:?} -> {:?} (generation {:?})",
            request.name, request.parent, child, generation
        );
        Ok(LookUpInodeResponse {
            child,
            generation,
            attributes,
            attributes_expiration,
            entry_expiration,
        })
    }

    fn forget_inode(
        &self,
        _req: &RequestInfo,
        request: ForgetInodeRequest,
    ) -> FuseResult<ForgetInodeResponse> {
        match self.inodes.forget(request.id, request.nlookup) {
            ForgetOutcome::Retired => debug!("forget {:?}: retired", request.id),
            ForgetOutcome::Remaining(left) => {
                debug!("forget {:?}: {} lookups left", request.id, left)
            }
            ForgetOutcome::Pinned => debug!("forget {:?}: root is never retired", request.id),
            ForgetOutcome::Unknown => warn!("forget {:?}: inode is not live", request.id),
            ForgetOutcome::OverForgotten { issued, forgotten } => warn!(
                "forget {:?}: {} lookups forgotten but only {} issued, retired",
                request.id, forgotten, issued
            ),
        }
        Ok(ForgetInodeResponse)
    }

    fn open_dir(&self, _req: &RequestInfo, request: OpenDirRequest) -> FuseResult<OpenDirResponse> {
        let key = self.resolve_live(request.inode)?;
        {
            let nodes = self.nodes.read();
            let node = nodes
                .get(&key)
                .ok_or_else(|| ErrorKind::NotFound.to_error("node is gone"))?;
            if !node.attributes.is_dir() {
                return Err(ErrorKind::NotADirectory.to_error(format!("{:?}", request.inode)));
            }
        }
        if request.flags.requests_write() {
            return Err(ErrorKind::PermissionDenied.to_error(format!(
                "directories can not be opened with {:?}",
                request.flags
            )));
        }
        let handle = self.handles.open(DirHandle {
            inode: request.inode,
            flags: request.flags,
        });
        debug!("opendir {:?} -> {:?}", request.inode, handle);
        Ok(OpenDirResponse { handle })
    }

    fn release_handle(
        &self,
        _req: &RequestInfo,
        request: ReleaseHandleRequest,
    ) -> FuseResult<ReleaseHandleResponse> {
        match self.handles.release(request.handle) {
            Some(dir) => debug!("releasedir {:?} of {:?}", request.handle, dir.inode),
            None => warn!("releasedir {:?}: handle is not open", request.handle),
        }
        Ok(ReleaseHandleResponse)
    }
}

fn walk(nodes: &HashMap<NodeKey, Node>, path: &str) -> Option<NodeKey> {
    path.split('/')
        .filter(|component| !component.is_empty())
        .try_fold(ROOT_KEY, |key, component| {
            nodes.get(&key)?.children.get(OsStr::new(component)).copied()
        })
}

/// Builds the initial tree of a [`MemoryFs`].
///
/// Paths are relative to the root, `/`-separated; missing parent directories are created.
pub struct MemoryFsBuilder {
    nodes: HashMap<NodeKey, Node>,
    next_key: u64,
    cache_policy: CachePolicy,
    table_config: InodeTableConfig,
}

impl MemoryFsBuilder {
    fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_KEY,
            Node {
                parent: ROOT_KEY,
                attributes: InodeAttributes::directory(),
                children: HashMap::new(),
            },
        );
        Self {
            nodes,
            next_key: 1,
            cache_policy: CachePolicy::disabled(),
            table_config: InodeTableConfig::default(),
        }
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.insert(path, InodeAttributes::directory());
        self
    }

    pub fn file(mut self, path: &str, size: u64) -> Self {
        self.insert(path, InodeAttributes::regular_file(size));
        self
    }

    pub fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn table_config(mut self, table_config: InodeTableConfig) -> Self {
        self.table_config = table_config;
        self
    }

    pub fn build(self) -> MemoryFs {
        MemoryFs {
            inner: DefaultFuseHandler::new(),
            nodes: RwLock::new(self.nodes),
            inodes: InodeTable::with_config(ROOT_KEY, self.table_config),
            handles: HandleTable::new(),
            cache_policy: self.cache_policy,
        }
    }

    fn insert(&mut self, path: &str, attributes: InodeAttributes) {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        let Some((last, parents)) = components.split_last() else {
            warn!("ignoring empty path {:?}", path);
            return;
        };

        let mut current = ROOT_KEY;
        for component in parents {
            match self.child_of(current, component) {
                Some(next) => current = next,
                None => current = self.add_child(current, component, InodeAttributes::directory()),
            }
            if !self
                .nodes
                .get(&current)
                .is_some_and(|node| node.attributes.is_dir())
            {
                warn!("ignoring {:?}: {:?} is not a directory", path, component);
                return;
            }
        }
        match self.child_of(current, last) {
            Some(existing) => {
                if let Some(node) = self.nodes.get_mut(&existing) {
                    node.attributes = attributes;
                }
            }
            None => {
                self.add_child(current, last, attributes);
            }
        }
    }

    fn child_of(&self, parent: NodeKey, name: &str) -> Option<NodeKey> {
        self.nodes.get(&parent)?.children.get(OsStr::new(name)).copied()
    }

    fn add_child(&mut self, parent: NodeKey, name: &str, attributes: InodeAttributes) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.insert(
            key,
            Node {
                parent,
                attributes,
                children: HashMap::new(),
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(OsString::from(name), key);
        }
        key
    }
}
