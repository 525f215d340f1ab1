use std::ffi::OsStr;
use std::sync::Arc;
use std::time::SystemTime;

use fuser::{ReplyEmpty, ReplyEntry, ReplyOpen, Request};
use libc::c_int;
use log::{info, log, warn};

#[cfg(feature = "parallel")]
use threadpool::ThreadPool;

use super::macros::execute_task;
use super::reply::{acknowledge, answer, entry_reply, Outcome};
use crate::fuse_handler::FuseHandler;
use crate::types::*;

/// Bridges fuser's request callbacks to a [`FuseHandler`].
///
/// Forget and release are acknowledgments for the kernel: handler errors on those paths
/// are logged and never sent back.
pub struct FuseDriver<H: FuseHandler> {
    handler: Arc<H>,
    #[cfg(feature = "parallel")]
    threadpool: ThreadPool,
}

impl<H: FuseHandler> FuseDriver<H> {
    /// num_threads is ignored in serial mode, it is kept for consistency with parallel mode
    pub fn new(handler: H, num_threads: usize) -> Self {
        #[cfg(feature = "deadlock_detection")]
        spawn_deadlock_checker();
        #[cfg(not(feature = "parallel"))]
        let _ = num_threads;
        FuseDriver {
            handler: Arc::new(handler),
            #[cfg(feature = "parallel")]
            threadpool: ThreadPool::new(num_threads.max(1)),
        }
    }
}

impl<H: FuseHandler> fuser::Filesystem for FuseDriver<H> {
    fn init(&mut self, req: &Request<'_>, config: &mut KernelConfig) -> Result<(), c_int> {
        let req = RequestInfo::from(req);
        match self.handler.init(&req, config) {
            Ok(()) => {
                info!("session initialized, {:?}", req);
                Ok(())
            }
            Err(e) => {
                warn!("init: [{}], {:?}", e, req);
                Err(e.raw_error())
            }
        }
    }

    fn destroy(&mut self) {
        self.handler.destroy();
    }

    fn lookup(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let req = RequestInfo::from(req);
        let handler = Arc::clone(&self.handler);
        let request = LookUpInodeRequest::new(InodeId::from(parent), name);
        execute_task!(self, {
            match answer(handler.lookup_inode(&req, request)) {
                Outcome::Reply(response) => {
                    let entry = entry_reply(&response, &req, SystemTime::now());
                    reply.entry(&entry.ttl, &entry.attr, entry.generation);
                }
                Outcome::Error { error, level } => {
                    log!(level, "lookup: parent {:x?}, [{}], {:?}", parent, error, req);
                    reply.error(error.raw_error());
                }
            }
        });
    }

    fn forget(&mut self, req: &Request<'_>, ino: u64, nlookup: u64) {
        let req = RequestInfo::from(req);
        let handler = Arc::clone(&self.handler);
        let request = ForgetInodeRequest {
            id: InodeId::from(ino),
            nlookup,
        };
        execute_task!(self, {
            if let Some(e) = acknowledge(handler.forget_inode(&req, request)) {
                warn!("forget: ino {:x?}, [{}], {:?}", ino, e, req);
            }
        });
    }

    fn opendir(&mut self, req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let req = RequestInfo::from(req);
        let handler = Arc::clone(&self.handler);
        let request = OpenDirRequest {
            inode: InodeId::from(ino),
            flags: OpenFlags::from_bits_retain(flags),
        };
        execute_task!(self, {
            match answer(handler.open_dir(&req, request)) {
                Outcome::Reply(response) => reply.opened(response.handle.into(), 0),
                Outcome::Error { error, level } => {
                    log!(level, "opendir: ino {:x?}, [{}], {:?}", ino, error, req);
                    reply.error(error.raw_error());
                }
            }
        });
    }

    fn releasedir(
        &mut self,
        req: &Request<'_>,
        ino: u64,
        fh: u64,
        _flags: i32,
        reply: ReplyEmpty,
    ) {
        let req = RequestInfo::from(req);
        let handler = Arc::clone(&self.handler);
        let request = ReleaseHandleRequest {
            handle: HandleId::from(fh),
        };
        execute_task!(self, {
            if let Some(e) = acknowledge(handler.release_handle(&req, request)) {
                warn!("releasedir: ino {:x?}, fh {:x?}, [{}], {:?}", ino, fh, e, req);
            }
            reply.ok();
        });
    }
}

#[cfg(feature = "deadlock_detection")]
fn spawn_deadlock_checker() {
    use log::{debug, error};
    use parking_lot::deadlock;
    use std::thread;
    use std::time::Duration;

    // Create a background thread which checks for deadlocks every 10s
    thread::spawn(move || loop {
        thread::sleep(Duration::from_secs(10));
        let deadlocks = deadlock::check_deadlock();
        if deadlocks.is_empty() {
            debug!("# No deadlock");
            continue;
        }

        error!("# {} deadlocks detected", deadlocks.len());
        for (i, threads) in deadlocks.iter().enumerate() {
            error!("Deadlock #{}", i);
            for t in threads {
                error!("Thread Id {:#?}\n, {:#?}", t.thread_id(), t.backtrace());
            }
        }
    });
}
