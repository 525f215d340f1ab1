use std::collections::HashSet;
use std::sync::{Barrier, Mutex};
use std::thread;

use fuse_lifecycle::core::{ForgetOutcome, InodeTable, InodeTableConfig};
use fuse_lifecycle::prelude::*;
use fuse_lifecycle::templates::MemoryFs;

mod common;
use common::*;

const THREADS: usize = 8;
const ITERATIONS: usize = 300;

#[test]
fn test_interleaved_operations_on_same_child() {
    init_logger();
    let mut builder = MemoryFs::builder().dir("bar");
    for t in 0..THREADS {
        builder = builder.dir(&format!("held_{t}"));
    }
    let fs = builder.build();
    let held = Mutex::new(Vec::new());
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for t in 0..THREADS {
            let fs = &fs;
            let held = &held;
            let barrier = &barrier;
            scope.spawn(move || {
                let req = request_info();
                let own = fs
                    .lookup_inode(&req, LookUpInodeRequest::new(ROOT_INODE, format!("held_{t}")))
                    .unwrap();
                held.lock().unwrap().push(own.child);
                barrier.wait();
                let held_ids: HashSet<InodeId> = held.lock().unwrap().iter().copied().collect();
                assert_eq!(held_ids.len(), THREADS, "held inodes must be distinct");

                for _ in 0..ITERATIONS {
                    let bar = fs
                        .lookup_inode(&req, LookUpInodeRequest::new(ROOT_INODE, "bar"))
                        .unwrap();
                    assert!(fs.is_valid(bar.child));
                    assert!(!held_ids.contains(&bar.child));

                    let handle = fs.open_dir(&req, read_only(bar.child)).unwrap().handle;
                    assert!(fs.is_open(handle));
                    fs.release_handle(&req, ReleaseHandleRequest { handle })
                        .unwrap();
                    assert!(!fs.is_open(handle));

                    fs.forget_inode(&req, ForgetInodeRequest::new(bar.child))
                        .unwrap();
                    assert!(fs.is_valid(own.child));
                    assert_eq!(fs.generation(own.child), Some(own.generation));
                }

                barrier.wait();
                fs.forget_inode(&req, ForgetInodeRequest::new(own.child))
                    .unwrap();
            });
        }
    });

    assert_eq!(fs.live_inodes(), 0);
    assert_eq!(fs.open_handles(), 0);
}

#[test]
fn test_no_incarnation_is_issued_twice() {
    init_logger();
    let table = InodeTable::with_config(
        (usize::MAX, usize::MAX),
        InodeTableConfig {
            shards: 2,
            recycle_ids: true,
        },
    );
    let issued = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for t in 0..THREADS {
            let table = &table;
            let issued = &issued;
            scope.spawn(move || {
                let mut local = Vec::with_capacity(ITERATIONS);
                for i in 0..ITERATIONS {
                    let (id, generation) = table.lookup_or_mint((t, i)).unwrap();
                    local.push((id, generation));
                    assert_eq!(table.forget(id, 1), ForgetOutcome::Retired);
                }
                issued.lock().unwrap().extend(local);
            });
        }
    });

    let issued = issued.into_inner().unwrap();
    let unique: HashSet<_> = issued.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * ITERATIONS);
    assert_eq!(table.live_count(), 0);
}

#[test]
fn test_concurrent_forgets_retire_once() {
    init_logger();
    let table = InodeTable::new("/");
    for _ in 0..THREADS {
        table.lookup_or_mint("bar").unwrap();
    }
    let (id, _) = table.lookup_or_mint("bar").unwrap();
    table.forget(id, 1);

    let outcomes = Mutex::new(Vec::new());
    thread::scope(|scope| {
        for _ in 0..THREADS {
            let table = &table;
            let outcomes = &outcomes;
            scope.spawn(move || {
                let outcome = table.forget(id, 1);
                outcomes.lock().unwrap().push(outcome);
            });
        }
    });

    let outcomes = outcomes.into_inner().unwrap();
    let retired = outcomes
        .iter()
        .filter(|outcome| **outcome == ForgetOutcome::Retired)
        .count();
    assert_eq!(retired, 1);
    assert!(!table.is_valid(id));
    assert_eq!(table.forget(id, 1), ForgetOutcome::Unknown);
}

#[test]
fn test_lookup_racing_forget_keeps_id_consistent() {
    init_logger();
    let table = InodeTable::new("/");

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let table = &table;
            scope.spawn(move || {
                for _ in 0..ITERATIONS {
                    let (id, generation) = table.lookup_or_mint("bar").unwrap();
                    // Our own lookup keeps the ID live until we forget it.
                    assert_eq!(table.generation(id), Some(generation));
                    assert_eq!(table.resolve(id), Some("bar"));
                    table.forget(id, 1);
                }
            });
        }
    });

    assert_eq!(table.live_count(), 0);
}

#[test]
fn test_concurrent_opens_are_distinct() {
    init_logger();
    let fs = MemoryFs::builder().dir("bar").build();
    let handles = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let fs = &fs;
            let handles = &handles;
            scope.spawn(move || {
                let req = request_info();
                let local: Vec<HandleId> = (0..ITERATIONS)
                    .map(|_| fs.open_dir(&req, read_only(ROOT_INODE)).unwrap().handle)
                    .collect();
                handles.lock().unwrap().extend(local);
            });
        }
    });

    let handles = handles.into_inner().unwrap();
    let unique: HashSet<_> = handles.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * ITERATIONS);
    assert_eq!(fs.open_handles(), THREADS * ITERATIONS);
}
