//! Inode bookkeeping shared by lookup and forget.
//!
//! The table maps a backend key (whatever identifies a node in the backing store) to the
//! inode ID the kernel knows it by, and counts how many lookups the kernel holds on it.
//! The ID is retired when the kernel forgets all of them. Retired IDs may be reissued,
//! always with a bumped generation.
//!
//! The table is split into shards. An ID minted by shard `s` satisfies
//! `(id - FIRST_MINTED_INODE) % shards == s`, and a key always lives in the shard its hash
//! selects, so every operation on a given key or ID takes exactly one shard lock. A
//! retirement and a later reissue of the same value are serialized by that lock.

use std::collections::hash_map::RandomState;
use std::collections::{HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::types::*;

/// First value handed out by the table, right after the root.
pub const FIRST_MINTED_INODE: u64 = fuser::FUSE_ROOT_ID + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeTableConfig {
    /// Number of independently locked shards. Zero is treated as one.
    pub shards: usize,
    /// Reissue forgotten IDs (with a new generation) instead of always minting fresh values.
    pub recycle_ids: bool,
}

impl Default for InodeTableConfig {
    fn default() -> Self {
        Self {
            shards: 16,
            recycle_ids: true,
        }
    }
}

/// What a forget did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgetOutcome {
    /// The last lookup was dropped, the ID is no longer valid.
    Retired,
    /// The ID stays live with this many lookups left.
    Remaining(u64),
    /// The root inode is never retired.
    Pinned,
    /// The ID is not live, nothing was changed.
    Unknown,
    /// More lookups were forgotten than issued. The ID was retired anyway.
    OverForgotten { issued: u64, forgotten: u64 },
}

struct InodeRecord<K> {
    key: K,
    generation: Generation,
    lookups: u64,
}

struct Shard<K> {
    by_id: HashMap<u64, InodeRecord<K>>,
    by_key: HashMap<K, u64>,
    next_seq: u64,
    free: VecDeque<(u64, Generation)>,
}

impl<K> Shard<K> {
    fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_key: HashMap::new(),
            next_seq: 0,
            free: VecDeque::new(),
        }
    }
}

pub struct InodeTable<K> {
    root_key: K,
    recycle_ids: bool,
    hasher: RandomState,
    shards: Box<[Mutex<Shard<K>>]>,
}

impl<K> InodeTable<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(root_key: K) -> Self {
        Self::with_config(root_key, InodeTableConfig::default())
    }

    pub fn with_config(root_key: K, config: InodeTableConfig) -> Self {
        let shards = (0..config.shards.max(1))
            .map(|_| Mutex::new(Shard::new()))
            .collect();
        Self {
            root_key,
            recycle_ids: config.recycle_ids,
            hasher: RandomState::new(),
            shards,
        }
    }

    fn shard_for_key(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }

    fn shard_for_id(&self, id: InodeId) -> Option<usize> {
        let raw = id.as_raw();
        if raw < FIRST_MINTED_INODE {
            return None;
        }
        Some(((raw - FIRST_MINTED_INODE) % self.shards.len() as u64) as usize)
    }

    /// Returns the live ID of `key`, adding one lookup to it, or mints a new one.
    ///
    /// The mint is committed before this returns, so a forget issued after the kernel
    /// received the response always finds it.
    pub fn lookup_or_mint(&self, key: K) -> FuseResult<(InodeId, Generation)> {
        if key == self.root_key {
            return Ok((ROOT_INODE, Generation::INITIAL));
        }
        let shard_index = self.shard_for_key(&key);
        let mut shard = self.shards[shard_index].lock();

        let existing = shard.by_key.get(&key).copied();
        if let Some(raw) = existing {
            if let Some(record) = shard.by_id.get_mut(&raw) {
                record.lookups += 1;
                return Ok((InodeId::from(raw), record.generation));
            }
        }

        let recycled = if self.recycle_ids {
            shard.free.pop_front()
        } else {
            None
        };
        let (raw, generation) = match recycled {
            Some((raw, previous)) => (raw, previous.next()),
            None => {
                let raw = (shard.next_seq)
                    .checked_mul(self.shards.len() as u64)
                    .and_then(|offset| offset.checked_add(FIRST_MINTED_INODE))
                    .and_then(|base| base.checked_add(shard_index as u64))
                    .ok_or_else(|| ErrorKind::Io.to_error("inode number space exhausted"))?;
                shard.next_seq += 1;
                (raw, Generation::INITIAL)
            }
        };
        shard.by_key.insert(key.clone(), raw);
        shard.by_id.insert(
            raw,
            InodeRecord {
                key,
                generation,
                lookups: 1,
            },
        );
        Ok((InodeId::from(raw), generation))
    }

    /// Drops `nlookup` lookups from `id`, retiring it when none are left.
    pub fn forget(&self, id: InodeId, nlookup: u64) -> ForgetOutcome {
        if id.is_root() {
            return ForgetOutcome::Pinned;
        }
        let Some(shard_index) = self.shard_for_id(id) else {
            return ForgetOutcome::Unknown;
        };
        let mut shard = self.shards[shard_index].lock();
        let raw = id.as_raw();

        let Some(record) = shard.by_id.get_mut(&raw) else {
            return ForgetOutcome::Unknown;
        };
        if nlookup < record.lookups {
            record.lookups -= nlookup;
            return ForgetOutcome::Remaining(record.lookups);
        }
        let issued = record.lookups;

        if let Some(record) = shard.by_id.remove(&raw) {
            shard.by_key.remove(&record.key);
            if self.recycle_ids {
                shard.free.push_back((raw, record.generation));
            }
        }
        if nlookup > issued {
            ForgetOutcome::OverForgotten {
                issued,
                forgotten: nlookup,
            }
        } else {
            ForgetOutcome::Retired
        }
    }

    /// Backend key of a live ID.
    pub fn resolve(&self, id: InodeId) -> Option<K> {
        if id.is_root() {
            return Some(self.root_key.clone());
        }
        let shard_index = self.shard_for_id(id)?;
        let shard = self.shards[shard_index].lock();
        shard.by_id.get(&id.as_raw()).map(|record| record.key.clone())
    }

    /// True for the root, and for any ID returned by a lookup and not yet retired.
    pub fn is_valid(&self, id: InodeId) -> bool {
        self.generation(id).is_some()
    }

    pub fn generation(&self, id: InodeId) -> Option<Generation> {
        if id.is_root() {
            return Some(Generation::INITIAL);
        }
        let shard_index = self.shard_for_id(id)?;
        let shard = self.shards[shard_index].lock();
        shard.by_id.get(&id.as_raw()).map(|record| record.generation)
    }

    /// Lookups the kernel currently holds on `id`.
    pub fn lookup_count(&self, id: InodeId) -> Option<u64> {
        let shard_index = self.shard_for_id(id)?;
        let shard = self.shards[shard_index].lock();
        shard.by_id.get(&id.as_raw()).map(|record| record.lookups)
    }

    /// Number of live IDs, root excluded.
    pub fn live_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().by_id.len()).sum()
    }
}
