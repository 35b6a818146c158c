mod memory_store;
mod redis_store;

use std::collections::{BTreeSet, HashMap};

use memory_store::MemoryStore;
use redis_store::RedisStore;

/// One merge/patch step against a single key. A slice of these passed to
/// [`DocumentService::apply`] is executed atomically; `SetAdd` and `SetRemove`
/// are no-ops when the member is already present/absent, which is what makes
/// two-document operations safe to re-run after a partial failure.
#[derive(Clone, Debug)]
pub enum PatchOp {
    HashSet {
        key: String,
        field: String,
        value: String,
    },
    HashIncr {
        key: String,
        field: String,
        delta: i64,
    },
    SetAdd {
        key: String,
        member: String,
    },
    SetRemove {
        key: String,
        member: String,
    },
    ListPush {
        key: String,
        value: String,
    },
    Put {
        key: String,
        value: String,
    },
    Delete {
        key: String,
    },
}

#[derive(Clone, Debug)]
enum StoreBackend {
    Memory(MemoryStore),
    Redis(RedisStore),
}

/// Handle to the hosted document store. Documents are plain string values,
/// hashes, sets, and lists keyed under a shared prefix; all writes go through
/// [`apply`](Self::apply) as merge patches, never full-document overwrites.
#[derive(Clone, Debug)]
pub struct DocumentService {
    key_prefix: String,
    backend: StoreBackend,
}

impl DocumentService {
    /// In-process backend for tests and local runs.
    pub fn memory(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: StoreBackend::Memory(MemoryStore::new()),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: StoreBackend::Redis(RedisStore::from_url(redis_url)?),
        })
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub fn is_redis(&self) -> bool {
        matches!(self.backend, StoreBackend::Redis(_))
    }

    /// Round-trip health check; the memory backend always succeeds.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            StoreBackend::Memory(_) => Ok(()),
            StoreBackend::Redis(store) => store.ping().await,
        }
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        match &self.backend {
            StoreBackend::Memory(store) => store.get(key),
            StoreBackend::Redis(store) => store.get(key).await,
        }
    }

    pub async fn hash_all(&self, key: &str) -> anyhow::Result<HashMap<String, String>> {
        match &self.backend {
            StoreBackend::Memory(store) => store.hash_all(key),
            StoreBackend::Redis(store) => store.hash_all(key).await,
        }
    }

    pub async fn set_members(&self, key: &str) -> anyhow::Result<BTreeSet<String>> {
        match &self.backend {
            StoreBackend::Memory(store) => store.set_members(key),
            StoreBackend::Redis(store) => store.set_members(key).await,
        }
    }

    pub async fn list_all(&self, key: &str) -> anyhow::Result<Vec<String>> {
        match &self.backend {
            StoreBackend::Memory(store) => store.list_all(key),
            StoreBackend::Redis(store) => store.list_all(key).await,
        }
    }

    /// Apply a merge patch. Every op in `ops` lands or none does: the redis
    /// backend runs an atomic MULTI/EXEC pipeline and the memory backend holds
    /// its lock across the whole batch.
    pub async fn apply(&self, ops: &[PatchOp]) -> anyhow::Result<()> {
        if ops.is_empty() {
            return Ok(());
        }
        match &self.backend {
            StoreBackend::Memory(store) => store.apply(ops),
            StoreBackend::Redis(store) => store.apply(ops).await,
        }
    }
}
