use std::collections::{BTreeSet, HashMap};

use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

use super::PatchOp;

#[derive(Clone, Debug)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn from_url(redis_url: &str) -> anyhow::Result<Self> {
        let config = Config::from_url(redis_url);
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("failed to create redis pool: {e}"))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> anyhow::Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("failed to get redis connection: {e}"))
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis PING failed: {e}"))?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.conn().await?;
        let value = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis GET failed for key `{key}`: {e}"))?;
        Ok(value)
    }

    pub async fn hash_all(&self, key: &str) -> anyhow::Result<HashMap<String, String>> {
        let mut conn = self.conn().await?;
        let fields = conn
            .hgetall::<_, HashMap<String, String>>(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis HGETALL failed for key `{key}`: {e}"))?;
        Ok(fields)
    }

    pub async fn set_members(&self, key: &str) -> anyhow::Result<BTreeSet<String>> {
        let mut conn = self.conn().await?;
        let members = conn
            .smembers::<_, BTreeSet<String>>(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis SMEMBERS failed for key `{key}`: {e}"))?;
        Ok(members)
    }

    pub async fn list_all(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let mut conn = self.conn().await?;
        let values = conn
            .lrange::<_, Vec<String>>(key, 0, -1)
            .await
            .map_err(|e| anyhow::anyhow!("redis LRANGE failed for key `{key}`: {e}"))?;
        Ok(values)
    }

    /// Run the whole patch as one MULTI/EXEC pipeline so concurrent writers to
    /// unrelated fields of the same document cannot interleave with it.
    pub async fn apply(&self, ops: &[PatchOp]) -> anyhow::Result<()> {
        let mut pipe = redis::pipe();
        pipe.atomic();

        for op in ops {
            match op {
                PatchOp::HashSet { key, field, value } => {
                    pipe.hset(key, field, value).ignore();
                }
                PatchOp::HashIncr { key, field, delta } => {
                    pipe.hincr(key, field, *delta).ignore();
                }
                PatchOp::SetAdd { key, member } => {
                    pipe.sadd(key, member).ignore();
                }
                PatchOp::SetRemove { key, member } => {
                    pipe.srem(key, member).ignore();
                }
                PatchOp::ListPush { key, value } => {
                    pipe.rpush(key, value).ignore();
                }
                PatchOp::Put { key, value } => {
                    pipe.set(key, value).ignore();
                }
                PatchOp::Delete { key } => {
                    pipe.del(key).ignore();
                }
            }
        }

        let mut conn = self.conn().await?;
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis patch pipeline failed: {e}"))?;

        Ok(())
    }
}
