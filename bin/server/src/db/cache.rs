//! Redis-backed user cache.
//!
//! Profiles are cached for a minute under `user-{id}` keys. The cache is
//! best-effort: callers log failures and fall back to the database.

use redis::AsyncCommands;
use sandpiper_core::UserId;
use sandpiper_social::User;

/// Seconds a cached user stays fresh.
const USER_TTL_SECS: u64 = 60;

/// Errors produced by the user cache.
#[derive(Debug)]
pub enum CacheError {
    /// The redis command failed.
    Redis(redis::RedisError),
    /// A cached value could not be decoded.
    Decode(serde_json::Error),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis(error) => write!(f, "redis error: {error}"),
            Self::Decode(error) => write!(f, "cache decode error: {error}"),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<redis::RedisError> for CacheError {
    fn from(error: redis::RedisError) -> Self {
        Self::Redis(error)
    }
}

/// A short-TTL cache of user profiles.
#[derive(Clone)]
pub struct UserCache {
    client: redis::Client,
}

impl UserCache {
    /// Creates a cache from a redis connection URL.
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn key(id: UserId) -> String {
        format!("user-{id}")
    }

    /// Looks up a cached user.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(Self::key(id)).await?;
        match raw {
            Some(json) => {
                let user = serde_json::from_str(&json).map_err(CacheError::Decode)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Caches a user for [`USER_TTL_SECS`].
    ///
    /// The serialized form never includes the password hash; the user
    /// type skips it during serialization.
    pub async fn set(&self, user: &User) -> Result<(), CacheError> {
        let json = serde_json::to_string(user).map_err(CacheError::Decode)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(user.id()), json, USER_TTL_SECS)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_carry_the_id_prefix() {
        let id = UserId::new();
        assert_eq!(UserCache::key(id), format!("user-{id}"));
    }
}
