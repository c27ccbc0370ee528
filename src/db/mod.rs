pub mod mood_logs;
pub mod postgres;
pub mod redis;
pub mod storage;

pub use mood_logs::{InMemoryMoodLogRepository, MoodLogRepository};
pub use postgres::{create_lazy_pool, PgMoodLogRepository};
pub use self::redis::{create_redis_client, RedisStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
