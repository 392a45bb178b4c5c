//! 进程内键值缓存，语义与 Redis 实现一致（过期、集合、原子 pipeline）。
//! 用于测试和本地开发。

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::store::{CacheError, CacheOp, CacheResult, KvCache};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Set(BTreeSet<String>),
    Counter(i64),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    unavailable: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟缓存故障：之后的所有调用都返回 Unavailable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 读取集合成员，测试断言用
    pub async fn members(&self, key: &str) -> BTreeSet<String> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => match &entry.value {
                Value::Set(set) => set.clone(),
                _ => BTreeSet::new(),
            },
            _ => BTreeSet::new(),
        }
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .get(key)
            .is_some_and(|e| !e.is_expired(now))
    }

    fn check(&self) -> CacheResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn apply(entries: &mut HashMap<String, Entry>, op: CacheOp, now: Instant) {
        match op {
            CacheOp::SetEx {
                key,
                value,
                ttl_secs,
            } => {
                entries.insert(
                    key,
                    Entry {
                        value: Value::Str(value),
                        expires_at: Some(now + Duration::from_secs(ttl_secs)),
                    },
                );
            }
            CacheOp::Del { key } => {
                entries.remove(&key);
            }
            CacheOp::SAdd { key, members } => {
                if members.is_empty() {
                    return;
                }
                let entry = entries
                    .entry(key)
                    .and_modify(|e| {
                        if e.is_expired(now) || !matches!(e.value, Value::Set(_)) {
                            e.value = Value::Set(BTreeSet::new());
                            e.expires_at = None;
                        }
                    })
                    .or_insert(Entry {
                        value: Value::Set(BTreeSet::new()),
                        expires_at: None,
                    });
                if let Value::Set(set) = &mut entry.value {
                    set.extend(members);
                }
            }
        }
    }
}

#[async_trait]
impl KvCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.check()?;
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => match &entry.value {
                Value::Str(s) => Some(s.clone()),
                Value::Counter(n) => Some(n.to_string()),
                Value::Set(_) => None,
            },
            _ => None,
        })
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        self.execute(vec![CacheOp::SetEx {
            key: key.to_string(),
            value: value.to_string(),
            ttl_secs,
        }])
        .await
    }

    async fn del(&self, keys: &[String]) -> CacheResult<()> {
        self.execute(
            keys.iter()
                .map(|key| CacheOp::Del { key: key.clone() })
                .collect(),
        )
        .await
    }

    async fn swap_ex(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<Option<String>> {
        self.check()?;
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let previous = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => match &entry.value {
                Value::Str(s) => Some(s.clone()),
                _ => return Err(CacheError::Unavailable),
            },
            _ => None,
        };
        Self::apply(
            &mut entries,
            CacheOp::SetEx {
                key: key.to_string(),
                value: value.to_string(),
                ttl_secs,
            },
            now,
        );
        Ok(previous)
    }

    async fn any_member(&self, set_key: &str, members: &[String]) -> CacheResult<bool> {
        self.check()?;
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(match entries.get(set_key) {
            Some(entry) if !entry.is_expired(now) => match &entry.value {
                Value::Set(set) => members.iter().any(|m| set.contains(m)),
                _ => false,
            },
            _ => false,
        })
    }

    async fn execute(&self, ops: Vec<CacheOp>) -> CacheResult<()> {
        self.check()?;
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        for op in ops {
            Self::apply(&mut entries, op, now);
        }
        Ok(())
    }

    async fn incr_window(&self, key: &str, window_secs: u64) -> CacheResult<i64> {
        self.check()?;
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let entry = entries
            .entry(key.to_string())
            .and_modify(|e| {
                if e.is_expired(now) {
                    e.value = Value::Counter(0);
                    e.expires_at = None;
                }
            })
            .or_insert(Entry {
                value: Value::Counter(0),
                expires_at: None,
            });
        let count = match &mut entry.value {
            Value::Counter(n) => {
                *n += 1;
                *n
            }
            _ => return Err(CacheError::Unavailable),
        };
        if count == 1 {
            entry.expires_at = Some(now + Duration::from_secs(window_secs));
        }
        Ok(count)
    }
}
