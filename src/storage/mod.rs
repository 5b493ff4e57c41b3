//! 会话持久化存储模块
//!
//! 测验会话以 JSON 字符串的形式按键存取，键由固定前缀加词集 id 派生。
//! 本模块提供：
//! - [`KeyValueStore`] - 存储协作方的接口抽象，供会话注入
//! - [`MemoryStore`] - 共享句柄的内存实现，用于测试和纯内存运行
//! - [`SqliteStore`] - 基于 SQLite 的本地实现
//!
//! 所有操作均为同步、可失败；会话把任何存储错误当作无操作失败处理，
//! 内存中的状态始终是权威副本。

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::types::{ExamError, STORAGE_KEY_PREFIX};

// ============================================================
// 键派生
// ============================================================

/// 由词集 id 派生持久化键
pub fn session_key(word_set_id: &str) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, word_set_id)
}

// ============================================================
// KeyValueStore - 存储协作方接口
// ============================================================

/// 按键存取字符串的存储协作方
///
/// 三个操作都允许失败；调用方决定失败是否致命。会话对所有错误降级为
/// 仅内存运行。
pub trait KeyValueStore {
    /// 读取指定键的值，不存在时返回 `None`
    fn get(&self, key: &str) -> Result<Option<String>, ExamError>;

    /// 写入或覆盖指定键的值
    fn set(&self, key: &str, value: &str) -> Result<(), ExamError>;

    /// 删除指定键，键不存在时也算成功
    fn remove(&self, key: &str) -> Result<(), ExamError>;
}

// ============================================================
// MemoryStore - 内存实现
// ============================================================

/// 共享句柄的内存存储
///
/// `clone` 后的句柄指向同一份数据，测试里可以用一个句柄写、
/// 另一个句柄读来模拟页面重载。
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前存储的条目数
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ExamError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ExamError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ExamError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

// ============================================================
// SqliteStore - SQLite 实现
// ============================================================

/// 基于 SQLite 的键值存储
///
/// 单表 `exam_session_store`，值为会话状态 JSON。`clone` 共享同一个
/// 连接。
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件
    ///
    /// 启用 WAL 模式并建表。
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, ExamError> {
        let connection =
            Connection::open(db_path).map_err(|e| ExamError::Storage(e.to_string()))?;

        connection
            .execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;",
            )
            .map_err(|e| ExamError::Storage(e.to_string()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(connection)),
        };
        store.initialize()?;
        Ok(store)
    }

    /// 创建内存数据库（用于测试）
    pub fn in_memory() -> Result<Self, ExamError> {
        let connection =
            Connection::open_in_memory().map_err(|e| ExamError::Storage(e.to_string()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(connection)),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), ExamError> {
        let conn = self.lock_conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS exam_session_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e| ExamError::Storage(e.to_string()))?;
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ExamError> {
        self.conn
            .lock()
            .map_err(|e| ExamError::Storage(format!("锁获取失败: {}", e)))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, ExamError> {
        let conn = self.lock_conn()?;
        let result: Option<String> = conn
            .query_row(
                "SELECT value FROM exam_session_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .ok();
        Ok(result)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ExamError> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO exam_session_store (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))",
            [key, value],
        )
        .map_err(|e| ExamError::Storage(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ExamError> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM exam_session_store WHERE key = ?1", [key])
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
