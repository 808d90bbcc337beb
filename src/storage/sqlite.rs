use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tokio::sync::OnceCell;

use crate::error::{Error, Result};

/// 数据库连接池类型
pub type DBPool = sqlx::SqlitePool;

/// 建表语句，可重复执行
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    slug            TEXT PRIMARY KEY NOT NULL,
    title           TEXT NOT NULL,
    excerpt         TEXT NOT NULL,
    content         TEXT NOT NULL,
    category        TEXT NOT NULL,
    category_label  TEXT NOT NULL,
    language        TEXT NOT NULL DEFAULT 'en',
    format          TEXT NOT NULL DEFAULT 'post',
    published_date  TEXT NOT NULL,
    reading_time    INTEGER NOT NULL DEFAULT 3,
    image           TEXT,
    youtube_url     TEXT,
    pdf_url         TEXT,
    featured        INTEGER NOT NULL DEFAULT 0,
    draft           INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS articles_published_idx
    ON articles (draft, published_date DESC);
"#;

/// `articles` 表必须包含的列
pub(crate) const COLUMNS: [&str; 15] = [
    "slug",
    "title",
    "excerpt",
    "content",
    "category",
    "category_label",
    "language",
    "format",
    "published_date",
    "reading_time",
    "image",
    "youtube_url",
    "pdf_url",
    "featured",
    "draft",
];

/// 文章存储
///
/// 持有进程内唯一的数据库连接池。连接池在第一次调用 [`ArticleStore::connection`]
/// 时创建：
///
/// - 创建数据库文件所在目录
/// - 打开（或新建）数据库文件，启用 WAL 日志模式
/// - 创建 `articles` 表并校验表结构
///
/// 并发的首次调用只会执行一次初始化，其余调用者等待同一个结果。
#[derive(Debug)]
pub struct ArticleStore {
    path: PathBuf,
    pool: OnceCell<DBPool>,
}

impl ArticleStore {
    /// 创建一个尚未打开的 [`ArticleStore`]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: OnceCell::new(),
        }
    }

    /// 是否已经完成初始化
    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// 获取共享连接池，首次调用时初始化
    ///
    /// 初始化失败返回 [`Error::StoreInit`]，此时不会缓存任何连接。
    pub async fn connection(&self) -> Result<&DBPool> {
        self.pool.get_or_try_init(|| open_pool(&self.path)).await
    }
}

/// 连接池配置：
///
/// - 最大连接数 8
/// - 最大空闲时间 60 秒
/// - 获取连接超时 2 秒
/// - 写锁等待 5 秒
async fn open_pool(path: &Path) -> Result<DBPool> {
    let init_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::StoreInit {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| init_err(e.into()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .idle_timeout(Duration::from_secs(60))
        .acquire_timeout(Duration::from_secs(2))
        .connect_with(options)
        .await
        .map_err(|e| init_err(e.into()))?;

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .map_err(|e| init_err(e.into()))?;

    let existing: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info('articles')")
            .fetch_all(&pool)
            .await
            .map_err(|e| init_err(e.into()))?;

    let missing: Vec<&str> = COLUMNS
        .into_iter()
        .filter(|c| !existing.iter().any(|e| e == c))
        .collect();
    if !missing.is_empty() {
        pool.close().await;
        return Err(init_err(
            format!("articles table is missing columns: {}", missing.join(", ")).into(),
        ));
    }

    tracing::info!(path = %path.display(), "article store ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_connection_creates_directory_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/articles.db");
        let store = ArticleStore::new(&path);

        assert!(!store.is_initialized());
        let pool = store.connection().await.expect("store should open");
        assert!(store.is_initialized());
        assert!(path.exists());

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'articles'",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        assert_eq!(count, 1);

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_connection_returns_same_pool() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("articles.db"));

        let first = store.connection().await.unwrap() as *const DBPool;
        let second = store.connection().await.unwrap() as *const DBPool;
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_initializes_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ArticleStore::new(dir.path().join("articles.db")));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.connection().await.map(|p| p as *const DBPool as usize)
                })
            })
            .collect();

        let mut addrs = Vec::new();
        for h in handles {
            addrs.push(h.await.unwrap().expect("no caller should fail"));
        }
        addrs.dedup();
        assert_eq!(addrs.len(), 1);

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'articles'",
        )
        .fetch_one(store.connection().await.unwrap())
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_reopen_existing_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.db");

        ArticleStore::new(&path).connection().await.unwrap();
        ArticleStore::new(&path)
            .connection()
            .await
            .expect("second open should not fail on existing table");
    }

    #[tokio::test]
    async fn test_foreign_articles_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.db");

        {
            let options = SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true);
            let pool = DBPool::connect_with(options).await.unwrap();
            sqlx::query("CREATE TABLE articles (id INTEGER PRIMARY KEY, body TEXT)")
                .execute(&pool)
                .await
                .unwrap();
            pool.close().await;
        }

        let store = ArticleStore::new(&path);
        let err = store.connection().await.unwrap_err();
        assert!(matches!(err, Error::StoreInit { .. }));
        assert!(!store.is_initialized());
    }

    #[tokio::test]
    async fn test_unwritable_location_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let store = ArticleStore::new(blocker.join("articles.db"));
        let err = store.connection().await.unwrap_err();
        assert!(matches!(err, Error::StoreInit { .. }));
    }
}
