use std::sync::Arc;

use axum::extract::FromRef;

use crate::storage::ArticleStore;

/// 应用程序上下文
///
/// [`AppState`] 持有进程内唯一的 [`ArticleStore`]，所有请求共享同一个连接池。
#[derive(Clone, FromRef)]
pub struct AppState {
    store: Arc<ArticleStore>,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(store: ArticleStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
