use crate::{
    content::Article,
    error::{Error, Result},
};

use super::{
    ArticleStore,
    models::{ARTICLE_COLUMNS, decode_article, decode_listing},
};

/// 相关文章最多返回的数量
pub const RELATED_LIMIT: usize = 3;

/// 用于查询文章相关数据
///
/// 所有接口均为只读。草稿只能通过 [`ArticleQuerier::get_by_slug`] 和
/// [`ArticleQuerier::all`] 获取，其余列表接口始终排除草稿。
///
/// 列表按发布日期倒序排列，日期相同时按 slug 升序。
pub trait ArticleQuerier: Send + Sync {
    type Error;

    /// 按 slug 精确查询单篇文章（区分大小写）
    ///
    /// 草稿同样返回，是否展示由调用方决定。不存在时返回 `None`。
    fn get_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = core::result::Result<Option<Article>, Self::Error>> + Send;

    /// 所有已发布文章
    fn published(&self) -> impl Future<Output = core::result::Result<Vec<Article>, Self::Error>> + Send;

    /// 已发布且标记为推荐的文章
    fn featured(&self) -> impl Future<Output = core::result::Result<Vec<Article>, Self::Error>> + Send;

    /// 与给定文章相关的已发布文章
    ///
    /// 同分类的文章优先，其次按发布日期补足，最多 [`RELATED_LIMIT`] 篇，
    /// 不包含文章本身。
    fn related(
        &self,
        article: &Article,
    ) -> impl Future<Output = core::result::Result<Vec<Article>, Self::Error>> + Send;

    /// 所有文章，包括草稿
    ///
    /// 仅用于管理用途，不应暴露给公开页面。
    fn all(&self) -> impl Future<Output = core::result::Result<Vec<Article>, Self::Error>> + Send;
}

impl ArticleQuerier for ArticleStore {
    type Error = Error;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let row = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = ?1"
        ))
        .bind(slug)
        .fetch_optional(self.connection().await?)
        .await?;

        row.as_ref().map(decode_article).transpose()
    }

    async fn published(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE draft = 0
            ORDER BY published_date DESC, slug ASC
            "#
        ))
        .fetch_all(self.connection().await?)
        .await?;

        Ok(decode_listing(rows))
    }

    async fn featured(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE draft = 0 AND featured = 1
            ORDER BY published_date DESC, slug ASC
            "#
        ))
        .fetch_all(self.connection().await?)
        .await?;

        Ok(decode_listing(rows))
    }

    async fn related(&self, article: &Article) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE draft = 0 AND slug <> ?1
            ORDER BY (category = ?2) DESC, published_date DESC, slug ASC
            "#
        ))
        .bind(&article.slug)
        .bind(article.category.as_str())
        .fetch_all(self.connection().await?)
        .await?;

        // 先跳过无法解码的行再截断，保证能用后续文章补足
        let mut related = decode_listing(rows);
        related.truncate(RELATED_LIMIT);
        Ok(related)
    }

    async fn all(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY published_date DESC, slug ASC"
        ))
        .fetch_all(self.connection().await?)
        .await?;

        Ok(decode_listing(rows))
    }
}
