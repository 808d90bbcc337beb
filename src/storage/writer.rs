use sqlx::SqliteExecutor;

use crate::content::Article;

use super::DBPool;

/// 文章写入接口
///
/// 只在导入流程中使用，查询接口不会写入数据。
pub trait ArticleWriter {
    /// 获取 SQL 执行器，用于 [`sqlx::query()`] 执行
    fn executor<'t>(&'t mut self) -> impl SqliteExecutor<'t>;

    /// 插入或更新文章
    ///
    /// 使用 `ON CONFLICT` 实现“存在则更新，否则插入”，slug 本身不会被修改。
    fn upsert(
        &mut self,
        article: &Article,
    ) -> impl std::future::Future<Output = Result<(), sqlx::Error>> {
        async {
            sqlx::query(
                "
                INSERT INTO articles
                    (slug, title, excerpt, content, category, category_label, language, format,
                     published_date, reading_time, image, youtube_url, pdf_url, featured, draft)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                ON CONFLICT (slug)
                DO UPDATE SET
                    title = excluded.title,
                    excerpt = excluded.excerpt,
                    content = excluded.content,
                    category = excluded.category,
                    category_label = excluded.category_label,
                    language = excluded.language,
                    format = excluded.format,
                    published_date = excluded.published_date,
                    reading_time = excluded.reading_time,
                    image = excluded.image,
                    youtube_url = excluded.youtube_url,
                    pdf_url = excluded.pdf_url,
                    featured = excluded.featured,
                    draft = excluded.draft
                ",
            )
            .bind(&article.slug)
            .bind(&article.title)
            .bind(&article.excerpt)
            .bind(&article.content)
            .bind(article.category.as_str())
            .bind(article.category.label())
            .bind(article.language.as_str())
            .bind(article.format.as_str())
            .bind(article.published_date)
            .bind(i64::from(article.reading_time))
            .bind(&article.image)
            .bind(&article.youtube_url)
            .bind(&article.pdf_url)
            .bind(article.featured)
            .bind(article.draft)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }
}

/// 为 [`sqlx::SqliteTransaction`] 实现 [`ArticleWriter`]
impl ArticleWriter for sqlx::Transaction<'_, sqlx::Sqlite> {
    fn executor<'t>(&'t mut self) -> impl SqliteExecutor<'t> {
        self.as_mut()
    }
}

/// 为 [`DBPool`] 实现 [`ArticleWriter`]
impl ArticleWriter for &'_ DBPool {
    fn executor<'t>(&'t mut self) -> impl SqliteExecutor<'t> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        content::Category,
        storage::{ArticleQuerier, ArticleStore},
    };

    #[tokio::test]
    async fn test_upsert_keeps_single_row_per_slug() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("articles.db"));
        let mut pool = store.connection().await.unwrap();

        let mut article = Article::new(
            "oee-explained",
            "OEE explained",
            "e",
            "c",
            Category::OperationalExcellence,
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        );
        pool.upsert(&article).await.unwrap();

        article.title = "OEE, explained".into();
        pool.upsert(&article).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "OEE, explained");
    }
}
