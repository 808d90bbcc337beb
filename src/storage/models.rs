use chrono::NaiveDate;
use sqlx::{FromRow, Row, sqlite::SqliteRow};

use crate::{
    content::{Article, Category, Format, Language},
    error::{Error, Result},
};

/// 查询文章时选取的列，顺序与 [`super::sqlite::COLUMNS`] 一致
pub(crate) const ARTICLE_COLUMNS: &str = "slug, title, excerpt, content, category, category_label, \
     language, format, published_date, reading_time, image, youtube_url, pdf_url, featured, draft";

/// `articles` 表的原始行
///
/// 枚举字段保持为字符串，转换为 [`Article`] 时再校验。
#[derive(Debug, sqlx::FromRow)]
pub struct ArticleRow {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub category_label: String,
    pub language: String,
    pub format: String,
    pub published_date: NaiveDate,
    pub reading_time: i64,
    pub image: Option<String>,
    pub youtube_url: Option<String>,
    pub pdf_url: Option<String>,
    pub featured: bool,
    pub draft: bool,
}

impl TryFrom<ArticleRow> for Article {
    type Error = Error;

    fn try_from(row: ArticleRow) -> Result<Self> {
        let mismatch = |reason: String| Error::SchemaMismatch {
            slug: row.slug.clone(),
            reason,
        };

        let category: Category = row
            .category
            .parse()
            .map_err(|e: Error| mismatch(e.to_string()))?;
        if row.category_label != category.label() {
            return Err(mismatch(format!(
                "category label `{}` does not match `{}`",
                row.category_label, category
            )));
        }
        let language: Language = row.language.parse().map_err(|e: Error| mismatch(e.to_string()))?;
        let format: Format = row.format.parse().map_err(|e: Error| mismatch(e.to_string()))?;
        let reading_time = u32::try_from(row.reading_time)
            .ok()
            .filter(|t| *t > 0)
            .ok_or_else(|| mismatch(format!("reading time {} is not positive", row.reading_time)))?;

        Ok(Article {
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            category,
            category_label: row.category_label,
            language,
            format,
            published_date: row.published_date,
            reading_time,
            image: row.image,
            youtube_url: row.youtube_url,
            pdf_url: row.pdf_url,
            featured: row.featured,
            draft: row.draft,
        })
    }
}

/// 将一行数据解码为 [`Article`]
///
/// 列缺失、类型不符或字段取值非法都返回 [`Error::SchemaMismatch`]。
pub(crate) fn decode_article(row: &SqliteRow) -> Result<Article> {
    let raw = ArticleRow::from_row(row).map_err(|e| Error::SchemaMismatch {
        slug: row.try_get::<String, _>("slug").unwrap_or_default(),
        reason: e.to_string(),
    })?;
    raw.try_into()
}

/// 解码列表查询结果，跳过无法解码的行并记录日志
pub(crate) fn decode_listing(rows: Vec<SqliteRow>) -> Vec<Article> {
    rows.iter()
        .filter_map(|row| match decode_article(row) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed article");
                None
            }
        })
        .collect()
}
