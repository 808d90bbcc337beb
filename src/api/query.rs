use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    content::{Article, Category, Format, Language},
    error::{Error, Result},
    state::AppState,
    storage::{ArticleQuerier, ArticleStore},
};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /articles`：已发布文章列表
/// - `GET /featured`：推荐文章列表
/// - `GET /articles/{slug}`：获取单篇文章
/// - `GET /articles/{slug}/related`：相关文章
/// - `GET /categories`：所有分类
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/articles", get(articles_list))
        .route("/articles/{slug}", get(article))
        .route("/articles/{slug}/related", get(related_list))
        .route("/featured", get(featured_list))
        .route("/categories", get(category_list))
}

/// 文章元信息，用于列表展示，不包含正文。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMeta {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: Category,
    pub category_label: String,
    pub language: Language,
    pub format: Format,
    pub published_date: NaiveDate,
    pub reading_time: u32,
    pub image: Option<String>,
    pub youtube_url: Option<String>,
    pub pdf_url: Option<String>,
    pub featured: bool,
}

impl From<Article> for ArticleMeta {
    fn from(a: Article) -> Self {
        Self {
            slug: a.slug,
            title: a.title,
            excerpt: a.excerpt,
            category: a.category,
            category_label: a.category_label,
            language: a.language,
            format: a.format,
            published_date: a.published_date,
            reading_time: a.reading_time,
            image: a.image,
            youtube_url: a.youtube_url,
            pdf_url: a.pdf_url,
            featured: a.featured,
        }
    }
}

/// 完整文章，包括元信息和正文。
#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    meta: ArticleMeta,

    content: String,
}

/// 文章分类。
#[derive(Debug, Serialize)]
pub struct CategoryItem {
    id: &'static str,
    label: &'static str,
}

/// 查找可公开展示的文章，草稿与不存在同样视为 [`Error::NotFound`]。
async fn visible_article(store: &ArticleStore, slug: &str) -> Result<Article> {
    store
        .get_by_slug(slug)
        .await?
        .filter(Article::is_published)
        .ok_or(Error::NotFound)
}

/// 根据 slug 获取单篇文章。
///
/// 返回 [`ArticleDetail`]，文章不存在或仍是草稿时返回 [`Error::NotFound`]。
async fn article(
    Path(slug): Path<String>,
    State(store): State<Arc<ArticleStore>>,
) -> Result<Json<ArticleDetail>> {
    let mut article = visible_article(&store, &slug).await?;
    let content = std::mem::take(&mut article.content);

    Ok(Json(ArticleDetail {
        meta: article.into(),
        content,
    }))
}

/// 获取相关文章。
async fn related_list(
    Path(slug): Path<String>,
    State(store): State<Arc<ArticleStore>>,
) -> Result<Json<Vec<ArticleMeta>>> {
    let article = visible_article(&store, &slug).await?;
    let related = store.related(&article).await?;
    Ok(Json(related.into_iter().map(Into::into).collect()))
}

/// 获取推荐文章。
async fn featured_list(State(store): State<Arc<ArticleStore>>) -> Result<Json<Vec<ArticleMeta>>> {
    let featured = store.featured().await?;
    Ok(Json(featured.into_iter().map(Into::into).collect()))
}

/// 获取所有分类。
async fn category_list() -> Json<Vec<CategoryItem>> {
    Json(
        Category::ALL
            .into_iter()
            .map(|c| CategoryItem {
                id: c.as_str(),
                label: c.label(),
            })
            .collect(),
    )
}

/// 查询参数，用于文章列表筛选。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    language: Option<Language>,
}

/// 获取已发布文章列表。
///
/// 支持按语言筛选，返回 [`ArticleMeta`] 列表。
async fn articles_list(
    Query(params): Query<QueryParams>,
    State(store): State<Arc<ArticleStore>>,
) -> Result<Json<Vec<ArticleMeta>>> {
    let articles = store.published().await?;

    Ok(Json(
        articles
            .into_iter()
            .filter(|a| params.language.is_none_or(|l| a.language == l))
            .map(Into::into)
            .collect(),
    ))
}
