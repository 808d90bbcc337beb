use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::model::{
    Article, Category, DEFAULT_READING_TIME, Format, Language, is_url_safe_slug,
};
use crate::error::{Error, Result};

/// Markdown 文件头部的 YAML front matter
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    pub excerpt: String,
    #[serde(deserialize_with = "parse_category")]
    pub category: Category,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub format: Format,
    #[serde(deserialize_with = "parse_date")]
    pub published_date: NaiveDate,
    #[serde(default = "default_reading_time")]
    pub reading_time: u32,
    pub image: Option<String>,
    pub youtube_url: Option<String>,
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub draft: bool,
}

fn default_reading_time() -> u32 {
    DEFAULT_READING_TIME
}

pub struct NoContent;
pub struct Content(String);

/// 从 Markdown 文件构建 [`Article`]
///
/// slug 取自文件名（去掉扩展名），正文与 front matter 由 [`ArticleBuilder::content`] 提供。
///
/// ```ignore
/// let article = ArticleBuilder::new("content/insights/mes-basics.md")
///     .content(markdown)
///     .build()?;
/// ```
pub struct ArticleBuilder<T> {
    slug: String,
    content: T,
}

impl ArticleBuilder<NoContent> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let slug = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            slug,
            content: NoContent,
        }
    }

    pub fn content(self, md_content: impl Into<String>) -> ArticleBuilder<Content> {
        ArticleBuilder {
            slug: self.slug,
            content: Content(md_content.into()),
        }
    }
}

impl ArticleBuilder<Content> {
    /// 从原始 Markdown 内容中提取 Front Matter 字符串和正文。
    fn extract_front_matter_and_body(content: &str) -> Result<(&str, &str)> {
        const DELIM: &str = "---";

        let content = content.trim_start();

        if !content.starts_with(DELIM) {
            return Err(Error::Format("Missing required YAML front matter"));
        }

        // 结束分隔符必须独占一行开头
        let rest = &content[DELIM.len()..];
        let end_pos = rest.find("\n---").ok_or(Error::Format(
            "Front matter does not terminate with expected delimiter ---",
        ))?;

        let yaml_str = &rest[..end_pos];
        let body_str = rest[end_pos + 1 + DELIM.len()..].trim_start();

        Ok((yaml_str.trim(), body_str))
    }

    /// 解析 front matter，校验后生成 [`Article`]
    pub fn build(self) -> Result<Article> {
        if !is_url_safe_slug(&self.slug) {
            return Err(Error::InvalidField {
                field: "slug",
                value: self.slug,
            });
        }

        let (yaml_str, body) = Self::extract_front_matter_and_body(&self.content.0)?;
        let fm: FrontMatter = serde_yaml::from_str(yaml_str)?;

        if fm.reading_time == 0 {
            return Err(Error::InvalidField {
                field: "readingTime",
                value: fm.reading_time.to_string(),
            });
        }

        Ok(Article {
            slug: self.slug,
            title: fm.title,
            excerpt: fm.excerpt.trim().to_string(),
            content: body.to_string(),
            category: fm.category,
            category_label: fm.category.label().to_string(),
            language: fm.language,
            format: fm.format,
            published_date: fm.published_date,
            reading_time: fm.reading_time,
            image: fm.image,
            youtube_url: fm.youtube_url,
            pdf_url: fm.pdf_url,
            featured: fm.featured,
            draft: fm.draft,
        })
    }
}

fn parse_category<'de, D>(deserializer: D) -> std::result::Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn parse_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    for fmt in &["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&s, fmt) {
            return Ok(date);
        }
    }

    Err(serde::de::Error::custom(format!("无法解析日期: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_markdown() -> String {
        r#"
---
title: From Spreadsheets to MES
excerpt: |
    Why planners outgrow Excel.
category: digital-transformation
publishedDate: 2024-06-01
readingTime: 7
youtubeUrl: https://www.youtube.com/watch?v=abc
featured: true
---

## Where spreadsheets break

- version conflicts
- no shop-floor feedback
"#
        .to_string()
    }

    #[test]
    fn test_article_builder_with_valid_front_matter() {
        let article = ArticleBuilder::new("content/insights/spreadsheets-to-mes.md")
            .content(sample_markdown())
            .build()
            .expect("Failed to build article");

        assert_eq!(article.slug, "spreadsheets-to-mes");
        assert_eq!(article.title, "From Spreadsheets to MES");
        assert_eq!(article.excerpt, "Why planners outgrow Excel.");
        assert_eq!(article.category, Category::DigitalTransformation);
        assert_eq!(article.category_label, "Digital Transformation");
        assert_eq!(
            article.published_date,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(article.reading_time, 7);
        assert_eq!(
            article.youtube_url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
        assert!(article.featured);
        assert!(!article.draft);
        assert!(article.content.starts_with("## Where spreadsheets break"));
    }

    #[test]
    fn test_article_builder_applies_defaults() {
        let md = "---\ntitle: T\nexcerpt: E\ncategory: supply-chain\npublishedDate: 2024/03/05\n---\nbody";
        let article = ArticleBuilder::new("short.md").content(md).build().unwrap();

        assert_eq!(article.language, Language::En);
        assert_eq!(article.format, Format::Post);
        assert_eq!(article.reading_time, 3);
        assert!(!article.featured);
        assert!(!article.draft);
        assert!(article.image.is_none());
        assert_eq!(article.content, "body");
    }

    #[test]
    fn test_article_builder_allows_dashes_inside_front_matter() {
        let md = "---\ntitle: \"Before --- After\"\nexcerpt: E\ncategory: company-news\npublishedDate: 2024-01-01\n---\nbody --- text";
        let article = ArticleBuilder::new("dashes.md").content(md).build().unwrap();

        assert_eq!(article.title, "Before --- After");
        assert_eq!(article.excerpt, "E");
        assert_eq!(article.content, "body --- text");
    }

    #[test]
    fn test_article_builder_missing_front_matter_should_fail() {
        let markdown = "# No Front Matter\n\nThis article has no front matter.\n";
        let result = ArticleBuilder::new("invalid-article.md")
            .content(markdown)
            .build();

        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_article_builder_rejects_unknown_category() {
        let md = "---\ntitle: T\nexcerpt: E\ncategory: gardening\npublishedDate: 2024-01-01\n---\n";
        let result = ArticleBuilder::new("x.md").content(md).build();
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn test_article_builder_rejects_zero_reading_time() {
        let md = "---\ntitle: T\nexcerpt: E\ncategory: company-news\npublishedDate: 2024-01-01\nreadingTime: 0\n---\n";
        let result = ArticleBuilder::new("x.md").content(md).build();
        assert!(matches!(
            result,
            Err(Error::InvalidField {
                field: "readingTime",
                ..
            })
        ));
    }

    #[test]
    fn test_article_builder_rejects_unsafe_slug() {
        let md = "---\ntitle: T\nexcerpt: E\ncategory: company-news\npublishedDate: 2024-01-01\n---\n";
        let result = ArticleBuilder::new("Hello World.md").content(md).build();
        assert!(matches!(result, Err(Error::InvalidField { field: "slug", .. })));
    }
}
