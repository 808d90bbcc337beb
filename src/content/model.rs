use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 文章分类
///
/// 固定的五个分类，每个分类对应一个固定的展示名称，参见 [`Category::label`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    DigitalTransformation,
    SmartManufacturing,
    OperationalExcellence,
    SupplyChain,
    CompanyNews,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::DigitalTransformation,
        Category::SmartManufacturing,
        Category::OperationalExcellence,
        Category::SupplyChain,
        Category::CompanyNews,
    ];

    /// 分类 id，即数据库中保存的值
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DigitalTransformation => "digital-transformation",
            Category::SmartManufacturing => "smart-manufacturing",
            Category::OperationalExcellence => "operational-excellence",
            Category::SupplyChain => "supply-chain",
            Category::CompanyNews => "company-news",
        }
    }

    /// 分类展示名称
    pub fn label(&self) -> &'static str {
        match self {
            Category::DigitalTransformation => "Digital Transformation",
            Category::SmartManufacturing => "Smart Manufacturing",
            Category::OperationalExcellence => "Operational Excellence",
            Category::SupplyChain => "Supply Chain",
            Category::CompanyNews => "Company News",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidField {
                field: "category",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 文章语言
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Nl => "nl",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "nl" => Ok(Language::Nl),
            _ => Err(Error::InvalidField {
                field: "language",
                value: s.to_string(),
            }),
        }
    }
}

/// 文章形式：短帖或长文
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Post,
    Article,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Post => "post",
            Format::Article => "article",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(Format::Post),
            "article" => Ok(Format::Article),
            _ => Err(Error::InvalidField {
                field: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// 默认阅读时长（分钟）
pub const DEFAULT_READING_TIME: u32 = 3;

/// 文章记录
///
/// 数据库 `articles` 表中一行对应的完整数据。`category_label` 始终由 `category`
/// 推导，不单独设置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
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
    pub draft: bool,
}

impl Article {
    /// 使用必填字段创建文章，其余字段取默认值
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        excerpt: impl Into<String>,
        content: impl Into<String>,
        category: Category,
        published_date: NaiveDate,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            excerpt: excerpt.into(),
            content: content.into(),
            category,
            category_label: category.label().to_string(),
            language: Language::default(),
            format: Format::default(),
            published_date,
            reading_time: DEFAULT_READING_TIME,
            image: None,
            youtube_url: None,
            pdf_url: None,
            featured: false,
            draft: false,
        }
    }

    /// 是否对外公开
    pub fn is_published(&self) -> bool {
        !self.draft
    }
}

/// 校验 slug 只包含小写字母、数字和 `-`，且不以 `-` 开头或结尾
pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
