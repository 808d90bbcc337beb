mod builder;
mod model;

pub use self::{
    builder::{ArticleBuilder, Content, FrontMatter, NoContent},
    model::{
        Article, Category, DEFAULT_READING_TIME, Format, Language, is_url_safe_slug,
    },
};
