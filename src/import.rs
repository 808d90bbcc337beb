use std::path::{Path, PathBuf};

use crate::{
    content::{Article, ArticleBuilder},
    error::Result,
    storage::{ArticleStore, ArticleWriter},
};

/// 收集目录下所有 Markdown 文件（不递归），按文件名排序
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 将目录中的 Markdown 文件解析为 [`Article`]
///
/// 任意一个文件解析失败都会返回错误。
pub fn load_articles(dir: impl AsRef<Path>) -> Result<Vec<Article>> {
    markdown_files(dir.as_ref())?
        .into_iter()
        .map(|path| -> Result<Article> {
            let content = std::fs::read_to_string(&path)?;
            ArticleBuilder::new(&path)
                .content(content)
                .build()
                .inspect_err(|e| {
                    tracing::error!(path = %path.display(), error = %e, "invalid article")
                })
        })
        .collect()
}

/// 导入目录中的文章
///
/// 先解析全部文件，全部成功后在一个事务中写入，返回写入的文章数量。
pub async fn import_dir(store: &ArticleStore, dir: impl AsRef<Path>) -> Result<usize> {
    let articles = load_articles(dir)?;

    let mut tx = store.connection().await?.begin().await?;
    for article in &articles {
        tx.upsert(article).await?;
        tracing::debug!(slug = %article.slug, draft = article.draft, "article upserted");
    }
    tx.commit().await?;

    Ok(articles.len())
}
