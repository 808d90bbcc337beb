use std::{env, path::PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// 运行配置
///
/// 先读取 `INSIGHTS_CONFIG` 指定的 TOML 文件（可选），再用环境变量覆盖：
///
/// - `INSIGHTS_DATABASE_PATH`
/// - `INSIGHTS_LISTEN_ADDR`
/// - `INSIGHTS_CONTENT_DIR`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据库文件路径
    pub database_path: PathBuf,
    /// HTTP 监听地址
    pub listen_addr: String,
    /// 导入文章时读取的 Markdown 目录
    pub content_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/articles.db"),
            listen_addr: "0.0.0.0:3000".to_string(),
            content_dir: PathBuf::from("content/insights"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match env::var_os("INSIGHTS_CONFIG") {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("INSIGHTS_DATABASE_PATH") {
            self.database_path = v.into();
        }
        if let Some(v) = var("INSIGHTS_LISTEN_ADDR") {
            self.listen_addr = v;
        }
        if let Some(v) = var("INSIGHTS_CONTENT_DIR") {
            self.content_dir = v.into();
        }
    }
}
