use std::{io, path::PathBuf};

use axum::{http::StatusCode, response::IntoResponse};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 数据库文件或目录无法创建、打开，或建表失败
    #[error("failed to initialize article store at {path}: {source}")]
    StoreInit {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 数据库中的记录不符合 [`Article`](crate::content::Article) 的结构
    #[error("article `{slug}` does not match schema: {reason}")]
    SchemaMismatch { slug: String, reason: String },

    /// front matter 字段取值非法
    #[error("invalid field `{field}`: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("{0}")]
    Format(&'static str),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Not Found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
            Error::Format(s) => (StatusCode::BAD_REQUEST, s.to_string()).into_response(),
            Error::InvalidField { .. } | Error::Yaml(_) | Error::Toml(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            Error::SchemaMismatch { slug, reason } => {
                tracing::error!(%slug, %reason, "corrupt article record");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            Error::StoreInit { path, source } => {
                tracing::error!(path = %path.display(), %source, "article store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response()
            }
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
