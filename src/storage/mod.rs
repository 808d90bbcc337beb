mod models;
mod querier;
mod sqlite;
mod writer;

pub use self::{
    querier::{ArticleQuerier, RELATED_LIMIT},
    sqlite::{ArticleStore, DBPool},
    writer::ArticleWriter,
};
