use std::path::PathBuf;

use insights::{
    config::Config,
    storage::{ArticleQuerier, ArticleStore},
};

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: import [content-dir]");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    insights::init_tracing();

    let mut args = std::env::args().skip(1); // 跳过程序名
    let dir_arg = args.next().map(PathBuf::from);
    if args.next().is_some() {
        eprintln!("Too many arguments provided.");
        print_usage_and_exit();
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("❌ Failed to load config: {}", e);
        std::process::exit(1);
    });
    let dir = dir_arg.unwrap_or(config.content_dir);

    let store = ArticleStore::new(&config.database_path);

    match insights::import::import_dir(&store, &dir).await {
        Ok(count) => println!("✅ Imported {} articles from {}", count, dir.display()),
        Err(e) => {
            eprintln!("❌ Import failed: {}", e);
            std::process::exit(1);
        }
    }

    match store.all().await {
        Ok(articles) => {
            for a in articles {
                let status = if a.draft {
                    "draft"
                } else if a.featured {
                    "featured"
                } else {
                    "published"
                };
                println!("{}  {:<9}  {}", a.published_date, status, a.slug);
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to list articles: {}", e);
            std::process::exit(1);
        }
    }
}
