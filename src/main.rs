mod cli;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, PageArgs};
use manga_gallery::config::Config;
use manga_gallery::detail::{DetailParams, DetailView, DEFAULT_TITLE};
use manga_gallery::render::{self, PageLink};
use manga_gallery::store::{Action, Store};
use manga_gallery::Gallery;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(registry) = cli.registry {
        config.registry_url = registry;
    }
    if let Some(size) = cli.page_size {
        config.page_size = size;
    }
    let gallery = Gallery::new(config)?;

    match cli.command {
        Commands::List { page } => {
            let store = load_store(&gallery, &page, None).await;
            let state = store.state();
            let info = state.page_info();
            println!("Trang {} / {} ({} truyện)", info.page, info.total_pages, state.filtered().len());
            for manga in state.page_items() {
                println!("Manga: {} [{}] (ID: {})", manga.title, manga.library_name, manga.id);
            }
        }
        Commands::Page { page, out } => {
            let frame = Arc::new(Mutex::new(String::new()));
            let _store = load_store(&gallery, &page, Some(frame.clone())).await;
            let body = frame.lock().map(|f| f.clone()).unwrap_or_default();
            emit(&render::render_document("Manga", &body), out.as_deref()).await?;
        }
        Commands::Build { out } => {
            let pages = gallery.build_site(&out).await?;
            println!("Wrote {} page(s) to {}", pages, out.display());
        }
        Commands::Detail { link, out } => {
            let params = DetailParams::from_link(&link);
            let view = gallery.detail(&params).await;
            let title = match &view {
                DetailView::Loaded(detail) => detail.title.as_str(),
                _ => DEFAULT_TITLE,
            };
            emit(&render::render_document(title, &render::render_detail(&view)), out.as_deref()).await?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MANGA_GALLERY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Aggregate, then replay the requested search and navigation through the store.
/// When `frame` is set, the renderer keeps the latest rendered gallery in it.
async fn load_store(gallery: &Gallery, args: &PageArgs, frame: Option<Arc<Mutex<String>>>) -> Store {
    let aggregation = gallery.aggregate().await;
    for name in &aggregation.failed_sources {
        tracing::warn!(source = %name, "sub-source skipped");
    }

    let mut store = gallery.new_store();
    if let Some(frame) = frame {
        render::subscribe_renderer(&mut store, gallery.render_options(PageLink::Query), move |html| {
            if let Ok(mut f) = frame.lock() {
                *f = html;
            }
        });
    }

    store.dispatch(Action::Loaded(aggregation.items));
    if let Some(q) = &args.query {
        store.dispatch(Action::Search(q.clone()));
    }
    if args.page != 1 && !store.dispatch(Action::GotoPage(args.page)) {
        tracing::warn!(page = args.page, total = store.state().total_pages(), "page out of range, staying on page 1");
    }
    store
}

async fn emit(html: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => tokio::fs::write(path, html)
            .await
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{html}");
            Ok(())
        }
    }
}
