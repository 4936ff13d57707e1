pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod pagination;
pub mod render;
pub mod search;
pub mod source;
pub mod state;
pub mod store;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::detail::{Detail, DetailParams, DetailView};
    pub use crate::error::FetchError;
    pub use crate::fetch::Aggregation;
    pub use crate::render::{PageLink, RenderOptions};
    pub use crate::source::{DocumentSource, HttpSource, MemorySource};
    pub use crate::state::{apply_search, clear_search, goto_page, GalleryState};
    pub use crate::store::{Action, Store, Update};
    pub use crate::types::{ChapterRecord, MangaItem, RegistryEntry};
    pub use crate::Gallery;
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::detail::{DetailParams, DetailView};
use crate::fetch::Aggregation;
use crate::render::{PageLink, RenderOptions};
use crate::source::{DocumentSource, HttpSource};
use crate::state::GalleryState;
use crate::store::Store;

/// Library entry point. Owns the configuration and the document source every fetch goes through.
pub struct Gallery {
    config: Config,
    source: Arc<dyn DocumentSource>,
}

impl Gallery {
    /// Gallery backed by the network (and local files for non-URL locations).
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let source = HttpSource::new(&config)?;
        Ok(Self { config, source: Arc::new(source) })
    }

    pub fn with_source(config: Config, source: Arc<dyn DocumentSource>) -> Self { Self { config, source } }

    pub fn config(&self) -> &Config { &self.config }

    /// Load the registry and merge every sub-source. Never fails; see [`Aggregation`].
    pub async fn aggregate(&self) -> Aggregation {
        fetch::aggregate(self.source.as_ref(), &self.config.registry_url).await
    }

    /// Empty store sized by the configured page size. Subscribe before dispatching `Action::Loaded`.
    pub fn new_store(&self) -> Store { Store::new(GalleryState::new(self.config.page_size)) }

    pub async fn detail(&self, params: &DetailParams) -> DetailView {
        detail::load_detail(self.source.as_ref(), params).await
    }

    pub fn render_options(&self, page_link: PageLink) -> RenderOptions {
        let search_action = match page_link {
            PageLink::Query => Some(String::new()),
            PageLink::StaticFiles => None,
        };
        RenderOptions { detail_page: self.config.detail_page.clone(), page_link, search_action }
    }

    /// Render every gallery page into `out_dir` (`index.html`, `page-2.html`, ...).
    /// Returns the number of pages written.
    pub async fn build_site(&self, out_dir: &Path) -> Result<usize> {
        let aggregation = self.aggregate().await;
        let options = self.render_options(PageLink::StaticFiles);
        let mut current = GalleryState::new(self.config.page_size).with_items(aggregation.items);

        tokio::fs::create_dir_all(out_dir)
            .await
            .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

        let total = current.total_pages();
        for page in 1..=total {
            current = state::goto_page(current, page);
            let html = render::render_document("Manga", &render::render_index(&current, &options));
            let path = out_dir.join(render::page_file_name(page));
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("failed to write page: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote page");
        }
        tracing::info!(pages = total, dir = %out_dir.display(), "site written");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn gallery(source: MemorySource, page_size: usize) -> Gallery {
        let config = Config { registry_url: "registry.json".into(), page_size, ..Config::default() };
        Gallery::with_source(config, Arc::new(source))
    }

    fn source_with(n: usize) -> MemorySource {
        MemorySource::new()
            .with_document(
                "registry.json",
                r#"[{"id": "a", "name": "Kho A", "mangaListUrl": "a.json"}, {"id": "b", "name": "Kho B", "mangaListUrl": "b.json"}]"#,
            )
            .with_document("a.json", crate::fetch::tests::manga_list("a", n))
    }

    #[tokio::test]
    async fn two_sources_one_failing() {
        let g = gallery(source_with(5), 6);
        let agg = g.aggregate().await;
        let mut store = g.new_store();
        store.dispatch(crate::store::Action::Loaded(agg.items));

        assert_eq!(store.state().all().len(), 5);
        assert_eq!(store.state().total_pages(), 1);
        assert_eq!(store.state().page_items().len(), 5);
        assert_eq!(agg.failed_sources, vec!["Kho B".to_string()]);
    }

    #[tokio::test]
    async fn build_site_writes_one_file_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let g = gallery(source_with(13), 6);
        assert_eq!(g.build_site(dir.path()).await.unwrap(), 3);

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.starts_with("<!DOCTYPE html>"));
        assert!(index.contains("href=\"page-2.html\""));
        assert!(!index.contains("searchInput"));
        let last = std::fs::read_to_string(dir.path().join("page-3.html")).unwrap();
        assert_eq!(last.matches("class=\"manga-card\"").count(), 1);
        assert!(!dir.path().join("page-4.html").exists());
    }

    #[tokio::test]
    async fn build_site_with_no_registry_writes_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let g = gallery(MemorySource::new(), 6);
        assert_eq!(g.build_site(dir.path()).await.unwrap(), 1);
        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("Trang 1 / 1"));
    }
}
