use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchError;
use crate::source::DocumentSource;
use crate::types::{ListedManga, MangaItem, RegistryEntry};

/// Result of merging every sub-source listed in a registry.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Items in registry order, then list order within each sub-source.
    pub items: Vec<MangaItem>,
    /// Names of sub-sources that contributed nothing because their fetch failed.
    pub failed_sources: Vec<String>,
    /// False when the registry itself could not be loaded.
    pub registry_loaded: bool,
}

pub async fn fetch_json<T: DeserializeOwned>(
    source: &dyn DocumentSource,
    location: &str,
) -> Result<T, FetchError> {
    let body = source.fetch_text(location).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode { location: location.to_string(), source: e })
}

/// Only a missing, unparseable or non-array registry is an error. Broken entries are kept
/// and fail on their own when their list is loaded.
pub async fn load_registry(source: &dyn DocumentSource, location: &str) -> Result<Vec<RegistryEntry>, FetchError> {
    let entries: Vec<Value> = fetch_json(source, location).await?;
    Ok(entries.iter().map(RegistryEntry::from_value).collect())
}

/// Fetch one sub-source's list. A failure is logged and yields `None`; it never reaches siblings.
/// Items that cannot be read are skipped individually.
pub async fn load_sub_source(source: &dyn DocumentSource, entry: &RegistryEntry) -> Option<Vec<MangaItem>> {
    let Some(location) = entry.manga_list_url.as_deref() else {
        tracing::warn!(source = %entry.label(), "registry entry has no usable mangaListUrl");
        return None;
    };
    let list = match fetch_json::<Vec<Value>>(source, location).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(source = %entry.label(), location, error = %e, "failed to load manga list");
            return None;
        }
    };

    let total = list.len();
    let items: Vec<MangaItem> = list
        .into_iter()
        .enumerate()
        .filter_map(|(idx, raw)| match serde_json::from_value::<ListedManga>(raw) {
            Ok(m) => Some(m.into_item(entry)),
            Err(e) => {
                tracing::warn!(source = %entry.label(), index = idx, error = %e, "skipping unreadable manga item");
                None
            }
        })
        .collect();
    tracing::debug!(source = %entry.label(), count = items.len(), skipped = total - items.len(), "loaded manga list");
    Some(items)
}

/// Load the registry and every sub-source concurrently, waiting for all of them to settle.
pub async fn aggregate(source: &dyn DocumentSource, registry_location: &str) -> Aggregation {
    let registry = match load_registry(source, registry_location).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(location = registry_location, error = %e, "failed to load registry");
            return Aggregation::default();
        }
    };

    let lists = join_all(registry.iter().map(|entry| load_sub_source(source, entry))).await;

    let mut out = Aggregation { registry_loaded: true, ..Aggregation::default() };
    for (entry, list) in registry.iter().zip(lists) {
        match list {
            Some(mut items) => out.items.append(&mut items),
            None => out.failed_sources.push(entry.label()),
        }
    }
    tracing::info!(
        sources = registry.len(),
        failed = out.failed_sources.len(),
        items = out.items.len(),
        "aggregated registry"
    );
    out
}
