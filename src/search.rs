use crate::types::MangaItem;

/// Trim and lowercase. `None` means the query is empty and acts as a clear.
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    (!q.is_empty()).then_some(q)
}

/// Items whose lowercased title contains `needle`. `needle` must already be normalized.
pub fn filter_by_title(items: &[MangaItem], needle: &str) -> Vec<MangaItem> {
    items
        .iter()
        .filter(|m| m.title.to_lowercase().contains(needle))
        .cloned()
        .collect()
}
