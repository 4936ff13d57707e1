//! Gallery state and the pure transitions over it.
//!
//! Every transition takes the state by value and returns the next one, so the
//! whole flow can be exercised without a renderer attached.

use crate::pagination::{self, PageInfo, DEFAULT_PAGE_SIZE};
use crate::search;
use crate::types::MangaItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    all: Vec<MangaItem>,
    filtered: Vec<MangaItem>,
    /// Search text as the user typed it.
    query: Option<String>,
    /// Trimmed, lowercased form of `query` used for matching.
    needle: Option<String>,
    page: usize,
    page_size: usize,
}

impl Default for GalleryState {
    fn default() -> Self { Self::new(DEFAULT_PAGE_SIZE) }
}

impl GalleryState {
    pub fn new(page_size: usize) -> Self {
        Self { all: Vec::new(), filtered: Vec::new(), query: None, needle: None, page: 1, page_size: page_size.max(1) }
    }

    /// Replace the aggregate collection. Shows everything from page 1.
    pub fn with_items(self, items: Vec<MangaItem>) -> Self {
        Self { filtered: items.clone(), all: items, query: None, needle: None, page: 1, ..self }
    }

    pub fn all(&self) -> &[MangaItem] { &self.all }
    pub fn filtered(&self) -> &[MangaItem] { &self.filtered }
    /// Active search text, unmodified, for echoing back into the search box.
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn normalized_query(&self) -> Option<&str> { self.needle.as_deref() }
    pub fn page_size(&self) -> usize { self.page_size }

    /// Raw cursor. May exceed `total_pages` after the filtered set shrinks; see [`Self::page_info`].
    pub fn page(&self) -> usize { self.page }

    pub fn total_pages(&self) -> usize { pagination::total_pages(self.filtered.len(), self.page_size) }

    /// Cursor clamped into `[1, total_pages]`.
    pub fn page_info(&self) -> PageInfo { PageInfo::new(self.page, self.filtered.len(), self.page_size) }

    pub fn page_items(&self) -> &[MangaItem] {
        let info = self.page_info();
        &self.filtered[pagination::page_range(info.page, self.page_size, self.filtered.len())]
    }

    /// Pull the cursor back into bounds. Applied before every render.
    pub fn clamped(self) -> Self {
        let page = self.page_info().page;
        Self { page, ..self }
    }
}

/// Narrow to titles containing `query` (trimmed, case-insensitive). A blank query clears.
pub fn apply_search(state: GalleryState, query: &str) -> GalleryState {
    match search::normalize_query(query) {
        None => clear_search(state),
        Some(q) => {
            let filtered = search::filter_by_title(&state.all, &q);
            GalleryState { filtered, query: Some(query.to_string()), needle: Some(q), page: 1, ..state }
        }
    }
}

pub fn clear_search(state: GalleryState) -> GalleryState {
    GalleryState { filtered: state.all.clone(), query: None, needle: None, page: 1, ..state }
}

/// Move to `page`. Out-of-range requests leave the state untouched.
pub fn goto_page(state: GalleryState, page: usize) -> GalleryState {
    if page < 1 || page > state.total_pages() {
        return state;
    }
    GalleryState { page, ..state }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn items(titles: &[&str]) -> Vec<MangaItem> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| MangaItem {
                id: i.to_string(),
                title: t.to_string(),
                cover: format!("https://img.example/{i}.jpg"),
                chapters_json: format!("https://data.example/{i}/chapters.json"),
                library_id: "a".into(),
                library_name: "Kho A".into(),
            })
            .collect()
    }

    fn numbered(n: usize) -> Vec<MangaItem> {
        let titles: Vec<String> = (0..n).map(|i| format!("Manga {i}")).collect();
        items(&titles.iter().map(String::as_str).collect::<Vec<_>>())
    }

    #[test]
    fn loading_shows_everything() {
        let state = GalleryState::new(6).with_items(numbered(5));
        assert_eq!(state.filtered().len(), 5);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.page_items().len(), 5);
    }

    #[test]
    fn thirteen_items_paginate_by_six() {
        let state = GalleryState::new(6).with_items(numbered(13));
        assert_eq!(state.total_pages(), 3);
        let ids = |s: &GalleryState| s.page_items().iter().map(|m| m.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&state), ["0", "1", "2", "3", "4", "5"]);
        let state = goto_page(state, 2);
        assert_eq!(ids(&state), ["6", "7", "8", "9", "10", "11"]);
        let state = goto_page(state, 3);
        assert_eq!(ids(&state), ["12"]);
    }

    #[test]
    fn out_of_range_navigation_is_a_no_op() {
        let state = goto_page(GalleryState::new(6).with_items(numbered(13)), 2);
        assert_eq!(goto_page(state.clone(), 0), state);
        assert_eq!(goto_page(state.clone(), 4), state);
        assert_eq!(goto_page(state.clone(), 3).page(), 3);
    }

    #[test]
    fn blank_search_is_a_clear() {
        let loaded = GalleryState::new(6).with_items(items(&["Naruto", "Bleach"]));
        let narrowed = goto_page(apply_search(loaded.clone(), "naru"), 1);
        let cleared = apply_search(narrowed, "   ");
        assert_eq!(cleared, loaded);
        assert_eq!(cleared.query(), None);
    }

    #[test]
    fn search_then_clear_restores_aggregate() {
        let loaded = GalleryState::new(6).with_items(numbered(13));
        let narrowed = apply_search(loaded.clone(), "Manga 1");
        assert_eq!(narrowed.filtered().len(), 4); // 1, 10, 11, 12
        assert_eq!(narrowed.query(), Some("Manga 1"));
        assert_eq!(narrowed.normalized_query(), Some("manga 1"));
        assert!(narrowed.filtered().iter().all(|m| loaded.all().contains(m)));
        assert_eq!(clear_search(narrowed), loaded);
    }

    #[test]
    fn search_resets_cursor() {
        let state = goto_page(GalleryState::new(6).with_items(numbered(13)), 3);
        assert_eq!(apply_search(state.clone(), "manga").page(), 1);
        assert_eq!(clear_search(state).page(), 1);
    }

    #[test]
    fn stale_cursor_is_clamped_for_rendering() {
        let state = goto_page(GalleryState::new(6).with_items(numbered(13)), 3);
        // Bypass the search reset to simulate the filtered set shrinking under the cursor.
        let shrunk = GalleryState { filtered: state.all()[..7].to_vec(), ..state };
        assert_eq!(shrunk.page(), 3);
        assert_eq!(shrunk.page_info().page, 2);
        assert_eq!(shrunk.page_items().len(), 1);
        assert_eq!(shrunk.clamped().page(), 2);
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        let state = GalleryState::new(6);
        assert_eq!(state.total_pages(), 1);
        assert!(state.page_items().is_empty());
        assert_eq!(goto_page(state.clone(), 1), state);
    }
}
