use crate::state::{self, GalleryState};
use crate::types::MangaItem;

/// Every way the gallery state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Loaded(Vec<MangaItem>),
    Search(String),
    ClearSearch,
    GotoPage(usize),
}

/// What listeners see after an accepted action.
pub struct Update<'a> {
    pub state: &'a GalleryState,
    pub action: &'a Action,
    /// Set when the page changed through navigation.
    pub scroll_to_top: bool,
}

type Listener = Box<dyn FnMut(&Update<'_>) + Send>;

/// Holds the current state, applies actions through the pure transitions and
/// notifies subscribers. Renderers subscribe here instead of being called by the transitions.
pub struct Store {
    state: GalleryState,
    listeners: Vec<Listener>,
}

impl Store {
    pub fn new(state: GalleryState) -> Self { Self { state, listeners: Vec::new() } }

    pub fn state(&self) -> &GalleryState { &self.state }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Update<'_>) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Apply `action`. Returns false (and notifies nobody) for rejected navigation.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let current = std::mem::take(&mut self.state);
        let (next, accepted, scroll_to_top) = match &action {
            Action::Loaded(items) => (current.with_items(items.clone()), true, false),
            Action::Search(q) => (state::apply_search(current, q), true, false),
            Action::ClearSearch => (state::clear_search(current), true, false),
            Action::GotoPage(p) => {
                let in_range = *p >= 1 && *p <= current.total_pages();
                (state::goto_page(current, *p), in_range, in_range)
            }
        };
        self.state = next.clamped();
        if !accepted {
            tracing::debug!(?action, "ignored out-of-range navigation");
            return false;
        }

        let update = Update { state: &self.state, action: &action, scroll_to_top };
        for listener in &mut self.listeners {
            listener(&update);
        }
        true
    }
}
