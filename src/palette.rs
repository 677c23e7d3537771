use crate::surface::{OutputSurface, SuggestionItem};

/// In-memory suggestion surface. Tracks how often it was rebuilt and how
/// often single rows changed highlight, so callers can tell the two apart.
#[derive(Default)]
pub struct SuggestionList {
    pub visible: bool,
    items: Vec<SuggestionItem>,
    highlighted: Vec<bool>,
    rebuilds: usize,
    highlight_updates: usize,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    pub fn values(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.value.as_str()).collect()
    }

    pub fn highlighted_indices(&self) -> Vec<usize> {
        self.highlighted
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
            .collect()
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted.get(index).copied().unwrap_or(false)
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn highlight_updates(&self) -> usize {
        self.highlight_updates
    }

    /// Drops rows without going through the controller, like a host re-rendering underneath it.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
        self.highlighted.truncate(len);
    }
}

impl OutputSurface for SuggestionList {
    fn clear(&mut self) {
        self.items.clear();
        self.highlighted.clear();
        self.rebuilds += 1;
    }

    fn append(&mut self, item: SuggestionItem) {
        self.items.push(item);
        self.highlighted.push(false);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Option<&SuggestionItem> {
        self.items.get(index)
    }

    fn set_highlighted(&mut self, index: usize, highlighted: bool) {
        if let Some(flag) = self.highlighted.get_mut(index) {
            *flag = highlighted;
            self.highlight_updates += 1;
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
