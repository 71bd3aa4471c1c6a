//! Incremental display of search results.

/// Results shown before the user asks for more.
pub const INITIAL_DISPLAY_COUNT: usize = 5;

/// Results added per "load more".
pub const LOAD_MORE_COUNT: usize = 10;

/// How many search results are currently revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsWindow {
    display_count: usize,
}

impl Default for ResultsWindow {
    fn default() -> Self {
        Self {
            display_count: INITIAL_DISPLAY_COUNT,
        }
    }
}

impl ResultsWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call whenever the search term changes.
    pub const fn reset(&mut self) {
        self.display_count = INITIAL_DISPLAY_COUNT;
    }

    pub const fn load_more(&mut self) {
        self.display_count += LOAD_MORE_COUNT;
    }

    #[must_use]
    pub fn visible<'a, T>(&self, results: &'a [T]) -> &'a [T] {
        &results[..results.len().min(self.display_count)]
    }

    #[must_use]
    pub const fn has_more(&self, total: usize) -> bool {
        total > self.display_count
    }
}
