//! Vertical scroll state of the page body.

/// Tracks which rows of the composed page are on screen and keeps the offset
/// inside `[0, content_height - view_height]`.
#[derive(Debug, Default)]
pub struct PageViewport {
    pub scroll_offset: usize,
    content_height: usize,
    view_height: usize,
}

impl PageViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current page and screen heights and re-clamp the offset.
    pub fn set_bounds(&mut self, content_height: usize, view_height: usize) {
        self.content_height = content_height;
        self.view_height = view_height;
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
    }

    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.view_height)
    }

    /// Scroll up by `lines`.
    pub fn up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Scroll down by `lines`.
    pub fn down(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.up(self.view_height.saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self) {
        self.down(self.view_height.saturating_sub(1).max(1));
    }

    pub fn top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn bottom(&mut self) {
        self.scroll_offset = self.max_offset();
    }

    /// Whether any of the page rows `start..end` are on screen.
    pub fn shows(&self, start: usize, end: usize) -> bool {
        start < self.scroll_offset + self.view_height && end > self.scroll_offset
    }
}
