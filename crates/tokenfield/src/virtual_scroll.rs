//! Windowed rendering of the option list.
//!
//! The menu never renders more than a slice of the options. A term only feeds
//! the window the option count and scroll events and asks it for the slice to
//! render, so any implementation of [`VirtualScroll`] can stand in.

use std::ops::Range;

/// Interface of the windowing collaborator.
pub trait VirtualScroll: Send {
    /// Set the total number of items.
    fn set_length(&mut self, len: usize);

    /// Total number of items.
    fn length(&self) -> usize;

    /// Items to render, `from..to`.
    fn slice_range(&self) -> Range<usize>;

    /// Number of items that fit in the viewport.
    fn page_size(&self) -> usize;

    /// Scroll just enough to make `index` visible.
    fn scroll_to(&mut self, index: usize);

    /// Scroll back to the top, then to `to_index` if given.
    fn reset(&mut self, to_index: Option<usize>);

    /// The viewport was scrolled to `offset_px`.
    fn on_scroll(&mut self, offset_px: f32);

    /// The viewport was resized.
    fn set_viewport(&mut self, px: f32);

    /// Space before and after the rendered slice, in pixels.
    fn padding(&self) -> (f32, f32);
}

/// Window over items of one fixed height.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSizeWindow {
    len: usize,
    item_size: f32,
    viewport: f32,
    offset: f32,
    overscan: Option<usize>,
}

impl FixedSizeWindow {
    /// Create a window with the given item height and viewport height.
    pub fn new(item_size: f32, viewport: f32) -> Self {
        Self {
            len: 0,
            item_size: item_size.max(1.0),
            viewport: viewport.max(0.0),
            offset: 0.0,
            overscan: None,
        }
    }

    /// Render `overscan` extra items on each side instead of a full page.
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = Some(overscan);
        self
    }

    /// Current scroll offset in pixels.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Item height in pixels.
    pub fn item_size(&self) -> f32 {
        self.item_size
    }

    fn max_offset(&self) -> f32 {
        (self.len as f32 * self.item_size - self.viewport).max(0.0)
    }

    fn set_offset(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.max_offset());
    }

    fn first_visible(&self) -> usize {
        (self.offset / self.item_size).floor() as usize
    }

    fn overscan_items(&self) -> usize {
        self.overscan.unwrap_or_else(|| self.page_size())
    }
}

impl Default for FixedSizeWindow {
    fn default() -> Self {
        Self::new(crate::config::ITEM_SIZE, 240.0)
    }
}

impl VirtualScroll for FixedSizeWindow {
    fn set_length(&mut self, len: usize) {
        self.len = len;
        self.set_offset(self.offset);
    }

    fn length(&self) -> usize {
        self.len
    }

    fn slice_range(&self) -> Range<usize> {
        let first = self.first_visible().min(self.len);
        let overscan = self.overscan_items();
        let from = first.saturating_sub(overscan);
        let to = first
            .saturating_add(self.page_size())
            .saturating_add(overscan)
            .min(self.len);
        from..to
    }

    fn page_size(&self) -> usize {
        ((self.viewport / self.item_size).floor() as usize).max(1)
    }

    fn scroll_to(&mut self, index: usize) {
        if self.len == 0 {
            return;
        }
        let index = index.min(self.len - 1);
        let top = index as f32 * self.item_size;
        let bottom = top + self.item_size;
        if top < self.offset {
            self.set_offset(top);
        } else if bottom > self.offset + self.viewport {
            self.set_offset(bottom - self.viewport);
        }
    }

    fn reset(&mut self, to_index: Option<usize>) {
        self.offset = 0.0;
        if let Some(index) = to_index {
            self.scroll_to(index);
        }
    }

    fn on_scroll(&mut self, offset_px: f32) {
        self.set_offset(offset_px);
    }

    fn set_viewport(&mut self, px: f32) {
        self.viewport = px.max(0.0);
        self.set_offset(self.offset);
    }

    fn padding(&self) -> (f32, f32) {
        let range = self.slice_range();
        (
            range.start as f32 * self.item_size,
            (self.len - range.end) as f32 * self.item_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(len: usize) -> FixedSizeWindow {
        let mut window = FixedSizeWindow::new(24.0, 240.0);
        window.set_length(len);
        window
    }

    #[test]
    fn test_page_size() {
        assert_eq!(window(100).page_size(), 10);
        assert_eq!(FixedSizeWindow::new(48.0, 240.0).page_size(), 5);
        assert_eq!(FixedSizeWindow::new(48.0, 10.0).page_size(), 1);
    }

    #[test]
    fn test_slice_at_top() {
        let w = window(100);
        assert_eq!(w.slice_range(), 0..20);
        assert_eq!(w.padding(), (0.0, 80.0 * 24.0));
    }

    #[test]
    fn test_slice_after_scroll() {
        let mut w = window(100);
        w.on_scroll(24.0 * 50.0);
        assert_eq!(w.slice_range(), 40..70);
        assert_eq!(w.padding().0, 40.0 * 24.0);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut w = window(12);
        w.on_scroll(10_000.0);
        assert_eq!(w.offset(), 2.0 * 24.0);
        w.on_scroll(-5.0);
        assert_eq!(w.offset(), 0.0);
    }

    #[test]
    fn test_scroll_to_reveals_item() {
        let mut w = window(100);
        w.scroll_to(15);
        assert_eq!(w.offset(), 6.0 * 24.0);

        // Already visible: no movement.
        w.scroll_to(10);
        assert_eq!(w.offset(), 6.0 * 24.0);

        w.scroll_to(2);
        assert_eq!(w.offset(), 2.0 * 24.0);
    }

    #[test]
    fn test_reset() {
        let mut w = window(100);
        w.on_scroll(500.0);
        w.reset(None);
        assert_eq!(w.offset(), 0.0);
        w.reset(Some(30));
        assert_eq!(w.offset(), 21.0 * 24.0);
    }

    #[test]
    fn test_shrinking_list_clamps_offset() {
        let mut w = window(100);
        w.on_scroll(2000.0);
        w.set_length(3);
        assert_eq!(w.offset(), 0.0);
        assert_eq!(w.slice_range(), 0..3);
    }

    #[test]
    fn test_empty_window() {
        let mut w = window(0);
        w.scroll_to(5);
        assert_eq!(w.slice_range(), 0..0);
        assert_eq!(w.padding(), (0.0, 0.0));
    }

    #[test]
    fn test_custom_overscan() {
        let mut w = FixedSizeWindow::new(24.0, 240.0).with_overscan(2);
        w.set_length(100);
        w.on_scroll(24.0 * 50.0);
        assert_eq!(w.slice_range(), 48..62);
    }

    #[test]
    fn test_unbounded_viewport_renders_everything() {
        let mut w = window(30);
        w.set_viewport(f32::INFINITY);
        assert_eq!(w.page_size(), usize::MAX);
        assert_eq!(w.slice_range(), 0..30);
        assert_eq!(w.padding(), (0.0, 0.0));
    }
}
