//! Slot arithmetic for a horizontal strip of equally sized cards.

use std::ops::Range;

/// Fixed geometry of a carousel strip, in abstract units (terminal columns in the UI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselLayout {
    /// Width of a single card slot.
    pub card_width: u32,
    /// Space between two neighbouring slots.
    pub gap: u32,
    /// Distance travelled by one navigation nudge.
    pub nudge: u32,
}

impl CarouselLayout {
    pub fn new(card_width: u32, gap: u32, nudge: u32) -> Self {
        Self {
            card_width,
            gap,
            nudge,
        }
    }

    /// Distance from the start of one slot to the start of the next.
    pub fn stride(&self) -> u32 {
        self.card_width.saturating_add(self.gap)
    }

    /// Left edge of slot `index`.
    pub fn slot_start(&self, index: usize) -> u32 {
        to_u32(index).saturating_mul(self.stride())
    }

    /// Total width of `count` slots including the gaps between them.
    pub fn content_width(&self, count: usize) -> u32 {
        if count == 0 {
            return 0;
        }
        self.slot_start(count - 1).saturating_add(self.card_width)
    }

    /// Upper clamp bound for the scroll offset.
    pub fn max_offset(&self, count: usize, viewport_width: u32) -> u32 {
        self.content_width(count).saturating_sub(viewport_width)
    }

    /// Index of the left-most slot that is at least partially visible at `offset`.
    ///
    /// An offset landing in the gap after slot `i` makes slot `i + 1` the left-most
    /// visible one. Returns `None` for an empty strip.
    pub fn leftmost_visible(&self, count: usize, offset: u32) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let stride = self.stride().max(1);
        let mut index = (offset / stride) as usize;
        if offset % stride >= self.card_width {
            index += 1;
        }
        Some(index.min(count - 1))
    }

    /// Slot boundary closest to `offset`, clamped to `max_offset`.
    pub fn nearest_slot(&self, count: usize, offset: u32, max_offset: u32) -> u32 {
        if count == 0 {
            return 0;
        }
        let stride = self.stride().max(1);
        let index = ((offset.saturating_add(stride / 2)) / stride) as usize;
        self.slot_start(index.min(count - 1)).min(max_offset)
    }

    /// Slots intersecting the window `[offset, offset + viewport_width)`.
    pub fn visible_range(&self, count: usize, offset: u32, viewport_width: u32) -> Range<usize> {
        let Some(first) = self.leftmost_visible(count, offset) else {
            return 0..0;
        };
        let right = offset.saturating_add(viewport_width);
        let mut end = first;
        while end < count && self.slot_start(end) < right {
            end += 1;
        }
        first..end.max(first)
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
