//! Horizontally scrolling, snap-aligned card strip with nudge navigation and a
//! position indicator.
//!
//! The scroll offset held by the mounted [`ScrollHandle`] is the only state the
//! carousel keeps about position; the active indicator is recomputed from it on
//! every query.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

pub mod geometry;
pub mod scroll;

pub use geometry::CarouselLayout;
pub use scroll::ScrollHandle;

/// Errors raised while building a carousel.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CarouselError {
    /// The item sequence or layout cannot be rendered
    #[error("Invalid carousel input: {0}")]
    InvalidInput(String),
}

/// Items carry a stable identity used as their render key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Navigation direction of a nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// How programmatic and free scrolling behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSettings {
    /// Ease nudges instead of jumping.
    pub smooth: bool,
    /// Length of an eased scroll.
    pub duration: Duration,
    /// Settle free scrolling on slot boundaries.
    pub snap: bool,
    /// Quiet period after free scrolling before the snap kicks in.
    pub snap_idle: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            smooth: true,
            duration: Duration::from_millis(300),
            snap: true,
            snap_idle: Duration::from_millis(120),
        }
    }
}

/// A visible card and where it sits relative to the viewport's left edge.
#[derive(Debug, Clone, Copy)]
pub struct VisibleSlot<'a, I> {
    pub index: usize,
    pub item: &'a I,
    /// Left edge relative to the viewport; negative when clipped on the left.
    pub x: i64,
    pub width: u32,
}

#[derive(Debug)]
pub struct Carousel<I> {
    items: Vec<I>,
    layout: CarouselLayout,
    settings: ScrollSettings,
    viewport_width: u32,
    handle: Option<ScrollHandle>,
    unsettled_since: Option<Instant>,
}

impl<I: Keyed> Carousel<I> {
    /// Build a carousel over `items`. Rejects a zero card width and duplicate keys.
    pub fn new(
        items: Vec<I>,
        layout: CarouselLayout,
        settings: ScrollSettings,
    ) -> Result<Self, CarouselError> {
        if layout.card_width == 0 {
            return Err(CarouselError::InvalidInput(
                "card width must be greater than zero".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.key()) {
                return Err(CarouselError::InvalidInput(format!(
                    "duplicate item key '{}'",
                    item.key()
                )));
            }
        }
        Ok(Self {
            items,
            layout,
            settings,
            viewport_width: 0,
            handle: None,
            unsettled_since: None,
        })
    }
}

impl<I> Carousel<I> {
    /// Attach a scroll handle sized for `viewport_width`. The returned guard
    /// releases the handle when dropped.
    pub fn mount(&mut self, viewport_width: u32) -> Mounted<'_, I> {
        self.viewport_width = viewport_width;
        let extent = self.max_offset();
        self.handle = Some(ScrollHandle::new(extent, self.settings.duration));
        self.unsettled_since = None;
        debug!(items = self.items.len(), viewport_width, extent, "carousel mounted");
        Mounted { carousel: self }
    }

    fn unmount(&mut self) {
        if self.handle.take().is_some() {
            debug!("carousel unmounted");
        }
        self.unsettled_since = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn layout(&self) -> CarouselLayout {
        self.layout
    }

    pub fn max_offset(&self) -> u32 {
        self.layout.max_offset(self.items.len(), self.viewport_width)
    }

    /// Current scroll offset; 0 while detached.
    pub fn scroll_offset(&self) -> u32 {
        self.handle.as_ref().map_or(0, ScrollHandle::scroll_offset)
    }

    /// Offset the viewport is heading to.
    pub fn target_offset(&self) -> u32 {
        self.handle.as_ref().map_or(0, ScrollHandle::target)
    }

    /// Index of the left-most visible item, derived from the live offset.
    pub fn active_index(&self) -> Option<usize> {
        self.layout
            .leftmost_visible(self.items.len(), self.scroll_offset())
    }

    /// One flag per item, `true` for the active indicator dot.
    pub fn indicators(&self) -> Vec<bool> {
        let active = self.active_index();
        (0..self.items.len()).map(|i| Some(i) == active).collect()
    }

    /// Whether a nudge in `direction` would move the viewport.
    pub fn can_scroll(&self, direction: Direction) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let target = self.target_offset();
        match direction {
            Direction::Left => target > 0,
            Direction::Right => target < self.max_offset(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.unsettled_since.is_some() || self.handle.as_ref().is_some_and(ScrollHandle::is_animating)
    }

    /// Nudge by the layout's fixed increment. Ignored while detached.
    pub fn scroll_by(&mut self, direction: Direction) {
        self.scroll_by_at(direction, Instant::now());
    }

    pub fn scroll_by_at(&mut self, direction: Direction, now: Instant) {
        let max = self.max_offset();
        let nudge = self.layout.nudge;
        let smooth = self.settings.smooth;
        let Some(handle) = self.handle.as_mut() else {
            debug!(?direction, "nudge ignored: carousel viewport not attached");
            return;
        };
        let base = handle.target();
        let target = match direction {
            Direction::Left => base.saturating_sub(nudge),
            Direction::Right => base.saturating_add(nudge).min(max),
        };
        debug!(?direction, from = base, to = target, "carousel nudge");
        self.unsettled_since = None;
        handle.scroll_to_at(target, smooth, now);
    }

    /// Move immediately by `delta` (wheel or drag) and schedule a snap.
    pub fn scroll_free(&mut self, delta: i64) {
        self.scroll_free_at(delta, Instant::now());
    }

    pub fn scroll_free_at(&mut self, delta: i64, now: Instant) {
        let max = i64::from(self.max_offset());
        let Some(handle) = self.handle.as_mut() else {
            debug!(delta, "free scroll ignored: carousel viewport not attached");
            return;
        };
        let target = (i64::from(handle.scroll_offset()) + delta).clamp(0, max);
        handle.scroll_to(target as u32, false);
        self.unsettled_since = Some(now);
    }

    /// Adopt a new viewport width and re-clamp the offset to the new bound.
    pub fn resize(&mut self, viewport_width: u32) {
        if viewport_width == self.viewport_width {
            return;
        }
        self.viewport_width = viewport_width;
        let max = self.max_offset();
        if let Some(handle) = self.handle.as_mut() {
            if handle.set_extent(max) {
                debug!(viewport_width, max_offset = max, "carousel offset re-clamped after resize");
            }
        }
    }

    /// Advance the eased scroll and the pending snap. Returns `true` while moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let count = self.items.len();
        let max = self.max_offset();
        let layout = self.layout;
        let settings = self.settings;
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        let mut moving = handle.tick(now);

        if let Some(since) = self.unsettled_since {
            if !settings.snap {
                self.unsettled_since = None;
            } else if now.saturating_duration_since(since) >= settings.snap_idle {
                self.unsettled_since = None;
                let current = handle.scroll_offset();
                let snapped = layout.nearest_slot(count, current, max);
                if snapped != current {
                    debug!(from = current, to = snapped, "carousel snapped to slot");
                    handle.scroll_to_at(snapped, settings.smooth, now);
                    moving = handle.is_animating();
                }
            } else {
                moving = true;
            }
        }
        moving
    }

    /// Cards intersecting the viewport, left to right.
    pub fn visible_slots(&self) -> Vec<VisibleSlot<'_, I>> {
        let offset = self.scroll_offset();
        self.layout
            .visible_range(self.items.len(), offset, self.viewport_width)
            .map(|index| VisibleSlot {
                index,
                item: &self.items[index],
                x: i64::from(self.layout.slot_start(index)) - i64::from(offset),
                width: self.layout.card_width,
            })
            .collect()
    }
}

/// A carousel with its viewport attached. Dropping the guard detaches it.
#[derive(Debug)]
pub struct Mounted<'a, I> {
    carousel: &'a mut Carousel<I>,
}

impl<I> Deref for Mounted<'_, I> {
    type Target = Carousel<I>;

    fn deref(&self) -> &Self::Target {
        self.carousel
    }
}

impl<I> DerefMut for Mounted<'_, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.carousel
    }
}

impl<I> Drop for Mounted<'_, I> {
    fn drop(&mut self) {
        self.carousel.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Card(String);

    impl Keyed for Card {
        fn key(&self) -> &str {
            &self.0
        }
    }

    fn cards(n: usize) -> Vec<Card> {
        (0..n).map(|i| Card(format!("card-{i}"))).collect()
    }

    fn instant() -> ScrollSettings {
        ScrollSettings {
            smooth: false,
            ..ScrollSettings::default()
        }
    }

    fn carousel(n: usize, width: u32, nudge: u32) -> Carousel<Card> {
        Carousel::new(cards(n), CarouselLayout::new(width, 0, nudge), instant()).unwrap()
    }

    #[test]
    fn test_rejects_zero_card_width() {
        let err = Carousel::new(cards(3), CarouselLayout::new(0, 0, 10), instant()).unwrap_err();
        assert!(matches!(err, CarouselError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let items = vec![Card("a".into()), Card("b".into()), Card("a".into())];
        let err = Carousel::new(items, CarouselLayout::new(10, 0, 10), instant()).unwrap_err();
        assert_eq!(
            err,
            CarouselError::InvalidInput("duplicate item key 'a'".to_string())
        );
    }

    #[test]
    fn test_nudge_sequence_scenario_clamps_at_max_offset() {
        let mut carousel = carousel(14, 420, 500);
        let mut mounted = carousel.mount(1000);
        assert_eq!(mounted.max_offset(), 4880);
        for _ in 0..9 {
            mounted.scroll_by(Direction::Right);
        }
        assert_eq!(mounted.scroll_offset(), 4500);
        mounted.scroll_by(Direction::Right);
        assert_eq!(mounted.scroll_offset(), 4880);
    }

    #[test]
    fn test_any_nudge_sequence_stays_in_bounds() {
        let mut carousel = carousel(7, 30, 45);
        let mut mounted = carousel.mount(100);
        let max = mounted.max_offset();
        // Deterministic pseudo-random walk over both directions.
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let direction = if seed % 3 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            mounted.scroll_by(direction);
            assert!(mounted.scroll_offset() <= max);
        }
    }

    #[test]
    fn test_nudges_are_monotonic_until_clamped() {
        let mut carousel = carousel(10, 50, 40);
        let mut mounted = carousel.mount(120);
        let max = mounted.max_offset();
        loop {
            let before = mounted.scroll_offset();
            mounted.scroll_by(Direction::Right);
            let after = mounted.scroll_offset();
            if before == max {
                assert_eq!(after, max);
                break;
            }
            assert!(after > before);
        }
        loop {
            let before = mounted.scroll_offset();
            mounted.scroll_by(Direction::Left);
            let after = mounted.scroll_offset();
            if before == 0 {
                assert_eq!(after, 0);
                break;
            }
            assert!(after < before);
        }
    }

    #[test]
    fn test_empty_carousel_has_no_dots_and_ignores_nudges() {
        let mut carousel = carousel(0, 40, 50);
        let mut mounted = carousel.mount(100);
        assert!(mounted.indicators().is_empty());
        assert!(mounted.visible_slots().is_empty());
        assert_eq!(mounted.active_index(), None);
        mounted.scroll_by(Direction::Right);
        mounted.scroll_by(Direction::Left);
        assert_eq!(mounted.scroll_offset(), 0);
    }

    #[test]
    fn test_single_item_is_stable() {
        let mut carousel = carousel(1, 420, 500);
        let mut mounted = carousel.mount(1000);
        let before = mounted.scroll_offset();
        mounted.scroll_by(Direction::Right);
        assert_eq!(mounted.indicators(), vec![true]);
        mounted.scroll_by(Direction::Left);
        assert_eq!(mounted.scroll_offset(), before);
        assert_eq!(mounted.indicators(), vec![true]);
    }

    #[test]
    fn test_indicator_follows_offset() {
        let mut carousel = carousel(14, 420, 500);
        let mut mounted = carousel.mount(1000);
        for k in 0..=11u32 {
            let current = i64::from(mounted.scroll_offset());
            mounted.scroll_free(i64::from(k * 420) - current);
            assert_eq!(mounted.active_index(), Some(k as usize));
            let dots = mounted.indicators();
            assert_eq!(dots.iter().filter(|d| **d).count(), 1);
            assert!(dots[k as usize]);
        }
    }

    #[test]
    fn test_detached_nudge_is_noop() {
        let mut carousel = carousel(5, 40, 50);
        carousel.scroll_by(Direction::Right);
        carousel.scroll_free(30);
        assert_eq!(carousel.scroll_offset(), 0);
        assert!(!carousel.is_mounted());
        assert!(!carousel.tick(Instant::now()));
    }

    #[test]
    fn test_guard_drop_releases_handle() {
        let mut carousel = carousel(5, 40, 50);
        {
            let mut mounted = carousel.mount(60);
            mounted.scroll_by(Direction::Right);
            assert!(mounted.is_mounted());
            assert!(mounted.can_scroll(Direction::Right));
        }
        assert!(!carousel.is_mounted());
        assert_eq!(carousel.scroll_offset(), 0);
        // Nudges are ignored while detached, so neither control is live.
        assert!(!carousel.can_scroll(Direction::Right));
        assert!(!carousel.can_scroll(Direction::Left));
    }

    #[test]
    fn test_resize_reclamps_offset() {
        let mut carousel = carousel(14, 420, 500);
        let mut mounted = carousel.mount(1000);
        for _ in 0..10 {
            mounted.scroll_by(Direction::Right);
        }
        assert_eq!(mounted.scroll_offset(), 4880);
        mounted.resize(1500);
        assert_eq!(mounted.max_offset(), 4380);
        assert_eq!(mounted.scroll_offset(), 4380);
        mounted.resize(6000);
        assert_eq!(mounted.scroll_offset(), 0);
    }

    #[test]
    fn test_smooth_nudges_accumulate_on_pending_target() {
        let mut carousel = Carousel::new(
            cards(14),
            CarouselLayout::new(420, 0, 500),
            ScrollSettings::default(),
        )
        .unwrap();
        let mut mounted = carousel.mount(1000);
        let start = Instant::now();
        mounted.scroll_by_at(Direction::Right, start);
        mounted.scroll_by_at(Direction::Right, start + Duration::from_millis(10));
        assert_eq!(mounted.target_offset(), 1000);
        assert!(mounted.scroll_offset() < 1000);
        assert!(mounted.tick(start + Duration::from_millis(100)));
        assert!(!mounted.tick(start + Duration::from_secs(1)));
        assert_eq!(mounted.scroll_offset(), 1000);
        assert_eq!(mounted.active_index(), Some(2));
    }

    #[test]
    fn test_free_scroll_snaps_after_idle() {
        let mut carousel = Carousel::new(
            cards(6),
            CarouselLayout::new(20, 2, 22),
            instant(),
        )
        .unwrap();
        let mut mounted = carousel.mount(50);
        let start = Instant::now();
        mounted.scroll_free_at(15, start);
        assert_eq!(mounted.scroll_offset(), 15);
        assert!(mounted.tick(start + Duration::from_millis(50)));
        assert_eq!(mounted.scroll_offset(), 15);
        mounted.tick(start + Duration::from_millis(200));
        assert_eq!(mounted.scroll_offset(), 22);
        assert!(!mounted.is_moving());
    }

    #[test]
    fn test_visible_slots_clip_on_both_sides() {
        let mut carousel = carousel(4, 10, 5);
        let mut mounted = carousel.mount(15);
        mounted.scroll_free(5);
        let slots = mounted.visible_slots();
        let xs: Vec<(usize, i64)> = slots.iter().map(|s| (s.index, s.x)).collect();
        assert_eq!(xs, vec![(0, -5), (1, 5)]);
    }
}
