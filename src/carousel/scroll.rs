//! Owned handle to the scrollable viewport, with eased programmatic scrolling.

use std::time::{Duration, Instant};

/// Scroll position of one viewport.
///
/// The handle clamps every request to `[0, extent]`. Animated requests ease out
/// over `duration`; a new request retargets from wherever the viewport currently is.
#[derive(Debug, Clone)]
pub struct ScrollHandle {
    position: f64,
    extent: u32,
    duration: Duration,
    animation: Option<Animation>,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: u32,
    started: Instant,
}

impl ScrollHandle {
    pub fn new(extent: u32, duration: Duration) -> Self {
        Self {
            position: 0.0,
            extent,
            duration,
            animation: None,
        }
    }

    /// Current (possibly mid-animation) offset.
    pub fn scroll_offset(&self) -> u32 {
        (self.position.round() as u32).min(self.extent)
    }

    /// Offset the viewport is heading to; equals `scroll_offset` when idle.
    pub fn target(&self) -> u32 {
        match self.animation {
            Some(animation) => animation.to,
            None => self.scroll_offset(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn scroll_to(&mut self, offset: u32, animated: bool) {
        self.scroll_to_at(offset, animated, Instant::now());
    }

    /// Move to `offset` (clamped). An animated move replaces any running one and
    /// starts from the current position.
    pub fn scroll_to_at(&mut self, offset: u32, animated: bool, now: Instant) {
        let to = offset.min(self.extent);
        if !animated || self.duration.is_zero() || to == self.scroll_offset() {
            self.position = f64::from(to);
            self.animation = None;
            return;
        }
        self.animation = Some(Animation {
            from: self.position,
            to,
            started: now,
        });
    }

    /// Advance the animation. Returns `true` while still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(animation.started);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        let to = f64::from(animation.to);
        self.position = animation.from + (to - animation.from) * ease_out_cubic(t);
        if t >= 1.0 {
            self.position = to;
            self.animation = None;
        }
        self.animation.is_some()
    }

    /// Change the scrollable extent, pulling the position and any pending target inside it.
    /// Returns `true` when something had to be clamped.
    pub fn set_extent(&mut self, extent: u32) -> bool {
        self.extent = extent;
        let limit = f64::from(extent);
        let mut clamped = false;
        if self.position > limit {
            self.position = limit;
            clamped = true;
        }
        if let Some(animation) = self.animation.as_mut() {
            if animation.to > extent {
                animation.to = extent;
                clamped = true;
            }
            animation.from = animation.from.min(limit);
        }
        clamped
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
