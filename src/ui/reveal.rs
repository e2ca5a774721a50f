//! One-shot entrance effects: a section fades in the first time it scrolls into
//! view, its children following one after another.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ratatui::style::{Modifier, Style};

use super::theme::Palette;

const DELAY_CHILDREN: Duration = Duration::from_millis(300);
const STAGGER_CHILDREN: Duration = Duration::from_millis(200);
/// Children beyond this share the last slot's reveal time.
const MAX_STAGGERED: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Hero,
    Skills,
    Experience,
    Projects,
    Certifications,
    Footer,
}

#[derive(Debug)]
pub struct Reveal {
    enabled: bool,
    seen: HashMap<SectionId, Instant>,
}

impl Reveal {
    pub fn new() -> Self {
        Self {
            enabled: true,
            seen: HashMap::new(),
        }
    }

    /// Everything shown from the start (non-interactive output).
    pub fn settled() -> Self {
        Self {
            enabled: false,
            seen: HashMap::new(),
        }
    }

    /// Note that `section` is on screen. Only the first sighting counts.
    pub fn observe(&mut self, section: SectionId, now: Instant) {
        if self.enabled {
            self.seen.entry(section).or_insert(now);
        }
    }

    pub fn is_revealed(&self, section: SectionId, child: usize, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }
        match self.seen.get(&section) {
            Some(start) => now >= *start + reveal_delay(child),
            None => false,
        }
    }

    /// Whether some observed section is still fading in.
    pub fn is_pending(&self, now: Instant) -> bool {
        self.enabled
            && self
                .seen
                .values()
                .any(|start| now < *start + reveal_delay(MAX_STAGGERED as usize))
    }
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new()
    }
}

fn reveal_delay(child: usize) -> Duration {
    let slot = u32::try_from(child).unwrap_or(MAX_STAGGERED).min(MAX_STAGGERED);
    DELAY_CHILDREN + STAGGER_CHILDREN * slot
}

/// `base` when revealed, otherwise a dimmed variant.
pub fn reveal_style(base: Style, revealed: bool, palette: &Palette) -> Style {
    if revealed {
        base
    } else {
        base.fg(palette.control_inert).add_modifier(Modifier::DIM)
    }
}
