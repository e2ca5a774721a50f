//! Terminal rendering of a [`Carousel`]: clipped card strip, arrow controls and
//! indicator dots.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Padding, Paragraph, Widget},
};

use super::reveal::reveal_style;
use super::theme::Palette;
use crate::carousel::{Carousel, Direction};

/// Rows below the card strip: one blank row and the dots.
pub const INDICATOR_ROWS: u16 = 2;
/// Columns taken by card borders and padding.
pub const CARD_CHROME: u16 = 4;

const LEFT_ARROW: &str = " ← ";
const RIGHT_ARROW: &str = " → ";
const DOT: &str = "●";

/// Draws `carousel` at its current scroll offset. `render_item` receives the
/// item and the inner card width and returns the card body.
pub struct CarouselView<'a, I, F> {
    carousel: &'a Carousel<I>,
    palette: Palette,
    render_item: F,
    controls_min_width: u16,
    revealed: bool,
}

impl<'a, I, F> CarouselView<'a, I, F>
where
    F: Fn(&I, u16) -> Text<'static>,
{
    pub fn new(carousel: &'a Carousel<I>, palette: Palette, render_item: F) -> Self {
        Self {
            carousel,
            palette,
            render_item,
            controls_min_width: 0,
            revealed: true,
        }
    }

    /// Hide the arrow controls when the area is narrower than `width`.
    pub fn controls_min_width(mut self, width: u16) -> Self {
        self.controls_min_width = width;
        self
    }

    pub fn revealed(mut self, revealed: bool) -> Self {
        self.revealed = revealed;
        self
    }
}

/// Where the left and right controls go inside `area`, or `None` when hidden.
pub fn control_rects(area: Rect, controls_min_width: u16) -> Option<[Rect; 2]> {
    let strip_height = area.height.saturating_sub(INDICATOR_ROWS);
    if area.width < controls_min_width || strip_height == 0 || area.width < 8 {
        return None;
    }
    let y = area.y + strip_height / 2;
    let width = LEFT_ARROW.chars().count() as u16;
    Some([
        Rect::new(area.x, y, width, 1),
        Rect::new(area.right() - width, y, width, 1),
    ])
}

impl<I, F> Widget for CarouselView<'_, I, F>
where
    F: Fn(&I, u16) -> Text<'static>,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let strip_height = area.height.saturating_sub(INDICATOR_ROWS);
        let strip = Rect::new(area.x, area.y, area.width, strip_height);

        let card_style = reveal_style(
            Style::default().fg(self.palette.text).bg(self.palette.card),
            self.revealed,
            &self.palette,
        );

        // Rows of the strip that land inside `buf`.
        let card_rows = strip_height.min(buf.area.bottom().saturating_sub(area.y));
        if card_rows > 0 {
            for slot in self.carousel.visible_slots() {
                let width = u16::try_from(slot.width).unwrap_or(u16::MAX);
                let scratch_area = Rect::new(0, 0, width, card_rows);
                let mut scratch = Buffer::empty(scratch_area);
                let body = (self.render_item)(slot.item, width.saturating_sub(CARD_CHROME));
                Paragraph::new(body)
                    .block(
                        Block::bordered()
                            .border_type(BorderType::Rounded)
                            .padding(Padding::horizontal(1)),
                    )
                    .style(card_style)
                    .render(scratch_area, &mut scratch);
                blit_columns(&scratch, slot.x, strip, buf);
            }
        }

        if let Some([left, right]) = control_rects(area, self.controls_min_width) {
            for (rect, label, direction) in [
                (left, LEFT_ARROW, Direction::Left),
                (right, RIGHT_ARROW, Direction::Right),
            ] {
                let bg = if self.carousel.can_scroll(direction) {
                    self.palette.control
                } else {
                    self.palette.control_inert
                };
                let style = Style::default()
                    .fg(self.palette.text)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD);
                if rect.y < buf.area.bottom() {
                    buf.set_string(rect.x, rect.y, label, style);
                }
            }
        }

        if area.height > 0 {
            let dots = indicator_line(&self.carousel.indicators(), &self.palette);
            let dots_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            if dots_area.intersection(buf.area) == dots_area {
                Paragraph::new(dots)
                    .alignment(Alignment::Center)
                    .render(dots_area, buf);
            }
        }
    }
}

/// Copy the columns of `card` that fall inside `strip` when the card's left edge
/// sits at `x` (relative to the strip).
fn blit_columns(card: &Buffer, x: i64, strip: Rect, buf: &mut Buffer) {
    let card_area = card.area;
    for col in 0..card_area.width {
        let dx = x + i64::from(col);
        if dx < 0 || dx >= i64::from(strip.width) {
            continue;
        }
        let dx = strip.x + dx as u16;
        for row in 0..card_area.height.min(strip.height) {
            if let (Some(src), Some(dst)) =
                (card.cell((col, row)), buf.cell_mut((dx, strip.y + row)))
            {
                *dst = src.clone();
            }
        }
    }
}

fn indicator_line(indicators: &[bool], palette: &Palette) -> Line<'static> {
    let mut spans = Vec::with_capacity(indicators.len() * 2);
    for (i, active) in indicators.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let color = if *active {
            palette.dot_active
        } else {
            palette.dot_inactive
        };
        spans.push(Span::styled(DOT, Style::default().fg(color)));
    }
    Line::from(spans)
}
