use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDirection, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph},
    Frame, Terminal,
};
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

pub mod carousel_view;
pub mod inputs;
pub mod page;
pub mod reveal;
pub mod theme;
pub mod viewport;

use crate::carousel::{Carousel, CarouselLayout, Direction, ScrollSettings};
use crate::config::Config;
use crate::content::{Experience, Portfolio};
use page::{carousel_viewport_width, compose, RenderCtx};
use reveal::{Reveal, SectionId};
use theme::Theme;

/// Columns a horizontal wheel notch moves the carousel.
const WHEEL_STEP: i64 = 6;
/// Lines a vertical wheel notch moves the page.
const PAGE_WHEEL_LINES: usize = 3;

/// High-level actions emitted by the UI layer and handled by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Left,
    Right,
    ToggleTheme,
    Help,
    Quit,
}

/// Messages sent from the UI loop to the application controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    /// The left-most visible experience card changed.
    ActiveIndexChanged { index: usize },
    ThemeChanged { theme: Theme },
}

/// Everything the page needs that does not come from the content.
#[derive(Debug, Clone)]
pub struct UiOptions {
    pub theme: Theme,
    pub layout: CarouselLayout,
    pub scroll: ScrollSettings,
    pub controls_min_width: u16,
    pub tick_rate: Duration,
    pub frame_rate: Duration,
}

impl From<&Config> for UiOptions {
    fn from(config: &Config) -> Self {
        Self {
            theme: config.theme(),
            layout: config.carousel_layout(),
            scroll: config.scroll_settings(),
            controls_min_width: config.controls_min_width(),
            tick_rate: config.tick_rate(),
            frame_rate: config.frame_rate(),
        }
    }
}

/// Screen positions of the clickable parts of the last frame.
#[derive(Debug, Default, Clone, Copy)]
struct HitMap {
    toggle: Rect,
    carousel: Rect,
    controls: Option<[Rect; 2]>,
}

struct AppState {
    portfolio: Portfolio,
    options: UiOptions,
    theme: Theme,
    page: viewport::PageViewport,
    reveal: Reveal,
    show_help: bool,
    hits: HitMap,
    last_index: Option<usize>,
    tx: UnboundedSender<AppMessage>,
}

impl AppState {
    fn new(portfolio: Portfolio, options: UiOptions, tx: UnboundedSender<AppMessage>) -> Self {
        Self {
            portfolio,
            theme: options.theme,
            options,
            page: viewport::PageViewport::new(),
            reveal: Reveal::new(),
            show_help: false,
            hits: HitMap::default(),
            last_index: None,
            tx,
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        debug!(theme = ?self.theme, "Theme toggled");
        let _ = self.tx.send(AppMessage::ThemeChanged { theme: self.theme });
    }
}

/// Build the experience carousel for `portfolio`.
pub fn build_carousel(portfolio: &Portfolio, options: &UiOptions) -> Result<Carousel<Experience>> {
    Carousel::new(
        portfolio.employment.experience_items(),
        options.layout,
        options.scroll,
    )
    .context("Failed to build the experience carousel")
}

/// Launch the interactive page. Returns when the user quits.
pub async fn run(
    portfolio: Portfolio,
    options: UiOptions,
    tx: UnboundedSender<AppMessage>,
) -> Result<()> {
    // Validate input before touching the terminal.
    let mut carousel = build_carousel(&portfolio, &options)?;

    // 1. Enter alternate screen + raw mode; the guard undoes both on every exit
    enable_raw_mode()?;
    let session = RestoreOnDrop::new(restore_terminal);
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;

    // 2. Setup ratatui terminal
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    // 3. Event loop
    let mut app = AppState::new(portfolio, options, tx);
    let res = run_app(&mut terminal, &mut app, &mut carousel).await;

    // 4. Restore terminal state
    session.finish()?;

    res
}

fn restore_terminal() -> std::io::Result<()> {
    disable_raw_mode()?;
    let mut out = stdout();
    execute!(out, DisableMouseCapture, LeaveAlternateScreen, cursor::Show)
}

/// Runs `restore` exactly once: on [`RestoreOnDrop::finish`], or when dropped
/// by an early return or a panic.
struct RestoreOnDrop<F: FnMut() -> std::io::Result<()>> {
    restore: Option<F>,
}

impl<F: FnMut() -> std::io::Result<()>> RestoreOnDrop<F> {
    fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    fn finish(mut self) -> std::io::Result<()> {
        match self.restore.take() {
            Some(mut restore) => restore(),
            None => Ok(()),
        }
    }
}

impl<F: FnMut() -> std::io::Result<()>> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        if let Some(mut restore) = self.restore.take() {
            if let Err(e) = restore() {
                warn!(error = %e, "Failed to restore terminal");
            }
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    carousel: &mut Carousel<Experience>,
) -> Result<()> {
    let width = terminal.size()?.width;
    let mut carousel = carousel.mount(u32::from(carousel_viewport_width(width)));
    info!("Portfolio view started");

    loop {
        let now = Instant::now();
        let moving = carousel.tick(now);

        // 1. Draw UI
        terminal.draw(|f| draw(f, app, &mut carousel, now))?;

        let index = carousel.active_index();
        if index != app.last_index {
            if let Some(index) = index {
                if app.tx.send(AppMessage::ActiveIndexChanged { index }).is_err() {
                    warn!("Controller channel closed");
                }
            }
            app.last_index = index;
        }

        // 2. Handle input
        let timeout = if moving || carousel.is_moving() || app.reveal.is_pending(now) {
            app.options.frame_rate
        } else {
            app.options.tick_rate
        };
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                let Some(action) = inputs::key_event_to_action(&key) else {
                    continue;
                };
                match action {
                    AppAction::Quit => break,
                    AppAction::Up => app.page.up(1),
                    AppAction::Down => app.page.down(1),
                    AppAction::PageUp => app.page.page_up(),
                    AppAction::PageDown => app.page.page_down(),
                    AppAction::Top => app.page.top(),
                    AppAction::Bottom => app.page.bottom(),
                    AppAction::Left => carousel.scroll_by(Direction::Left),
                    AppAction::Right => carousel.scroll_by(Direction::Right),
                    AppAction::ToggleTheme => app.toggle_theme(),
                    AppAction::Help => app.show_help = !app.show_help,
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, &mut carousel, mouse),
            // The next draw picks up the new size and re-clamps.
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            _ => {}
        }
    }

    info!("Portfolio view closed");
    Ok(())
}

fn handle_mouse(app: &mut AppState, carousel: &mut Carousel<Experience>, mouse: MouseEvent) {
    let position = Position::new(mouse.column, mouse.row);
    let over_carousel = app.hits.carousel.contains(position);
    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.hits.toggle.contains(position) {
                app.toggle_theme();
            } else if let Some([left, right]) = app.hits.controls {
                if left.contains(position) {
                    carousel.scroll_by(Direction::Left);
                } else if right.contains(position) {
                    carousel.scroll_by(Direction::Right);
                }
            }
        }
        MouseEventKind::ScrollLeft if over_carousel => carousel.scroll_free(-WHEEL_STEP),
        MouseEventKind::ScrollRight if over_carousel => carousel.scroll_free(WHEEL_STEP),
        MouseEventKind::ScrollUp if over_carousel && shift => carousel.scroll_free(-WHEEL_STEP),
        MouseEventKind::ScrollDown if over_carousel && shift => carousel.scroll_free(WHEEL_STEP),
        MouseEventKind::ScrollUp => app.page.up(PAGE_WHEEL_LINES),
        MouseEventKind::ScrollDown => app.page.down(PAGE_WHEEL_LINES),
        _ => {}
    }
}

fn draw(f: &mut Frame, app: &mut AppState, carousel: &mut Carousel<Experience>, now: Instant) {
    let size = f.area();
    let palette = app.theme.palette();

    // Split layout: nav bar (1 line), page body (rest -1), footer hints (1 line)
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);
    let body = chunks[1];

    carousel.resize(u32::from(carousel_viewport_width(body.width)));
    app.reveal.observe(SectionId::Hero, now);

    let ctx = RenderCtx {
        palette,
        reveal: &app.reveal,
        now,
        controls_min_width: app.options.controls_min_width,
    };
    let composed = compose(&app.portfolio, carousel, body.width, body.height, &ctx);

    app.page
        .set_bounds(usize::from(composed.height()), usize::from(body.height));
    let offset = app.page.scroll_offset;
    blit_rows(&composed.buffer, offset, body, f.buffer_mut());

    for (id, rows) in &composed.sections {
        if app.page.shows(usize::from(rows.start), usize::from(rows.end)) {
            app.reveal.observe(*id, now);
        }
    }

    let carousel_screen = to_screen(composed.carousel, offset, body);
    app.hits.carousel = carousel_screen;
    app.hits.controls = carousel_view::control_rects(composed.carousel, app.options.controls_min_width)
        .map(|rects| rects.map(|r| to_screen(r, offset, body)))
        .filter(|[left, right]| left.height > 0 && right.height > 0);

    // Nav bar
    let nav = chunks[0];
    f.buffer_mut().set_style(
        nav,
        Style::default().fg(palette.text).bg(palette.background),
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", app.portfolio.initials),
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        nav,
    );
    let glyph = format!(" {} ", app.theme.toggle_glyph());
    let glyph_width = UnicodeWidthStr::width(glyph.as_str()) as u16;
    let toggle = Rect::new(
        nav.right().saturating_sub(glyph_width + 1),
        nav.y,
        glyph_width.min(nav.width),
        1,
    );
    f.buffer_mut().set_string(
        toggle.x,
        toggle.y,
        &glyph,
        Style::default().fg(palette.toggle_fg).bg(palette.toggle_bg),
    );
    app.hits.toggle = toggle;

    // Footer hints
    let footer_text = "↑/↓ scroll  ←/→ experience  t theme  ? help  q quit";
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(palette.muted).bg(palette.background));
    f.render_widget(footer, chunks[2]);

    // Help modal overlay
    if app.show_help {
        let help_text = "Controls:\n\n↑/k ↓/j  scroll page\nPgUp/PgDn  page\nHome/End  top/bottom\n←/h →/l  previous/next experience\nShift+wheel  drag experiences\nt  toggle theme\nq  quit  ? help";
        let area = centered_rect(60, 50, size);
        let block = Block::bordered()
            .title("Help")
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.accent));
        let help = Paragraph::new(help_text)
            .block(block)
            .style(Style::default().fg(palette.text).bg(palette.surface));
        f.render_widget(Clear, area);
        f.render_widget(help, area);
    }
}

/// Copy page rows `offset..` into `area` of the screen buffer.
fn blit_rows(page: &Buffer, offset: usize, area: Rect, screen: &mut Buffer) {
    for row in 0..area.height {
        let Ok(page_y) = u16::try_from(offset + usize::from(row)) else {
            break;
        };
        if page_y >= page.area.height {
            break;
        }
        for col in 0..area.width.min(page.area.width) {
            if let (Some(src), Some(dst)) = (
                page.cell((col, page_y)),
                screen.cell_mut((area.x + col, area.y + row)),
            ) {
                *dst = src.clone();
            }
        }
    }
}

/// Translate a page-space rect to screen space, clipped to `body`.
fn to_screen(rect: Rect, offset: usize, body: Rect) -> Rect {
    let top = i64::from(rect.y) - offset as i64 + i64::from(body.y);
    let bottom = top + i64::from(rect.height);
    let clipped_top = top.max(i64::from(body.y));
    let clipped_bottom = bottom.min(i64::from(body.bottom()));
    if clipped_bottom <= clipped_top {
        return Rect::default();
    }
    Rect::new(
        rect.x + body.x,
        clipped_top as u16,
        rect.width,
        (clipped_bottom - clipped_top) as u16,
    )
}

/// Render the whole page once, as plain text, `width` columns wide.
pub fn render_page_text(portfolio: &Portfolio, options: &UiOptions, width: u16) -> Result<String> {
    let mut carousel = build_carousel(portfolio, options)?;
    let carousel = carousel.mount(u32::from(carousel_viewport_width(width)));
    let reveal = Reveal::settled();
    let ctx = RenderCtx {
        palette: options.theme.palette(),
        reveal: &reveal,
        now: Instant::now(),
        controls_min_width: options.controls_min_width,
    };
    let composed = compose(portfolio, &carousel, width, 0, &ctx);
    Ok(buffer_to_text(&composed.buffer))
}

/// Plain-text rows of `buf`, trailing blanks trimmed. Cells hidden behind a wide
/// grapheme are skipped.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        let mut skip = 0usize;
        for x in 0..buf.area.width {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = buf.cell((x, y)).map_or(" ", |c| c.symbol());
            skip = UnicodeWidthStr::width(symbol).saturating_sub(1);
            line.push_str(symbol);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Helper to create a centered rect with given percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn options() -> UiOptions {
        UiOptions::from(&Config::default())
    }

    fn test_app() -> (AppState, mpsc::UnboundedReceiver<AppMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppState::new(Portfolio::builtin(), options(), tx), rx)
    }

    #[test]
    fn test_to_screen_clips_to_body() {
        let body = Rect::new(0, 1, 80, 20);
        assert_eq!(
            to_screen(Rect::new(2, 30, 10, 5), 25, body),
            Rect::new(2, 6, 10, 5)
        );
        assert_eq!(
            to_screen(Rect::new(2, 10, 10, 5), 12, body),
            Rect::new(2, 1, 10, 3)
        );
        assert_eq!(to_screen(Rect::new(2, 100, 10, 5), 0, body), Rect::default());
    }

    #[test]
    fn test_buffer_to_text_skips_wide_tails() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        buf.set_string(0, 0, "👋 hi", Style::default());
        assert_eq!(buffer_to_text(&buf), "👋 hi\n");
    }

    #[test]
    fn test_render_page_text_contains_sections() {
        let text = render_page_text(&Portfolio::builtin(), &options(), 100).unwrap();
        assert!(text.contains("Prathamesh Jadhav"));
        assert!(text.contains("Combined Experience"));
        assert!(text.contains("Kotak Security"));
        assert!(text.contains("© 2025 Prathamesh Jadhav. All rights reserved."));
        assert_eq!(text.matches('●').count(), 14);
    }

    #[test]
    fn test_draw_scrolls_carousel_and_updates_hits() {
        let (mut app, _rx) = test_app();
        let mut carousel = build_carousel(&app.portfolio, &app.options).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut mounted = carousel.mount(u32::from(carousel_viewport_width(120)));

        let now = Instant::now();
        terminal
            .draw(|f| draw(f, &mut app, &mut mounted, now))
            .unwrap();
        assert_eq!(app.hits.toggle.y, 0);
        // Carousel starts below the first screen.
        assert_eq!(app.hits.carousel, Rect::default());

        app.page.bottom();
        terminal
            .draw(|f| draw(f, &mut app, &mut mounted, now))
            .unwrap();
        app.page.scroll_offset = 0;
        // Bring the carousel on screen, then click its right control.
        while app.hits.controls.is_none() && app.page.scroll_offset < app.page.max_offset() {
            app.page.down(5);
            terminal
                .draw(|f| draw(f, &mut app, &mut mounted, now))
                .unwrap();
        }
        let [_, right] = app.hits.controls.expect("controls on screen");
        handle_mouse(
            &mut app,
            &mut mounted,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: right.x,
                row: right.y,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(mounted.target_offset(), 44);
    }

    #[test]
    fn test_toggle_theme_notifies_controller() {
        let (mut app, mut rx) = test_app();
        app.toggle_theme();
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(
            rx.try_recv().unwrap(),
            AppMessage::ThemeChanged {
                theme: Theme::Light
            }
        );
    }

    #[test]
    fn test_resize_reclamps_mounted_carousel() {
        let (mut app, _rx) = test_app();
        let mut carousel = build_carousel(&app.portfolio, &app.options).unwrap();
        let mut mounted = carousel.mount(u32::from(carousel_viewport_width(60)));
        for _ in 0..20 {
            mounted.scroll_by(Direction::Right);
        }
        let wide_max = mounted.max_offset();
        assert_eq!(mounted.target_offset(), wide_max);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| draw(f, &mut app, &mut mounted, Instant::now()))
            .unwrap();
        assert!(mounted.max_offset() < wide_max);
        assert!(mounted.target_offset() <= mounted.max_offset());
    }

    #[test]
    fn test_terminal_restored_once_on_finish() {
        let calls = std::cell::Cell::new(0);
        let session = RestoreOnDrop::new(|| {
            calls.set(calls.get() + 1);
            Ok(())
        });
        session.finish().unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_terminal_restored_on_early_error() {
        let calls = std::cell::Cell::new(0);
        let setup = || -> std::io::Result<()> {
            let _session = RestoreOnDrop::new(|| {
                calls.set(calls.get() + 1);
                Ok(())
            });
            Err(std::io::Error::other("alternate screen unavailable"))
        };
        assert!(setup().is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_terminal_restored_on_panic() {
        let calls = std::cell::Cell::new(0);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _session = RestoreOnDrop::new(|| {
                calls.set(calls.get() + 1);
                Ok(())
            });
            panic!("event loop failed");
        }));
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
