//! Page composition. Every section is measured for the current width and drawn
//! into one tall off-screen buffer; the screen (or `print`) shows a slice of it.

use std::ops::Range;
use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Padding, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::carousel_view::{CarouselView, CARD_CHROME, INDICATOR_ROWS};
use super::reveal::{reveal_style, Reveal, SectionId};
use super::theme::Palette;
use crate::carousel::Carousel;
use crate::content::{Employment, Experience, Portfolio};

const MAX_CONTENT_WIDTH: u16 = 110;
const NARROW_CONTENT_WIDTH: u16 = 80;
const SIDE_PADDING: u16 = 2;
const GRID_GAP: u16 = 2;
const HEADING_HEIGHT: u16 = 3;
const SECTION_SPACING: u16 = 1;
/// Experience panel border plus two columns of padding on each side.
const PANEL_CHROME: u16 = 6;
const HERO_TEXT_WIDTH: u16 = 70;
/// Rows past this are cut from the composed page.
pub const MAX_PAGE_ROWS: u16 = 4096;

/// Shared, read-only inputs of one composition pass.
pub struct RenderCtx<'a> {
    pub palette: Palette,
    pub reveal: &'a Reveal,
    pub now: Instant,
    pub controls_min_width: u16,
}

impl RenderCtx<'_> {
    fn style(&self, section: SectionId, child: usize, base: Style) -> Style {
        reveal_style(
            base,
            self.reveal.is_revealed(section, child, self.now),
            &self.palette,
        )
    }
}

/// One vertical block of the page.
trait Section {
    fn id(&self) -> SectionId;
    fn height(&self, width: u16) -> u16;
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// The whole page drawn off-screen.
pub struct ComposedPage {
    pub buffer: Buffer,
    /// Rows occupied by each section.
    pub sections: Vec<(SectionId, Range<u16>)>,
    /// Carousel area in page coordinates.
    pub carousel: Rect,
}

impl ComposedPage {
    pub fn height(&self) -> u16 {
        self.buffer.area.height
    }
}

/// Width available to section content on a page `page_width` columns wide.
pub fn content_width(page_width: u16) -> u16 {
    page_width
        .saturating_sub(2 * SIDE_PADDING)
        .min(MAX_CONTENT_WIDTH)
        .max(1)
}

/// Viewport width the experience carousel gets on a page `page_width` wide.
pub fn carousel_viewport_width(page_width: u16) -> u16 {
    content_width(page_width).saturating_sub(PANEL_CHROME)
}

/// Lay out and draw every section. `hero_min_height` keeps the hero screen-sized.
pub fn compose(
    portfolio: &Portfolio,
    carousel: &Carousel<Experience>,
    width: u16,
    hero_min_height: u16,
    ctx: &RenderCtx<'_>,
) -> ComposedPage {
    let hero = HeroSection {
        portfolio,
        min_height: hero_min_height,
        ctx,
    };
    let skills = SkillsSection { portfolio, ctx };
    let experience = ExperienceSection {
        employment: &portfolio.employment,
        carousel,
        ctx,
    };
    let projects = ProjectsSection { portfolio, ctx };
    let certifications = CertificationsSection { portfolio, ctx };
    let footer = FooterSection { portfolio, ctx };
    let sections: [&dyn Section; 6] = [
        &hero,
        &skills,
        &experience,
        &projects,
        &certifications,
        &footer,
    ];

    let heights: Vec<u16> = sections.iter().map(|s| s.height(width)).collect();
    let total = sum_rows(&heights).min(MAX_PAGE_ROWS);
    let mut buffer = Buffer::empty(Rect::new(0, 0, width, total));
    let page_area = buffer.area;
    buffer.set_style(
        page_area,
        Style::default()
            .fg(ctx.palette.text)
            .bg(ctx.palette.background),
    );

    let mut spans = Vec::with_capacity(sections.len());
    let mut carousel_area = Rect::default();
    let mut y = 0u16;
    for (section, height) in sections.iter().zip(heights) {
        let height = height.min(total - y);
        if height > 0 {
            let area = Rect::new(0, y, width, height);
            section.render(area, &mut buffer);
            if section.id() == SectionId::Experience {
                carousel_area = experience.carousel_rect(area);
            }
        }
        spans.push((section.id(), y..y + height));
        y += height;
    }

    ComposedPage {
        buffer,
        sections: spans,
        carousel: carousel_area,
    }
}

fn content_rect(area: Rect, max_width: u16) -> Rect {
    let width = content_width(area.width).min(max_width).min(area.width);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height,
    )
}

fn wrap(text: &str, width: u16) -> Vec<String> {
    textwrap::wrap(text.trim(), usize::from(width.max(1)))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn len_u16(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

fn sum_rows(parts: &[u16]) -> u16 {
    parts.iter().fold(0u16, |acc, rows| acc.saturating_add(*rows))
}

/// `set_stringn` that drops rows below the buffer.
fn put_str(buf: &mut Buffer, x: u16, y: u16, text: &str, width: u16, style: Style) {
    if y < buf.area.bottom() {
        buf.set_stringn(x, y, text, usize::from(width), style);
    }
}

fn render_centered(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_heading(title: &str, area: Rect, buf: &mut Buffer, ctx: &RenderCtx<'_>, id: SectionId) {
    let style = ctx.style(id, 0, Style::default().add_modifier(Modifier::BOLD));
    let line_area = Rect::new(area.x, area.y + 1, area.width, 1);
    render_centered(vec![Line::styled(title.to_string(), style)], line_area, buf);
}

fn render_card(lines: Vec<Line<'static>>, style: Style, area: Rect, buf: &mut Buffer) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1)),
        )
        .style(style)
        .render(area, buf);
}

/// `(x offset, width)` of each grid column.
fn grid_columns(width: u16, columns: u16) -> Vec<(u16, u16)> {
    let columns = columns.max(1);
    let column = width.saturating_sub(GRID_GAP * (columns - 1)) / columns;
    (0..columns).map(|i| (i * (column + GRID_GAP), column)).collect()
}

fn grid_row_heights(cards: &[Vec<Line<'static>>], columns: usize) -> Vec<u16> {
    cards
        .chunks(columns.max(1))
        .map(|row| {
            row.iter()
                .map(|body| len_u16(body.len()).saturating_add(2))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn grid_height(cards: &[Vec<Line<'static>>], columns: usize) -> u16 {
    let rows = grid_row_heights(cards, columns);
    sum_rows(&rows).saturating_add(len_u16(rows.len().saturating_sub(1)))
}

/// Lay `cards` out row by row, the card for child `i` styled by `style(i)`.
fn render_grid(
    cards: Vec<Vec<Line<'static>>>,
    columns: u16,
    area: Rect,
    buf: &mut Buffer,
    style: impl Fn(usize) -> Style,
) {
    let layout = grid_columns(area.width, columns);
    let rows = grid_row_heights(&cards, usize::from(columns));
    let mut y = area.y;
    let mut cards = cards.into_iter().enumerate();
    for row_height in rows {
        if y >= buf.area.bottom() {
            return;
        }
        for &(x, width) in &layout {
            let Some((index, body)) = cards.next() else {
                return;
            };
            render_card(body, style(index), Rect::new(area.x + x, y, width, row_height), buf);
        }
        y = y.saturating_add(row_height).saturating_add(1);
    }
}

fn breakpoint_columns(width: u16, breakpoints: &[(u16, u16)], widest: u16) -> u16 {
    breakpoints
        .iter()
        .find(|(below, _)| width < *below)
        .map_or(widest, |(_, columns)| *columns)
}

struct HeroSection<'a> {
    portfolio: &'a Portfolio,
    min_height: u16,
    ctx: &'a RenderCtx<'a>,
}

impl HeroSection<'_> {
    fn tagline(&self, width: u16) -> Vec<String> {
        let text = format!(
            "☁️ A {} {}",
            self.portfolio.role.trim(),
            self.portfolio.tagline.trim()
        );
        wrap(&text, width.saturating_sub(4).min(HERO_TEXT_WIDTH))
    }
}

impl Section for HeroSection<'_> {
    fn id(&self) -> SectionId {
        SectionId::Hero
    }

    fn height(&self, width: u16) -> u16 {
        let content = len_u16(self.tagline(width).len()).saturating_add(2);
        self.min_height.max(content.saturating_add(4))
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let ctx = self.ctx;
        let palette = &ctx.palette;
        let tagline = self.tagline(area.width);
        let content = len_u16(tagline.len()).saturating_add(2);
        let top = area.y + area.height.saturating_sub(content) / 2;

        let greeting = Line::from(vec![
            Span::styled("👋 Hi, I'm ", ctx.style(SectionId::Hero, 0, Style::default().add_modifier(Modifier::BOLD))),
            Span::styled(
                self.portfolio.name.clone(),
                ctx.style(
                    SectionId::Hero,
                    0,
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                ),
            ),
        ]);
        render_centered(vec![greeting], Rect::new(area.x, top, area.width, 1), buf);

        let role = self.portfolio.role.trim();
        let plain = ctx.style(SectionId::Hero, 1, Style::default().fg(palette.muted));
        let highlighted = ctx.style(
            SectionId::Hero,
            1,
            Style::default()
                .fg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        );
        let lines: Vec<Line> = tagline
            .into_iter()
            .map(|line| match line.find(role) {
                Some(at) if !role.is_empty() => Line::from(vec![
                    Span::styled(line[..at].to_string(), plain),
                    Span::styled(role.to_string(), highlighted),
                    Span::styled(line[at + role.len()..].to_string(), plain),
                ]),
                _ => Line::styled(line, plain),
            })
            .collect();
        let height = len_u16(lines.len());
        render_centered(lines, Rect::new(area.x, top.saturating_add(2), area.width, height), buf);
    }
}

/// Greedily pack `items` as padded chips into lines no wider than `width`.
fn chip_lines(items: &[String], width: u16, chip: Style) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;
    for item in items {
        let label = format!(" {} ", item.trim());
        let label_width = UnicodeWidthStr::width(label.as_str());
        if used > 0 && used + 1 + label_width > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }
        if used > 0 {
            spans.push(Span::raw(" "));
            used += 1;
        }
        spans.push(Span::styled(label, chip));
        used += label_width;
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

struct SkillsSection<'a> {
    portfolio: &'a Portfolio,
    ctx: &'a RenderCtx<'a>,
}

impl SkillsSection<'_> {
    fn columns(width: u16) -> u16 {
        breakpoint_columns(width, &[(60, 1), (100, 2)], 3)
    }

    fn cards(&self, content: u16) -> Vec<Vec<Line<'static>>> {
        let columns = Self::columns(content);
        let inner = grid_columns(content, columns)[0].1.saturating_sub(CARD_CHROME);
        let palette = &self.ctx.palette;
        self.portfolio
            .skills
            .iter()
            .enumerate()
            .map(|(i, set)| {
                let child = i + 1;
                let mut lines: Vec<Line<'static>> = wrap(&set.category, inner)
                    .into_iter()
                    .map(|l| {
                        Line::styled(
                            l,
                            self.ctx.style(SectionId::Skills, child, Style::default().add_modifier(Modifier::BOLD)),
                        )
                    })
                    .collect();
                lines.push(Line::default());
                let chip = self.ctx.style(
                    SectionId::Skills,
                    child,
                    Style::default().fg(palette.text).bg(palette.card),
                );
                lines.extend(chip_lines(&set.items, inner, chip));
                lines
            })
            .collect()
    }
}

impl Section for SkillsSection<'_> {
    fn id(&self) -> SectionId {
        SectionId::Skills
    }

    fn height(&self, width: u16) -> u16 {
        let content = content_width(width);
        let columns = usize::from(Self::columns(content));
        sum_rows(&[
            HEADING_HEIGHT,
            grid_height(&self.cards(content), columns),
            SECTION_SPACING,
        ])
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let content = content_rect(area, MAX_CONTENT_WIDTH);
        render_heading("Skills & Expertise", content, buf, self.ctx, SectionId::Skills);
        let grid = Rect::new(
            content.x,
            content.y + HEADING_HEIGHT,
            content.width,
            content.height.saturating_sub(HEADING_HEIGHT),
        );
        let surface = Style::default()
            .fg(self.ctx.palette.text)
            .bg(self.ctx.palette.surface);
        render_grid(
            self.cards(content.width),
            Self::columns(content.width),
            grid,
            buf,
            |i| self.ctx.style(SectionId::Skills, i + 1, surface),
        );
    }
}

struct ExperienceSection<'a> {
    employment: &'a Employment,
    carousel: &'a Carousel<Experience>,
    ctx: &'a RenderCtx<'a>,
}

/// Row budget of the experience panel for one inner width.
struct ExperienceRows {
    title: Vec<String>,
    clients: Vec<Vec<Line<'static>>>,
    client_columns: u16,
    clients_height: u16,
    carousel_height: u16,
}

impl ExperienceRows {
    fn clients_block(&self) -> u16 {
        if self.clients.is_empty() {
            0
        } else {
            sum_rows(&[2, self.clients_height, 1])
        }
    }

    fn inner_height(&self) -> u16 {
        sum_rows(&[
            self.carousel_top(),
            self.carousel_height,
            1,
        ])
    }

    /// Rows from the top of the panel interior to the carousel.
    fn carousel_top(&self) -> u16 {
        sum_rows(&[1, len_u16(self.title.len()), 1, self.clients_block(), 2])
    }
}

impl ExperienceSection<'_> {
    fn rows(&self, inner: u16) -> ExperienceRows {
        let client_columns = breakpoint_columns(inner, &[(50, 2), (90, 3)], 4);
        let clients: Vec<Vec<Line<'static>>> = self
            .employment
            .clients
            .iter()
            .map(|client| vec![Line::from(client.clone()).alignment(Alignment::Center)])
            .collect();
        let clients_height = grid_height(&clients, usize::from(client_columns));

        let card_inner = u16::try_from(self.carousel.layout().card_width)
            .unwrap_or(u16::MAX)
            .saturating_sub(CARD_CHROME);
        let card_lines = self
            .carousel
            .items()
            .iter()
            .map(|item| len_u16(wrap(&item.text, card_inner).len()))
            .max()
            .unwrap_or(1);

        ExperienceRows {
            title: wrap(&self.employment.title, inner),
            clients,
            client_columns,
            clients_height,
            carousel_height: card_lines.saturating_add(2 + INDICATOR_ROWS),
        }
    }

    fn panel(&self, area: Rect) -> (Rect, Rect) {
        let content = content_rect(area, MAX_CONTENT_WIDTH);
        let inner_width = content.width.saturating_sub(PANEL_CHROME);
        let rows = self.rows(inner_width);
        let panel = Rect::new(
            content.x,
            content.y + HEADING_HEIGHT,
            content.width,
            rows.inner_height().saturating_add(2),
        );
        let inner = Rect::new(
            panel.x + PANEL_CHROME / 2,
            panel.y + 1,
            inner_width,
            rows.inner_height(),
        );
        (panel, inner)
    }

    /// Where the carousel lands inside this section's `area`.
    fn carousel_rect(&self, area: Rect) -> Rect {
        let (_, inner) = self.panel(area);
        let rows = self.rows(inner.width);
        let y = inner.y.saturating_add(rows.carousel_top());
        Rect::new(inner.x, y, inner.width, rows.carousel_height)
    }
}

impl Section for ExperienceSection<'_> {
    fn id(&self) -> SectionId {
        SectionId::Experience
    }

    fn height(&self, width: u16) -> u16 {
        let inner = content_width(width).saturating_sub(PANEL_CHROME);
        sum_rows(&[
            HEADING_HEIGHT,
            self.rows(inner).inner_height(),
            2,
            SECTION_SPACING,
        ])
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let ctx = self.ctx;
        let palette = &ctx.palette;
        let id = SectionId::Experience;
        let content = content_rect(area, MAX_CONTENT_WIDTH);
        render_heading("Experience", content, buf, ctx, id);

        let (panel, inner) = self.panel(area);
        let panel_style = ctx.style(id, 1, Style::default().fg(palette.text).bg(palette.surface));
        Block::bordered()
            .border_type(BorderType::Rounded)
            .style(panel_style)
            .render(panel, buf);

        let rows = self.rows(inner.width);
        let bold = ctx.style(id, 1, Style::default().add_modifier(Modifier::BOLD));
        let mut y = inner.y.saturating_add(1);
        for line in rows.title.iter().take(usize::from(buf.area.bottom().saturating_sub(y))) {
            put_str(buf, inner.x, y, line, inner.width, bold);
            y += 1;
        }
        y = y.saturating_add(1);

        if !rows.clients.is_empty() {
            put_str(buf, inner.x, y, "Clients Worked With:", inner.width, bold);
            y = y.saturating_add(2);
            let card = Style::default().fg(palette.text).bg(palette.card);
            render_grid(
                rows.clients.clone(),
                rows.client_columns,
                Rect::new(inner.x, y, inner.width, rows.clients_height),
                buf,
                |i| ctx.style(id, 2 + i, card),
            );
            y = y.saturating_add(rows.clients_height).saturating_add(1);
        }

        put_str(buf, inner.x, y, "Combined Experience", inner.width, bold);

        let carousel_area = self.carousel_rect(area);
        let revealed = ctx.reveal.is_revealed(id, 2, ctx.now);
        CarouselView::new(self.carousel, ctx.palette, experience_card)
            .controls_min_width(ctx.controls_min_width)
            .revealed(revealed)
            .render(carousel_area, buf);
    }
}

/// Card body for one experience line.
fn experience_card(item: &Experience, width: u16) -> Text<'static> {
    Text::from(
        wrap(&item.text, width)
            .into_iter()
            .map(Line::from)
            .collect::<Vec<_>>(),
    )
}

struct ProjectsSection<'a> {
    portfolio: &'a Portfolio,
    ctx: &'a RenderCtx<'a>,
}

impl ProjectsSection<'_> {
    fn columns(width: u16) -> u16 {
        breakpoint_columns(width, &[(90, 1), (130, 2)], 3)
    }

    fn cards(&self, content: u16) -> Vec<Vec<Line<'static>>> {
        let columns = Self::columns(content);
        let inner = grid_columns(content, columns)[0].1.saturating_sub(CARD_CHROME);
        let palette = &self.ctx.palette;
        self.portfolio
            .projects
            .iter()
            .enumerate()
            .map(|(i, project)| {
                let child = i + 1;
                let title = self.ctx.style(
                    SectionId::Projects,
                    child,
                    Style::default().add_modifier(Modifier::BOLD),
                );
                let body = self
                    .ctx
                    .style(SectionId::Projects, child, Style::default().fg(palette.muted));
                let mut lines: Vec<Line<'static>> = wrap(&project.title, inner)
                    .into_iter()
                    .map(|l| Line::styled(l, title))
                    .collect();
                lines.push(Line::default());
                lines.extend(
                    wrap(&project.description, inner)
                        .into_iter()
                        .map(|l| Line::styled(l, body)),
                );
                lines
            })
            .collect()
    }
}

impl Section for ProjectsSection<'_> {
    fn id(&self) -> SectionId {
        SectionId::Projects
    }

    fn height(&self, width: u16) -> u16 {
        let content = content_width(width);
        let columns = usize::from(Self::columns(content));
        sum_rows(&[
            HEADING_HEIGHT,
            grid_height(&self.cards(content), columns),
            SECTION_SPACING,
        ])
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let content = content_rect(area, MAX_CONTENT_WIDTH);
        render_heading(
            "Projects & Case Studies",
            content,
            buf,
            self.ctx,
            SectionId::Projects,
        );
        let grid = Rect::new(
            content.x,
            content.y + HEADING_HEIGHT,
            content.width,
            content.height.saturating_sub(HEADING_HEIGHT),
        );
        let surface = Style::default()
            .fg(self.ctx.palette.text)
            .bg(self.ctx.palette.surface);
        render_grid(
            self.cards(content.width),
            Self::columns(content.width),
            grid,
            buf,
            |i| self.ctx.style(SectionId::Projects, i + 1, surface),
        );
    }
}

struct CertificationsSection<'a> {
    portfolio: &'a Portfolio,
    ctx: &'a RenderCtx<'a>,
}

impl CertificationsSection<'_> {
    fn cards(&self, width: u16) -> Vec<Vec<Line<'static>>> {
        let inner = width.saturating_sub(CARD_CHROME);
        let palette = &self.ctx.palette;
        self.portfolio
            .certifications
            .iter()
            .enumerate()
            .map(|(i, cert)| {
                let child = i + 1;
                let mut lines: Vec<Line<'static>> = wrap(&cert.title, inner)
                    .into_iter()
                    .map(|l| {
                        Line::styled(
                            l,
                            self.ctx.style(
                                SectionId::Certifications,
                                child,
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                        )
                    })
                    .collect();
                lines.push(Line::styled(
                    cert.year.clone(),
                    self.ctx.style(
                        SectionId::Certifications,
                        child,
                        Style::default().fg(palette.muted),
                    ),
                ));
                lines
            })
            .collect()
    }
}

impl Section for CertificationsSection<'_> {
    fn id(&self) -> SectionId {
        SectionId::Certifications
    }

    fn height(&self, width: u16) -> u16 {
        let content = content_width(width).min(NARROW_CONTENT_WIDTH);
        sum_rows(&[
            HEADING_HEIGHT,
            grid_height(&self.cards(content), 1),
            SECTION_SPACING,
        ])
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let content = content_rect(area, NARROW_CONTENT_WIDTH);
        render_heading(
            "Certifications",
            content,
            buf,
            self.ctx,
            SectionId::Certifications,
        );
        let list = Rect::new(
            content.x,
            content.y + HEADING_HEIGHT,
            content.width,
            content.height.saturating_sub(HEADING_HEIGHT),
        );
        let surface = Style::default()
            .fg(self.ctx.palette.text)
            .bg(self.ctx.palette.surface);
        render_grid(self.cards(content.width), 1, list, buf, |i| {
            self.ctx.style(SectionId::Certifications, i + 1, surface)
        });
    }
}

struct FooterSection<'a> {
    portfolio: &'a Portfolio,
    ctx: &'a RenderCtx<'a>,
}

impl Section for FooterSection<'_> {
    fn id(&self) -> SectionId {
        SectionId::Footer
    }

    fn height(&self, width: u16) -> u16 {
        len_u16(wrap(&self.portfolio.footer, content_width(width)).len()).saturating_add(2)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let palette = &self.ctx.palette;
        let style = self.ctx.style(
            SectionId::Footer,
            0,
            Style::default().fg(palette.text).bg(palette.surface),
        );
        buf.set_style(area, style);
        let lines: Vec<Line> = wrap(&self.portfolio.footer, content_width(area.width))
            .into_iter()
            .map(Line::from)
            .collect();
        let height = len_u16(lines.len());
        render_centered(lines, Rect::new(area.x, area.y + 1, area.width, height), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{CarouselLayout, ScrollSettings};
    use crate::ui::theme::Theme;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()).to_string())
            .collect()
    }

    fn compose_builtin(width: u16) -> (ComposedPage, Carousel<Experience>) {
        compose_portfolio(&Portfolio::builtin(), width)
    }

    fn compose_portfolio(
        portfolio: &Portfolio,
        width: u16,
    ) -> (ComposedPage, Carousel<Experience>) {
        let mut carousel = Carousel::new(
            portfolio.employment.experience_items(),
            CarouselLayout::new(42, 2, 44),
            ScrollSettings::default(),
        )
        .unwrap();
        let reveal = Reveal::settled();
        let ctx = RenderCtx {
            palette: Theme::Dark.palette(),
            reveal: &reveal,
            now: Instant::now(),
            controls_min_width: 80,
        };
        let page = {
            let mounted = carousel.mount(u32::from(carousel_viewport_width(width)));
            compose(portfolio, &mounted, width, 0, &ctx)
        };
        (page, carousel)
    }

    #[test]
    fn test_oversized_title_is_cut_at_page_limit() {
        let mut portfolio = Portfolio::builtin();
        portfolio.employment.title = "a ".repeat(400_000);
        let (page, _) = compose_portfolio(&portfolio, 20);

        assert_eq!(page.height(), MAX_PAGE_ROWS);
        assert_eq!(page.sections.last().unwrap().1.end, MAX_PAGE_ROWS);
        let experience = &page.sections[2];
        assert_eq!(experience.0, SectionId::Experience);
        assert_eq!(experience.1.end, MAX_PAGE_ROWS);
        // Later sections still get a (zero height) slot.
        assert!(page.sections[3..].iter().all(|(_, rows)| rows.is_empty()));
        let text: Vec<String> = (0..page.height()).map(|y| row(&page.buffer, y)).collect();
        assert!(text.iter().any(|line| line.contains("Experience")));
        assert!(text.last().unwrap().contains('a'));
    }

    #[test]
    fn test_tall_experience_card_stays_inside_buffer() {
        let mut portfolio = Portfolio::builtin();
        portfolio.employment.experiences = vec!["word ".repeat(200_000), "short".into()];
        let (page, _) = compose_portfolio(&portfolio, 60);
        assert_eq!(page.height(), MAX_PAGE_ROWS);
        assert!(page.carousel.y < MAX_PAGE_ROWS);
        assert!(page.carousel.bottom() > MAX_PAGE_ROWS);
    }

    #[test]
    fn test_sections_are_stacked_in_order() {
        let (page, _) = compose_builtin(120);
        let ids: Vec<SectionId> = page.sections.iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::Hero,
                SectionId::Skills,
                SectionId::Experience,
                SectionId::Projects,
                SectionId::Certifications,
                SectionId::Footer,
            ]
        );
        for pair in page.sections.windows(2) {
            assert_eq!(pair[0].1.end, pair[1].1.start);
        }
        assert_eq!(page.sections.last().unwrap().1.end, page.height());
    }

    #[test]
    fn test_carousel_area_matches_viewport_width() {
        for width in [60, 100, 200] {
            let (page, _) = compose_builtin(width);
            assert_eq!(page.carousel.width, carousel_viewport_width(width));
            let experience = &page.sections[2].1;
            assert!(page.carousel.y >= experience.start);
            assert!(page.carousel.bottom() <= experience.end);
        }
    }

    #[test]
    fn test_page_contains_headings_and_dots() {
        let (page, _) = compose_builtin(120);
        let text: Vec<String> = (0..page.height()).map(|y| row(&page.buffer, y)).collect();
        let joined = text.join("\n");
        for heading in [
            "Skills & Expertise",
            "Experience",
            "Combined Experience",
            "Projects & Case Studies",
            "Certifications",
        ] {
            assert!(joined.contains(heading), "missing {heading}");
        }
        let dots_row = &text[usize::from(page.carousel.bottom() - 1)];
        assert_eq!(dots_row.matches('●').count(), 14);
    }

    #[test]
    fn test_controls_follow_breakpoint() {
        let (wide, _) = compose_builtin(120);
        let (narrow, _) = compose_builtin(70);
        let arrow_row = |page: &ComposedPage| {
            let y = page.carousel.y + (page.carousel.height - INDICATOR_ROWS) / 2;
            row(&page.buffer, y)
        };
        assert!(arrow_row(&wide).contains('→'));
        assert!(!arrow_row(&narrow).contains('→'));
    }

    #[test]
    fn test_chip_lines_wrap_at_width() {
        let items: Vec<String> = ["AWS", "GCP", "Prisma Cloud"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let lines = chip_lines(&items, 14, Style::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].width(), " Prisma Cloud ".len());
    }

    #[test]
    fn test_breakpoint_columns() {
        assert_eq!(breakpoint_columns(40, &[(60, 1), (100, 2)], 3), 1);
        assert_eq!(breakpoint_columns(80, &[(60, 1), (100, 2)], 3), 2);
        assert_eq!(breakpoint_columns(140, &[(60, 1), (100, 2)], 3), 3);
    }
}
