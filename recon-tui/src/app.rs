//! The dashboard: page tabs, the current page's table and a status line.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use recon_table::{Buffer, Color, DefaultTheme, Key, KeyCombo, Paint, Rect, Row, TextStyle, Theme};

use crate::error::Result;
use crate::pages::{Page, STYLE_HINTS};
use crate::summary::Stat;
use crate::terminal::Terminal;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TAB_SEPARATOR: &str = " │ ";
const STAT_SEPARATOR: &str = "  ";

/// Local date stamped on saved records.
fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Theme with the dashboard's badge colours and exception hints.
pub fn dashboard_theme() -> DefaultTheme {
    let theme = DefaultTheme::new()
        .with("success", Color::oklch(0.72, 0.17, 150.0))
        .with("warning", Color::oklch(0.80, 0.16, 85.0))
        .with("error", Color::oklch(0.63, 0.21, 25.0))
        .with("info", Color::oklch(0.70, 0.13, 235.0))
        .with("code", Color::oklch(0.82, 0.06, 200.0));
    STYLE_HINTS
        .iter()
        .fold(theme, |theme, (name, color)| theme.with(*name, *color))
}

/// The row most recently clicked or activated with Enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clicked {
    pub page: String,
    pub id: String,
    pub children: usize,
}

pub struct App {
    pages: Vec<Page>,
    current: usize,
    theme: DefaultTheme,
    clicked: Rc<RefCell<Option<Clicked>>>,
    /// x ranges of the page tabs from the last draw.
    tabs: Vec<(u16, u16)>,
    quit: bool,
}

impl App {
    pub fn new(mut pages: Vec<Page>, theme: DefaultTheme) -> Self {
        let clicked = Rc::new(RefCell::new(None));
        for page in &mut pages {
            let sink = Rc::clone(&clicked);
            let title = page.title.clone();
            page.table.on_row_click(move |row: &Row| {
                log::info!("{}: row {} selected", title, row.id);
                *sink.borrow_mut() = Some(Clicked {
                    page: title.clone(),
                    id: row.id.clone(),
                    children: row.children.len(),
                });
            });
        }
        Self {
            pages,
            current: 0,
            theme,
            clicked,
            tabs: Vec::new(),
            quit: false,
        }
    }

    /// Switch to the page titled `title` (case-insensitive).
    pub fn open(&mut self, title: &str) -> bool {
        match self
            .pages
            .iter()
            .position(|page| page.title.eq_ignore_ascii_case(title))
        {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&Page> {
        self.pages.get(self.current)
    }

    fn current_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current)
    }

    pub fn last_clicked(&self) -> Option<Clicked> {
        self.clicked.borrow().clone()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        log::info!("dashboard started with {} pages", self.pages.len());
        while !self.should_quit() {
            terminal.draw(|buf| self.draw(buf))?;
            for event in terminal.poll(POLL_INTERVAL)? {
                self.handle_event(event)?;
            }
        }
        log::info!("dashboard closed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let combo = KeyCombo::from(key);
        let ctrl = combo.modifiers.ctrl;
        let editing = self.current().is_some_and(|page| page.form().is_some());
        match combo.key {
            Key::Char('q') | Key::Char('c') if ctrl => self.quit = true,
            _ if editing => {
                if let Some(page) = self.current_mut() {
                    page.on_form_key(&combo, &today())?;
                }
            }
            Key::Char('f') if ctrl => {
                if let Some(page) = self.current_mut() {
                    page.cycle_fund()?;
                }
            }
            Key::Char('g') if ctrl => {
                if let Some(page) = self.current_mut() {
                    page.cycle_pivot();
                }
            }
            Key::Char('n') if ctrl => {
                if let Some(page) = self.current_mut() {
                    page.begin_add();
                }
            }
            Key::Char('e') if ctrl => {
                if let Some(page) = self.current_mut()
                    && let Some(id) = page.table.cursor_id().map(str::to_string)
                {
                    page.begin_edit(&id);
                }
            }
            Key::Tab if !ctrl => self.select_page(self.current + 1),
            Key::BackTab => self.select_page(self.current + self.pages.len().saturating_sub(1)),
            _ => {
                if let Some(page) = self.current_mut() {
                    page.table.on_key(&combo);
                }
            }
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        if self.current().is_some_and(|page| page.form().is_some()) {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if y == 0 {
                    if let Some(index) = self.tabs.iter().position(|&(start, end)| x >= start && x < end) {
                        self.select_page(index);
                    }
                } else if let Some(page) = self.current_mut() {
                    match page.action_at(x, y) {
                        Some(id) => {
                            page.begin_edit(&id);
                        }
                        None => {
                            page.table.on_click(x, y);
                        }
                    }
                }
            }
            MouseEventKind::ScrollDown => {
                if let Some(page) = self.current_mut() {
                    page.table.move_cursor(1);
                }
            }
            MouseEventKind::ScrollUp => {
                if let Some(page) = self.current_mut() {
                    page.table.move_cursor(-1);
                }
            }
            _ => {}
        }
    }

    fn select_page(&mut self, index: usize) {
        if self.pages.is_empty() {
            return;
        }
        self.current = index % self.pages.len();
        log::debug!("page {}", self.pages[self.current].title);
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    pub fn draw(&mut self, buf: &mut Buffer) {
        let area = buf.area();
        let background = self.theme.background.to_rgb();
        let base = Paint::new(self.theme.foreground.to_rgb(), background);
        buf.fill(area, base);
        if area.height < 3 {
            return;
        }

        self.draw_tabs(buf, Rect::new(area.x, area.y, area.width, 1));

        let mut top = area.y + 1;
        let strip = self.summary_lines();
        for line in strip.iter().take(area.height.saturating_sub(3) as usize) {
            self.draw_stats(buf, Rect::new(area.x, top, area.width, 1), line);
            top += 1;
        }

        let body = Rect::new(area.x, top, area.width, area.bottom() - 1 - top);
        let theme = &self.theme;
        if let Some(page) = self.pages.get_mut(self.current) {
            page.table.render(buf, body, theme);
        }

        let status = self.status_line();
        let muted = Paint::new(self.theme.muted.to_rgb(), background);
        buf.put_str(area.x, area.bottom() - 1, &status, area.width, muted);

        if let Some(form) = self.current().and_then(Page::form) {
            form.paint(buf, area, &self.theme);
        }
    }

    /// Strip lines for the current page: its stats, then the pivot
    /// breakdown when it has one.
    fn summary_lines(&self) -> Vec<Vec<Stat>> {
        let Some(page) = self.current() else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        let stats = page.stats();
        if !stats.is_empty() {
            lines.push(stats);
        }
        if let Some((pivot, groups)) = page.pivot() {
            let mut line = vec![Stat::new(format!("By {}:", pivot.label()), "")];
            line.extend(groups.into_iter().map(|group| {
                let value = format!("{} ✓{} ✗{}", group.count, group.matched, group.unmatched);
                Stat::new(group.name, value)
            }));
            lines.push(line);
        }
        lines
    }

    fn draw_stats(&self, buf: &mut Buffer, line: Rect, stats: &[Stat]) {
        let background = self.theme.background.to_rgb();
        let label = Paint::new(self.theme.muted.to_rgb(), background);
        let mut x = line.x + 1;
        for stat in stats {
            let value = stat
                .color
                .as_deref()
                .and_then(|name| self.theme.resolve(name))
                .unwrap_or(self.theme.foreground);
            let value = Paint::new(value.to_rgb(), background).with_style(TextStyle::new().bold());
            x += buf.put_str(x, line.y, &stat.label, line.right().saturating_sub(x), label);
            if !stat.value.is_empty() {
                x += buf.put_str(x, line.y, " ", line.right().saturating_sub(x), label);
                x += buf.put_str(x, line.y, &stat.value, line.right().saturating_sub(x), value);
            }
            x += buf.put_str(x, line.y, STAT_SEPARATOR, line.right().saturating_sub(x), label);
        }
    }

    fn draw_tabs(&mut self, buf: &mut Buffer, line: Rect) {
        let background = self.theme.background.to_rgb();
        let normal = Paint::new(self.theme.muted.to_rgb(), background);
        let active = Paint::new(self.theme.accent.to_rgb(), background)
            .with_style(TextStyle::new().bold().underline());

        self.tabs.clear();
        let mut x = line.x + 1;
        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                x += buf.put_str(x, line.y, TAB_SEPARATOR, line.right().saturating_sub(x), normal);
            }
            let paint = if index == self.current { active } else { normal };
            let written = buf.put_str(x, line.y, &page.title, line.right().saturating_sub(x), paint);
            self.tabs.push((x, x + written));
            x += written;
        }

        if let Some(page) = self.current()
            && page.has_fund_filter()
        {
            let label = format!("Fund: {} ", page.fund().unwrap_or("All"));
            let width = recon_table::text::cells(&label);
            if line.right() > x + width {
                buf.put_str(line.right() - width, line.y, &label, width, normal);
            }
        }
    }

    fn status_line(&self) -> String {
        let Some(page) = self.current() else {
            return " no pages ".to_string();
        };
        let mut parts = vec![format!(
            " {} of {} rows",
            page.table.visible_len(),
            page.table.data().total_rows()
        )];
        if let Some(clicked) = self.last_clicked() {
            let mut part = format!("selected {} / {}", clicked.page, clicked.id);
            if clicked.children > 0 {
                part.push_str(&format!(" ({} sub-rows)", clicked.children));
            }
            parts.push(part);
        }
        let mut hints = "Tab pages · ←/→ expand · Enter select".to_string();
        if page.has_fund_filter() {
            hints.push_str(" · Ctrl+F fund");
        }
        if page.pivot().is_some() {
            hints.push_str(" · Ctrl+G pivot");
        }
        if page.is_editable() {
            hints.push_str(" · Ctrl+N add · Ctrl+E edit");
        }
        hints.push_str(" · Ctrl+Q quit");
        parts.push(hints);
        parts.join(" · ")
    }
}
