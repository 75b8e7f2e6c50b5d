use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use recon_table::text::char_width;
use recon_table::{Buffer, Rgb, TextStyle};

/// Raw-mode alternate screen that redraws only changed cells.
///
/// Restores the terminal on drop, including on error paths.
pub struct Terminal {
    stdout: io::Stdout,
    current: Buffer,
    previous: Buffer,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        let (width, height) = terminal::size()?;
        log::info!("terminal opened at {}x{}", width, height);
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
        })
    }

    /// Wait up to `timeout` for input, then drain everything pending.
    pub fn poll(&self, timeout: Duration) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        Ok(events)
    }

    /// Let `paint` fill a cleared frame, then write the difference.
    pub fn draw(&mut self, paint: impl FnOnce(&mut Buffer)) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if width != self.current.width() || height != self.current.height() {
            log::debug!("terminal resized to {}x{}", width, height);
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        self.current.clear();
        paint(&mut self.current);
        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_x = u16::MAX;
        let mut last_y = u16::MAX;
        let mut last_width: u16 = 1;
        let mut last_fg = Rgb::new(255, 255, 255);
        let mut last_bg = Rgb::new(0, 0, 0);
        let mut last_style = TextStyle::new();

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.wide_continuation {
                continue;
            }
            if y != last_y || x != last_x.wrapping_add(last_width) {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }
            if cell.fg != last_fg {
                queue!(self.stdout, SetForegroundColor(rgb(cell.fg)))?;
                last_fg = cell.fg;
            }
            if cell.bg != last_bg {
                queue!(self.stdout, SetBackgroundColor(rgb(cell.bg)))?;
                last_bg = cell.bg;
            }
            if cell.style != last_style {
                apply_style(&mut self.stdout, last_style, cell.style)?;
                last_style = cell.style;
            }

            write!(self.stdout, "{}", cell.char)?;

            last_x = x;
            last_y = y;
            last_width = char_width(cell.char).max(1);
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

fn rgb(color: Rgb) -> CtColor {
    CtColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn apply_style(out: &mut io::Stdout, from: TextStyle, to: TextStyle) -> io::Result<()> {
    // Bold and dim share one reset.
    if (from.bold && !to.bold) || (from.dim && !to.dim) {
        queue!(out, SetAttribute(Attribute::NormalIntensity))?;
    }
    if to.bold && (!from.bold || from.dim != to.dim) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if to.dim && (!from.dim || from.bold != to.bold) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if from.italic != to.italic {
        let attr = if to.italic { Attribute::Italic } else { Attribute::NoItalic };
        queue!(out, SetAttribute(attr))?;
    }
    if from.underline != to.underline {
        let attr = if to.underline {
            Attribute::Underlined
        } else {
            Attribute::NoUnderline
        };
        queue!(out, SetAttribute(attr))?;
    }
    Ok(())
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
