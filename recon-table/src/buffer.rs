//! Cell buffer the table paints into.

use crate::text::char_width;
use crate::theme::{Rgb, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub style: TextStyle,
    pub wide_continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            style: TextStyle::new(),
            wide_continuation: false,
        }
    }
}

impl Cell {
    pub fn new(char: char) -> Self {
        Self {
            char,
            ..Default::default()
        }
    }
}

/// A rectangle in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Foreground, background and attributes applied to painted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paint {
    pub fg: Rgb,
    pub bg: Rgb,
    pub style: TextStyle,
}

impl Paint {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            style: TextStyle::new(),
        }
    }

    pub const fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        let cells = vec![Cell::default(); (width as usize) * (height as usize)];
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Fill a rectangle with blanks in the given paint.
    pub fn fill(&mut self, rect: Rect, paint: Paint) {
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..rect.right().min(self.width) {
                self.set(
                    x,
                    y,
                    Cell {
                        char: ' ',
                        fg: paint.fg,
                        bg: paint.bg,
                        style: paint.style,
                        wide_continuation: false,
                    },
                );
            }
        }
    }

    /// Write `text` starting at `(x, y)`, never past `x + max_width`.
    ///
    /// Wide characters that would straddle the limit are dropped. Returns
    /// the number of columns written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, max_width: u16, paint: Paint) -> u16 {
        let mut col: u16 = 0;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col + w > max_width {
                break;
            }
            self.set(
                x + col,
                y,
                Cell {
                    char: ch,
                    fg: paint.fg,
                    bg: paint.bg,
                    style: paint.style,
                    wide_continuation: false,
                },
            );
            for extra in 1..w {
                self.set(
                    x + col + extra,
                    y,
                    Cell {
                        char: ' ',
                        fg: paint.fg,
                        bg: paint.bg,
                        style: paint.style,
                        wide_continuation: true,
                    },
                );
            }
            col += w;
        }
        col
    }

    /// Read back a row segment as a string, skipping wide continuations.
    pub fn line(&self, y: u16, x: u16, width: u16) -> String {
        (x..x.saturating_add(width).min(self.width))
            .filter_map(|cx| self.get(cx, y))
            .filter(|cell| !cell.wide_continuation)
            .map(|cell| cell.char)
            .collect()
    }

    pub fn diff<'a>(&'a self, other: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| {
                let x = (i % self.width as usize) as u16;
                let y = (i / self.width as usize) as u16;
                (x, y, cell)
            })
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_stops_at_max_width() {
        let mut buf = Buffer::new(10, 1);
        let written = buf.put_str(0, 0, "abcdef", 4, Paint::default());
        assert_eq!(written, 4);
        assert_eq!(buf.line(0, 0, 10), "abcd      ");
    }

    #[test]
    fn wide_char_marks_continuation() {
        let mut buf = Buffer::new(4, 1);
        let written = buf.put_str(0, 0, "日x", 4, Paint::default());
        assert_eq!(written, 3);
        assert!(buf.get(1, 0).is_some_and(|c| c.wide_continuation));
        assert_eq!(buf.line(0, 0, 4), "日x ");
    }

    #[test]
    fn wide_char_dropped_at_edge() {
        let mut buf = Buffer::new(4, 1);
        let written = buf.put_str(0, 0, "a日", 2, Paint::default());
        assert_eq!(written, 1);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(2, 2, 3, 2);
        assert!(rect.contains(2, 2));
        assert!(rect.contains(4, 3));
        assert!(!rect.contains(5, 3));
        assert!(!rect.contains(4, 4));
    }
}
