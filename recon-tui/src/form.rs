//! Modal add/edit forms for the editable pages.
//!
//! A form is a column of labelled inputs drawn in a box over the page.
//! While it is open it takes every key: Tab and the vertical arrows move
//! between fields, Enter submits, Escape cancels.

use recon_table::text::{cells, char_width, fit};
use recon_table::{Buffer, DefaultTheme, Key, KeyCombo, Paint, Rect, TextStyle, Theme};

const MAX_WIDTH: u16 = 64;
const HINTS: &str = "Enter save · Esc cancel · Tab next field";

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Free text. `cursor` counts characters.
    Text { value: String, cursor: usize },
    /// One of a fixed list, cycled with Left/Right.
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub required: bool,
    pub input: Input,
}

impl Field {
    /// A required text field, cursor at the end.
    pub fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self {
            key,
            label,
            placeholder: "",
            required: true,
            input: Input::Text { value, cursor },
        }
    }

    /// A choice preset to `current`, or the first option.
    pub fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        current: &str,
    ) -> Self {
        let selected = options.iter().position(|o| *o == current).unwrap_or(0);
        Self {
            key,
            label,
            placeholder: "",
            required: false,
            input: Input::Choice { options, selected },
        }
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn value(&self) -> &str {
        match &self.input {
            Input::Text { value, .. } => value,
            Input::Choice { options, selected } => options.get(*selected).copied().unwrap_or(""),
        }
    }

    fn is_blank(&self) -> bool {
        self.value().trim().is_empty()
    }

    /// Returns true if the key changed the field.
    fn edit(&mut self, key: Key) -> bool {
        match &mut self.input {
            Input::Text { value, cursor } => edit_text(value, cursor, key),
            Input::Choice { options, selected } => {
                let len = options.len();
                if len == 0 {
                    return false;
                }
                match key {
                    Key::Right | Key::Char(' ') => *selected = (*selected + 1) % len,
                    Key::Left => *selected = (*selected + len - 1) % len,
                    _ => return false,
                }
                true
            }
        }
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

fn edit_text(value: &mut String, cursor: &mut usize, key: Key) -> bool {
    let len = value.chars().count();
    *cursor = (*cursor).min(len);
    match key {
        Key::Char(c) => {
            let at = byte_index(value, *cursor);
            value.insert(at, c);
            *cursor += 1;
        }
        Key::Backspace if *cursor > 0 => {
            *cursor -= 1;
            let at = byte_index(value, *cursor);
            value.remove(at);
        }
        Key::Delete if *cursor < len => {
            let at = byte_index(value, *cursor);
            value.remove(at);
        }
        Key::Left if *cursor > 0 => *cursor -= 1,
        Key::Right if *cursor < len => *cursor += 1,
        Key::Home => *cursor = 0,
        Key::End => *cursor = len,
        _ => return false,
    }
    true
}

/// Result of a key press on an open form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Pending,
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    /// Record being edited; `None` when adding.
    pub target: Option<String>,
    fields: Vec<Field>,
    focus: usize,
    error: Option<String>,
}

impl Form {
    pub fn new(title: impl Into<String>, target: Option<String>) -> Self {
        Self {
            title: title.into(),
            target,
            fields: Vec::new(),
            focus: 0,
            error: None,
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Value of the field `key`, empty when there is no such field.
    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", Field::value)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key)
    }

    #[cfg(test)]
    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    pub fn on_key(&mut self, key: &KeyCombo) -> FormOutcome {
        if key.modifiers.ctrl || key.modifiers.alt {
            return FormOutcome::Pending;
        }
        match key.key {
            Key::Escape => return FormOutcome::Cancelled,
            Key::Enter => {
                if let Some(index) = self.fields.iter().position(|f| f.required && f.is_blank()) {
                    self.error = Some(format!("{} is required", self.fields[index].label));
                    self.focus = index;
                    return FormOutcome::Pending;
                }
                return FormOutcome::Submitted;
            }
            Key::Tab | Key::Down => self.move_focus(true),
            Key::BackTab | Key::Up => self.move_focus(false),
            other => {
                if let Some(field) = self.fields.get_mut(self.focus)
                    && field.edit(other)
                {
                    self.error = None;
                }
            }
        }
        FormOutcome::Pending
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    /// The box the form takes, centered in `area`.
    pub fn frame(&self, area: Rect) -> Rect {
        let width = area.width.saturating_sub(4).min(MAX_WIDTH);
        let wanted = self.fields.len() as u16 + 5;
        let height = wanted.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    pub fn paint(&self, buf: &mut Buffer, area: Rect, theme: &DefaultTheme) {
        let frame = self.frame(area);
        if frame.width < 12 || frame.height < 3 {
            return;
        }
        let bg = theme.background.to_rgb();
        let base = Paint::new(theme.foreground.to_rgb(), bg);
        let muted = Paint::new(theme.muted.to_rgb(), bg);
        let accent = Paint::new(theme.accent.to_rgb(), bg);
        buf.fill(frame, base);
        paint_box(buf, frame, Paint::new(theme.border.to_rgb(), bg));

        let title = format!(" {} ", self.title);
        buf.put_str(
            frame.x + 2,
            frame.y,
            &title,
            frame.width - 4,
            accent.with_style(TextStyle::new().bold()),
        );

        let inner = Rect::new(frame.x + 2, frame.y + 2, frame.width - 4, frame.height - 3);
        let label_width = self
            .fields
            .iter()
            .map(|f| cells(f.label))
            .max()
            .unwrap_or(0)
            .saturating_add(2)
            .min(inner.width / 2);
        let input_x = inner.x + label_width;
        let input_width = inner.width - label_width;

        for (index, field) in self.fields.iter().enumerate() {
            let y = inner.y + index as u16;
            if y >= inner.bottom() {
                return;
            }
            let focused = index == self.focus;
            let label_paint = if focused {
                accent.with_style(TextStyle::new().bold())
            } else {
                muted
            };
            buf.put_str(inner.x, y, &fit(field.label, label_width), label_width, label_paint);

            let input_paint = if focused {
                Paint::new(theme.cursor_text.to_rgb(), theme.cursor.to_rgb())
            } else {
                base
            };
            buf.fill(Rect::new(input_x, y, input_width, 1), input_paint);
            match &field.input {
                Input::Text { value, .. } if value.is_empty() && !focused => {
                    let dim = input_paint.with_style(TextStyle::new().dim());
                    buf.put_str(input_x, y, field.placeholder, input_width, dim);
                }
                Input::Text { value, cursor } => {
                    let (head, rest) = value.split_at(byte_index(value, *cursor));
                    let head = visible_tail(head, input_width.saturating_sub(1));
                    let mut x = input_x + buf.put_str(input_x, y, head, input_width, input_paint);
                    if focused {
                        x += buf.put_str(x, y, "▏", input_x + input_width - x, input_paint);
                    }
                    buf.put_str(x, y, rest, input_x + input_width - x, input_paint);
                }
                Input::Choice { .. } => {
                    let shown = format!("‹ {} ›", field.value());
                    buf.put_str(input_x, y, &shown, input_width, input_paint);
                }
            }
        }

        let footer_y = frame.bottom() - 2;
        if footer_y >= inner.y + self.fields.len() as u16 {
            match &self.error {
                Some(error) => {
                    let error_paint = theme
                        .resolve("error")
                        .map_or(accent, |color| Paint::new(color.to_rgb(), bg));
                    buf.put_str(inner.x, footer_y, error, inner.width, error_paint);
                }
                None => {
                    buf.put_str(inner.x, footer_y, HINTS, inner.width, muted);
                }
            }
        }
    }
}

/// Longest suffix of `value` that fits in `width` cells.
fn visible_tail(value: &str, width: u16) -> &str {
    let mut used: u16 = 0;
    let mut start = value.len();
    for (i, ch) in value.char_indices().rev() {
        let w = char_width(ch);
        if used.saturating_add(w) > width {
            break;
        }
        used += w;
        start = i;
    }
    &value[start..]
}

fn paint_box(buf: &mut Buffer, rect: Rect, paint: Paint) {
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    for x in rect.x + 1..right {
        buf.put_str(x, rect.y, "─", 1, paint);
        buf.put_str(x, bottom, "─", 1, paint);
    }
    for y in rect.y + 1..bottom {
        buf.put_str(rect.x, y, "│", 1, paint);
        buf.put_str(right, y, "│", 1, paint);
    }
    buf.put_str(rect.x, rect.y, "╭", 1, paint);
    buf.put_str(right, rect.y, "╮", 1, paint);
    buf.put_str(rect.x, bottom, "╰", 1, paint);
    buf.put_str(right, bottom, "╯", 1, paint);
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [&str; 2] = ["fund", "secnum"];

    fn form() -> Form {
        Form::new("Add New Mapping", None)
            .field(Field::text("externalName", "External Name", ""))
            .field(Field::text("internalName", "Internal Name", "Fund C13"))
            .field(Field::choice("type", "Type", &KINDS, "secnum"))
    }

    fn press(form: &mut Form, key: Key) -> FormOutcome {
        form.on_key(&KeyCombo::key(key))
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            press(form, Key::Char(c));
        }
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut form = form();
        type_text(&mut form, "Fund C1");
        assert_eq!(form.value("externalName"), "Fund C1");
        press(&mut form, Key::Backspace);
        press(&mut form, Key::Home);
        press(&mut form, Key::Delete);
        assert_eq!(form.value("externalName"), "und C");
    }

    #[test]
    fn tab_moves_between_fields() {
        let mut form = form();
        press(&mut form, Key::Tab);
        assert_eq!(form.focused().unwrap().key, "internalName");
        press(&mut form, Key::BackTab);
        press(&mut form, Key::BackTab);
        assert_eq!(form.focused().unwrap().key, "type");
    }

    #[test]
    fn choices_cycle_with_arrows() {
        let mut form = form();
        assert_eq!(form.value("type"), "secnum");
        press(&mut form, Key::Up);
        press(&mut form, Key::Right);
        assert_eq!(form.value("type"), "fund");
        press(&mut form, Key::Left);
        assert_eq!(form.value("type"), "secnum");
    }

    #[test]
    fn submit_requires_text_fields() {
        let mut form = form();
        press(&mut form, Key::Tab);
        assert_eq!(press(&mut form, Key::Enter), FormOutcome::Pending);
        assert_eq!(form.error(), Some("External Name is required"));
        assert_eq!(form.focused().unwrap().key, "externalName");

        type_text(&mut form, "SEC1");
        assert_eq!(form.error(), None);
        assert_eq!(press(&mut form, Key::Enter), FormOutcome::Submitted);
    }

    #[test]
    fn escape_cancels_and_ctrl_is_ignored() {
        let mut form = form();
        assert_eq!(form.on_key(&KeyCombo::key(Key::Char('x')).ctrl()), FormOutcome::Pending);
        assert_eq!(form.value("externalName"), "");
        assert_eq!(press(&mut form, Key::Escape), FormOutcome::Cancelled);
    }

    #[test]
    fn paints_a_centered_box() {
        let form = form();
        let mut buf = Buffer::new(80, 20);
        let area = buf.area();
        form.paint(&mut buf, area, &DefaultTheme::new());
        let frame = form.frame(buf.area());
        assert_eq!(frame.width, MAX_WIDTH);
        assert_eq!(frame.x, 8);
        assert!(buf.line(frame.y, 0, 80).contains("Add New Mapping"));
        assert!(buf.line(frame.y + 3, 0, 80).contains("Fund C13"));
        assert!(buf.line(frame.y + 4, 0, 80).contains("‹ secnum ›"));
        assert!(buf.line(frame.bottom() - 2, 0, 80).contains("Esc cancel"));
    }

    #[test]
    fn long_text_shows_the_end() {
        assert_eq!(visible_tail("internal_position > 0", 5), "n > 0");
        assert_eq!(visible_tail("abc", 5), "abc");
    }
}
