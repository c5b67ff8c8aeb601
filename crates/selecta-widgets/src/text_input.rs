//! `TextInput` widget for single-line text entry.

use selecta_core::{
    widget::{AccessibleRole, LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, Key, MouseButton, Point, Rect, Size, TypeId, Widget,
};
use std::any::Any;

/// Message emitted when text changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChanged {
    /// The new text value
    pub value: String,
}

/// Message emitted when Enter is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSubmitted {
    /// The submitted text value
    pub value: String,
}

/// `TextInput` widget for text entry.
///
/// The cursor is a character index, so multi-byte input edits whole
/// characters.
#[derive(Debug, Clone)]
pub struct TextInput {
    /// Current text value
    value: String,
    /// Placeholder text
    placeholder: String,
    /// Maximum length in characters (0 = unlimited)
    max_length: usize,
    /// Text style
    text_style: TextStyle,
    /// Placeholder text color
    placeholder_color: Color,
    /// Background color
    background_color: Color,
    /// Border color
    border_color: Color,
    /// Focused border color
    focus_border_color: Color,
    /// Padding
    padding: f32,
    /// Minimum width
    min_width: f32,
    /// Test ID
    test_id_value: Option<String>,
    /// Accessible name
    accessible_name_value: Option<String>,
    /// Cached bounds
    bounds: Rect,
    /// Whether focused
    focused: bool,
    /// Cursor position (character index)
    cursor: usize,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    /// Create a new text input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: String::new(),
            placeholder: String::new(),
            max_length: 0,
            text_style: TextStyle {
                size: 14.0,
                ..TextStyle::default()
            },
            placeholder_color: Color::new(0.6, 0.6, 0.6, 1.0),
            background_color: Color::WHITE,
            border_color: Color::new(0.8, 0.8, 0.8, 1.0),
            focus_border_color: Color::new(0.39, 0.4, 0.95, 1.0),
            padding: 8.0,
            min_width: 240.0,
            test_id_value: None,
            accessible_name_value: None,
            bounds: Rect::default(),
            focused: false,
            cursor: 0,
        }
    }

    /// Set the current value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Set maximum length in characters.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = max;
        let current = self.value.clone();
        self.set_value(current);
        self
    }

    /// Set focus border color.
    #[must_use]
    pub const fn focus_border_color(mut self, color: Color) -> Self {
        self.focus_border_color = color;
        self
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width.max(0.0);
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Replace the text, truncating to the maximum length. The cursor moves
    /// to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.value = if self.max_length > 0 {
            value.chars().take(self.max_length).collect()
        } else {
            value
        };
        self.cursor = self.char_count();
    }

    /// Get current value.
    #[must_use]
    pub fn get_value(&self) -> &str {
        &self.value
    }

    /// Get placeholder.
    #[must_use]
    pub fn get_placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get cursor position.
    #[must_use]
    pub const fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Check if focused.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Insert text at cursor.
    fn insert_text(&mut self, text: &str) -> bool {
        let mut changed = false;
        for c in text.chars() {
            if self.max_length > 0 && self.char_count() >= self.max_length {
                break;
            }
            let at = self.byte_index(self.cursor);
            self.value.insert(at, c);
            self.cursor += 1;
            changed = true;
        }
        changed
    }

    /// Delete character before cursor.
    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    /// Delete character at cursor.
    fn delete(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn changed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(TextChanged {
            value: self.value.clone(),
        }))
    }
}

impl Widget for TextInput {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let height = 2.0f32.mul_add(self.padding, self.text_style.size);
        let width = self.min_width.max(constraints.min_width);
        constraints.constrain(Size::new(width, height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.background_color);

        let border_color = if self.focused {
            self.focus_border_color
        } else {
            self.border_color
        };
        canvas.stroke_rect(self.bounds, border_color, 1.0);

        let position = Point::new(self.bounds.x + self.padding, self.bounds.y + self.padding);
        if self.value.is_empty() {
            let placeholder_style = TextStyle {
                color: self.placeholder_color,
                ..self.text_style.clone()
            };
            canvas.draw_text(&self.placeholder, position, &placeholder_style);
        } else {
            canvas.draw_text(&self.value, position, &self.text_style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                let was_focused = self.focused;
                self.focused = self.bounds.contains_point(position);
                if self.focused && !was_focused {
                    self.cursor = self.char_count();
                }
            }
            Event::FocusIn => {
                self.focused = true;
            }
            Event::FocusOut => {
                self.focused = false;
            }
            Event::TextInput { text } if self.focused => {
                if self.insert_text(text) {
                    return self.changed();
                }
            }
            Event::KeyDown { key } if self.focused => match key {
                Key::Backspace => {
                    if self.backspace() {
                        return self.changed();
                    }
                }
                Key::Delete => {
                    if self.delete() {
                        return self.changed();
                    }
                }
                Key::Left => self.cursor = self.cursor.saturating_sub(1),
                Key::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
                Key::Home => self.cursor = 0,
                Key::End => self.cursor = self.char_count(),
                Key::Enter => {
                    return Some(Box::new(TextSubmitted {
                        value: self.value.clone(),
                    }));
                }
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value
            .as_deref()
            .or(Some(self.placeholder.as_str()))
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::TextInput
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
