//! Button widget for user interactions.

use selecta_core::{
    widget::{AccessibleRole, FontWeight, LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, Key, MouseButton, Point, Rect, Size, TypeId, Widget,
};
use std::any::Any;

/// Button widget with label and click handling.
#[derive(Debug, Clone)]
pub struct Button {
    /// Button label
    label: String,
    /// Background color (normal state)
    background: Color,
    /// Background color (hover state)
    background_hover: Color,
    /// Background color (pressed state)
    background_pressed: Color,
    /// Text color
    text_color: Color,
    /// Padding
    padding: f32,
    /// Font size
    font_size: f32,
    /// Test ID
    test_id_value: Option<String>,
    /// Current hover state
    hovered: bool,
    /// Current pressed state
    pressed: bool,
    /// Whether focused
    focused: bool,
    /// Cached bounds
    bounds: Rect,
}

/// Message emitted when button is clicked.
#[derive(Debug, Clone)]
pub struct ButtonClicked;

impl Button {
    /// Create a new button with label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            background: Color::from_hex("#6366f1").unwrap_or(Color::BLACK),
            background_hover: Color::from_hex("#4f46e5").unwrap_or(Color::BLACK),
            background_pressed: Color::from_hex("#4338ca").unwrap_or(Color::BLACK),
            text_color: Color::WHITE,
            padding: 12.0,
            font_size: 14.0,
            test_id_value: None,
            hovered: false,
            pressed: false,
            focused: false,
            bounds: Rect::default(),
        }
    }

    /// Set background color.
    #[must_use]
    pub const fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Button label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the pointer is pressed on the button.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn current_background(&self) -> Color {
        if self.pressed {
            self.background_pressed
        } else if self.hovered {
            self.background_hover
        } else {
            self.background
        }
    }

    fn estimate_text_size(&self) -> Size {
        let char_width = self.font_size * 0.6;
        let width = self.label.chars().count() as f32 * char_width;
        Size::new(width, self.font_size * 1.2)
    }
}

impl Widget for Button {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let text = self.estimate_text_size();
        let size = Size::new(
            2.0f32.mul_add(self.padding, text.width),
            2.0f32.mul_add(self.padding, text.height),
        );
        constraints.constrain(size)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.current_background());

        let text = self.estimate_text_size();
        let text_pos = Point::new(
            self.bounds.x + (self.bounds.width - text.width) / 2.0,
            self.bounds.y + (self.bounds.height - text.height) / 2.0,
        );
        let style = TextStyle {
            size: self.font_size,
            color: self.text_color,
            weight: FontWeight::Medium,
        };
        canvas.draw_text(&self.label, text_pos, &style);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseMove { position } => {
                self.hovered = self.bounds.contains_point(position);
                None
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                self.pressed = self.bounds.contains_point(position);
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let was_pressed = self.pressed;
                self.pressed = false;
                if was_pressed && self.bounds.contains_point(position) {
                    Some(Box::new(ButtonClicked))
                } else {
                    None
                }
            }
            Event::FocusIn => {
                self.focused = true;
                None
            }
            Event::FocusOut => {
                self.focused = false;
                self.pressed = false;
                None
            }
            Event::KeyDown {
                key: Key::Enter | Key::Space,
            } if self.focused => {
                self.pressed = true;
                None
            }
            Event::KeyUp {
                key: Key::Enter | Key::Space,
            } if self.focused => {
                self.pressed = false;
                Some(Box::new(ButtonClicked))
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Button
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
