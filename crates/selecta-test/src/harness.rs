//! Test harness for Selecta widgets.

use selecta_core::{Event, Key, MouseButton, Point, Rect, RecordingCanvas, Widget};
use std::any::Any;
use std::collections::VecDeque;

/// Test harness for interacting with a widget.
pub struct Harness<W: Widget> {
    /// Root widget being tested
    root: W,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Current viewport size
    viewport: Rect,
    /// Messages emitted by the root, oldest first
    messages: Vec<Box<dyn Any + Send>>,
}

impl<W: Widget> Harness<W> {
    /// Create a new harness and lay the root out in a 1280x720 viewport.
    pub fn new(root: W) -> Self {
        let mut harness = Self {
            root,
            event_queue: VecDeque::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            messages: Vec::new(),
        };
        harness.relayout();
        harness
    }

    /// Set the viewport size and lay the root out again.
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.relayout();
        self
    }

    /// Lay the root out in the current viewport.
    pub fn relayout(&mut self) -> &mut Self {
        self.root.layout(self.viewport);
        self
    }

    /// Root widget.
    pub const fn root(&self) -> &W {
        &self.root
    }

    /// Root widget, mutably.
    pub fn root_mut(&mut self) -> &mut W {
        &mut self.root
    }

    // === Event Simulation ===

    /// Send a single event.
    pub fn send(&mut self, event: Event) -> &mut Self {
        self.event_queue.push_back(event);
        self.process_events();
        self
    }

    /// Give the root keyboard focus.
    pub fn focus(&mut self) -> &mut Self {
        self.send(Event::FocusIn)
    }

    /// Take keyboard focus away from the root.
    pub fn blur(&mut self) -> &mut Self {
        self.send(Event::FocusOut)
    }

    /// Move the pointer to `position`.
    pub fn hover(&mut self, position: Point) -> &mut Self {
        self.send(Event::MouseMove { position })
    }

    /// Simulate a left click at `position`.
    pub fn click(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.event_queue.push_back(Event::MouseDown {
            position,
            button: MouseButton::Left,
        });
        self.event_queue.push_back(Event::MouseUp {
            position,
            button: MouseButton::Left,
        });
        self.process_events();
        self
    }

    /// Simulate a left click at the center of `rect`.
    pub fn click_rect(&mut self, rect: Rect) -> &mut Self {
        self.click(rect.center())
    }

    /// Simulate typing, one character per event.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.event_queue.push_back(Event::TextInput {
                text: c.to_string(),
            });
        }
        self.process_events();
        self
    }

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.event_queue.push_back(Event::KeyDown { key });
        self.event_queue.push_back(Event::KeyUp { key });
        self.process_events();
        self
    }

    /// Press `key` `times` times.
    pub fn press_key_times(&mut self, key: Key, times: usize) -> &mut Self {
        for _ in 0..times {
            self.press_key(key);
        }
        self
    }

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            if let Some(msg) = self.root.event(&event) {
                self.messages.push(msg);
            }
        }
    }

    // === Messages ===

    /// Number of messages emitted so far.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Messages of type `T`, oldest first.
    pub fn messages_of<T: Any>(&self) -> Vec<&T> {
        self.messages
            .iter()
            .filter_map(|m| m.downcast_ref::<T>())
            .collect()
    }

    /// Most recent message of type `T`.
    pub fn last_message<T: Any>(&self) -> Option<&T> {
        self.messages.iter().rev().find_map(|m| m.downcast_ref::<T>())
    }

    /// Drop all recorded messages.
    pub fn clear_messages(&mut self) -> &mut Self {
        self.messages.clear();
        self
    }

    // === Rendering ===

    /// Paint the root into a fresh recording canvas.
    pub fn paint(&self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        self.root.paint(&mut canvas);
        canvas
    }

    // === Assertions ===

    /// Assert that painting draws `text`.
    ///
    /// # Panics
    ///
    /// Panics if no text command matches.
    pub fn assert_painted(&self, text: &str) -> &Self {
        let canvas = self.paint();
        assert!(
            canvas.has_text(text),
            "Expected '{text}' to be painted, got {:?}",
            canvas.texts()
        );
        self
    }

    /// Assert that painting does not draw `text`.
    ///
    /// # Panics
    ///
    /// Panics if a text command matches.
    pub fn assert_not_painted(&self, text: &str) -> &Self {
        let canvas = self.paint();
        assert!(
            !canvas.has_text(text),
            "Expected '{text}' not to be painted"
        );
        self
    }

    /// Assert the number of recorded messages of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_message_count<T: Any>(&self, expected: usize) -> &Self {
        let actual = self.messages_of::<T>().len();
        assert_eq!(
            actual, expected,
            "Expected {expected} messages of the requested type but found {actual}"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selecta_core::{
        widget::LayoutResult, Canvas, Color, Constraints, Size, TextStyle, TypeId,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Clicked(Point);

    #[derive(Debug, Clone, PartialEq)]
    struct Typed(String);

    #[derive(Default)]
    struct Probe {
        bounds: Rect,
        focused: bool,
        keys: Vec<Key>,
    }

    impl Widget for Probe {
        fn type_id(&self) -> TypeId {
            TypeId::of::<Self>()
        }
        fn measure(&self, c: Constraints) -> Size {
            c.constrain(Size::new(100.0, 50.0))
        }
        fn layout(&mut self, b: Rect) -> LayoutResult {
            self.bounds = b;
            LayoutResult { size: b.size() }
        }
        fn paint(&self, canvas: &mut dyn Canvas) {
            canvas.fill_rect(self.bounds, Color::WHITE);
            if self.focused {
                canvas.draw_text("focused", Point::ORIGIN, &TextStyle::default());
            }
        }
        fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
            match event {
                Event::MouseDown { position, .. } => Some(Box::new(Clicked(*position))),
                Event::TextInput { text } => Some(Box::new(Typed(text.clone()))),
                Event::KeyDown { key } => {
                    self.keys.push(*key);
                    None
                }
                Event::FocusIn => {
                    self.focused = true;
                    None
                }
                Event::FocusOut => {
                    self.focused = false;
                    None
                }
                _ => None,
            }
        }
        fn bounds(&self) -> Rect {
            self.bounds
        }
    }

    #[test]
    fn test_harness_lays_out_root() {
        let harness = Harness::new(Probe::default()).viewport(300.0, 200.0);
        assert_eq!(harness.root().bounds(), Rect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_harness_click_records_message() {
        let mut harness = Harness::new(Probe::default());
        harness.click(Point::new(5.0, 6.0));
        assert_eq!(
            harness.last_message::<Clicked>(),
            Some(&Clicked(Point::new(5.0, 6.0)))
        );
        harness.assert_message_count::<Clicked>(1);
    }

    #[test]
    fn test_harness_types_per_character() {
        let mut harness = Harness::new(Probe::default());
        harness.type_text("abc");
        let typed: Vec<&str> = harness
            .messages_of::<Typed>()
            .into_iter()
            .map(|t| t.0.as_str())
            .collect();
        assert_eq!(typed, vec!["a", "b", "c"]);
        assert_eq!(harness.message_count(), 3);

        harness.clear_messages();
        assert_eq!(harness.message_count(), 0);
    }

    #[test]
    fn test_harness_press_key_times() {
        let mut harness = Harness::new(Probe::default());
        harness.press_key_times(Key::Down, 3);
        assert_eq!(harness.root().keys, vec![Key::Down; 3]);
    }

    #[test]
    fn test_harness_focus_and_paint() {
        let mut harness = Harness::new(Probe::default());
        harness.assert_not_painted("focused");
        harness.focus();
        harness.assert_painted("focused");
        harness.blur();
        harness.assert_not_painted("focused");
    }

    #[test]
    #[should_panic(expected = "Expected 'missing' to be painted")]
    fn test_harness_assert_painted_fails() {
        Harness::new(Probe::default()).assert_painted("missing");
    }
}
