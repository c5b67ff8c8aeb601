//! Select/Dropdown widget for choosing one or many options.
//!
//! The widget is controlled: it renders the [`SelectValue`] its owner gives
//! it and reports changes through [`SelectChanged`] (and the optional
//! `on_change` callback) without applying them. The owner decides and
//! pushes the result back with [`Select::set_value`].
//!
//! The widget owns only interaction state: whether the list is open, which
//! row is highlighted and whether it has focus.

use selecta_core::{
    lifecycle,
    widget::{AccessibleRole, LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, Key, ListenerRegistry, MouseButton, Point, Rect,
    ScopedListener, SelectOption, SelectValue, Size, TypeId, Widget, WidgetId,
};
use std::any::Any;

/// Message emitted when the user commits a value change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectChanged {
    /// Proposed new value, same variant as the current one
    pub value: SelectValue,
}

/// Visual state of one option row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowState {
    /// Row is part of the current value
    pub selected: bool,
    /// Row is the keyboard/hover highlight
    pub highlighted: bool,
}

type ChangeCallback = Box<dyn FnMut(&SelectValue) + Send + Sync>;

/// Width of the clear control.
const CLEAR_WIDTH: f32 = 24.0;
/// Width of the divider between clear control and caret.
const DIVIDER_WIDTH: f32 = 1.0;
/// Width of the caret area.
const CARET_WIDTH: f32 = 24.0;
/// Horizontal padding inside the header and badges.
const PADDING: f32 = 6.0;
/// Width of the remove mark inside a badge.
const BADGE_MARK_WIDTH: f32 = 14.0;
/// Gap between badges.
const BADGE_GAP: f32 = 4.0;

/// Select/Dropdown widget.
pub struct Select {
    /// Instance ID used for listener registration
    id: WidgetId,
    /// Available options
    options: Vec<SelectOption>,
    /// Latest value pushed by the owner
    value: SelectValue,
    /// Placeholder text when nothing is selected (single mode)
    placeholder: String,
    /// Whether the option list is open
    open: bool,
    /// Highlighted option row
    highlighted: Option<usize>,
    /// Whether the widget itself has keyboard focus
    focused: bool,
    /// Keyboard listener registration
    listener: ScopedListener,
    /// Change notification
    on_change: Option<ChangeCallback>,
    /// Minimum width
    min_width: f32,
    /// Header and row height
    item_height: f32,
    /// Font size for labels
    font_size: f32,
    /// Background color
    background_color: Color,
    /// Border color
    border_color: Color,
    /// Border color while focused
    focus_color: Color,
    /// Selected row background
    selected_bg_color: Color,
    /// Highlighted row background
    highlight_bg_color: Color,
    /// Text color
    text_color: Color,
    /// Placeholder text color
    placeholder_color: Color,
    /// Test ID
    test_id_value: Option<String>,
    /// Accessible name
    accessible_name_value: Option<String>,
    /// Cached bounds
    bounds: Rect,
}

impl std::fmt::Debug for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("option_count", &self.options.len())
            .field("open", &self.open)
            .field("highlighted", &self.highlighted)
            .field("focused", &self.focused)
            .field("mounted", &self.listener.is_attached())
            .finish_non_exhaustive()
    }
}

impl Select {
    /// Create a select for `value`; its variant fixes the selection mode.
    #[must_use]
    pub fn new(value: SelectValue) -> Self {
        Self {
            id: WidgetId::new(0),
            options: Vec::new(),
            value,
            placeholder: "Select...".to_string(),
            open: false,
            highlighted: None,
            focused: false,
            listener: ScopedListener::new(),
            on_change: None,
            min_width: 240.0,
            item_height: 32.0,
            font_size: 14.0,
            background_color: Color::WHITE,
            border_color: Color::new(0.8, 0.8, 0.8, 1.0),
            focus_color: Color::new(0.39, 0.4, 0.95, 1.0),
            selected_bg_color: Color::new(0.85, 0.87, 1.0, 1.0),
            highlight_bg_color: Color::new(0.93, 0.93, 0.97, 1.0),
            text_color: Color::BLACK,
            placeholder_color: Color::new(0.6, 0.6, 0.6, 1.0),
            test_id_value: None,
            accessible_name_value: None,
            bounds: Rect::default(),
        }
    }

    /// Single-select over `options`, holding `value`.
    #[must_use]
    pub fn single(options: Vec<SelectOption>, value: Option<SelectOption>) -> Self {
        Self::new(SelectValue::Single(value)).options(options)
    }

    /// Multi-select over `options`, holding `value`.
    #[must_use]
    pub fn multiple(options: Vec<SelectOption>, value: Vec<SelectOption>) -> Self {
        Self::new(SelectValue::Multiple(value)).options(options)
    }

    /// Set the options.
    #[must_use]
    pub fn options(mut self, opts: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = opts.into_iter().collect();
        self
    }

    /// Set the instance ID.
    #[must_use]
    pub const fn with_id(mut self, id: WidgetId) -> Self {
        self.id = id;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width.max(CLEAR_WIDTH + DIVIDER_WIDTH + CARET_WIDTH + 2.0 * PADDING);
        self
    }

    /// Set header and row height.
    #[must_use]
    pub fn item_height(mut self, height: f32) -> Self {
        self.item_height = height.max(20.0);
        self
    }

    /// Set the focus/accent color.
    #[must_use]
    pub const fn accent_color(mut self, color: Color) -> Self {
        self.focus_color = color;
        self
    }

    /// Register a change callback, called with every emitted value.
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&SelectValue) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
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

    // =========================================================================
    // Controlled props
    // =========================================================================

    /// Push the owner's current value.
    pub fn set_value(&mut self, value: SelectValue) {
        self.value = value;
    }

    /// Replace the options. A different list clears the highlight.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        if self.options != options {
            self.options = options;
            self.highlighted = None;
            self.refresh_listener();
        }
    }

    /// Instance ID.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Current value as last pushed by the owner.
    #[must_use]
    pub const fn value(&self) -> &SelectValue {
        &self.value
    }

    /// All options.
    #[must_use]
    pub fn get_options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Whether the option list is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Highlighted row, if any.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether the widget has keyboard focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether this is a multi-select.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.value.is_multiple()
    }

    /// Visual state of option row `index`.
    #[must_use]
    pub fn row_state(&self, index: usize) -> Option<RowState> {
        let option = self.options.get(index)?;
        Some(RowState {
            selected: self.value.contains(option),
            highlighted: self.highlighted == Some(index),
        })
    }

    // =========================================================================
    // Lifetime
    // =========================================================================

    /// Start listening for keyboard input through `registry`.
    pub fn mount(&mut self, registry: &ListenerRegistry) {
        self.listener
            .attach(registry, self.id, lifecycle::fingerprint(&self.listener_deps()));
    }

    /// Stop listening for keyboard input.
    pub fn unmount(&mut self) {
        self.listener.detach();
    }

    /// Whether a keyboard listener is registered.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.listener.is_attached()
    }

    fn listener_deps(&self) -> (bool, Option<usize>, &[SelectOption]) {
        (self.open, self.highlighted, &self.options)
    }

    fn refresh_listener(&mut self) {
        let deps = lifecycle::fingerprint(&self.listener_deps());
        self.listener.refresh(self.id, deps);
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Open or close the list. Any change of the open state clears the
    /// highlight.
    pub fn set_open(&mut self, open: bool) {
        if self.open != open {
            self.open = open;
            self.highlighted = None;
            log::debug!("select {:?} {}", self.id, if open { "opened" } else { "closed" });
            self.refresh_listener();
        }
    }

    /// Flip the open state.
    pub fn toggle_open(&mut self) {
        self.set_open(!self.open);
    }

    /// Highlight row `index` (pointer hover). Out-of-range indices are ignored.
    pub fn highlight(&mut self, index: usize) {
        if index < self.options.len() && self.highlighted != Some(index) {
            self.highlighted = Some(index);
            log::trace!("select {:?} highlight {index}", self.id);
            self.refresh_listener();
        }
    }

    /// Drop focus: close the list and clear the highlight.
    pub fn blur(&mut self) {
        self.focused = false;
        self.set_open(false);
        self.highlighted = None;
        self.refresh_listener();
    }

    /// Report the empty value of the current variant. The open state is
    /// left alone.
    pub fn clear(&mut self) -> SelectValue {
        let cleared = self.value.cleared();
        self.notify(&cleared);
        cleared
    }

    /// Apply the selection rules for `option` and report the result.
    ///
    /// - single: a different option replaces the value and closes the list;
    ///   the current option is a no-op (`None`), open state untouched.
    /// - multiple: a present option is removed and the list stays as it is;
    ///   an absent option is appended and the list closes.
    pub fn select_option(&mut self, option: &SelectOption) -> Option<SelectValue> {
        let next = match &self.value {
            SelectValue::Single(current) => {
                if current.as_ref() == Some(option) {
                    return None;
                }
                self.set_open(false);
                SelectValue::Single(Some(option.clone()))
            }
            SelectValue::Multiple(values) => {
                if values.contains(option) {
                    SelectValue::Multiple(values.iter().filter(|o| *o != option).cloned().collect())
                } else {
                    let mut appended = values.clone();
                    appended.push(option.clone());
                    self.set_open(false);
                    SelectValue::Multiple(appended)
                }
            }
        };
        self.notify(&next);
        Some(next)
    }

    /// Handle a key press as the focused widget.
    pub fn handle_key(&mut self, key: Key) -> Option<SelectValue> {
        match key {
            Key::Enter | Key::Space => {
                let was_open = self.open;
                let commit = self
                    .highlighted
                    .filter(|_| was_open)
                    .and_then(|i| self.options.get(i).cloned());
                self.set_open(!was_open);
                commit.and_then(|option| self.select_option(&option))
            }
            Key::Up | Key::Down => {
                if !self.open {
                    self.set_open(true);
                    return None;
                }
                let current = self.highlighted.map_or(-1, |i| i as isize);
                let step = if key == Key::Down { 1 } else { -1 };
                let next = current + step;
                if next >= 0 && (next as usize) < self.options.len() {
                    self.highlight(next as usize);
                }
                None
            }
            Key::Escape => {
                self.set_open(false);
                None
            }
            _ => None,
        }
    }

    fn notify(&mut self, value: &SelectValue) {
        log::debug!("select {:?} change -> {:?}", self.id, value.labels());
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Header (value, clear control, divider, caret). Grows by one row
    /// per extra line of badges.
    #[must_use]
    pub fn header_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.header_height(self.bounds.width),
        )
    }

    fn header_height(&self, width: f32) -> f32 {
        let value_width = (width - CLEAR_WIDTH - DIVIDER_WIDTH - CARET_WIDTH).max(0.0);
        let lines = self
            .badge_slots(value_width)
            .last()
            .map_or(1, |&(line, _, _)| line + 1);
        lines as f32 * self.item_height
    }

    fn controls_split(&self) -> (Rect, Rect) {
        self.header_rect()
            .split_right(CLEAR_WIDTH + DIVIDER_WIDTH + CARET_WIDTH)
    }

    /// Area showing the value text or badges.
    #[must_use]
    pub fn value_rect(&self) -> Rect {
        self.controls_split().0
    }

    /// Clear control.
    #[must_use]
    pub fn clear_rect(&self) -> Rect {
        let controls = self.controls_split().1;
        Rect::new(controls.x, controls.y, CLEAR_WIDTH, controls.height)
    }

    /// Divider between clear control and caret.
    #[must_use]
    pub fn divider_rect(&self) -> Rect {
        let controls = self.controls_split().1;
        Rect::new(
            controls.x + CLEAR_WIDTH,
            controls.y + PADDING,
            DIVIDER_WIDTH,
            2.0f32.mul_add(-PADDING, controls.height).max(0.0),
        )
    }

    /// Caret indicator.
    #[must_use]
    pub fn caret_rect(&self) -> Rect {
        let controls = self.controls_split().1;
        Rect::new(
            controls.x + CLEAR_WIDTH + DIVIDER_WIDTH,
            controls.y,
            CARET_WIDTH,
            controls.height,
        )
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * 0.6
    }

    /// `(line, x offset, width)` of each badge in a value area `width` wide.
    /// A badge that would cross the right edge starts the next line.
    fn badge_slots(&self, width: f32) -> Vec<(usize, f32, f32)> {
        let Some(values) = self.value.as_multiple() else {
            return Vec::new();
        };
        let mut slots = Vec::with_capacity(values.len());
        let (mut line, mut x) = (0, PADDING);
        for option in values {
            let badge = 2.0f32.mul_add(PADDING, self.text_width(&option.label)) + BADGE_MARK_WIDTH;
            if x > PADDING && x + badge > width {
                line += 1;
                x = PADDING;
            }
            slots.push((line, x, badge));
            x += badge + BADGE_GAP;
        }
        slots
    }

    /// Badge for the `index`-th selected option (multi-select only).
    #[must_use]
    pub fn badge_rect(&self, index: usize) -> Option<Rect> {
        let area = self.value_rect();
        let (line, x, width) = *self.badge_slots(area.width).get(index)?;
        Some(Rect::new(
            area.x + x,
            (line as f32).mul_add(self.item_height, area.y) + 4.0,
            width,
            (self.item_height - 8.0).max(0.0),
        ))
    }

    /// Option row `index` in the open list.
    #[must_use]
    pub fn option_rect(&self, index: usize) -> Option<Rect> {
        if index >= self.options.len() {
            return None;
        }
        let list = self.list_rect();
        let y = (index as f32).mul_add(self.item_height, list.y);
        Some(Rect::new(list.x, y, list.width, self.item_height))
    }

    fn list_rect(&self) -> Rect {
        let header = self.header_rect();
        Rect::new(
            header.x,
            header.bottom(),
            header.width,
            self.options.len() as f32 * self.item_height,
        )
    }

    fn option_at(&self, position: &Point) -> Option<usize> {
        let list = self.list_rect();
        if !self.open || !list.contains_point(position) {
            return None;
        }
        let index = ((position.y - list.y) / self.item_height) as usize;
        (index < self.options.len()).then_some(index)
    }

    fn badge_at(&self, position: &Point) -> Option<usize> {
        let count = self.value.as_multiple()?.len();
        (0..count).find(|&i| {
            self.badge_rect(i)
                .is_some_and(|rect| rect.contains_point(position))
        })
    }

    fn click(&mut self, position: &Point) -> Option<SelectValue> {
        if self.clear_rect().contains_point(position) {
            return Some(self.clear());
        }
        if let Some(index) = self.badge_at(position) {
            let option = self.value.selected()[index].clone();
            return self.select_option(&option);
        }
        if let Some(index) = self.option_at(position) {
            let option = self.options[index].clone();
            return self.select_option(&option);
        }
        if self.header_rect().contains_point(position) {
            self.toggle_open();
        }
        None
    }

    // =========================================================================
    // Painting
    // =========================================================================

    fn text_position(&self, rect: Rect) -> Point {
        Point::new(rect.x + PADDING, rect.y + (rect.height - self.font_size) / 2.0)
    }

    fn label_style(&self, color: Color) -> TextStyle {
        TextStyle {
            size: self.font_size,
            color,
            ..TextStyle::default()
        }
    }

    fn paint_value(&self, canvas: &mut dyn Canvas) {
        match &self.value {
            SelectValue::Single(Some(option)) => {
                let pos = self.text_position(self.value_rect());
                canvas.draw_text(&option.label, pos, &self.label_style(self.text_color));
            }
            SelectValue::Single(None) => {
                let pos = self.text_position(self.value_rect());
                canvas.draw_text(
                    &self.placeholder,
                    pos,
                    &self.label_style(self.placeholder_color),
                );
            }
            SelectValue::Multiple(values) => {
                for (i, option) in values.iter().enumerate() {
                    let Some(badge) = self.badge_rect(i) else {
                        continue;
                    };
                    canvas.stroke_rect(badge, self.border_color, 1.0);
                    canvas.draw_text(
                        &option.label,
                        self.text_position(badge),
                        &self.label_style(self.text_color),
                    );
                    let mark = Point::new(badge.right() - BADGE_MARK_WIDTH, badge.y);
                    canvas.draw_text("×", mark, &self.label_style(self.text_color));
                }
            }
        }
    }

    fn paint_controls(&self, canvas: &mut dyn Canvas) {
        let clear = self.clear_rect();
        canvas.draw_text(
            "×",
            self.text_position(clear),
            &self.label_style(self.placeholder_color),
        );

        canvas.fill_rect(self.divider_rect(), self.border_color);

        let caret = self.caret_rect();
        let c = caret.center();
        canvas.fill_polygon(
            &[c.offset(-4.0, -2.0), c.offset(4.0, -2.0), c.offset(0.0, 3.0)],
            self.placeholder_color,
        );
    }

    fn paint_list(&self, canvas: &mut dyn Canvas) {
        let list = self.list_rect();
        canvas.fill_rect(list, self.background_color);
        canvas.stroke_rect(list, self.border_color, 1.0);

        for (i, option) in self.options.iter().enumerate() {
            let Some(row) = self.option_rect(i) else {
                continue;
            };
            let state = self.row_state(i).unwrap_or_default();
            let bg = if state.selected {
                self.selected_bg_color
            } else if state.highlighted {
                self.highlight_bg_color
            } else {
                self.background_color
            };
            canvas.fill_rect(row, bg);
            canvas.draw_text(
                &option.label,
                self.text_position(row),
                &self.label_style(self.text_color),
            );
        }
    }
}

impl Widget for Select {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        // Badges wrap at the width the owner will lay us out with.
        let width = if constraints.max_width.is_finite() {
            constraints.max_width.max(self.min_width)
        } else {
            self.min_width
        };
        constraints.constrain(Size::new(self.min_width, self.header_height(width)))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let header = self.header_rect();
        canvas.fill_rect(header, self.background_color);
        let border = if self.focused {
            self.focus_color
        } else {
            self.border_color
        };
        canvas.stroke_rect(header, border, 1.0);

        self.paint_value(canvas);
        self.paint_controls(canvas);

        if self.open && !self.options.is_empty() {
            self.paint_list(canvas);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let changed = match event {
            Event::MouseMove { position } => {
                if let Some(index) = self.option_at(position) {
                    self.highlight(index);
                }
                None
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                if self.hit_area().contains_point(position) {
                    self.focused = true;
                    self.click(position)
                } else {
                    if self.focused {
                        self.blur();
                    }
                    None
                }
            }
            Event::FocusIn => {
                self.focused = true;
                None
            }
            Event::FocusOut => {
                self.blur();
                None
            }
            Event::KeyDown { key } if self.focused && self.listener.is_attached() => {
                self.handle_key(*key)
            }
            _ => None,
        };

        changed.map(|value| Box::new(SelectChanged { value }) as Box<dyn Any + Send>)
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ComboBox
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn hit_area(&self) -> Rect {
        if self.open {
            self.header_rect().union(&self.list_rect())
        } else {
            self.header_rect()
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use selecta_core::RecordingCanvas;
    use std::sync::{Arc, Mutex};

    fn needs() -> Vec<SelectOption> {
        selecta_yaml::maslow_catalog()
    }

    fn transcendence() -> SelectOption {
        needs()[7].clone()
    }

    fn esteem() -> SelectOption {
        needs()[3].clone()
    }

    fn mounted(mut select: Select) -> (Select, ListenerRegistry) {
        let registry = ListenerRegistry::new();
        select.layout(Rect::new(0.0, 0.0, 480.0, 32.0));
        select.mount(&registry);
        select.event(&Event::FocusIn);
        (select, registry)
    }

    fn single() -> (Select, ListenerRegistry) {
        mounted(Select::single(needs(), Some(needs()[0].clone())).with_id(WidgetId::new(1)))
    }

    fn multiple() -> (Select, ListenerRegistry) {
        mounted(Select::multiple(needs(), vec![transcendence()]).with_id(WidgetId::new(2)))
    }

    fn click_at(select: &mut Select, position: Point) -> Option<SelectValue> {
        select
            .event(&Event::MouseDown {
                position,
                button: MouseButton::Left,
            })
            .and_then(|msg| msg.downcast::<SelectChanged>().ok())
            .map(|msg| msg.value)
    }

    fn press(select: &mut Select, key: Key) -> Option<SelectValue> {
        select
            .event(&Event::KeyDown { key })
            .and_then(|msg| msg.downcast::<SelectChanged>().ok())
            .map(|msg| msg.value)
    }

    fn click_row(select: &mut Select, index: usize) -> Option<SelectValue> {
        let rect = select.option_rect(index).unwrap();
        click_at(select, rect.center())
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_select_single_construction() {
        let s = Select::single(needs(), None);
        assert!(!s.is_multiple());
        assert_eq!(s.get_options().len(), 8);
        assert!(!s.is_open());
        assert_eq!(s.highlighted(), None);
        assert!(!s.is_mounted());
    }

    #[test]
    fn test_select_multiple_construction() {
        let s = Select::multiple(needs(), vec![transcendence()])
            .with_test_id("needs")
            .with_accessible_name("Needs");
        assert!(s.is_multiple());
        assert_eq!(s.value().labels(), vec!["Transcendence needs"]);
        assert_eq!(Widget::test_id(&s), Some("needs"));
        assert_eq!(s.accessible_name(), Some("Needs"));
        assert_eq!(s.accessible_role(), AccessibleRole::ComboBox);
    }

    #[test]
    fn test_select_measure() {
        let s = Select::single(needs(), None).min_width(200.0).item_height(30.0);
        let size = s.measure(Constraints::loose(Size::new(400.0, 200.0)));
        assert_eq!(size, Size::new(200.0, 30.0));
    }

    #[test]
    fn test_select_min_width_fits_controls() {
        let s = Select::single(needs(), None).min_width(10.0);
        assert_eq!(s.min_width, 61.0);
    }

    // =========================================================================
    // Open / Close Tests
    // =========================================================================

    #[test]
    fn test_click_header_toggles_open() {
        let (mut s, _registry) = single();
        let body = s.value_rect().center();

        assert!(click_at(&mut s, body).is_none());
        assert!(s.is_open());
        assert!(click_at(&mut s, body).is_none());
        assert!(!s.is_open());
    }

    #[test]
    fn test_click_caret_toggles_open() {
        let (mut s, _registry) = multiple();
        let pt = s.caret_rect().center();
        click_at(&mut s, pt);
        assert!(s.is_open());
    }

    #[test]
    fn test_open_state_change_clears_highlight() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(3);
        assert_eq!(s.highlighted(), Some(3));

        s.set_open(false);
        assert_eq!(s.highlighted(), None);

        s.highlight(2);
        s.set_open(true);
        assert_eq!(s.highlighted(), None, "opening clears the highlight too");
    }

    #[test]
    fn test_focus_out_closes_and_clears() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(1);

        s.event(&Event::FocusOut);
        assert!(!s.is_open());
        assert_eq!(s.highlighted(), None);
        assert!(!s.is_focused());
    }

    #[test]
    fn test_click_outside_blurs() {
        let (mut s, _registry) = single();
        s.set_open(true);
        assert!(click_at(&mut s, Point::new(1000.0, 1000.0)).is_none());
        assert!(!s.is_open());
        assert!(!s.is_focused());
    }

    // =========================================================================
    // Clear Tests
    // =========================================================================

    #[test]
    fn test_clear_single_reports_none_without_toggle() {
        let (mut s, _registry) = single();
        let pt = s.clear_rect().center();
        let value = click_at(&mut s, pt);
        assert_eq!(value, Some(SelectValue::Single(None)));
        assert!(!s.is_open());

        s.set_open(true);
        let pt = s.clear_rect().center();
        let value = click_at(&mut s, pt);
        assert_eq!(value, Some(SelectValue::Single(None)));
        assert!(s.is_open());
    }

    #[test]
    fn test_clear_multiple_reports_empty() {
        let (mut s, _registry) = multiple();
        let pt = s.clear_rect().center();
        let value = click_at(&mut s, pt);
        assert_eq!(value, Some(SelectValue::Multiple(vec![])));
        assert!(!s.is_open());
    }

    #[test]
    fn test_widget_does_not_apply_its_own_change() {
        let (mut s, _registry) = multiple();
        let pt = s.clear_rect().center();
        click_at(&mut s, pt);
        assert_eq!(s.value().labels(), vec!["Transcendence needs"]);
    }

    // =========================================================================
    // Single Selection Tests
    // =========================================================================

    #[test]
    fn test_single_select_different_option_closes() {
        let (mut s, _registry) = single();
        s.set_open(true);
        let value = click_row(&mut s, 2);
        assert_eq!(value, Some(SelectValue::Single(Some(needs()[2].clone()))));
        assert!(!s.is_open());
    }

    #[test]
    fn test_single_select_current_option_is_noop() {
        let (mut s, _registry) = single();
        s.set_open(true);
        let value = click_row(&mut s, 0);
        assert_eq!(value, None);
        assert!(s.is_open(), "re-selecting the held option keeps the list open");
        assert_eq!(s.value(), &SelectValue::Single(Some(needs()[0].clone())));
    }

    #[test]
    fn test_single_select_from_empty() {
        let (mut s, _registry) = mounted(Select::single(needs(), None));
        let value = s.select_option(&esteem());
        assert_eq!(value, Some(SelectValue::Single(Some(esteem()))));
    }

    // =========================================================================
    // Multiple Selection Tests
    // =========================================================================

    #[test]
    fn test_multiple_append_closes() {
        let (mut s, _registry) = multiple();
        s.set_open(true);
        let value = click_row(&mut s, 3);
        assert_eq!(
            value,
            Some(SelectValue::Multiple(vec![transcendence(), esteem()]))
        );
        assert!(!s.is_open());
    }

    #[test]
    fn test_multiple_remove_keeps_open() {
        let (mut s, _registry) = multiple();
        s.set_open(true);
        let value = click_row(&mut s, 7);
        assert_eq!(value, Some(SelectValue::Multiple(vec![])));
        assert!(s.is_open());
    }

    #[test]
    fn test_badge_click_removes_without_toggle() {
        let (mut s, _registry) = multiple();
        s.set_value(SelectValue::Multiple(vec![transcendence(), esteem()]));

        let badge = s.badge_rect(0).unwrap();
        let value = click_at(&mut s, badge.center());
        assert_eq!(value, Some(SelectValue::Multiple(vec![esteem()])));
        assert!(!s.is_open(), "badge click must not reach the header toggle");
    }

    #[test]
    fn test_badges_do_not_overlap() {
        let (mut s, _registry) = multiple();
        s.set_value(SelectValue::Multiple(vec![needs()[0].clone(), needs()[1].clone()]));
        let a = s.badge_rect(0).unwrap();
        let b = s.badge_rect(1).unwrap();
        assert!(a.right() <= b.x);
        assert!(s.badge_rect(2).is_none());
    }

    fn four_needs() -> Vec<SelectOption> {
        vec![transcendence(), esteem(), needs()[0].clone(), needs()[1].clone()]
    }

    #[test]
    fn test_badges_wrap_onto_new_lines() {
        let (mut s, _registry) = multiple();
        s.set_value(SelectValue::Multiple(four_needs()));

        let rects: Vec<Rect> = (0..4).map(|i| s.badge_rect(i).unwrap()).collect();
        assert_eq!(rects[0].y, rects[1].y);
        assert_eq!(rects[2].y, rects[0].y + 32.0, "third badge starts line two");
        assert_eq!(rects[2].x, rects[0].x);
        assert!(rects[2].right() <= rects[3].x);
        assert_eq!(s.header_rect().height, 64.0);
        assert!(s.badge_rect(4).is_none());
    }

    #[test]
    fn test_wrapped_header_pushes_list_down() {
        let (mut s, _registry) = multiple();
        s.set_value(SelectValue::Multiple(four_needs()));
        s.set_open(true);

        assert_eq!(s.option_rect(0).unwrap().y, 64.0);
        assert_eq!(s.hit_area().height, 64.0 + 32.0 * 8.0);

        let row = s.option_rect(5).unwrap();
        s.event(&Event::MouseMove {
            position: row.center(),
        });
        assert_eq!(s.highlighted(), Some(5));
    }

    #[test]
    fn test_every_wrapped_badge_removes_its_option() {
        for index in 0..4 {
            let (mut s, _registry) = multiple();
            s.set_value(SelectValue::Multiple(four_needs()));

            let badge = s.badge_rect(index).unwrap();
            let value = click_at(&mut s, badge.center()).unwrap();
            let mut expected = four_needs();
            expected.remove(index);
            assert_eq!(value, SelectValue::Multiple(expected));
            assert!(!s.is_open());
        }
    }

    #[test]
    fn test_paint_draws_every_wrapped_badge() {
        let (mut s, _registry) = multiple();
        s.set_value(SelectValue::Multiple(four_needs()));
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        for option in four_needs() {
            assert!(canvas.has_text(&option.label), "{} missing", option.label);
        }
        assert_eq!(canvas.texts().iter().filter(|t| **t == "×").count(), 5);
    }

    #[test]
    fn test_measure_counts_badge_lines() {
        let s = Select::multiple(needs(), four_needs());
        let size = s.measure(Constraints::loose(Size::new(480.0, 400.0)));
        assert_eq!(size, Size::new(240.0, 64.0));

        let s = Select::multiple(needs(), vec![transcendence()]);
        let size = s.measure(Constraints::loose(Size::new(480.0, 400.0)));
        assert_eq!(size.height, 32.0);
    }

    #[test]
    fn test_badges_absent_in_single_mode() {
        let (s, _registry) = single();
        assert!(s.badge_rect(0).is_none());
    }

    #[test]
    fn test_on_change_callback_receives_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let select = Select::multiple(needs(), vec![])
            .on_change(move |v| sink.lock().unwrap().push(v.labels().len()));
        let (mut s, _registry) = mounted(select);

        s.select_option(&esteem());
        s.clear();
        assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
    }

    // =========================================================================
    // Hover Tests
    // =========================================================================

    #[test]
    fn test_hover_highlights_row() {
        let (mut s, _registry) = single();
        s.set_open(true);
        let row = s.option_rect(5).unwrap();
        s.event(&Event::MouseMove {
            position: row.center(),
        });
        assert_eq!(s.highlighted(), Some(5));
        assert_eq!(
            s.row_state(5),
            Some(RowState {
                selected: false,
                highlighted: true
            })
        );
    }

    #[test]
    fn test_hover_ignored_while_closed() {
        let (mut s, _registry) = single();
        s.event(&Event::MouseMove {
            position: Point::new(100.0, 80.0),
        });
        assert_eq!(s.highlighted(), None);
    }

    // =========================================================================
    // Keyboard Tests
    // =========================================================================

    #[test]
    fn test_arrow_down_opens_then_moves() {
        let (mut s, _registry) = single();

        press(&mut s, Key::Down);
        assert!(s.is_open());
        assert_eq!(s.highlighted(), None);

        for expected in 0..3 {
            press(&mut s, Key::Down);
            assert_eq!(s.highlighted(), Some(expected));
        }
    }

    #[test]
    fn test_arrow_up_opens_when_closed() {
        let (mut s, _registry) = single();
        press(&mut s, Key::Up);
        assert!(s.is_open());
        assert_eq!(s.highlighted(), None);
    }

    #[test]
    fn test_arrow_up_without_highlight_is_noop() {
        let (mut s, _registry) = single();
        s.set_open(true);
        press(&mut s, Key::Up);
        assert_eq!(s.highlighted(), None);
    }

    #[test]
    fn test_arrows_clamp_at_bounds() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(7);
        press(&mut s, Key::Down);
        assert_eq!(s.highlighted(), Some(7));

        s.highlight(0);
        press(&mut s, Key::Up);
        assert_eq!(s.highlighted(), Some(0));
    }

    #[test]
    fn test_enter_opens_when_closed() {
        let (mut s, _registry) = single();
        assert_eq!(press(&mut s, Key::Enter), None);
        assert!(s.is_open());
    }

    #[test]
    fn test_space_commits_highlight_and_closes() {
        let (mut s, _registry) = multiple();
        s.set_open(true);
        s.highlight(3);

        let value = press(&mut s, Key::Space);
        assert_eq!(
            value,
            Some(SelectValue::Multiple(vec![transcendence(), esteem()]))
        );
        assert!(!s.is_open());
        assert_eq!(s.highlighted(), None);
    }

    #[test]
    fn test_enter_on_selected_multi_row_removes_and_closes() {
        let (mut s, _registry) = multiple();
        s.set_open(true);
        s.highlight(7);

        let value = press(&mut s, Key::Enter);
        assert_eq!(value, Some(SelectValue::Multiple(vec![])));
        assert!(!s.is_open(), "the key toggle closes even on toggle-off");
    }

    #[test]
    fn test_enter_on_current_single_row_only_closes() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(0);
        assert_eq!(press(&mut s, Key::Enter), None);
        assert!(!s.is_open());
    }

    #[test]
    fn test_enter_without_highlight_just_closes() {
        let (mut s, _registry) = single();
        s.set_open(true);
        assert_eq!(press(&mut s, Key::Enter), None);
        assert!(!s.is_open());
    }

    #[test]
    fn test_escape_closes() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(2);
        press(&mut s, Key::Escape);
        assert!(!s.is_open());
        assert_eq!(s.highlighted(), None);
    }

    #[test]
    fn test_keys_ignored_without_focus() {
        let (mut s, _registry) = single();
        s.event(&Event::FocusOut);
        press(&mut s, Key::Down);
        assert!(!s.is_open());
    }

    #[test]
    fn test_keys_ignored_when_unmounted() {
        let (mut s, registry) = single();
        s.unmount();
        assert!(!registry.is_registered(s.id()));
        press(&mut s, Key::Enter);
        assert!(!s.is_open());
    }

    // =========================================================================
    // Listener Scope Tests
    // =========================================================================

    #[test]
    fn test_listener_reregisters_on_dependency_change() {
        let (mut s, registry) = single();
        let before = registry.total_registrations();

        press(&mut s, Key::Down);
        assert_eq!(registry.total_registrations(), before + 1, "open changed");

        press(&mut s, Key::Down);
        assert_eq!(registry.total_registrations(), before + 2, "highlight changed");

        press(&mut s, Key::Up);
        assert_eq!(registry.total_registrations(), before + 2, "clamped: no change");
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_set_options_clears_highlight() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(4);

        s.set_options(needs());
        assert_eq!(s.highlighted(), Some(4), "same list keeps the highlight");

        s.set_options(needs()[..3].to_vec());
        assert_eq!(s.highlighted(), None);
    }

    #[test]
    fn test_drop_releases_listener() {
        let (s, registry) = single();
        assert_eq!(registry.active_count(), 1);
        drop(s);
        assert_eq!(registry.active_count(), 0);
    }

    // =========================================================================
    // Paint Tests
    // =========================================================================

    #[test]
    fn test_paint_closed_single() {
        let (s, _registry) = single();
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Physiological needs"));
        assert!(canvas.has_text("×"));
        assert!(!canvas.has_text("Safety needs"), "list hidden while closed");
    }

    #[test]
    fn test_paint_placeholder_when_empty() {
        let (s, _registry) = mounted(Select::single(needs(), None).placeholder("Pick one"));
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Pick one"));
    }

    #[test]
    fn test_paint_open_list_styles_rows() {
        let (mut s, _registry) = single();
        s.set_open(true);
        s.highlight(2);

        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Transcendence needs"));
        assert_eq!(
            canvas.fill_at(s.option_rect(0).unwrap()),
            Some(s.selected_bg_color)
        );
        assert_eq!(
            canvas.fill_at(s.option_rect(2).unwrap()),
            Some(s.highlight_bg_color)
        );
        assert_eq!(
            canvas.fill_at(s.option_rect(1).unwrap()),
            Some(s.background_color)
        );
    }

    #[test]
    fn test_paint_badges_with_remove_marks() {
        let (mut s, _registry) = multiple();
        s.set_value(SelectValue::Multiple(vec![transcendence(), esteem()]));
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Transcendence needs"));
        assert!(canvas.has_text("Esteem needs"));
        // two badge marks plus the clear control
        assert_eq!(canvas.texts().iter().filter(|t| **t == "×").count(), 3);
    }

    #[test]
    fn test_hit_area_grows_when_open() {
        let (mut s, _registry) = single();
        assert_eq!(s.hit_area(), s.header_rect());
        s.set_open(true);
        assert_eq!(s.hit_area().height, 32.0 * 9.0);
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        #[test]
        fn prop_arrow_navigation_stays_in_range(keys in prop::collection::vec(prop::bool::ANY, 0..40)) {
            let (mut s, _registry) = single();
            for down in keys {
                press(&mut s, if down { Key::Down } else { Key::Up });
                if let Some(i) = s.highlighted() {
                    prop_assert!(i < s.get_options().len());
                }
            }
        }

        #[test]
        fn prop_multi_toggle_semantics(picks in prop::collection::vec(0usize..8, 1..20), open in prop::bool::ANY) {
            let (mut s, _registry) = multiple();
            for index in picks {
                s.set_open(open);
                let option = needs()[index].clone();
                let was_present = s.value().contains(&option);
                let before = s.value().selected().to_vec();

                let next = s.select_option(&option).expect("multi always reports");
                let values = next.as_multiple().expect("variant preserved").to_vec();

                if was_present {
                    prop_assert!(!values.contains(&option));
                    prop_assert_eq!(values.len(), before.len() - 1);
                    prop_assert_eq!(s.is_open(), open);
                } else {
                    prop_assert_eq!(values.last(), Some(&option));
                    prop_assert_eq!(values.len(), before.len() + 1);
                    prop_assert!(!s.is_open());
                }
                s.set_value(next);
            }
        }

        #[test]
        fn prop_single_select_semantics(picks in prop::collection::vec(0usize..8, 1..20), open in prop::bool::ANY) {
            let (mut s, _registry) = single();
            for index in picks {
                s.set_open(open);
                let option = needs()[index].clone();
                let held = s.value().contains(&option);

                match s.select_option(&option) {
                    None => {
                        prop_assert!(held);
                        prop_assert_eq!(s.is_open(), open);
                    }
                    Some(next) => {
                        prop_assert!(!held);
                        prop_assert_eq!(&next, &SelectValue::Single(Some(option)));
                        prop_assert!(!s.is_open());
                        s.set_value(next);
                    }
                }
            }
        }

        #[test]
        fn prop_clear_never_toggles(open in prop::bool::ANY, multi in prop::bool::ANY) {
            let (mut s, _registry) = if multi { multiple() } else { single() };
            s.set_open(open);
            let pt = s.clear_rect().center();
            let cleared = click_at(&mut s, pt).expect("clear reports");
            prop_assert!(cleared.is_empty());
            prop_assert_eq!(cleared.is_multiple(), multi);
            prop_assert_eq!(s.is_open(), open);
        }
    }
}
