//! Demo form: a nickname field and one or two selects over a shared catalog.
//!
//! The container owns the authoritative [`FormState`] in a [`Store`]. Child
//! widgets report changes as messages; the container dispatches them into
//! the store and pushes the new values back into the selects.

use crate::button::{Button, ButtonClicked};
use crate::select::{Select, SelectChanged};
use crate::text_input::{TextChanged, TextInput, TextSubmitted};
use selecta_core::{
    widget::{AccessibleRole, LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, FormValidator, Key, ListenerRegistry,
    MouseButton, Point, Rect, SelectOption, SelectValue, Size, State, Store, TypeId, Widget,
    WidgetId,
};
use selecta_yaml::{FormManifest, FormVariant};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Field name the nickname rules are registered under.
pub const NICKNAME: &str = "nickname";

/// Authoritative form values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormState {
    /// Nickname text
    pub nickname: String,
    /// Value of the single select
    pub option: Option<SelectOption>,
    /// Value of the multi select; absent in the single-select variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl FormState {
    /// Initial values for `manifest`: empty nickname, first catalog entry,
    /// and the last catalog entry for the multi select.
    #[must_use]
    pub fn initial(manifest: &FormManifest) -> Self {
        Self {
            nickname: String::new(),
            option: manifest.default_option(),
            options: (manifest.variant == FormVariant::Dual).then(|| manifest.default_options()),
        }
    }
}

/// Form state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    /// Nickname text changed
    NicknameChanged(String),
    /// Single select reported a value
    OptionChanged(Option<SelectOption>),
    /// Multi select reported a value
    OptionsChanged(Vec<SelectOption>),
}

impl From<SelectValue> for FormMessage {
    fn from(value: SelectValue) -> Self {
        match value {
            SelectValue::Single(option) => Self::OptionChanged(option),
            SelectValue::Multiple(options) => Self::OptionsChanged(options),
        }
    }
}

impl State for FormState {
    type Message = FormMessage;

    fn update(&mut self, msg: FormMessage) {
        match msg {
            FormMessage::NicknameChanged(nickname) => self.nickname = nickname,
            FormMessage::OptionChanged(option) => self.option = option,
            FormMessage::OptionsChanged(options) => {
                if self.options.is_some() {
                    self.options = Some(options);
                }
            }
        }
    }
}

/// Destination for accepted submissions.
pub trait SubmitSink: Send + Sync {
    /// Receive a valid form state.
    fn submit(&mut self, state: &FormState);
}

impl<F> SubmitSink for F
where
    F: FnMut(&FormState) + Send + Sync,
{
    fn submit(&mut self, state: &FormState) {
        self(state);
    }
}

/// Sink that logs each submission as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SubmitSink for LogSink {
    fn submit(&mut self, state: &FormState) {
        match serde_json::to_string(state) {
            Ok(json) => log::info!("submitted {json}"),
            Err(e) => log::warn!("submitted form could not be encoded: {e}"),
        }
    }
}

/// Sink that keeps every submission. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    submissions: Arc<Mutex<Vec<FormState>>>,
}

impl CollectSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All accepted submissions so far.
    #[must_use]
    pub fn submissions(&self) -> Vec<FormState> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SubmitSink for CollectSink {
    fn submit(&mut self, state: &FormState) {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state.clone());
    }
}

/// Message emitted when a valid form was handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmitted {
    /// Submitted values
    pub state: FormState,
}

/// Message emitted when submission failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRejected {
    /// Errors keyed by field name
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The sink received the state
    Submitted(FormState),
    /// Validation failed; the sink was not called
    Rejected(BTreeMap<String, Vec<String>>),
}

impl SubmitOutcome {
    /// Whether the submission reached the sink.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// Box as the message a submit click emits.
    #[must_use]
    pub fn into_message(self) -> Box<dyn Any + Send> {
        match self {
            Self::Submitted(state) => Box::new(FormSubmitted { state }),
            Self::Rejected(errors) => Box::new(FormRejected { errors }),
        }
    }
}

/// Focusable parts of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Nickname text input
    Nickname,
    /// Single select
    Option,
    /// Multi select
    Options,
    /// Submit button
    Submit,
}

const PADDING: f32 = 16.0;
const GAP: f32 = 12.0;
const ERROR_HEIGHT: f32 = 18.0;

/// Form container widget.
pub struct FormContainer {
    store: Store<FormState>,
    initial: FormState,
    validator: FormValidator,
    registry: ListenerRegistry,
    nickname: TextInput,
    option: Select,
    options: Option<Select>,
    submit: Button,
    focused: Option<Field>,
    sink: Box<dyn SubmitSink>,
    last_outcome: Option<SubmitOutcome>,
    error_color: Color,
    bounds: Rect,
}

impl std::fmt::Debug for FormContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContainer")
            .field("state", self.store.state())
            .field("focused", &self.focused)
            .field("option", &self.option)
            .field("options", &self.options)
            .field("last_outcome", &self.last_outcome)
            .finish_non_exhaustive()
    }
}

impl Default for FormContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl FormContainer {
    /// Form over the built-in Maslow catalog with both selects.
    #[must_use]
    pub fn new() -> Self {
        Self::from_manifest(&FormManifest::default())
    }

    /// Build the form a manifest describes. Selects are mounted right away.
    #[must_use]
    pub fn from_manifest(manifest: &FormManifest) -> Self {
        let initial = FormState::initial(manifest);
        let registry = ListenerRegistry::new();

        let mut validator = FormValidator::new();
        validator.register(NICKNAME, manifest.nickname.field_config());

        let mut nickname = TextInput::new()
            .placeholder(&manifest.nickname.placeholder)
            .with_test_id(NICKNAME);
        if let Some(max) = manifest.nickname.max_length {
            nickname = nickname.max_length(max);
        }

        let mut option = Select::single(manifest.catalog.clone(), initial.option.clone())
            .with_id(WidgetId::new(1))
            .with_test_id("option");
        let mut options = initial.options.clone().map(|values| {
            Select::multiple(manifest.catalog.clone(), values)
                .with_id(WidgetId::new(2))
                .with_test_id("options")
        });

        let mut submit = Button::new("Submit").with_test_id("submit");
        if let Some(accent) = manifest.accent() {
            nickname = nickname.focus_border_color(accent);
            submit = submit.background(accent);
            option = option.accent_color(accent);
            options = options.map(|s| s.accent_color(accent));
        }

        option.mount(&registry);
        if let Some(select) = options.as_mut() {
            select.mount(&registry);
        }

        log::debug!(
            "form '{}' built with {} options ({:?})",
            manifest.name,
            manifest.catalog.len(),
            manifest.variant
        );

        Self {
            store: Store::new(initial.clone()),
            initial,
            validator,
            registry,
            nickname,
            option,
            options,
            submit,
            focused: None,
            sink: Box::new(LogSink),
            last_outcome: None,
            error_color: Color::new(0.86, 0.15, 0.15, 1.0),
            bounds: Rect::default(),
        }
    }

    /// Replace the submit sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl SubmitSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Current form values.
    #[must_use]
    pub const fn state(&self) -> &FormState {
        self.store.state()
    }

    /// Observe every state change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&FormState) + Send + Sync + 'static,
    {
        self.store.subscribe(callback);
    }

    /// Registry the selects listen through.
    #[must_use]
    pub const fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Whether every field currently validates.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validator.is_valid()
    }

    /// Current nickname errors.
    #[must_use]
    pub fn nickname_errors(&self) -> &[String] {
        self.validator.errors(NICKNAME)
    }

    /// Outcome of the most recent submit attempt.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    /// Field holding keyboard focus.
    #[must_use]
    pub const fn focused(&self) -> Option<Field> {
        self.focused
    }

    /// Nickname input.
    #[must_use]
    pub const fn nickname_input(&self) -> &TextInput {
        &self.nickname
    }

    /// Single select.
    #[must_use]
    pub const fn option_select(&self) -> &Select {
        &self.option
    }

    /// Multi select, present in the dual variant.
    #[must_use]
    pub const fn options_select(&self) -> Option<&Select> {
        self.options.as_ref()
    }

    /// Submit button.
    #[must_use]
    pub const fn submit_button(&self) -> &Button {
        &self.submit
    }

    /// Fields in tab order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::Nickname, Field::Option];
        if self.options.is_some() {
            fields.push(Field::Options);
        }
        fields.push(Field::Submit);
        fields
    }

    fn widget(&self, field: Field) -> Option<&dyn Widget> {
        match field {
            Field::Nickname => Some(&self.nickname),
            Field::Option => Some(&self.option),
            Field::Options => self.options.as_ref().map(|s| s as &dyn Widget),
            Field::Submit => Some(&self.submit),
        }
    }

    fn widget_mut(&mut self, field: Field) -> Option<&mut dyn Widget> {
        match field {
            Field::Nickname => Some(&mut self.nickname),
            Field::Option => Some(&mut self.option),
            Field::Options => self.options.as_mut().map(|s| s as &mut dyn Widget),
            Field::Submit => Some(&mut self.submit),
        }
    }

    // =========================================================================
    // State updates
    // =========================================================================

    /// Apply a message to the store and push the result into the children.
    pub fn dispatch(&mut self, msg: FormMessage) {
        log::debug!("form dispatch {msg:?}");
        if let FormMessage::NicknameChanged(nickname) = &msg {
            self.validator.set_value(NICKNAME, nickname);
        }
        self.store.dispatch(msg);
        self.sync_children();
    }

    fn sync_children(&mut self) {
        let state = self.store.state();
        self.option.set_value(SelectValue::Single(state.option.clone()));
        if let (Some(select), Some(values)) = (self.options.as_mut(), state.options.as_ref()) {
            select.set_value(SelectValue::Multiple(values.clone()));
        }
        // Badge lines change the multi select's height.
        self.layout(self.bounds);
    }

    /// Validate and hand the state to the sink when valid.
    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = if self.validator.validate() {
            let state = self.store.state().clone();
            log::info!("form submitted by '{}'", state.nickname);
            self.sink.submit(&state);
            SubmitOutcome::Submitted(state)
        } else {
            let errors = self.validator.all_errors();
            log::warn!("form rejected: {errors:?}");
            SubmitOutcome::Rejected(errors)
        };
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Restore initial values and clear validation and interaction state.
    pub fn reset(&mut self) {
        self.store.replace(self.initial.clone());
        self.validator.reset();
        self.nickname.set_value("");
        self.option.set_open(false);
        if let Some(select) = self.options.as_mut() {
            select.set_open(false);
        }
        self.last_outcome = None;
        self.sync_children();
        log::debug!("form reset");
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to `field`, blurring the previous holder.
    pub fn focus(&mut self, field: Option<Field>) {
        if self.focused == field {
            return;
        }
        if let Some(previous) = self.focused.take() {
            if let Some(widget) = self.widget_mut(previous) {
                widget.event(&Event::FocusOut);
            }
            if previous == Field::Nickname {
                self.validator.touch(NICKNAME);
            }
        }
        if let Some(next) = field {
            if let Some(widget) = self.widget_mut(next) {
                widget.event(&Event::FocusIn);
                self.focused = Some(next);
            }
        }
        log::trace!("form focus -> {:?}", self.focused);
    }

    fn focus_next(&mut self) {
        let fields = self.fields();
        let next = match self.focused.and_then(|f| fields.iter().position(|x| *x == f)) {
            Some(i) => fields[(i + 1) % fields.len()],
            None => fields[0],
        };
        self.focus(Some(next));
    }

    fn field_at(&self, position: &Point) -> Option<Field> {
        let hit = |field: &Field| {
            self.widget(*field)
                .is_some_and(|w| w.hit_area().contains_point(position))
        };
        let open_first = [Field::Option, Field::Options].into_iter().find(|f| {
            let open = match f {
                Field::Option => self.option.is_open(),
                _ => self.options.as_ref().is_some_and(Select::is_open),
            };
            open && hit(f)
        });
        open_first.or_else(|| self.fields().into_iter().find(|f| hit(f)))
    }

    // =========================================================================
    // Routing
    // =========================================================================

    fn forward(&mut self, field: Field, event: &Event) -> Option<Box<dyn Any + Send>> {
        let msg = self.widget_mut(field)?.event(event)?;
        self.handle_child_message(msg)
    }

    fn handle_child_message(&mut self, msg: Box<dyn Any + Send>) -> Option<Box<dyn Any + Send>> {
        let msg = match msg.downcast::<TextChanged>() {
            Ok(changed) => {
                self.dispatch(FormMessage::NicknameChanged(changed.value));
                return None;
            }
            Err(other) => other,
        };
        let msg = match msg.downcast::<SelectChanged>() {
            Ok(changed) => {
                self.dispatch(changed.value.into());
                return None;
            }
            Err(other) => other,
        };
        if msg.is::<TextSubmitted>() || msg.is::<ButtonClicked>() {
            return Some(self.submit().into_message());
        }
        None
    }

    // =========================================================================
    // Painting helpers
    // =========================================================================

    fn error_rect(&self) -> Rect {
        let input = self.nickname.bounds();
        Rect::new(input.x, input.bottom() + 2.0, input.width, ERROR_HEIGHT)
    }

    fn selects(&self) -> impl Iterator<Item = &Select> {
        std::iter::once(&self.option).chain(self.options.as_ref())
    }
}

impl Widget for FormContainer {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let inner = Constraints::new(
            0.0,
            (constraints.max_width - 2.0 * PADDING).max(0.0),
            0.0,
            f32::INFINITY,
        );
        let mut width: f32 = 0.0;
        let mut height = 2.0 * PADDING + ERROR_HEIGHT;
        let fields = self.fields();
        for field in &fields {
            if let Some(widget) = self.widget(*field) {
                let size = widget.measure(inner);
                width = width.max(size.width);
                height += size.height;
            }
        }
        height += GAP * (fields.len().saturating_sub(1)) as f32;
        constraints.constrain(Size::new(2.0f32.mul_add(PADDING, width), height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        let width = (bounds.width - 2.0 * PADDING).max(0.0);
        let inner = Constraints::new(0.0, width, 0.0, f32::INFINITY);
        let x = bounds.x + PADDING;
        let mut y = bounds.y + PADDING;

        for field in self.fields() {
            let Some(widget) = self.widget_mut(field) else {
                continue;
            };
            let size = widget.measure(inner);
            let child_width = if field == Field::Submit { size.width } else { width };
            widget.layout(Rect::new(x, y, child_width, size.height));
            y += size.height + GAP;
            if field == Field::Nickname {
                y += ERROR_HEIGHT;
            }
        }

        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        self.nickname.paint(canvas);
        if let Some(error) = self.validator.field(NICKNAME).and_then(|f| {
            (f.validated && !f.is_valid()).then(|| f.first_error()).flatten()
        }) {
            let rect = self.error_rect();
            let style = TextStyle {
                size: 12.0,
                color: self.error_color,
                ..TextStyle::default()
            };
            canvas.draw_text(error, rect.origin(), &style);
        }
        self.submit.paint(canvas);

        // Open lists overlap the widgets below them.
        for select in self.selects().filter(|s| !s.is_open()) {
            select.paint(canvas);
        }
        for select in self.selects().filter(|s| s.is_open()) {
            select.paint(canvas);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                let target = self.field_at(position);
                self.focus(target);
                target.and_then(|field| self.forward(field, event))
            }
            Event::MouseUp { .. } => self.forward(Field::Submit, event),
            Event::MouseMove { .. } => {
                self.forward(Field::Option, event);
                if self.options.is_some() {
                    self.forward(Field::Options, event);
                }
                self.forward(Field::Submit, event);
                None
            }
            Event::KeyDown { key: Key::Tab } => {
                self.focus_next();
                None
            }
            Event::KeyDown { .. } | Event::KeyUp { .. } | Event::TextInput { .. } => {
                let field = self.focused?;
                self.forward(field, event)
            }
            Event::FocusOut => {
                self.focus(None);
                None
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Form
    }

    fn test_id(&self) -> Option<&str> {
        Some("form")
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
