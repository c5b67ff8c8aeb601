//! Core types and traits for the Selecta widget toolkit.
//!
//! This crate provides foundational types used throughout Selecta:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Colors and layout constraints: [`Color`], [`Constraints`]
//! - Events and the [`Widget`] trait
//! - Selection data: [`SelectOption`], [`SelectValue`]
//! - State holders: [`State`], [`Store`]
//! - Scoped listener registrations: [`ListenerRegistry`], [`ScopedListener`]
//! - Field validation: [`FormValidator`]

mod canvas;
mod choice;
mod color;
mod constraints;
mod event;
mod geometry;
pub mod lifecycle;
mod state;
pub mod validation;
pub mod widget;

pub use canvas::{DrawCommand, RecordingCanvas};
pub use choice::{OptionValue, SelectOption, SelectValue};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use lifecycle::{HookId, ListenerGuard, ListenerRegistry, ScopedListener};
pub use state::{State, Store};
pub use validation::{FieldConfig, FormValidator, ValidateOn, ValidationResult};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, TypeId, Widget, WidgetId,
};
