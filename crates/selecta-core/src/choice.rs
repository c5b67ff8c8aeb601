//! Option and value types shared by selection widgets and manifests.
//!
//! A [`SelectValue`] is a tagged union over the two selection modes, so a
//! single-select can never hold a list and a multi-select can never hold
//! "nothing" as anything other than an empty list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value carried by an option: text or an integer.
///
/// Serialized untagged, so `value: 4` and `value: "four"` both parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Integer value
    Number(i64),
    /// Text value
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    /// Display label
    pub label: String,
    /// Value reported to the owner
    pub value: OptionValue,
}

impl SelectOption {
    /// Create a new option.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Create an option with an integer value.
    #[must_use]
    pub fn numbered(label: impl Into<String>, value: i64) -> Self {
        Self::new(label, OptionValue::Number(value))
    }

    /// Create an option where value equals label.
    #[must_use]
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: OptionValue::Text(text.clone()),
            label: text,
        }
    }
}

/// Current value of a selection widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectValue {
    /// Single-select: at most one option
    Single(Option<SelectOption>),
    /// Multi-select: ordered options without duplicates
    Multiple(Vec<SelectOption>),
}

impl SelectValue {
    /// Empty single-select value.
    #[must_use]
    pub const fn single_empty() -> Self {
        Self::Single(None)
    }

    /// Empty multi-select value.
    #[must_use]
    pub const fn multiple_empty() -> Self {
        Self::Multiple(Vec::new())
    }

    /// Whether this is the multi-select variant.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// The empty value of the same variant.
    #[must_use]
    pub const fn cleared(&self) -> Self {
        match self {
            Self::Single(_) => Self::single_empty(),
            Self::Multiple(_) => Self::multiple_empty(),
        }
    }

    /// Whether `option` is part of the value.
    #[must_use]
    pub fn contains(&self, option: &SelectOption) -> bool {
        match self {
            Self::Single(current) => current.as_ref() == Some(option),
            Self::Multiple(values) => values.contains(option),
        }
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(current) => current.is_none(),
            Self::Multiple(values) => values.is_empty(),
        }
    }

    /// Selected options in order.
    #[must_use]
    pub fn selected(&self) -> &[SelectOption] {
        match self {
            Self::Single(current) => current.as_slice(),
            Self::Multiple(values) => values,
        }
    }

    /// Labels of the selected options in order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.selected().iter().map(|o| o.label.as_str()).collect()
    }

    /// Multi-select payload, if this is the multiple variant.
    #[must_use]
    pub fn as_multiple(&self) -> Option<&[SelectOption]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(values) => Some(values),
        }
    }
}
