//! Field validation for forms and inputs.
//!
//! Only the rules the form layer needs: required and length bounds, run on
//! every change (or on blur / submit, per field).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validation result for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Validation passed.
    Valid,
    /// Validation failed with an error message.
    Invalid(String),
}

impl ValidationResult {
    /// Check if validation passed.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Get the error message if invalid.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Invalid(msg) => Some(msg),
            Self::Valid => None,
        }
    }
}

/// A validator that can validate a string value.
pub trait Validator: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &str) -> ValidationResult;

    /// Get the name of this validator.
    fn name(&self) -> &str;
}

/// Required field validator. Fails only on the empty string.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    /// Create a required validator with default message.
    pub fn new() -> Self {
        Self::with_message("This field is required")
    }

    /// Create with custom message.
    pub fn with_message(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() {
            ValidationResult::Invalid(self.message.clone())
        } else {
            ValidationResult::Valid
        }
    }

    fn name(&self) -> &'static str {
        "required"
    }
}

/// Minimum length validator, counted in characters.
#[derive(Debug, Clone)]
pub struct MinLength {
    min: usize,
    message: String,
}

impl MinLength {
    /// Create a min length validator.
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: format!("Must be at least {min} characters"),
        }
    }
}

impl Validator for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        // An empty value is the Required rule's concern.
        if !value.is_empty() && value.chars().count() < self.min {
            ValidationResult::Invalid(self.message.clone())
        } else {
            ValidationResult::Valid
        }
    }

    fn name(&self) -> &'static str {
        "minLength"
    }
}

/// Maximum length validator, counted in characters.
#[derive(Debug, Clone)]
pub struct MaxLength {
    max: usize,
    message: String,
}

impl MaxLength {
    /// Create a max length validator.
    pub fn new(max: usize) -> Self {
        Self {
            max,
            message: format!("Must be at most {max} characters"),
        }
    }
}

impl Validator for MaxLength {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.chars().count() > self.max {
            ValidationResult::Invalid(self.message.clone())
        } else {
            ValidationResult::Valid
        }
    }

    fn name(&self) -> &'static str {
        "maxLength"
    }
}

/// When to run validation. Submitting always validates every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidateOn {
    /// Validate on value change.
    #[default]
    Change,
    /// Validate on blur.
    Blur,
    /// Validate only on submit.
    Submit,
}

/// Configuration for a validated field.
#[derive(Default)]
pub struct FieldConfig {
    validators: Vec<Box<dyn Validator>>,
    validate_on: ValidateOn,
}

impl std::fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("FieldConfig")
            .field("validators", &names)
            .field("validate_on", &self.validate_on)
            .finish()
    }
}

impl FieldConfig {
    /// Create a new field config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator.
    pub fn add_validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Add required validator.
    pub fn required(self) -> Self {
        self.add_validator(Required::new())
    }

    /// Add min length validator.
    pub fn min_length(self, min: usize) -> Self {
        self.add_validator(MinLength::new(min))
    }

    /// Add max length validator.
    pub fn max_length(self, max: usize) -> Self {
        self.add_validator(MaxLength::new(max))
    }

    /// Set validation trigger.
    pub const fn validate_on(mut self, trigger: ValidateOn) -> Self {
        self.validate_on = trigger;
        self
    }

    /// Run all validators on a value and collect error messages.
    pub fn validate(&self, value: &str) -> Vec<String> {
        self.validators
            .iter()
            .filter_map(|v| match v.validate(value) {
                ValidationResult::Invalid(msg) => Some(msg),
                ValidationResult::Valid => None,
            })
            .collect()
    }
}

/// Field validation state.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    /// Current value.
    pub value: String,
    /// Latest validation errors.
    pub errors: Vec<String>,
    /// Whether validation has run at least once.
    pub validated: bool,
}

impl FieldState {
    /// Check if the field passed its last validation.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error message, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Form validation state manager.
#[derive(Debug, Default)]
pub struct FormValidator {
    configs: BTreeMap<String, FieldConfig>,
    states: BTreeMap<String, FieldState>,
}

impl FormValidator {
    /// Create a new form validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field and validate its initial (empty) value silently.
    ///
    /// The initial errors count for [`is_valid`](Self::is_valid), the same
    /// way a required field is invalid before anyone types into it.
    pub fn register(&mut self, name: &str, config: FieldConfig) {
        let state = FieldState {
            errors: config.validate(""),
            ..FieldState::default()
        };
        self.configs.insert(name.to_string(), config);
        self.states.insert(name.to_string(), state);
    }

    /// Set field value, validating it when the field validates on change.
    pub fn set_value(&mut self, name: &str, value: &str) {
        let (Some(state), Some(config)) = (self.states.get_mut(name), self.configs.get(name))
        else {
            return;
        };
        state.value = value.to_string();
        if config.validate_on == ValidateOn::Change {
            state.errors = config.validate(value);
            state.validated = true;
        }
    }

    /// The field lost focus: validate it when the field validates on blur.
    pub fn touch(&mut self, name: &str) {
        let (Some(state), Some(config)) = (self.states.get_mut(name), self.configs.get(name))
        else {
            return;
        };
        if config.validate_on == ValidateOn::Blur {
            state.errors = config.validate(&state.value);
            state.validated = true;
        }
    }

    /// Get field state.
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.states.get(name)
    }

    /// Get field errors.
    pub fn errors(&self, name: &str) -> &[String] {
        self.states.get(name).map_or(&[], |s| s.errors.as_slice())
    }

    /// Validate all fields and return overall validity.
    pub fn validate(&mut self) -> bool {
        for (name, config) in &self.configs {
            if let Some(state) = self.states.get_mut(name) {
                state.errors = config.validate(&state.value);
                state.validated = true;
            }
        }
        self.is_valid()
    }

    /// Check if every field passes its latest validation.
    pub fn is_valid(&self) -> bool {
        self.states.values().all(FieldState::is_valid)
    }

    /// All validation errors keyed by field name, sorted by name.
    pub fn all_errors(&self) -> BTreeMap<String, Vec<String>> {
        self.states
            .iter()
            .filter(|(_, s)| !s.errors.is_empty())
            .map(|(k, s)| (k.clone(), s.errors.clone()))
            .collect()
    }

    /// Reset all fields to empty and re-run the silent initial validation.
    pub fn reset(&mut self) {
        for (name, state) in &mut self.states {
            *state = FieldState {
                errors: self
                    .configs
                    .get(name)
                    .map(|c| c.validate(""))
                    .unwrap_or_default(),
                ..FieldState::default()
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nickname_form() -> FormValidator {
        let mut form = FormValidator::new();
        form.register("nickname", FieldConfig::new().required().min_length(3));
        form
    }

    // =========================================================================
    // Validator Tests
    // =========================================================================

    #[test]
    fn test_required_fails_only_on_empty() {
        let v = Required::new();
        assert!(!v.validate("").is_valid());
        assert!(v.validate(" ").is_valid());
        assert!(v.validate("abc").is_valid());
        assert_eq!(v.validate("").error(), Some("This field is required"));
    }

    #[test]
    fn test_min_length_counts_chars() {
        let v = MinLength::new(3);
        assert!(!v.validate("ab").is_valid());
        assert!(v.validate("abc").is_valid());
        assert!(v.validate("日本語").is_valid());
        assert!(v.validate("").is_valid());
    }

    #[test]
    fn test_max_length() {
        let v = MaxLength::new(2);
        assert!(v.validate("ab").is_valid());
        assert_eq!(v.validate("abc").error(), Some("Must be at most 2 characters"));
    }

    #[test]
    fn test_field_config_collects_all_errors() {
        let config = FieldConfig::new().required().min_length(3);
        assert_eq!(config.validate(""), vec!["This field is required"]);
        assert_eq!(config.validate("ab"), vec!["Must be at least 3 characters"]);
        assert!(config.validate("abc").is_empty());
    }

    // =========================================================================
    // FormValidator Tests
    // =========================================================================

    #[test]
    fn test_form_starts_invalid_when_required_is_empty() {
        let form = nickname_form();
        assert!(!form.is_valid());
        assert!(!form.field("nickname").unwrap().validated);
    }

    #[test]
    fn test_form_validates_on_change() {
        let mut form = nickname_form();

        form.set_value("nickname", "ab");
        assert!(!form.is_valid());
        assert_eq!(
            form.field("nickname").unwrap().first_error(),
            Some("Must be at least 3 characters")
        );

        form.set_value("nickname", "abc");
        assert!(form.is_valid());
        assert!(form.errors("nickname").is_empty());
    }

    #[test]
    fn test_form_validates_on_blur_only_when_configured() {
        let mut form = FormValidator::new();
        form.register(
            "nickname",
            FieldConfig::new().min_length(3).validate_on(ValidateOn::Blur),
        );

        form.set_value("nickname", "ab");
        assert!(form.is_valid(), "no validation before blur");

        form.touch("nickname");
        assert!(!form.is_valid());
        assert!(form.field("nickname").unwrap().validated);
    }

    #[test]
    fn test_submit_trigger_waits_for_validate() {
        let mut form = FormValidator::new();
        form.register(
            "nickname",
            FieldConfig::new().min_length(3).validate_on(ValidateOn::Submit),
        );

        form.set_value("nickname", "ab");
        form.touch("nickname");
        assert!(form.is_valid());
        assert!(!form.field("nickname").unwrap().validated);

        assert!(!form.validate());
    }

    #[test]
    fn test_touch_is_noop_for_change_trigger() {
        let mut form = nickname_form();
        form.touch("nickname");
        assert!(!form.field("nickname").unwrap().validated);
    }

    #[test]
    fn test_validate_on_names() {
        let trigger: ValidateOn = serde_json::from_str("\"blur\"").unwrap();
        assert_eq!(trigger, ValidateOn::Blur);
        assert_eq!(serde_json::to_string(&ValidateOn::Submit).unwrap(), "\"submit\"");
    }

    #[test]
    fn test_form_validate_collects_errors() {
        let mut form = nickname_form();
        assert!(!form.validate());
        assert!(form.field("nickname").unwrap().validated);
        assert_eq!(
            form.all_errors().get("nickname").map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn test_form_reset() {
        let mut form = nickname_form();
        form.set_value("nickname", "valid");
        form.validate();
        form.reset();

        assert!(!form.field("nickname").unwrap().validated);
        assert_eq!(form.field("nickname").unwrap().value, "");
        assert!(!form.is_valid());
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut form = nickname_form();
        form.set_value("email", "x");
        form.touch("email");
        assert!(form.field("email").is_none());
        assert!(form.errors("email").is_empty());
    }
}
