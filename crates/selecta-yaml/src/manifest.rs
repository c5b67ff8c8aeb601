//! YAML form manifest.

use crate::error::ParseError;
use selecta_core::{Color, FieldConfig, SelectOption, ValidateOn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Form description loaded from a manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormManifest {
    /// Form name
    pub name: String,
    /// Which selects the form shows
    #[serde(default)]
    pub variant: FormVariant,
    /// Nickname field rules
    #[serde(default)]
    pub nickname: NicknameRules,
    /// Options offered by every select
    #[serde(default = "maslow_catalog")]
    pub catalog: Vec<SelectOption>,
    /// Theme configuration
    #[serde(default)]
    pub theme: Option<ThemeConfig>,
}

/// Which selects the form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// One single-select
    Single,
    /// A single-select and a multi-select over the same catalog
    #[default]
    Dual,
}

/// Validation rules for the nickname field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicknameRules {
    /// Placeholder shown while empty
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Whether an empty nickname is rejected
    #[serde(default = "default_required")]
    pub required: bool,
    /// Minimum length in characters
    #[serde(default = "default_min_length")]
    pub min_length: Option<usize>,
    /// Maximum length in characters
    #[serde(default)]
    pub max_length: Option<usize>,
    /// When edits are validated: `change`, `blur` or `submit`
    #[serde(default)]
    pub validate_on: ValidateOn,
}

fn default_placeholder() -> String {
    "enter nickname".to_string()
}

const fn default_required() -> bool {
    true
}

#[allow(clippy::unnecessary_wraps)]
const fn default_min_length() -> Option<usize> {
    Some(3)
}

impl Default for NicknameRules {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            required: default_required(),
            min_length: default_min_length(),
            max_length: None,
            validate_on: ValidateOn::Change,
        }
    }
}

impl NicknameRules {
    /// Validator configuration for the nickname field.
    #[must_use]
    pub fn field_config(&self) -> FieldConfig {
        let mut config = FieldConfig::new();
        if self.required {
            config = config.required();
        }
        if let Some(min) = self.min_length {
            config = config.min_length(min);
        }
        if let Some(max) = self.max_length {
            config = config.max_length(max);
        }
        config.validate_on(self.validate_on)
    }
}

/// Theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Accent color as `#rrggbb`
    #[serde(default)]
    pub accent: Option<String>,
}

impl ThemeConfig {
    /// Parsed accent color, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the accent is not a hex color.
    pub fn accent_color(&self) -> Result<Option<Color>, ParseError> {
        Ok(self.accent.as_deref().map(Color::from_hex).transpose()?)
    }
}

/// The eight levels of Maslow's hierarchy of needs, numbered 1 to 8.
#[must_use]
pub fn maslow_catalog() -> Vec<SelectOption> {
    [
        "Physiological needs",
        "Safety needs",
        "Love and social needs",
        "Esteem needs",
        "Cognitive needs",
        "Aesthetic needs",
        "Self-actualization",
        "Transcendence needs",
    ]
    .into_iter()
    .zip(1..)
    .map(|(label, value)| SelectOption::numbered(label, value))
    .collect()
}

impl Default for FormManifest {
    fn default() -> Self {
        Self {
            name: "maslow-demo".to_string(),
            variant: FormVariant::Dual,
            nickname: NicknameRules::default(),
            catalog: maslow_catalog(),
            theme: None,
        }
    }
}

impl FormManifest {
    /// Parse and validate a manifest from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or the manifest fails
    /// [`validate`](Self::validate).
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the manifest for values the form cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.name.trim().is_empty() {
            return Err(ParseError::Validation("name is empty".to_string()));
        }
        if self.catalog.is_empty() {
            return Err(ParseError::invalid("catalog", "must not be empty"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.catalog.iter().find(|o| !seen.insert(*o)) {
            return Err(ParseError::invalid(
                "catalog",
                format!("duplicate option '{}'", dup.label),
            ));
        }
        if let (Some(min), Some(max)) = (self.nickname.min_length, self.nickname.max_length) {
            if min > max {
                return Err(ParseError::invalid(
                    "nickname.min_length",
                    format!("{min} exceeds max_length {max}"),
                ));
            }
        }
        if let Some(theme) = &self.theme {
            theme.accent_color()?;
        }
        Ok(())
    }

    /// Initial value of the single select: the first catalog entry.
    #[must_use]
    pub fn default_option(&self) -> Option<SelectOption> {
        self.catalog.first().cloned()
    }

    /// Initial value of the multi select: the last catalog entry.
    #[must_use]
    pub fn default_options(&self) -> Vec<SelectOption> {
        self.catalog.last().cloned().into_iter().collect()
    }

    /// Accent color from the theme, if any.
    #[must_use]
    pub fn accent(&self) -> Option<Color> {
        self.theme
            .as_ref()
            .and_then(|t| t.accent_color().ok().flatten())
    }
}
