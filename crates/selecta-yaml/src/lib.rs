//! YAML form manifests for Selecta.
//!
//! A manifest names the form variant, the nickname rules and the option
//! catalog shared by the form's selects. [`FormManifest::default`] is the
//! built-in Maslow catalog.

mod error;
mod manifest;

pub use error::ParseError;
pub use manifest::{maslow_catalog, FormManifest, FormVariant, NicknameRules, ThemeConfig};
