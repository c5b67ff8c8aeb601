//! Interaction scripts replayed against a form.

use crate::CliError;
use selecta_core::{Event, Key, MouseButton, Point, Widget};
use selecta_widgets::{Field, FormContainer, FormRejected, FormSubmitted, Select};
use serde::Deserialize;

/// Part of a field a pointer step aims at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Part {
    /// Center of the field (select: value area)
    #[default]
    Body,
    /// Select clear control
    Clear,
    /// Select caret
    Caret,
    /// Option row `index` of an open select
    Option,
    /// Badge `index` of a multi select
    Badge,
}

/// Pointer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct Target {
    pub(crate) field: Field,
    #[serde(default)]
    pub(crate) part: Part,
    #[serde(default)]
    pub(crate) index: usize,
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Step {
    /// Move focus to a field
    Focus(Field),
    /// Type text into the focused field
    Type(String),
    /// Press and release a key
    Key(Key),
    /// Click a target
    Click(Target),
    /// Move the pointer over a target
    Hover(Target),
    /// Submit the form directly
    Submit,
    /// Restore initial values
    Reset,
}

/// Parse a YAML list of steps.
pub(crate) fn parse(yaml: &str) -> Result<Vec<Step>, CliError> {
    serde_yaml_ng::from_str(yaml).map_err(CliError::Script)
}

fn select_for(form: &FormContainer, field: Field) -> Result<&Select, CliError> {
    match field {
        Field::Option => Ok(form.option_select()),
        Field::Options => form
            .options_select()
            .ok_or_else(|| CliError::Target("form has no multi select".to_string())),
        _ => Err(CliError::Target(format!("{field:?} is not a select"))),
    }
}

fn resolve(form: &FormContainer, target: Target) -> Result<Point, CliError> {
    let missing = |what: &str| CliError::Target(format!("{what} {} not found", target.index));
    let rect = match (target.field, target.part) {
        (Field::Nickname, Part::Body) => form.nickname_input().bounds(),
        (Field::Submit, Part::Body) => form.submit_button().bounds(),
        (Field::Option | Field::Options, part) => {
            let select = select_for(form, target.field)?;
            match part {
                Part::Body => select.value_rect(),
                Part::Clear => select.clear_rect(),
                Part::Caret => select.caret_rect(),
                Part::Option => select
                    .option_rect(target.index)
                    .ok_or_else(|| missing("option"))?,
                Part::Badge => select
                    .badge_rect(target.index)
                    .ok_or_else(|| missing("badge"))?,
            }
        }
        (field, part) => {
            return Err(CliError::Target(format!("{field:?} has no {part:?}")));
        }
    };
    Ok(rect.center())
}

/// Log a form outcome carried by `msg`.
///
/// Returns `Some(true)` for a submission, `Some(false)` for a rejection.
fn report(msg: Option<Box<dyn std::any::Any + Send>>) -> Option<bool> {
    let msg = msg?;
    if let Some(submitted) = msg.downcast_ref::<FormSubmitted>() {
        log::info!("step submitted nickname '{}'", submitted.state.nickname);
        Some(true)
    } else if let Some(rejected) = msg.downcast_ref::<FormRejected>() {
        log::info!("step rejected: {:?}", rejected.errors);
        Some(false)
    } else {
        None
    }
}

/// Apply one step to `form`.
pub(crate) fn apply(form: &mut FormContainer, step: &Step) -> Result<(), CliError> {
    log::debug!("step {step:?}");
    match step {
        Step::Focus(field) => form.focus(Some(*field)),
        Step::Type(text) => {
            for c in text.chars() {
                report(form.event(&Event::TextInput {
                    text: c.to_string(),
                }));
            }
        }
        Step::Key(key) => {
            report(form.event(&Event::KeyDown { key: *key }));
            report(form.event(&Event::KeyUp { key: *key }));
        }
        Step::Click(target) => {
            let position = resolve(form, *target)?;
            let button = MouseButton::Left;
            form.event(&Event::MouseMove { position });
            report(form.event(&Event::MouseDown { position, button }));
            report(form.event(&Event::MouseUp { position, button }));
        }
        Step::Hover(target) => {
            let position = resolve(form, *target)?;
            form.event(&Event::MouseMove { position });
        }
        Step::Submit => {
            report(Some(form.submit().into_message()));
        }
        Step::Reset => form.reset(),
    }
    Ok(())
}
