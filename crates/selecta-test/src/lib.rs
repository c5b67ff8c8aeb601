//! Testing harness for Selecta widgets.
//!
//! [`Harness`] owns a root widget, lays it out in a viewport and drives it
//! with synthetic input, keeping every message the widget emits.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]

mod harness;

pub use harness::Harness;
