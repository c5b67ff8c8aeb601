//! Widgets for Selecta: the controlled [`Select`] and the demo form built
//! around it.

pub mod button;
pub mod form;
pub mod select;
pub mod text_input;

pub use button::{Button, ButtonClicked};
pub use form::{
    CollectSink, Field, FormContainer, FormMessage, FormRejected, FormState, FormSubmitted,
    LogSink, SubmitOutcome, SubmitSink,
};
pub use select::{RowState, Select, SelectChanged};
pub use text_input::{TextChanged, TextInput, TextSubmitted};
