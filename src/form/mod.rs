mod controller;
mod validation;

#[cfg(test)]
mod tests;

pub use controller::{
    DismissTicket, FieldKey, FormController, FormError, FormResult, FormSnapshot, SubmitOutcome,
    SubmitStart, SubmitState,
};
pub use folio_contact_derive::FormModel;
pub use validation::{FieldLens, FormModel, FormValidator, ValidationError};
