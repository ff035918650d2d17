mod controller;
mod model;

#[cfg(test)]
mod tests;

pub use controller::{ContactController, ContactOptions, ContactSnapshot, DismissTimer};
pub use model::{
    ContactError, ContactForm, ContactFormEmailLens, ContactFormFields, ContactFormMessageLens,
    ContactFormNameLens, ErrorKind, is_valid_email, validate_contact,
};
