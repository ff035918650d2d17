use gpui::SharedString;

use super::controller::FieldKey;
use crate::i18n::I18nManager;

/// A user-facing failure carried by a form; rendered through the catalog.
pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message_key(&self) -> &'static str;

    fn message(&self, i18n: &I18nManager) -> SharedString {
        i18n.t(self.message_key())
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
    fn field_keys() -> &'static [FieldKey];
}

/// Whole-model check run on submit. The first failing validator wins.
pub trait FormValidator<T, E>: Send + Sync
where
    E: ValidationError,
{
    fn validate(&self, model: &T) -> Result<(), E>;
}

impl<T, E, F> FormValidator<T, E> for F
where
    E: ValidationError,
    F: Fn(&T) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T) -> Result<(), E> {
        (self)(model)
    }
}
