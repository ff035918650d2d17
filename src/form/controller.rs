use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::validation::{FieldLens, FormValidator, ValidationError};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifies one raised success flag. Only the holder of the current ticket
/// may lower it; every new submission and every teardown issues a new one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DismissTicket(pub u64);

impl DismissTicket {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub error: Option<E>,
    pub success_visible: bool,
}

impl<T, E> FormSnapshot<T, E> {
    pub fn is_submitting(&self) -> bool {
        self.submit_state == SubmitState::Submitting
    }
}

/// Result of the synchronous half of a submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitStart<T, E> {
    Rejected(E),
    Ready(T),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome<E> {
    Rejected(E),
    Failed(E),
    Sent(DismissTicket),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    AlreadySubmitting,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid submit state transition: {from:?} -> {to:?}")
            }
            FormError::AlreadySubmitting => f.write_str("form submit is already in progress"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

type FormValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;

struct FormState<T, E> {
    initial_model: T,
    model: T,
    submit_state: SubmitState,
    submit_count: u32,
    error: Option<E>,
    success_visible: bool,
    dismiss_ticket: DismissTicket,
}

#[derive(Clone)]
pub struct FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    state: Arc<RwLock<FormState<T, E>>>,
    validators: Arc<RwLock<Vec<FormValidatorFn<T, E>>>>,
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(FormState {
                initial_model: initial.clone(),
                model: initial,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                error: None,
                success_visible: false,
                dismiss_ticket: DismissTicket(0),
            })),
            validators: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_validator<V>(initial: T, validator: V) -> Self
    where
        V: FormValidator<T, E> + 'static,
    {
        let validator = Arc::new(validator);
        let wrapped: FormValidatorFn<T, E> = Arc::new(move |model: &T| validator.validate(model));
        let mut controller = Self::new(initial);
        controller.validators = Arc::new(RwLock::new(vec![wrapped]));
        controller
    }

    pub fn register_form_validator<V>(&self, validator: V) -> FormResult<()>
    where
        V: FormValidator<T, E> + 'static,
    {
        let validator = Arc::new(validator);
        let wrapped: FormValidatorFn<T, E> = Arc::new(move |model: &T| validator.validate(model));
        write_lock(&self.validators, "registering form validator")?.push(wrapped);
        Ok(())
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut state = write_lock(&self.state, "writing form model")?;
        lens.set(&mut state.model, value);
        Ok(())
    }

    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: FieldLens<T>,
    {
        Ok(lens
            .get(&read_lock(&self.state, "reading field value")?.model)
            .clone())
    }

    pub fn validate_form(&self) -> FormResult<Result<(), E>> {
        let model = read_lock(&self.state, "reading model for validation")?
            .model
            .clone();
        let validators = read_lock(&self.validators, "reading form validators")?.clone();
        for validator in validators {
            if let Err(error) = validator(&model) {
                return Ok(Err(error));
            }
        }
        Ok(Ok(()))
    }

    /// Clears the previous outcome, runs the validators and, when they pass,
    /// enters `Submitting` and hands back the model to deliver.
    pub fn begin_submit(&self) -> FormResult<SubmitStart<T, E>> {
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if matches!(
                state.submit_state,
                SubmitState::Validating | SubmitState::Submitting
            ) {
                return Err(FormError::AlreadySubmitting);
            }
            transition_submit_state(&mut state, SubmitState::Validating)?;
            state.submit_count = state.submit_count.saturating_add(1);
            state.error = None;
            state.success_visible = false;
            state.dismiss_ticket = state.dismiss_ticket.next();
        }

        if let Err(error) = self.validate_form()? {
            let mut state = write_lock(&self.state, "handling submit validation failure")?;
            transition_submit_state(&mut state, SubmitState::Failed)?;
            state.error = Some(error.clone());
            return Ok(SubmitStart::Rejected(error));
        }

        let mut state = write_lock(&self.state, "moving submit state to submitting")?;
        transition_submit_state(&mut state, SubmitState::Submitting)?;
        Ok(SubmitStart::Ready(state.model.clone()))
    }

    /// Applies the delivery result. Success resets the model to its initial
    /// value and raises the success flag under a fresh ticket.
    pub fn finish_submit(&self, result: Result<(), E>) -> FormResult<SubmitOutcome<E>> {
        let mut state = write_lock(&self.state, "completing submit")?;
        match result {
            Ok(()) => {
                transition_submit_state(&mut state, SubmitState::Succeeded)?;
                state.model = state.initial_model.clone();
                state.success_visible = true;
                state.dismiss_ticket = state.dismiss_ticket.next();
                Ok(SubmitOutcome::Sent(state.dismiss_ticket))
            }
            Err(error) => {
                transition_submit_state(&mut state, SubmitState::Failed)?;
                state.error = Some(error.clone());
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }

    pub async fn submit_async<F, Fut>(&self, deliver: F) -> FormResult<SubmitOutcome<E>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let model = match self.begin_submit()? {
            SubmitStart::Rejected(error) => return Ok(SubmitOutcome::Rejected(error)),
            SubmitStart::Ready(model) => model,
        };
        let result = deliver(model).await;
        self.finish_submit(result)
    }

    pub fn is_current_ticket(&self, ticket: DismissTicket) -> FormResult<bool> {
        Ok(read_lock(&self.state, "checking dismiss ticket")?.dismiss_ticket == ticket)
    }

    /// Lowers the success flag if `ticket` still owns it.
    pub fn dismiss_success(&self, ticket: DismissTicket) -> FormResult<bool> {
        let mut state = write_lock(&self.state, "dismissing success flag")?;
        if state.dismiss_ticket != ticket || !state.success_visible {
            return Ok(false);
        }
        state.success_visible = false;
        if state.submit_state == SubmitState::Succeeded {
            transition_submit_state(&mut state, SubmitState::Idle)?;
        }
        Ok(true)
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate_dismissal(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "invalidating dismiss ticket")?;
        state.dismiss_ticket = state.dismiss_ticket.next();
        Ok(())
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.model = state.initial_model.clone();
        state.submit_state = SubmitState::Idle;
        state.error = None;
        state.success_visible = false;
        state.dismiss_ticket = state.dismiss_ticket.next();
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            error: state.error.clone(),
            success_visible: state.success_visible,
        })
    }
}

fn transition_submit_state<T, E>(state: &mut FormState<T, E>, next: SubmitState) -> FormResult<()> {
    let current = state.submit_state;
    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Validating)
            | (SubmitState::Validating, SubmitState::Submitting)
            | (SubmitState::Validating, SubmitState::Failed)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Validating)
            | (SubmitState::Failed, SubmitState::Validating)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
