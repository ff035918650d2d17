use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use futures_timer::Delay;
use tracing::{debug, error, info, warn};

use super::model::{ContactError, ContactForm, validate_contact};
use crate::form::{
    DismissTicket, FieldKey, FieldLens, FormController, FormModel, FormResult, FormSnapshot,
    SubmitOutcome, SubmitStart, SubmitState,
};
use crate::sender::{ContactMessage, MessageSender, SimulatedSender};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContactOptions {
    /// How long the simulated delivery takes.
    pub send_delay: Duration,
    /// How long the success banner stays up.
    pub success_display: Duration,
}

impl Default for ContactOptions {
    fn default() -> Self {
        Self {
            send_delay: SimulatedSender::DEFAULT_DELAY,
            success_display: Duration::from_secs(5),
        }
    }
}

/// Everything the page needs to draw the form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactSnapshot {
    pub form: ContactForm,
    pub submitted: bool,
    pub error: Option<ContactError>,
    pub loading: bool,
    pub submit_state: SubmitState,
    pub submit_count: u32,
}

impl From<FormSnapshot<ContactForm, ContactError>> for ContactSnapshot {
    fn from(snapshot: FormSnapshot<ContactForm, ContactError>) -> Self {
        Self {
            loading: snapshot.is_submitting(),
            form: snapshot.model,
            submitted: snapshot.success_visible,
            error: snapshot.error,
            submit_state: snapshot.submit_state,
            submit_count: snapshot.submit_count,
        }
    }
}

/// Owner side of a scheduled banner dismissal. Dropping it aborts the wait.
#[derive(Debug)]
pub struct DismissTimer {
    handle: AbortHandle,
    ticket: DismissTicket,
}

impl DismissTimer {
    pub fn ticket(&self) -> DismissTicket {
        self.ticket
    }

    /// Aborts the wait; the abort itself happens in `Drop`.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// View-model of the contact form: field setters, the submission sequence
/// and the success banner lifetime.
#[derive(Clone)]
pub struct ContactController {
    form: FormController<ContactForm, ContactError>,
    sender: Arc<dyn MessageSender>,
    options: ContactOptions,
}

impl ContactController {
    pub fn new(options: ContactOptions, sender: impl MessageSender) -> Self {
        Self::with_shared_sender(options, Arc::new(sender))
    }

    pub fn with_shared_sender(options: ContactOptions, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            form: FormController::with_validator(ContactForm::default(), validate_contact),
            sender,
            options,
        }
    }

    pub fn simulated(options: ContactOptions) -> Self {
        Self::new(options, SimulatedSender::new(options.send_delay))
    }

    pub fn options(&self) -> ContactOptions {
        self.options
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<ContactForm>,
    {
        self.form.set(lens, value)
    }

    pub fn set_name(&self, value: impl Into<String>) -> FormResult<()> {
        self.set(ContactForm::fields().name(), value.into())
    }

    pub fn set_email(&self, value: impl Into<String>) -> FormResult<()> {
        self.set(ContactForm::fields().email(), value.into())
    }

    pub fn set_message(&self, value: impl Into<String>) -> FormResult<()> {
        self.set(ContactForm::fields().message(), value.into())
    }

    /// Returns `false` when `key` is not a contact form field.
    pub fn set_by_key(&self, key: FieldKey, value: String) -> FormResult<bool> {
        let fields = ContactForm::fields();
        if key == fields.name().key() {
            self.set(fields.name(), value)?;
        } else if key == fields.email().key() {
            self.set(fields.email(), value)?;
        } else if key == fields.message().key() {
            self.set(fields.message(), value)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    pub fn snapshot(&self) -> FormResult<ContactSnapshot> {
        Ok(self.form.snapshot()?.into())
    }

    pub fn can_submit(&self) -> FormResult<bool> {
        Ok(!self.snapshot()?.loading)
    }

    /// Synchronous half of a submission: clears the last error, validates and,
    /// on success, enters the loading state.
    pub fn begin_submit(&self) -> FormResult<SubmitStart<ContactForm, ContactError>> {
        let start = self.form.begin_submit()?;
        match &start {
            SubmitStart::Rejected(error) => warn!(%error, "contact form rejected"),
            SubmitStart::Ready(form) => debug!(email = %form.email, "contact form submitting"),
        }
        Ok(start)
    }

    pub fn deliver(
        &self,
        form: ContactForm,
    ) -> impl Future<Output = Result<(), ContactError>> + Send + 'static {
        let sender = self.sender.clone();
        async move {
            let message = ContactMessage::from(form);
            sender.send(&message).await.map_err(|send_error| {
                error!(error = %send_error, "contact message delivery failed");
                ContactError::SendFailed {
                    reason: send_error.to_string(),
                }
            })
        }
    }

    pub fn complete_submit(
        &self,
        result: Result<(), ContactError>,
    ) -> FormResult<SubmitOutcome<ContactError>> {
        let outcome = self.form.finish_submit(result)?;
        if let SubmitOutcome::Sent(ticket) = outcome {
            info!(ticket = ticket.0, "contact message sent");
        }
        Ok(outcome)
    }

    pub async fn submit(&self) -> FormResult<SubmitOutcome<ContactError>> {
        let outcome = self
            .form
            .submit_async(|form| {
                debug!(email = %form.email, "contact form submitting");
                self.deliver(form)
            })
            .await?;
        match &outcome {
            SubmitOutcome::Rejected(error) => warn!(%error, "contact form rejected"),
            SubmitOutcome::Sent(ticket) => info!(ticket = ticket.0, "contact message sent"),
            SubmitOutcome::Failed(_) => {}
        }
        Ok(outcome)
    }

    /// Arms the success banner timeout for `ticket`. The returned future
    /// resolves to `true` only if it lowered the banner; it resolves to
    /// `false` if the timer was dropped or a newer submission took over.
    pub fn schedule_dismiss(
        &self,
        ticket: DismissTicket,
    ) -> (
        DismissTimer,
        impl Future<Output = FormResult<bool>> + Send + 'static,
    ) {
        let (handle, registration) = AbortHandle::new_pair();
        let form = self.form.clone();
        let delay = self.options.success_display;
        let wait = Abortable::new(
            async move {
                if !delay.is_zero() {
                    Delay::new(delay).await;
                }
                let dismissed = form.dismiss_success(ticket);
                if let Ok(true) = dismissed {
                    debug!(ticket = ticket.0, "success banner dismissed");
                }
                dismissed
            },
            registration,
        );
        let future = async move { wait.await.unwrap_or(Ok(false)) };
        (DismissTimer { handle, ticket }, future)
    }

    pub fn dismiss_success(&self, ticket: DismissTicket) -> FormResult<bool> {
        self.form.dismiss_success(ticket)
    }

    /// Called when the page goes away; pending dismissals become no-ops.
    pub fn teardown(&self) -> FormResult<()> {
        self.form.invalidate_dismissal()
    }
}
