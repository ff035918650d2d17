use std::time::{Duration, Instant};

use futures::executor::block_on;

use super::*;
use crate::form::{FieldKey, FormError, SubmitOutcome, SubmitStart, SubmitState, ValidationError};
use crate::i18n::I18nManager;
use crate::sender::{BoxedSendFuture, ContactMessage, MessageSender, SendError};

const INSTANT: ContactOptions = ContactOptions {
    send_delay: Duration::ZERO,
    success_display: Duration::ZERO,
};

struct FailingSender;

impl MessageSender for FailingSender {
    fn send<'a>(&'a self, _message: &'a ContactMessage) -> BoxedSendFuture<'a> {
        Box::pin(async { Err(SendError::new("smtp unreachable")) })
    }
}

fn filled(controller: &ContactController, name: &str, email: &str, message: &str) {
    controller.set_name(name).expect("set name");
    controller.set_email(email).expect("set email");
    controller.set_message(message).expect("set message");
}

fn sent_ticket(outcome: SubmitOutcome<ContactError>) -> crate::form::DismissTicket {
    match outcome {
        SubmitOutcome::Sent(ticket) => ticket,
        other => panic!("expected a sent outcome, got {other:?}"),
    }
}

#[test]
fn any_empty_field_is_missing() {
    let cases = [
        ContactForm::new("", "x@y.com", "hi"),
        ContactForm::new("Ana", "", "hi"),
        ContactForm::new("Ana", "x@y.com", ""),
        ContactForm::new("", "", ""),
    ];
    for form in cases {
        assert_eq!(
            validate_contact(&form),
            Err(ContactError::MissingFields),
            "{form:?}"
        );
    }
}

#[test]
fn whitespace_only_fields_count_as_present() {
    assert_eq!(
        validate_contact(&ContactForm::new(" ", "x@y.com", " ")),
        Ok(())
    );
}

#[test]
fn malformed_emails_are_rejected() {
    for email in [
        "not-an-email",
        "ana@example",
        "@example.com",
        "ana@.com",
        "ana @example.com",
        "ana@exa@mple.com",
        "ana@example.",
    ] {
        assert!(!is_valid_email(email), "{email} should be invalid");
        assert_eq!(
            validate_contact(&ContactForm::new("Ana", email, "hi")),
            Err(ContactError::InvalidEmail)
        );
    }
    for email in ["juan@example.com", "a@b.co", "first.last@sub.domain.pe"] {
        assert!(is_valid_email(email), "{email} should be valid");
    }
}

#[test]
fn missing_fields_lists_keys_in_form_order() {
    let form = ContactForm::new("", "x@y.com", "");
    assert_eq!(
        form.missing_fields(),
        vec![FieldKey::new("name"), FieldKey::new("message")]
    );
    assert!(ContactForm::default().is_empty());
    assert!(!form.is_empty());
}

#[test]
fn valid_submission_loads_then_clears_fields_and_shows_success() {
    let options = ContactOptions {
        send_delay: Duration::from_millis(40),
        success_display: Duration::from_secs(5),
    };
    let controller = ContactController::simulated(options);
    filled(&controller, "Juan Pérez", "juan@example.com", "Hola");

    let SubmitStart::Ready(form) = controller.begin_submit().expect("begin") else {
        panic!("valid form should be ready");
    };
    assert_eq!(form, ContactForm::new("Juan Pérez", "juan@example.com", "Hola"));

    let during = controller.snapshot().expect("snapshot");
    assert!(during.loading);
    assert!(!during.submitted);
    assert!(!controller.can_submit().expect("can submit"));

    let started = Instant::now();
    let result = block_on(controller.deliver(form));
    assert!(started.elapsed() >= Duration::from_millis(40));
    let outcome = controller.complete_submit(result).expect("complete");
    assert!(matches!(outcome, SubmitOutcome::Sent(_)));

    let after = controller.snapshot().expect("snapshot");
    assert!(after.submitted);
    assert!(!after.loading);
    assert!(after.error.is_none());
    assert_eq!(after.form, ContactForm::default());
    assert_eq!(after.submit_state, SubmitState::Succeeded);
}

#[test]
fn empty_name_is_rejected_immediately_without_loading() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "", "x@y.com", "hi");

    let outcome = block_on(controller.submit()).expect("submit");
    assert_eq!(outcome, SubmitOutcome::Rejected(ContactError::MissingFields));

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.error, Some(ContactError::MissingFields));
    assert!(!snapshot.loading);
    assert!(!snapshot.submitted);
    assert_eq!(snapshot.form, ContactForm::new("", "x@y.com", "hi"));
    assert!(controller.can_submit().expect("can submit"));
}

#[test]
fn malformed_email_is_rejected_immediately() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "not-an-email", "hi");

    let start = controller.begin_submit().expect("begin");
    assert_eq!(start, SubmitStart::Rejected(ContactError::InvalidEmail));
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.error, Some(ContactError::InvalidEmail));
    assert!(!snapshot.loading);
    assert_eq!(snapshot.form, ContactForm::new("Ana", "not-an-email", "hi"));
}

#[test]
fn next_attempt_clears_previous_error() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "not-an-email", "hi");
    let _ = controller.begin_submit().expect("first attempt");

    controller.set_email("ana@example.com").expect("fix email");
    let start = controller.begin_submit().expect("second attempt");
    assert!(matches!(start, SubmitStart::Ready(_)));
    assert!(controller.snapshot().expect("snapshot").error.is_none());
}

#[test]
fn resubmission_is_refused_while_loading() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "ana@example.com", "hi");

    let _ = controller.begin_submit().expect("first begin");
    assert_eq!(
        block_on(controller.submit()),
        Err(FormError::AlreadySubmitting)
    );
}

#[test]
fn delivery_fault_surfaces_as_submission_error() {
    let controller = ContactController::new(INSTANT, FailingSender);
    filled(&controller, "Ana", "ana@example.com", "hi");

    let outcome = block_on(controller.submit()).expect("submit");
    let expected = ContactError::SendFailed {
        reason: "smtp unreachable".to_string(),
    };
    assert_eq!(outcome, SubmitOutcome::Failed(expected.clone()));
    assert_eq!(expected.kind(), ErrorKind::Submission);

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.error, Some(expected));
    assert!(!snapshot.loading);
    assert!(!snapshot.submitted);
    assert_eq!(snapshot.form.name, "Ana");
}

#[test]
fn scheduled_dismiss_lowers_the_banner() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "ana@example.com", "hi");
    let ticket = sent_ticket(block_on(controller.submit()).expect("submit"));

    let (timer, wait) = controller.schedule_dismiss(ticket);
    assert_eq!(timer.ticket(), ticket);
    assert_eq!(block_on(wait), Ok(true));

    let snapshot = controller.snapshot().expect("snapshot");
    assert!(!snapshot.submitted);
    assert_eq!(snapshot.submit_state, SubmitState::Idle);
}

#[test]
fn dropped_timer_never_fires() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "ana@example.com", "hi");
    let ticket = sent_ticket(block_on(controller.submit()).expect("submit"));

    let (timer, wait) = controller.schedule_dismiss(ticket);
    timer.cancel();
    assert_eq!(block_on(wait), Ok(false));
    assert!(controller.snapshot().expect("snapshot").submitted);
}

#[test]
fn newer_submission_owns_the_banner() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "ana@example.com", "first");
    let first = sent_ticket(block_on(controller.submit()).expect("first submit"));
    let (_first_timer, first_wait) = controller.schedule_dismiss(first);

    filled(&controller, "Ana", "ana@example.com", "second");
    let second = sent_ticket(block_on(controller.submit()).expect("second submit"));
    assert_ne!(first, second);

    assert_eq!(block_on(first_wait), Ok(false));
    assert!(controller.snapshot().expect("snapshot").submitted);
    assert!(controller.dismiss_success(second).expect("dismiss"));
}

#[test]
fn teardown_disarms_pending_dismissal() {
    let controller = ContactController::simulated(INSTANT);
    filled(&controller, "Ana", "ana@example.com", "hi");
    let ticket = sent_ticket(block_on(controller.submit()).expect("submit"));
    let (_timer, wait) = controller.schedule_dismiss(ticket);

    controller.teardown().expect("teardown");
    assert_eq!(block_on(wait), Ok(false));
}

#[test]
fn set_by_key_routes_to_the_matching_field() {
    let controller = ContactController::simulated(INSTANT);
    assert!(
        controller
            .set_by_key(FieldKey::new("email"), "a@b.co".to_string())
            .expect("set email")
    );
    assert!(
        !controller
            .set_by_key(FieldKey::new("phone"), "123".to_string())
            .expect("set phone")
    );
    let form = controller.snapshot().expect("snapshot").form;
    assert_eq!(form.email, "a@b.co");
    assert_eq!(form.value_by_key(FieldKey::new("email")), Some("a@b.co"));
    assert_eq!(form.value_by_key(FieldKey::new("phone")), None);
}

#[test]
fn errors_render_through_the_catalog() {
    let es = I18nManager::with_locale("es");
    assert_eq!(
        ContactError::InvalidEmail.message(&es).to_string(),
        "Por favor, introduce un correo electrónico válido."
    );
    let failure = ContactError::SendFailed {
        reason: "timeout".to_string(),
    };
    assert_eq!(
        failure.message(&es).to_string(),
        "Hubo un error al enviar el mensaje. Intenta de nuevo más tarde."
    );
    assert_eq!(ContactError::MissingFields.kind(), ErrorKind::Validation);
}
