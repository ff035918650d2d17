use super::*;
use futures::executor::block_on;

#[derive(Clone, Debug, Eq, PartialEq)]
struct TestError(&'static str);

impl ValidationError for TestError {
    fn message_key(&self) -> &'static str {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, FormModel)]
struct SignupForm {
    email: String,
    nickname: String,
}

fn filled() -> SignupForm {
    SignupForm {
        email: "ana@example.com".to_string(),
        nickname: "ana".to_string(),
    }
}

fn require_email(model: &SignupForm) -> Result<(), TestError> {
    if model.email.is_empty() {
        Err(TestError("required"))
    } else {
        Ok(())
    }
}

fn controller_with_required_email() -> FormController<SignupForm, TestError> {
    FormController::with_validator(SignupForm::default(), require_email)
}

#[test]
fn field_lens_reads_and_writes_model() {
    let controller = controller_with_required_email();
    let fields = SignupForm::fields();

    controller
        .set(fields.nickname(), "juan".to_string())
        .expect("set must succeed");

    assert_eq!(controller.value(fields.nickname()).expect("value"), "juan");
    assert_eq!(fields.nickname().key().as_str(), "nickname");
    assert_eq!(
        controller.snapshot().expect("snapshot").model.nickname,
        "juan"
    );
}

#[test]
fn derived_keys_follow_declaration_order() {
    assert_eq!(
        SignupForm::field_keys(),
        &[FieldKey::new("email"), FieldKey::new("nickname")]
    );
    assert_eq!(SignupFormFields::KEYS.len(), 2);
}

#[test]
fn first_failing_validator_wins() {
    let controller = controller_with_required_email();
    controller
        .register_form_validator(|_: &SignupForm| -> Result<(), TestError> {
            Err(TestError("second"))
        })
        .expect("register validator");

    assert_eq!(
        controller.validate_form().expect("validate"),
        Err(TestError("required"))
    );

    controller
        .set(SignupForm::fields().email(), "x@y.com".to_string())
        .expect("set email");
    assert_eq!(
        controller.validate_form().expect("validate"),
        Err(TestError("second"))
    );
}

#[test]
fn rejected_submit_keeps_model_and_never_enters_submitting() {
    let controller = controller_with_required_email();
    let fields = SignupForm::fields();
    controller
        .set(fields.nickname(), "ana".to_string())
        .expect("set nickname");

    let start = controller.begin_submit().expect("begin submit");
    assert_eq!(start, SubmitStart::Rejected(TestError("required")));

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Failed);
    assert_eq!(snapshot.error, Some(TestError("required")));
    assert_eq!(snapshot.model.nickname, "ana");
    assert_eq!(snapshot.submit_count, 1);
    assert!(!snapshot.success_visible);
}

#[test]
fn successful_submit_resets_model_and_raises_success_flag() {
    let controller = FormController::with_validator(filled(), require_email);
    let delivered = std::sync::Arc::new(std::sync::Mutex::new(None));
    let sink = delivered.clone();

    let outcome = block_on(controller.submit_async(move |model: SignupForm| async move {
        *sink.lock().expect("sink lock") = Some(model);
        Ok(())
    }))
    .expect("submit");

    assert!(matches!(outcome, SubmitOutcome::Sent(_)));
    assert_eq!(
        delivered.lock().expect("delivered lock").clone(),
        Some(filled())
    );

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Succeeded);
    assert!(snapshot.success_visible);
    assert!(snapshot.error.is_none());
    // initial model of this controller is the filled form
    assert_eq!(snapshot.model, filled());
}

#[test]
fn submit_is_refused_while_delivery_is_in_flight() {
    let controller = FormController::with_validator(filled(), require_email);

    assert!(matches!(
        controller.begin_submit().expect("first begin"),
        SubmitStart::Ready(_)
    ));
    assert!(controller.snapshot().expect("snapshot").is_submitting());
    assert_eq!(
        controller.begin_submit(),
        Err(FormError::AlreadySubmitting)
    );
}

#[test]
fn failed_delivery_records_error_and_allows_retry() {
    let controller = FormController::with_validator(filled(), require_email);

    let outcome = block_on(
        controller.submit_async(|_model: SignupForm| async { Err(TestError("send failed")) }),
    )
    .expect("submit");
    assert_eq!(outcome, SubmitOutcome::Failed(TestError("send failed")));

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Failed);
    assert_eq!(snapshot.model, filled());

    let retry = block_on(controller.submit_async(|_model: SignupForm| async { Ok(()) }))
        .expect("retry");
    assert!(matches!(retry, SubmitOutcome::Sent(_)));
    assert!(controller.snapshot().expect("snapshot").error.is_none());
}

#[test]
fn dismiss_only_honours_the_current_ticket() {
    let controller = FormController::with_validator(filled(), require_email);

    let SubmitOutcome::Sent(first) =
        block_on(controller.submit_async(|_model: SignupForm| async { Ok(()) })).expect("first")
    else {
        panic!("first submit should be sent");
    };
    let SubmitOutcome::Sent(second) =
        block_on(controller.submit_async(|_model: SignupForm| async { Ok(()) })).expect("second")
    else {
        panic!("second submit should be sent");
    };

    assert_ne!(first, second);
    assert!(!controller.dismiss_success(first).expect("stale dismiss"));
    assert!(controller.snapshot().expect("snapshot").success_visible);

    assert!(controller.dismiss_success(second).expect("current dismiss"));
    let snapshot = controller.snapshot().expect("snapshot");
    assert!(!snapshot.success_visible);
    assert_eq!(snapshot.submit_state, SubmitState::Idle);
}

#[test]
fn invalidated_ticket_cannot_dismiss() {
    let controller = FormController::with_validator(filled(), require_email);
    let SubmitOutcome::Sent(ticket) =
        block_on(controller.submit_async(|_model: SignupForm| async { Ok(()) })).expect("submit")
    else {
        panic!("submit should be sent");
    };

    controller.invalidate_dismissal().expect("invalidate");
    assert!(!controller.is_current_ticket(ticket).expect("ticket check"));
    assert!(!controller.dismiss_success(ticket).expect("dismiss"));
}

#[test]
fn finishing_without_starting_is_an_invalid_transition() {
    let controller = controller_with_required_email();
    assert_eq!(
        controller.finish_submit(Ok(())),
        Err(FormError::InvalidStateTransition {
            from: SubmitState::Idle,
            to: SubmitState::Succeeded,
        })
    );
}

#[test]
fn reset_restores_initial_model_and_clears_outcome() {
    let controller = controller_with_required_email();
    let fields = SignupForm::fields();
    controller
        .set(fields.nickname(), "ana".to_string())
        .expect("set nickname");
    let _ = controller.begin_submit().expect("begin");

    controller.reset_to_initial().expect("reset");
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.model, SignupForm::default());
    assert_eq!(snapshot.submit_state, SubmitState::Idle);
    assert!(snapshot.error.is_none());
}

#[test]
fn concurrent_begin_lets_only_one_caller_through() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    let entered = Arc::new(Barrier::new(2));
    let first_call = Arc::new(AtomicBool::new(true));
    let validator_entered = entered.clone();
    let controller = FormController::with_validator(filled(), move |model: &SignupForm| {
        if first_call.swap(false, Ordering::SeqCst) {
            validator_entered.wait();
            thread::sleep(Duration::from_millis(50));
        }
        require_email(model)
    });

    let racing = controller.clone();
    let first = thread::spawn(move || racing.begin_submit());
    entered.wait();
    let second = controller.begin_submit();
    let first = first.join().expect("first caller thread");

    assert_eq!(second, Err(FormError::AlreadySubmitting));
    assert!(matches!(first, Ok(SubmitStart::Ready(_))));
    assert_eq!(controller.snapshot().expect("snapshot").submit_count, 1);
}

#[test]
fn finishing_twice_is_an_invalid_transition() {
    let controller = FormController::with_validator(filled(), require_email);
    let _ = controller.begin_submit().expect("begin");
    assert!(matches!(
        controller.finish_submit(Ok(())).expect("first finish"),
        SubmitOutcome::Sent(_)
    ));
    assert_eq!(
        controller.finish_submit(Ok(())),
        Err(FormError::InvalidStateTransition {
            from: SubmitState::Succeeded,
            to: SubmitState::Succeeded,
        })
    );
}
