use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_timer::Delay;
use tracing::debug;

/// What gets handed to a delivery backend once the form validates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SendError {
    reason: String,
}

impl SendError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for SendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for SendError {}

pub type BoxedSendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SendError>> + Send + 'a>>;

/// Delivery backend for contact messages. A mail or HTTP integration plugs
/// in here; the page only ever sees success or a `SendError`.
pub trait MessageSender: Send + Sync + 'static {
    fn send<'a>(&'a self, message: &'a ContactMessage) -> BoxedSendFuture<'a>;
}

impl<F> MessageSender for F
where
    F: for<'a> Fn(&'a ContactMessage) -> BoxedSendFuture<'a> + Send + Sync + 'static,
{
    fn send<'a>(&'a self, message: &'a ContactMessage) -> BoxedSendFuture<'a> {
        (self)(message)
    }
}

/// Waits `delay` and reports success. Stands in until a real backend exists.
#[derive(Clone, Copy, Debug)]
pub struct SimulatedSender {
    delay: Duration,
}

impl SimulatedSender {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1_500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSender {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl MessageSender for SimulatedSender {
    fn send<'a>(&'a self, message: &'a ContactMessage) -> BoxedSendFuture<'a> {
        Box::pin(async move {
            debug!(
                to = %message.email,
                delay_ms = self.delay.as_millis() as u64,
                "simulating contact message delivery"
            );
            if !self.delay.is_zero() {
                Delay::new(self.delay).await;
            }
            Ok(())
        })
    }
}
