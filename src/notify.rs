//! Outbound e-mail and SMS notifications.
//!
//! Messages are JSON-encoded [`ZmqNotification`] values published on a PUB
//! socket; the mailer and SMS workers subscribe on the other side.

use std::sync::Mutex;

use thiserror::Error;

use crate::models::zmq::{ZmqAttachment, ZmqChannel, ZmqNotification};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("zmq error: {0}")]
    Zmq(#[from] zmq::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("notifier socket is poisoned")]
    Poisoned,
}

/// Sink for outbound notifications.
#[cfg_attr(feature = "test-mocks", mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &ZmqNotification) -> Result<(), NotifyError>;
}

impl ZmqNotification {
    pub fn email(
        hub_id: i32,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            channel: ZmqChannel::Email,
            to: to.into(),
            subject: Some(subject.into()),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn sms(hub_id: i32, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            hub_id,
            channel: ZmqChannel::Sms,
            to: to.into(),
            subject: None,
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: ZmqAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Publishes notifications on a ZeroMQ PUB socket.
pub struct ZmqNotifier {
    socket: Mutex<zmq::Socket>,
    // Keeps the context alive for as long as the socket.
    _context: zmq::Context,
}

impl ZmqNotifier {
    /// Connects a PUB socket to `endpoint`.
    pub fn connect(endpoint: &str) -> Result<Self, NotifyError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.connect(endpoint)?;
        log::info!("Notifier publishing to {endpoint}");

        Ok(Self {
            socket: Mutex::new(socket),
            _context: context,
        })
    }
}

impl Notifier for ZmqNotifier {
    fn notify(&self, message: &ZmqNotification) -> Result<(), NotifyError> {
        let payload = serde_json::to_vec(message)?;
        let socket = self.socket.lock().map_err(|_| NotifyError::Poisoned)?;
        socket.send(payload, 0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_builder_sets_subject_and_channel() {
        let message = ZmqNotification::email(7, "owner@example.com", "Visit done", "Mowing done")
            .with_attachment(ZmqAttachment {
                filename: "quote_1.csv".into(),
                content_type: "text/csv".into(),
                content: "a,b".into(),
            });

        assert_eq!(message.channel, ZmqChannel::Email);
        assert_eq!(message.subject.as_deref(), Some("Visit done"));
        assert_eq!(
            message.attachment.as_ref().map(|a| a.filename.as_str()),
            Some("quote_1.csv")
        );
    }

    #[test]
    fn sms_builder_has_no_subject() {
        let message = ZmqNotification::sms(7, "+14155552671", "Reminder");
        assert_eq!(message.channel, ZmqChannel::Sms);
        assert!(message.subject.is_none());
    }

    #[test]
    fn notifier_publishes_without_subscribers() {
        let notifier = ZmqNotifier::connect("tcp://127.0.0.1:5599").expect("connects");
        let message = ZmqNotification::sms(1, "+14155552671", "Hello");
        notifier.notify(&message).expect("publishes");
    }
}
