use serde::{Deserialize, Serialize};

/// Delivery channel of an outbound notification.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZmqChannel {
    Email,
    Sms,
}

/// File shipped with an e-mail notification.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZmqAttachment {
    pub filename: String,
    pub content_type: String,
    /// UTF-8 file body.
    pub content: String,
}

/// Message published on the notifier PUB socket for the mailer and SMS
/// workers.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZmqNotification {
    pub hub_id: i32,
    pub channel: ZmqChannel,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<ZmqAttachment>,
}
