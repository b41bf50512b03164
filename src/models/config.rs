//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::db::DatabaseSettings;

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_attachment_bytes() -> u64 {
    5 * 1024 * 1024
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default)]
    pub database: DatabaseSettings,
    /// Endpoint of the PUB socket used for outbound email and SMS.
    pub zmq_notifier_pub: String,
    pub templates_dir: String,
    /// Root directory for ticket attachments.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,
    pub secret: String,
    pub auth_service_url: String,
}
