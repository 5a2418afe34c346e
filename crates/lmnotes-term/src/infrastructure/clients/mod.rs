use anyhow::Result;
use lmnotes_client::NotesApiBox;
use lmnotes_client::NotesApiFactory;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub struct NotesApiManager {}

impl NotesApiManager {
    /// HTTP client for the configured server.
    pub fn get() -> Result<NotesApiBox> {
        let server_url = Config::get(ConfigKey::ServerUrl);
        let timeout = Config::request_timeout()?;

        tracing::debug!(
            server_url = %server_url,
            timeout_ms = timeout.as_millis() as u64,
            "creating notes client"
        );

        NotesApiFactory::create_http_client(&server_url, timeout)
    }
}
