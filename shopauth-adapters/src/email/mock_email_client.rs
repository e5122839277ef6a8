use std::sync::{Arc, Mutex};

use shopauth_core::{Email, EmailClient};

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Email client for tests and local development: records instead of
/// sending, so reset-flow tests can read the token back out.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().expect("mailbox lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        self.sent
            .lock()
            .map_err(|e| e.to_string())?
            .push(SentEmail {
                recipient: recipient.expose().to_string(),
                subject: subject.to_string(),
                content: content.to_string(),
            });
        Ok(())
    }
}
