//! Notifier test doubles

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eventhub::services::{EmailMessage, Notifier};
use eventhub::utils::errors::{EventHubError, Result};

/// Records every message instead of delivering it
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Always fails, for exercising the fire-and-forget paths
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _message: EmailMessage) -> Result<()> {
        Err(EventHubError::Email("simulated transport failure".to_string()))
    }
}
