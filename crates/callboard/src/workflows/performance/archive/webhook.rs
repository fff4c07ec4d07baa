use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::{ArchiveError, ArchivePublisher, ArchiveRecord};

/// Spreadsheet webhook (e.g. an Apps Script endpoint).
///
/// Delivery is fire-and-forget: `publish` schedules the POST on the current
/// tokio runtime and returns; the response is only logged.
#[derive(Debug, Clone)]
pub struct WebhookArchivePublisher {
    endpoint: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(flatten)]
    record: &'a ArchiveRecord,
    timestamp: String,
}

impl WebhookArchivePublisher {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self, ArchiveError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ArchiveError::Transport(err.to_string()))?;
        Ok(Self { endpoint, client })
    }

    /// Publisher that logs and skips every record.
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl ArchivePublisher for WebhookArchivePublisher {
    fn publish(&self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!(
                employee = %record.employee_name,
                "skipping spreadsheet export: archive webhook url is not configured"
            );
            return Ok(());
        };

        let handle = Handle::try_current()
            .map_err(|err| ArchiveError::Transport(format!("no async runtime: {err}")))?;

        let payload = WebhookPayload {
            record,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let request = self.client.post(endpoint).json(&payload);
        let employee = record.employee_name.clone();

        handle.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(%employee, "archive row delivered to spreadsheet webhook");
                }
                Ok(response) => {
                    warn!(%employee, status = %response.status(), "spreadsheet webhook rejected archive row");
                }
                Err(err) => {
                    warn!(%employee, error = %err, "spreadsheet webhook delivery failed");
                }
            }
        });

        Ok(())
    }
}
