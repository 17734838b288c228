use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::error::Error;

use super::{MailSender, OutgoingEmail};

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Delivers through an HTTP mail API. The API is expected to accept a JSON
/// payload and respond with a non-error status on acceptance.
pub struct HttpMailSender {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl HttpMailSender {
    pub fn new(api_url: String, api_token: Option<String>) -> HttpMailSender {
        HttpMailSender {
            client: reqwest::Client::new(),
            api_url,
            api_token,
        }
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    #[tracing::instrument(skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &OutgoingEmail) -> Result<(), Error> {
        let mut request = self.client.post(&self.api_url).json(&SendRequest {
            to: &email.to,
            subject: &email.subject,
            text: &email.body_text,
            html: &email.body_html,
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| Error::DeliveryFailed(err.to_string()))?;

        Ok(())
    }
}

/// Logs instead of sending. Used when no mail API is configured, so a
/// campaign can be exercised end to end without outbound mail.
pub struct DryRunMailSender;

#[async_trait]
impl MailSender for DryRunMailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), Error> {
        info!(to = %email.to, subject = %email.subject, "dry-run: not sending email");
        Ok(())
    }
}
