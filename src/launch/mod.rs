use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::error::Error;

pub mod deliver;
pub mod endpoints;
pub mod generate;
pub mod manager;
pub use endpoints::*;

fn default_language() -> String {
    "English".to_owned()
}

/// One recipient in a launch request. Unknown emails are added to the
/// employee roster on first contact.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Target {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub business_unit: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// The tracking URLs embedded in a lure, all pointing back at this
/// service's event endpoints for one (campaign, email) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingLinks {
    pub open_url: String,
    pub click_url: String,
    pub report_url: String,
}

impl TrackingLinks {
    pub fn build(base_url: &str, campaign_id: CampaignId, email: &str) -> TrackingLinks {
        let base_url = base_url.trim_end_matches('/');
        let email = urlencoding::encode(email);

        TrackingLinks {
            open_url: format!(
                "{base_url}/events/track_open?email={email}&campaign_id={campaign_id}"
            ),
            click_url: format!(
                "{base_url}/events/track_click?email={email}&campaign_id={campaign_id}"
            ),
            report_url: format!(
                "{base_url}/events/track_reported?email={email}&campaign_id={campaign_id}"
            ),
        }
    }
}

/// Everything a generator needs to write one lure for one recipient.
#[derive(Clone, Debug)]
pub struct LureContext {
    pub target: Target,
    pub reason: String,
    pub link: String,
    pub tracking: TrackingLinks,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lure {
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

#[async_trait]
pub trait LureGenerator: Send + Sync {
    async fn generate_lure(&self, context: &LureContext) -> Result<Lure, Error>;
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_links_encode_the_email() {
        let links = TrackingLinks::build(
            "http://localhost:8080/",
            CampaignId::from_raw(4),
            "jo+test@example.com",
        );

        assert_eq!(
            links.open_url,
            "http://localhost:8080/events/track_open?email=jo%2Btest%40example.com&campaign_id=4"
        );
        assert_eq!(
            links.click_url,
            "http://localhost:8080/events/track_click?email=jo%2Btest%40example.com&campaign_id=4"
        );
        assert_eq!(
            links.report_url,
            "http://localhost:8080/events/track_reported?email=jo%2Btest%40example.com&campaign_id=4"
        );
    }
}
