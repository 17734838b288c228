use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::campaign::{CampaignId, CampaignStatus};

pub mod endpoints;
pub mod manager;
pub use endpoints::*;

/// Per-campaign event tallies. All five types are always present, zero
/// filled, even when the campaign has no events at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub open: u64,
    pub click: u64,
    pub submitted: u64,
    pub reported: u64,
    #[serde(rename = "downloaded_attachement")]
    pub downloaded: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignMetrics {
    pub campaign_id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub target_count: i64,
    pub counts: EventCounts,
    pub open_rate: f64,
    pub click_rate: f64,
    pub submitted_rate: f64,
    pub report_rate: f64,
    pub download_rate: f64,
}
