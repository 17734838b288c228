use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub target_count: i64,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

/// Both transitions are permitted; a finished campaign may be reopened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Running,
    Finished,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Running => "running",
            CampaignStatus::Finished => "finished",
        }
    }

    pub fn parse(value: &str) -> Option<CampaignStatus> {
        match value {
            "running" => Some(CampaignStatus::Running),
            "finished" => Some(CampaignStatus::Finished),
            _ => None,
        }
    }
}

/// Insert payload; the store assigns id, status and creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignDraft {
    pub name: String,
    pub description: String,
    pub target_count: i64,
}
