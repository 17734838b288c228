use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::employee::EmployeeId;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type EventId = TypedId<Event>;

/// A single recorded interaction, tied to one campaign and one employee.
/// Rows are append-only; repeated interactions of the same type are all
/// retained.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub campaign_id: CampaignId,
    pub employee_id: EmployeeId,
    pub email: String,
    pub ip: String,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
}

impl TypedIdMarker for Event {
    fn tag() -> &'static str {
        "EVT"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EventType {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "reported")]
    Reported,
    // Wire spelling kept for dashboard compatibility.
    #[serde(rename = "downloaded_attachement")]
    DownloadedAttachment,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Open,
        EventType::Click,
        EventType::Submitted,
        EventType::Reported,
        EventType::DownloadedAttachment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Open => "open",
            EventType::Click => "click",
            EventType::Submitted => "submitted",
            EventType::Reported => "reported",
            EventType::DownloadedAttachment => "downloaded_attachement",
        }
    }

    pub fn parse(value: &str) -> Option<EventType> {
        EventType::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventDraft {
    pub campaign_id: CampaignId,
    pub employee_id: EmployeeId,
    pub email: String,
    pub ip: String,
    pub event_type: EventType,
}
